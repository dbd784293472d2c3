//! The sealed registry and its public encode/decode surface.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;

use element::Element;
use kumiki::decoder::Decoder;
use kumiki::encoder::Encoder;

use crate::builder::RegistryBuilder;
use crate::decode::ObjectDecoder;
use crate::descriptor::{DescriptorId, Kind, Shape, TypeDescriptor};
use crate::discovery::Discovery;
use crate::encode::ObjectEncoder;
use crate::error::Error;
use crate::reflect::{Object, ObjectRef, Reflect};
use crate::view::Diagnostic;

/// Checked, immutable set of descriptors. Cheap to share across threads.
pub struct Registry {
    descriptors: Vec<TypeDescriptor>,
    by_type: HashMap<TypeId, DescriptorId>,
    by_tag: HashMap<String, DescriptorId>,
    discovery: Arc<dyn Discovery + Send + Sync>,
    scope: String,
}

impl Registry {
    pub(crate) fn new(builder: RegistryBuilder, by_tag: HashMap<String, DescriptorId>) -> Self {
        Registry {
            descriptors: builder.descriptors,
            by_type: builder.by_type,
            by_tag,
            discovery: builder.discovery,
            scope: builder.scope,
        }
    }

    /// Reopens the registry for further registration. The result has to be
    /// sealed again.
    pub fn into_builder(self) -> RegistryBuilder {
        RegistryBuilder {
            discovery: self.discovery,
            scope: self.scope,
            descriptors: self.descriptors,
            by_type: self.by_type,
        }
    }

    pub fn descriptor<T: Reflect>(&self) -> Option<&TypeDescriptor> {
        self.by_type_id(TypeId::of::<T>())
    }

    /// The class descriptor whose tag is `tag`.
    pub fn descriptor_by_tag(&self, tag: &str) -> Option<&TypeDescriptor> {
        let id = self.by_tag.get(tag)?;
        Some(&self.descriptors[id.0])
    }

    pub fn descriptors(&self) -> &[TypeDescriptor] {
        &self.descriptors
    }

    /// The descriptor behind `id`, or `None` for an id handed out by another
    /// registry.
    pub fn descriptor_by_id(&self, id: DescriptorId) -> Option<&TypeDescriptor> {
        self.descriptors.get(id.0)
    }

    // Only for ids recorded by this registry's own descriptors.
    pub(crate) fn get(&self, id: DescriptorId) -> &TypeDescriptor {
        &self.descriptors[id.0]
    }

    pub(crate) fn by_type_id(&self, id: TypeId) -> Option<&TypeDescriptor> {
        let id = self.by_type.get(&id)?;
        Some(&self.descriptors[id.0])
    }

    /// Whether an element tagged `tag` can stand for the type `nested`: the
    /// class itself, or any implementor of the interface.
    pub(crate) fn tag_matches(&self, nested: DescriptorId, tag: &str) -> bool {
        let descriptor = self.get(nested);
        match &descriptor.shape {
            Shape::Class(_) => descriptor.tag() == tag,
            Shape::Interface(interface) => interface
                .implementors
                .iter()
                .any(|id| self.get(*id).tag() == tag),
            Shape::Enum(_) => false,
        }
    }

    pub(crate) fn is_instance(&self, nested: DescriptorId, object: ObjectRef<'_>) -> bool {
        let descriptor = self.get(nested);
        let actual = object.reflect_type_id();
        match &descriptor.shape {
            Shape::Class(_) => descriptor.type_id() == actual,
            Shape::Interface(interface) => interface
                .implementors
                .iter()
                .any(|id| self.get(*id).type_id() == actual),
            Shape::Enum(e) => e.constants().iter().any(|c| c.is_instance(object)),
        }
    }

    /// Appends the element for `value` to `parent`. Returns `false` when the
    /// concrete type of `value` is not registered.
    pub fn encode_into<T: Reflect>(&self, value: &T, parent: &mut Element) -> Result<bool, Error> {
        ObjectEncoder::new(self).encode(value.as_object(), parent)
    }

    pub fn encode_into_required<T: Reflect>(
        &self,
        value: &T,
        parent: &mut Element,
    ) -> Result<(), Error> {
        if self.encode_into(value, parent)? {
            return Ok(());
        }
        Err(not_registered(value.as_object()))
    }

    /// Builds the element for `value`, or `None` when its concrete type is
    /// not registered.
    pub fn to_element<T: Reflect>(&self, value: &T) -> Result<Option<Element>, Error> {
        let mut holder = Element::new(type_name::<T>());
        if !self.encode_into(value, &mut holder)? {
            return Ok(None);
        }
        let mut children = holder.into_children();
        if children.len() != 1 {
            return Err(Error::Ambiguity {
                element: value.as_object().reflect_type_name().to_string(),
                tag: "*".to_string(),
                count: children.len(),
            });
        }
        Ok(children.pop())
    }

    pub fn to_element_required<T: Reflect>(&self, value: &T) -> Result<Element, Error> {
        self.to_element(value)?
            .ok_or_else(|| not_registered(value.as_object()))
    }

    /// Renders `value` as indented markup.
    pub fn to_xml_string<T: Reflect>(&self, value: &T) -> Result<Option<String>, Error> {
        match self.to_element(value)? {
            Some(element) => Ok(Some(element.encode()?)),
            None => Ok(None),
        }
    }

    pub fn to_xml_string_required<T: Reflect>(&self, value: &T) -> Result<String, Error> {
        Ok(self.to_element_required(value)?.encode()?)
    }

    /// Decodes `element` into an object of whatever class its tag names.
    pub fn from_element(&self, element: &Element) -> Result<Option<Object>, Error> {
        self.decode_with_diagnostics(element)
            .map(|(object, _)| object)
    }

    /// Like [`Registry::from_element`], also returning every attribute and
    /// child element that was not consumed. Each of them is logged as a
    /// warning as well.
    pub fn decode_with_diagnostics(
        &self,
        element: &Element,
    ) -> Result<(Option<Object>, Vec<Diagnostic>), Error> {
        let mut decoder = ObjectDecoder::new(self);
        let object = decoder.decode(element)?;
        Ok((object, decoder.into_diagnostics()))
    }

    /// Decodes `element` as a `T`. `T` may be an interface.
    pub fn from_element_as<T: Reflect>(&self, element: &Element) -> Result<Option<T>, Error> {
        let Some(object) = self.from_element(element)? else {
            return Ok(None);
        };
        T::from_object(object)
            .map(Some)
            .map_err(|object| Error::TypeMismatch {
                element: element.tag().to_string(),
                param: "root".to_string(),
                expected: type_name::<T>().to_string(),
                found: object.reflect_type_name().to_string(),
            })
    }

    pub fn from_element_required<T: Reflect>(&self, element: &Element) -> Result<T, Error> {
        self.from_element_as(element)?
            .ok_or_else(|| Error::UnknownTag(element.tag().to_string()))
    }

    /// Parses `text` and decodes its root element as a `T`.
    pub fn from_xml_str<T: Reflect>(&self, text: &str) -> Result<Option<T>, Error> {
        let element: Element = text.decode()?;
        self.from_element_as(&element)
    }

    pub fn from_xml_str_required<T: Reflect>(&self, text: &str) -> Result<T, Error> {
        let element: Element = text.decode()?;
        self.from_element_required(&element)
    }

    fn write_param_type(
        &self,
        f: &mut Formatter<'_>,
        kind: Kind,
        nested: Option<DescriptorId>,
    ) -> fmt::Result {
        match (kind, nested) {
            (Kind::List, Some(id)) => write!(f, "list<{}>", self.get(id).name()),
            (Kind::Class, Some(id)) => f.write_str(self.get(id).name()),
            _ => write!(f, "{kind}"),
        }
    }
}

fn not_registered(object: ObjectRef<'_>) -> Error {
    Error::UnsupportedType {
        type_name: object.reflect_type_name().to_string(),
        reason: "type is not registered".to_string(),
    }
}

/// Lists interfaces with their implementors, classes with their
/// parameters, then enums with their constants.
impl Display for Registry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for descriptor in &self.descriptors {
            if let Shape::Interface(interface) = &descriptor.shape {
                writeln!(f, "interface {}", descriptor.name())?;
                for id in &interface.implementors {
                    writeln!(f, "    {}", self.get(*id).tag())?;
                }
            }
        }
        for descriptor in &self.descriptors {
            let Shape::Class(class) = &descriptor.shape else {
                continue;
            };
            write!(f, "class {}", descriptor.name())?;
            if descriptor.tag() != descriptor.name() {
                write!(f, " <{}>", descriptor.tag())?;
            }
            if descriptor.has_converter() {
                f.write_str(" (converter)")?;
            }
            writeln!(f)?;
            for param in &class.params {
                write!(f, "    {}: ", param.attr())?;
                self.write_param_type(f, param.kind, param.nested)?;
                if param.optional {
                    f.write_str("?")?;
                }
                if param.explicit {
                    f.write_str(" explicit")?;
                }
                if param.default.is_some() {
                    f.write_str(" default")?;
                }
                writeln!(f)?;
            }
        }
        for descriptor in &self.descriptors {
            if let Shape::Enum(e) = &descriptor.shape {
                writeln!(f, "enum {}", descriptor.name())?;
                for constant in e.constants() {
                    writeln!(f, "    {}", constant.name())?;
                }
            }
        }
        Ok(())
    }
}

impl Debug for Registry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("scope", &self.scope)
            .field("descriptors", &self.descriptors)
            .finish()
    }
}
