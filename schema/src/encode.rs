//! Object to element tree.

use element::Element;
use log::trace;

use crate::descriptor::{Kind, ParamDescriptor, Shape, TypeDescriptor};
use crate::error::Error;
use crate::reflect::{FieldRef, ObjectRef};
use crate::registry::Registry;

pub(crate) struct ObjectEncoder<'r> {
    registry: &'r Registry,
}

impl<'r> ObjectEncoder<'r> {
    pub(crate) fn new(registry: &'r Registry) -> Self {
        ObjectEncoder { registry }
    }

    /// Appends the element for `object` to `parent`. Returns `false` when the
    /// concrete type of `object` is not registered.
    pub(crate) fn encode(
        &self,
        object: ObjectRef<'_>,
        parent: &mut Element,
    ) -> Result<bool, Error> {
        let Some(descriptor) = self.registry.by_type_id(object.reflect_type_id()) else {
            trace!("{} is not registered", object.reflect_type_name());
            return Ok(false);
        };

        if let Some(converter) = &descriptor.converter {
            if converter.to_element(&FieldRef::Object(object), parent)? {
                return Ok(true);
            }
        }
        let Shape::Class(class) = &descriptor.shape else {
            return Ok(false);
        };

        let element = parent.push_child(Element::new(descriptor.tag()));
        for param in &class.params {
            let value = param.field.get(object).ok_or_else(|| Error::TypeMismatch {
                element: descriptor.tag().to_string(),
                param: param.name.to_string(),
                expected: descriptor.path().to_string(),
                found: object.reflect_type_name().to_string(),
            })?;
            if let Some(converter) = &param.converter {
                if converter.to_element(&value, element)? {
                    continue;
                }
            }
            self.encode_param(descriptor, param, value, element)?;
        }
        Ok(true)
    }

    fn encode_param(
        &self,
        owner: &TypeDescriptor,
        param: &ParamDescriptor,
        value: FieldRef<'_>,
        element: &mut Element,
    ) -> Result<(), Error> {
        let attr = param.attr();
        match (param.kind, value) {
            (_, FieldRef::Null) => {
                if !param.is_nullable() {
                    return Err(Error::NullValue {
                        type_name: owner.name().to_string(),
                        param: param.name.to_string(),
                    });
                }
            }
            (Kind::Int, FieldRef::Int(v)) => element.set_attribute(attr, v.to_string()),
            (Kind::Float, FieldRef::Float(v)) => element.set_attribute(attr, format!("{v:?}")),
            (Kind::Bool, FieldRef::Bool(v)) => element.set_attribute(attr, v.to_string()),
            (Kind::Str, FieldRef::Str(v)) => element.set_attribute(attr, v),
            (Kind::Class, FieldRef::Object(object)) => {
                let nested = param.nested.map(|id| self.registry.get(id));
                if let Some(Shape::Enum(e)) = nested.map(|d| &d.shape) {
                    let constant = e
                        .constants()
                        .iter()
                        .find(|c| c.is_instance(object))
                        .ok_or_else(|| self.mismatch(owner, param, object.reflect_type_name()))?;
                    element.set_attribute(attr, constant.name());
                } else if param.explicit {
                    let wrapper = element.push_child(Element::new(attr));
                    self.encode_nested(owner, param, object, wrapper)?;
                } else {
                    self.encode_nested(owner, param, object, element)?;
                }
            }
            (Kind::List, FieldRef::List(items)) => {
                let target = if param.explicit {
                    element.push_child(Element::new(attr))
                } else {
                    element
                };
                for item in items {
                    self.encode_nested(owner, param, item, target)?;
                }
            }
            (_, other) => return Err(self.mismatch(owner, param, &other.describe())),
        }
        Ok(())
    }

    fn encode_nested(
        &self,
        owner: &TypeDescriptor,
        param: &ParamDescriptor,
        object: ObjectRef<'_>,
        parent: &mut Element,
    ) -> Result<(), Error> {
        if self.encode(object, parent)? {
            return Ok(());
        }
        Err(Error::UnsupportedType {
            type_name: object.reflect_type_name().to_string(),
            reason: format!("cannot encode {}.{}", owner.name(), param.name),
        })
    }

    fn mismatch(&self, owner: &TypeDescriptor, param: &ParamDescriptor, found: &str) -> Error {
        Error::TypeMismatch {
            element: owner.tag().to_string(),
            param: param.name.to_string(),
            expected: param.ty.path().to_string(),
            found: found.to_string(),
        }
    }
}
