//! Element tree to object.

use element::Element;
use log::trace;

use crate::descriptor::{ClassDescriptor, DescriptorId, Kind, ParamDescriptor, Shape};
use crate::error::Error;
use crate::reflect::{Args, Object, Value};
use crate::registry::Registry;
use crate::view::{Diagnostic, ElementView};

pub(crate) struct ObjectDecoder<'r> {
    registry: &'r Registry,
    diagnostics: Vec<Diagnostic>,
}

/// Shared position in the candidate children for positional matching.
struct Cursor<'c> {
    candidates: &'c [usize],
    next: usize,
}

impl Cursor<'_> {
    /// The next candidate nobody has consumed yet. Converters may consume
    /// candidates out of order.
    fn peek(&mut self, view: &ElementView<'_>) -> Option<usize> {
        while let Some(&index) = self.candidates.get(self.next) {
            if !view.is_child_used(index) {
                return Some(index);
            }
            self.next += 1;
        }
        None
    }

    fn advance(&mut self) {
        self.next += 1;
    }
}

impl<'r> ObjectDecoder<'r> {
    pub(crate) fn new(registry: &'r Registry) -> Self {
        ObjectDecoder {
            registry,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Decodes `element`, or returns `None` when no class is registered for
    /// its tag.
    pub(crate) fn decode(&mut self, element: &Element) -> Result<Option<Object>, Error> {
        let registry = self.registry;
        let Some(descriptor) = registry.descriptor_by_tag(element.tag()) else {
            trace!("no class registered for <{}>", element.tag());
            return Ok(None);
        };
        let mut view = ElementView::new(element);

        if let Some(converter) = &descriptor.converter {
            if let Some(value) = converter.from_element(&mut view)? {
                self.finish(&view);
                return match value {
                    Value::Object(object) => Ok(Some(object)),
                    other => Err(Error::TypeMismatch {
                        element: element.tag().to_string(),
                        param: "converter".to_string(),
                        expected: descriptor.path().to_string(),
                        found: other.describe(),
                    }),
                };
            }
        }

        let Shape::Class(class) = &descriptor.shape else {
            return Ok(None);
        };
        let candidates = view.candidate_children();
        let mut cursor = Cursor {
            candidates: &candidates,
            next: 0,
        };

        let mut values = Vec::with_capacity(class.params.len());
        for param in &class.params {
            let converted = match &param.converter {
                Some(converter) => converter.from_element(&mut view)?,
                None => None,
            };
            let value = match converted {
                Some(value) => value,
                None => self.resolve(class, param, &mut view, &mut cursor)?,
            };
            values.push(value);
        }
        self.finish(&view);

        let names = class.params.iter().map(|p| p.name).collect();
        let args = Args::new(element.tag(), names, values);
        class.constructor.invoke(args).map(Some)
    }

    fn finish(&mut self, view: &ElementView<'_>) {
        self.diagnostics.extend(view.report_unused());
    }

    fn resolve(
        &mut self,
        class: &ClassDescriptor,
        param: &ParamDescriptor,
        view: &mut ElementView<'_>,
        cursor: &mut Cursor<'_>,
    ) -> Result<Value, Error> {
        let Some(nested) = param.nested else {
            return self.resolve_scalar(param, view);
        };
        if self.registry.get(nested).is_enum() {
            return self.resolve_enum(param, nested, view);
        }

        match (param.kind, param.explicit, class.no_order) {
            (Kind::List, true, _) => self.explicit_list(param, nested, view),
            (Kind::List, false, true) => self.unordered_list(param, nested, view),
            (Kind::List, false, false) => self.ordered_list(param, nested, view, cursor),
            (_, true, _) => self.explicit_class(param, nested, view),
            (_, false, true) => self.unordered_class(param, nested, view),
            (_, false, false) => self.ordered_class(param, nested, view, cursor),
        }
    }

    fn resolve_scalar(
        &mut self,
        param: &ParamDescriptor,
        view: &mut ElementView<'_>,
    ) -> Result<Value, Error> {
        let attr = param.attr();
        match view.use_attr(attr) {
            Some(text) => parse_literal(param.kind, view.tag(), attr, text),
            None => or_default(param, || Error::MissingAttribute {
                element: view.tag().to_string(),
                attribute: attr.to_string(),
            }),
        }
    }

    fn resolve_enum(
        &mut self,
        param: &ParamDescriptor,
        nested: DescriptorId,
        view: &mut ElementView<'_>,
    ) -> Result<Value, Error> {
        let attr = param.attr();
        let Some(text) = view.use_attr(attr) else {
            return or_default(param, || Error::MissingAttribute {
                element: view.tag().to_string(),
                attribute: attr.to_string(),
            });
        };
        let descriptor = self.registry.get(nested);
        descriptor
            .as_enum()
            .and_then(|e| e.constant(text))
            .map(|constant| Value::Object(constant.instance()))
            .ok_or_else(|| Error::UnknownEnumValue {
                enum_name: descriptor.name().to_string(),
                value: text.to_string(),
            })
    }

    fn explicit_class(
        &mut self,
        param: &ParamDescriptor,
        nested: DescriptorId,
        view: &mut ElementView<'_>,
    ) -> Result<Value, Error> {
        let Some(wrapper) = view.use_child_by_tag(param.attr())? else {
            return or_default(param, || self.missing(view.tag(), param, nested));
        };
        let child = match wrapper.children() {
            [child] => child,
            children => {
                return Err(Error::Ambiguity {
                    element: view.tag().to_string(),
                    tag: wrapper.tag().to_string(),
                    count: children.len(),
                });
            }
        };
        self.decode_nested(view.tag(), param, nested, child)
            .map(Value::Object)
    }

    fn unordered_class(
        &mut self,
        param: &ParamDescriptor,
        nested: DescriptorId,
        view: &mut ElementView<'_>,
    ) -> Result<Value, Error> {
        let registry = self.registry;
        let found = view.candidate_children().into_iter().find(|&i| {
            !view.is_child_used(i) && registry.tag_matches(nested, view.child(i).tag())
        });
        match found {
            Some(index) => {
                let child = view.use_child(index);
                self.decode_nested(view.tag(), param, nested, child)
                    .map(Value::Object)
            }
            None => or_default(param, || self.missing(view.tag(), param, nested)),
        }
    }

    fn ordered_class(
        &mut self,
        param: &ParamDescriptor,
        nested: DescriptorId,
        view: &mut ElementView<'_>,
        cursor: &mut Cursor<'_>,
    ) -> Result<Value, Error> {
        match cursor.peek(view) {
            Some(index) if self.registry.tag_matches(nested, view.child(index).tag()) => {
                cursor.advance();
                let child = view.use_child(index);
                self.decode_nested(view.tag(), param, nested, child)
                    .map(Value::Object)
            }
            _ => or_default(param, || self.missing(view.tag(), param, nested)),
        }
    }

    /// An absent wrapper is an empty list.
    fn explicit_list(
        &mut self,
        param: &ParamDescriptor,
        nested: DescriptorId,
        view: &mut ElementView<'_>,
    ) -> Result<Value, Error> {
        let Some(wrapper) = view.use_child_by_tag(param.attr())? else {
            return Ok(Value::List(Vec::new()));
        };
        let mut items = Vec::with_capacity(wrapper.children().len());
        for child in wrapper.children() {
            items.push(self.decode_nested(view.tag(), param, nested, child)?);
        }
        Ok(Value::List(items))
    }

    fn unordered_list(
        &mut self,
        param: &ParamDescriptor,
        nested: DescriptorId,
        view: &mut ElementView<'_>,
    ) -> Result<Value, Error> {
        let mut items = Vec::new();
        for index in view.candidate_children() {
            let tag = view.child(index).tag();
            if view.is_child_used(index) || !self.registry.tag_matches(nested, tag) {
                continue;
            }
            let child = view.use_child(index);
            items.push(self.decode_nested(view.tag(), param, nested, child)?);
        }
        Ok(Value::List(items))
    }

    /// Takes the longest run of matching candidates at the cursor.
    fn ordered_list(
        &mut self,
        param: &ParamDescriptor,
        nested: DescriptorId,
        view: &mut ElementView<'_>,
        cursor: &mut Cursor<'_>,
    ) -> Result<Value, Error> {
        let mut items = Vec::new();
        while let Some(index) = cursor.peek(view) {
            if !self.registry.tag_matches(nested, view.child(index).tag()) {
                break;
            }
            cursor.advance();
            let child = view.use_child(index);
            items.push(self.decode_nested(view.tag(), param, nested, child)?);
        }
        Ok(Value::List(items))
    }

    fn decode_nested(
        &mut self,
        owner: &str,
        param: &ParamDescriptor,
        nested: DescriptorId,
        child: &Element,
    ) -> Result<Object, Error> {
        let registry = self.registry;
        let mismatch = |found: String| Error::TypeMismatch {
            element: owner.to_string(),
            param: param.name.to_string(),
            expected: registry.get(nested).path().to_string(),
            found,
        };
        let Some(object) = self.decode(child)? else {
            return Err(mismatch(format!("<{}>", child.tag())));
        };
        if !registry.is_instance(nested, &*object) {
            return Err(mismatch(object.reflect_type_name().to_string()));
        }
        Ok(object)
    }

    fn missing(&self, owner: &str, param: &ParamDescriptor, nested: DescriptorId) -> Error {
        Error::MissingElement {
            element: owner.to_string(),
            param: param.name.to_string(),
            expected: self.registry.get(nested).tag().to_string(),
        }
    }
}

fn or_default(param: &ParamDescriptor, missing: impl FnOnce() -> Error) -> Result<Value, Error> {
    match &param.default {
        Some(default) => Ok(default.produce()),
        None => Err(missing()),
    }
}

fn parse_literal(kind: Kind, element: &str, attribute: &str, text: &str) -> Result<Value, Error> {
    let invalid = || Error::InvalidLiteral {
        element: element.to_string(),
        attribute: attribute.to_string(),
        value: text.to_string(),
        kind,
    };
    match kind {
        Kind::Int => text.parse().map(Value::Int).map_err(|_| invalid()),
        Kind::Float => text.parse().map(Value::Float).map_err(|_| invalid()),
        Kind::Bool => text.parse().map(Value::Bool).map_err(|_| invalid()),
        Kind::Str => Ok(Value::Str(text.to_string())),
        Kind::Class | Kind::List => Err(invalid()),
    }
}
