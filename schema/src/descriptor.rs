//! Registered type descriptors.

use std::any::TypeId;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;

use crate::convert::Converter;
use crate::info::{Constructor, EnumConstant, Field, ScalarKind, TypeRef};
use crate::reflect::{Reflect, Value};

/// Index of a descriptor inside its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DescriptorId(pub(crate) usize);

/// How a parameter maps to the element tree. `Class` covers nested classes,
/// interfaces and enums; the nested descriptor tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Int,
    Float,
    Bool,
    Str,
    Class,
    List,
}

impl Kind {
    pub fn is_scalar(&self) -> bool {
        matches!(self, Kind::Int | Kind::Float | Kind::Bool | Kind::Str)
    }
}

impl From<ScalarKind> for Kind {
    fn from(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Int => Kind::Int,
            ScalarKind::Float => Kind::Float,
            ScalarKind::Bool => Kind::Bool,
            ScalarKind::Str => Kind::Str,
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Bool => "bool",
            Kind::Str => "string",
            Kind::Class => "class",
            Kind::List => "list",
        };
        f.write_str(name)
    }
}

pub(crate) type DefaultFactory = Arc<dyn Fn() -> Value + Send + Sync>;

/// Value used when the tree does not provide one.
#[derive(Clone)]
pub enum DefaultValue {
    Null,
    Value(DefaultFactory),
}

impl DefaultValue {
    pub(crate) fn of<V>(value: V) -> Self
    where
        V: Reflect + Clone + Send + Sync,
    {
        DefaultValue::Value(Arc::new(move || value.clone().into_value()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DefaultValue::Null)
    }

    pub fn produce(&self) -> Value {
        match self {
            DefaultValue::Null => Value::Null,
            DefaultValue::Value(make) => make(),
        }
    }
}

impl Debug for DefaultValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Null => f.write_str("Null"),
            DefaultValue::Value(make) => write!(f, "Value({})", make().describe()),
        }
    }
}

pub struct ParamDescriptor {
    pub(crate) name: &'static str,
    pub(crate) ty: TypeRef,
    pub(crate) kind: Kind,
    pub(crate) nested: Option<DescriptorId>,
    pub(crate) optional: bool,
    pub(crate) alias: Option<String>,
    pub(crate) converter: Option<Arc<dyn Converter>>,
    pub(crate) explicit: bool,
    pub(crate) default: Option<DefaultValue>,
    pub(crate) field: Field,
}

impl ParamDescriptor {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ty(&self) -> TypeRef {
        self.ty
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn nested(&self) -> Option<DescriptorId> {
        self.nested
    }

    /// Declared as `Option<_>`.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Attribute name or wrapper tag: the alias if set, else the name.
    pub fn attr(&self) -> &str {
        self.alias.as_deref().unwrap_or(self.name)
    }

    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    pub fn default(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    pub fn is_nullable(&self) -> bool {
        self.default.as_ref().is_some_and(DefaultValue::is_null)
    }

    pub fn has_converter(&self) -> bool {
        self.converter.is_some()
    }

    pub fn field(&self) -> &Field {
        &self.field
    }
}

impl Debug for ParamDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("nested", &self.nested)
            .field("optional", &self.optional)
            .field("alias", &self.alias)
            .field("converter", &self.converter.is_some())
            .field("explicit", &self.explicit)
            .field("default", &self.default)
            .finish()
    }
}

#[derive(Debug)]
pub struct ClassDescriptor {
    pub(crate) constructor: Constructor,
    pub(crate) params: Vec<ParamDescriptor>,
    pub(crate) no_order: bool,
}

impl ClassDescriptor {
    pub fn constructor(&self) -> &Constructor {
        &self.constructor
    }

    pub fn params(&self) -> &[ParamDescriptor] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&ParamDescriptor> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Children are matched by type regardless of their position.
    pub fn is_no_order(&self) -> bool {
        self.no_order
    }
}

#[derive(Debug)]
pub struct InterfaceDescriptor {
    pub(crate) implementors: Vec<DescriptorId>,
}

impl InterfaceDescriptor {
    pub fn implementors(&self) -> &[DescriptorId] {
        &self.implementors
    }
}

#[derive(Debug)]
pub struct EnumDescriptor {
    pub(crate) constants: Vec<EnumConstant>,
}

impl EnumDescriptor {
    pub fn constants(&self) -> &[EnumConstant] {
        &self.constants
    }

    /// Finds a constant by name, ignoring ASCII case.
    pub fn constant(&self, name: &str) -> Option<&EnumConstant> {
        self.constants
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

#[derive(Debug)]
pub enum Shape {
    Class(ClassDescriptor),
    Interface(InterfaceDescriptor),
    Enum(EnumDescriptor),
}

pub struct TypeDescriptor {
    pub(crate) id: DescriptorId,
    pub(crate) ty: TypeRef,
    pub(crate) name: &'static str,
    pub(crate) alias: Option<String>,
    pub(crate) converter: Option<Arc<dyn Converter>>,
    pub(crate) shape: Shape,
}

impl TypeDescriptor {
    pub fn id(&self) -> DescriptorId {
        self.id
    }

    pub fn type_id(&self) -> TypeId {
        self.ty.id()
    }

    pub fn path(&self) -> &'static str {
        self.ty.path()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Element tag: the alias if set, else the simple name.
    pub fn tag(&self) -> &str {
        self.alias.as_deref().unwrap_or(self.name)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn as_class(&self) -> Option<&ClassDescriptor> {
        match &self.shape {
            Shape::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceDescriptor> {
        match &self.shape {
            Shape::Interface(interface) => Some(interface),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumDescriptor> {
        match &self.shape {
            Shape::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_class(&self) -> bool {
        matches!(self.shape, Shape::Class(_))
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.shape, Shape::Interface(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.shape, Shape::Enum(_))
    }

    pub fn has_converter(&self) -> bool {
        self.converter.is_some()
    }

    pub fn kind_name(&self) -> &'static str {
        match self.shape {
            Shape::Class(_) => "class",
            Shape::Interface(_) => "interface",
            Shape::Enum(_) => "enum",
        }
    }
}

impl Debug for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("id", &self.id)
            .field("path", &self.ty.path())
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("converter", &self.converter.is_some())
            .field("shape", &self.shape)
            .finish()
    }
}
