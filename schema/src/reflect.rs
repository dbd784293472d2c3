//! Runtime view of values.
//!
//! Types take part in the mapping by implementing [`Reflect`]. The trait
//! describes the shape of the type through [`TypeInfo`] and moves values in
//! and out of the dynamic [`Value`] representation that constructors and
//! accessors exchange with the registry.

use std::any::{Any, TypeId, type_name};
use std::fmt::Debug;

use crate::error::Error;
use crate::info::{ScalarKind, TypeInfo, TypeRef};

/// An owned instance of any reflected type.
pub type Object = Box<dyn Reflect>;

/// A borrowed instance of any reflected type.
pub type ObjectRef<'a> = &'a (dyn Reflect + 'static);

pub trait Reflect: Any + Debug {
    fn type_info() -> TypeInfo
    where
        Self: Sized;

    fn from_value(value: Value) -> Result<Self, Value>
    where
        Self: Sized,
    {
        match value {
            Value::Object(object) => Self::from_object(object).map_err(Value::Object),
            other => Err(other),
        }
    }

    /// Recovers `Self` from an object. Interfaces override this to accept
    /// any of their implementors.
    fn from_object(object: Object) -> Result<Self, Object>
    where
        Self: Sized,
    {
        object.downcast::<Self>().map(|boxed| *boxed)
    }

    fn into_value(self) -> Value
    where
        Self: Sized,
    {
        Value::Object(Box::new(self))
    }

    /// The concrete instance behind `self`. Interfaces return the wrapped
    /// implementor.
    fn as_object(&self) -> ObjectRef<'_>
    where
        Self: Sized,
    {
        self
    }

    fn field_ref(&self) -> FieldRef<'_>
    where
        Self: Sized,
    {
        FieldRef::Object(self.as_object())
    }

    fn reflect_type_name(&self) -> &'static str {
        type_name::<Self>()
    }
}

impl dyn Reflect {
    pub fn reflect_type_id(&self) -> TypeId {
        let any: &dyn Any = self;
        Any::type_id(any)
    }

    pub fn is<T: Reflect>(&self) -> bool {
        self.reflect_type_id() == TypeId::of::<T>()
    }

    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }

    pub fn downcast<T: Reflect>(self: Box<Self>) -> Result<Box<T>, Box<Self>> {
        if !self.is::<T>() {
            return Err(self);
        }
        let any: Box<dyn Any> = self;
        match any.downcast::<T>() {
            Ok(value) => Ok(value),
            Err(_) => unreachable!("type id was checked"),
        }
    }
}

/// Owned dynamic value passed to constructors.
#[derive(Debug)]
pub enum Value {
    Int(i32),
    Float(f32),
    Bool(bool),
    Str(String),
    Object(Object),
    List(Vec<Object>),
    Null,
}

impl Value {
    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Value::Int(v) => format!("int {v}"),
            Value::Float(v) => format!("float {v:?}"),
            Value::Bool(v) => format!("bool {v}"),
            Value::Str(v) => format!("string {v:?}"),
            Value::Object(object) => object.reflect_type_name().to_string(),
            Value::List(items) => format!("list of {}", items.len()),
            Value::Null => "null".to_string(),
        }
    }
}

/// Borrowed dynamic value read from an accessor.
#[derive(Debug, Clone)]
pub enum FieldRef<'a> {
    Int(i32),
    Float(f32),
    Bool(bool),
    Str(&'a str),
    Object(ObjectRef<'a>),
    List(Vec<ObjectRef<'a>>),
    Null,
}

impl FieldRef<'_> {
    pub fn describe(&self) -> String {
        match self {
            FieldRef::Int(v) => format!("int {v}"),
            FieldRef::Float(v) => format!("float {v:?}"),
            FieldRef::Bool(v) => format!("bool {v}"),
            FieldRef::Str(v) => format!("string {v:?}"),
            FieldRef::Object(object) => object.reflect_type_name().to_string(),
            FieldRef::List(items) => format!("list of {}", items.len()),
            FieldRef::Null => "null".to_string(),
        }
    }
}

macro_rules! reflect_scalar {
    ($ty:ty, $kind:ident) => {
        impl Reflect for $ty {
            fn type_info() -> TypeInfo {
                TypeInfo::Scalar(ScalarKind::$kind)
            }

            fn from_value(value: Value) -> Result<Self, Value> {
                match value {
                    Value::$kind(v) => Ok(v),
                    other => Err(other),
                }
            }

            fn into_value(self) -> Value {
                Value::$kind(self)
            }

            fn field_ref(&self) -> FieldRef<'_> {
                FieldRef::$kind(*self)
            }
        }
    };
}

reflect_scalar!(i32, Int);
reflect_scalar!(f32, Float);
reflect_scalar!(bool, Bool);

impl Reflect for String {
    fn type_info() -> TypeInfo {
        TypeInfo::Scalar(ScalarKind::Str)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Str(v) => Ok(v),
            other => Err(other),
        }
    }

    fn into_value(self) -> Value {
        Value::Str(self)
    }

    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::Str(self.as_str())
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::List(TypeRef::of::<T>())
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        let items = match value {
            Value::List(items) => items,
            other => return Err(other),
        };
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            match T::from_object(item) {
                Ok(v) => out.push(v),
                Err(item) => return Err(Value::Object(item)),
            }
        }
        Ok(out)
    }

    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(|v| Box::new(v) as Object).collect())
    }

    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::List(self.iter().map(|v| v.as_object()).collect())
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::Optional(TypeRef::of::<T>())
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }

    fn field_ref(&self) -> FieldRef<'_> {
        match self {
            Some(v) => v.field_ref(),
            None => FieldRef::Null,
        }
    }
}

/// Constructor arguments in declaration order.
#[derive(Debug)]
pub struct Args {
    element: String,
    names: Vec<&'static str>,
    values: std::vec::IntoIter<Value>,
    position: usize,
}

impl Args {
    /// `element` and `names` only feed error messages.
    pub fn new(element: impl Into<String>, names: Vec<&'static str>, values: Vec<Value>) -> Self {
        Args {
            element: element.into(),
            names,
            values: values.into_iter(),
            position: 0,
        }
    }

    /// Takes the next argument as a `T`.
    pub fn take<T: Reflect>(&mut self) -> Result<T, Error> {
        let index = self.position;
        let value = self.values.next().ok_or_else(|| Error::SchemaMismatch {
            type_name: self.element.clone(),
            reason: format!(
                "constructor reads argument {index} but declares {}",
                self.names.len()
            ),
        })?;
        self.position += 1;

        T::from_value(value).map_err(|value| Error::TypeMismatch {
            element: self.element.clone(),
            param: self.names.get(index).copied().unwrap_or("?").to_string(),
            expected: type_name::<T>().to_string(),
            found: value.describe(),
        })
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

/// Implements [`Reflect`] for an enum whose variants each wrap one
/// implementor, turning it into an interface.
///
/// ```
/// use schema::{ClassInfo, Reflect, Signature, TypeInfo, reflect_interface};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Sword;
///
/// impl Reflect for Sword {
///     fn type_info() -> TypeInfo {
///         TypeInfo::Class(
///             ClassInfo::builder::<Self>("Sword")
///                 .constructor(Signature::new("new"), |_| Ok(Sword))
///                 .implements::<Weapon>()
///                 .build(),
///         )
///     }
/// }
///
/// #[derive(Debug, Clone, PartialEq)]
/// enum Weapon {
///     Sword(Sword),
/// }
///
/// reflect_interface!(Weapon { Sword(Sword) });
///
/// let object: schema::Object = Box::new(Sword);
/// assert_eq!(Ok(Weapon::Sword(Sword)), Weapon::from_object(object).map_err(|_| ()));
/// ```
#[macro_export]
macro_rules! reflect_interface {
    ($name:ident { $($variant:ident($ty:ty)),+ $(,)? }) => {
        impl $crate::Reflect for $name {
            fn type_info() -> $crate::TypeInfo {
                $crate::TypeInfo::Interface($crate::InterfaceInfo::new(stringify!($name)))
            }

            fn from_object(
                object: $crate::Object,
            ) -> ::std::result::Result<Self, $crate::Object> {
                let object = match object.downcast::<$name>() {
                    ::std::result::Result::Ok(value) => return ::std::result::Result::Ok(*value),
                    ::std::result::Result::Err(object) => object,
                };
                $(
                    let object = match object.downcast::<$ty>() {
                        ::std::result::Result::Ok(value) => {
                            return ::std::result::Result::Ok($name::$variant(*value));
                        }
                        ::std::result::Result::Err(object) => object,
                    };
                )+
                ::std::result::Result::Err(object)
            }

            fn as_object(&self) -> $crate::ObjectRef<'_> {
                match self {
                    $($name::$variant(value) => value,)+
                }
            }
        }
    };
}

/// Implements [`Reflect`] for a fieldless enum. Constants are named after
/// the variants.
#[macro_export]
macro_rules! reflect_enum {
    ($name:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::Reflect for $name {
            fn type_info() -> $crate::TypeInfo {
                $crate::TypeInfo::Enum($crate::EnumInfo::new(
                    stringify!($name),
                    ::std::vec![$((stringify!($variant), $name::$variant)),+],
                ))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Args, FieldRef, Object, Reflect, Value};
    use crate::error::Error;

    #[derive(Debug, Clone, PartialEq)]
    struct Marker(i32);

    impl Reflect for Marker {
        fn type_info() -> crate::TypeInfo {
            crate::TypeInfo::Class(crate::ClassInfo::builder::<Self>("Marker").build())
        }
    }

    #[test]
    fn test_downcast() {
        let object: Object = Box::new(Marker(3));
        assert!(object.is::<Marker>());
        assert!(!object.is::<i32>());
        assert_eq!(Some(&Marker(3)), object.downcast_ref::<Marker>());

        let object = object.downcast::<String>().unwrap_err();
        assert_eq!(Marker(3), *object.downcast::<Marker>().unwrap());
    }

    #[test]
    fn test_reflect_type_id_of_boxed_object() {
        let object: Object = Box::new(Marker(1));
        assert_eq!(std::any::TypeId::of::<Marker>(), object.reflect_type_id());
    }

    #[rstest(value, expected,
        case(Value::Null, None),
        case(Value::Int(4), Some(4)),
    )]
    fn test_option_from_value(value: Value, expected: Option<i32>) {
        assert_eq!(expected, Option::<i32>::from_value(value).unwrap());
    }

    #[test]
    fn test_vec_from_value_rejects_foreign_item() {
        let value = Value::List(vec![Box::new(Marker(1)) as Object, Box::new(7i32) as Object]);
        let err = Vec::<Marker>::from_value(value).unwrap_err();
        assert!(matches!(err, Value::Object(ref o) if o.is::<i32>()), "{err:?}");
    }

    #[test]
    fn test_field_ref() {
        let items = vec![Marker(1), Marker(2)];
        match items.field_ref() {
            FieldRef::List(refs) => {
                assert_eq!(2, refs.len());
                assert_eq!(Some(&Marker(2)), refs[1].downcast_ref::<Marker>());
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(None::<String>.field_ref(), FieldRef::Null));
        assert!(matches!(Some("x".to_string()).field_ref(), FieldRef::Str("x")));
    }

    #[test]
    fn test_args_take() {
        let mut args = Args::new(
            "IsInRange",
            vec!["min", "max"],
            vec![Value::Float(0.5), Value::Str("x".to_string())],
        );
        assert_eq!(0.5, args.take::<f32>().unwrap());
        assert_eq!(1, args.remaining());

        let err = args.take::<f32>().unwrap_err();
        assert!(
            matches!(err, Error::TypeMismatch { ref param, .. } if param == "max"),
            "{err:?}"
        );
        assert!(matches!(args.take::<f32>(), Err(Error::SchemaMismatch { .. })));
    }
}
