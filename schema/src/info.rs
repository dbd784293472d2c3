//! Static declarations of reflected types.
//!
//! A class declares its fields (read accessors), its constructors and the
//! interfaces it implements. The registry reads these declarations once, at
//! registration time.

use std::any::{TypeId, type_name};
use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::Error;
use crate::reflect::{Args, FieldRef, Object, ObjectRef, Reflect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Int,
    Float,
    Bool,
    Str,
}

/// A handle on a reflected type that can produce its [`TypeInfo`] on demand.
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    path: &'static str,
    info: fn() -> TypeInfo,
}

impl TypeRef {
    pub fn of<T: Reflect>() -> Self {
        TypeRef {
            id: TypeId::of::<T>(),
            path: type_name::<T>(),
            info: T::type_info,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type path, e.g. `game::rules::IsAlive`.
    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn info(&self) -> TypeInfo {
        (self.info)()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeRef {}

impl Debug for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

#[derive(Debug)]
pub enum TypeInfo {
    Scalar(ScalarKind),
    Optional(TypeRef),
    List(TypeRef),
    Class(ClassInfo),
    Interface(InterfaceInfo),
    Enum(EnumInfo),
}

type Getter = Arc<dyn for<'a> Fn(ObjectRef<'a>) -> Option<FieldRef<'a>> + Send + Sync>;
type Invoke = Arc<dyn Fn(Args) -> Result<Object, Error> + Send + Sync>;

/// A named read accessor.
#[derive(Clone)]
pub struct Field {
    name: &'static str,
    ty: TypeRef,
    get: Getter,
}

impl Field {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ty(&self) -> TypeRef {
        self.ty
    }

    /// Reads the field from `owner`. Returns `None` when `owner` is not an
    /// instance of the declaring class.
    pub fn get<'a>(&self, owner: ObjectRef<'a>) -> Option<FieldRef<'a>> {
        (self.get)(owner)
    }
}

impl Debug for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.name, self.ty)
    }
}

/// A constructor parameter. `field` names the accessor that reads the value
/// back, which is the parameter name unless bound explicitly.
#[derive(Debug, Clone)]
pub struct Param {
    name: &'static str,
    field: &'static str,
    ty: TypeRef,
}

impl Param {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn ty(&self) -> TypeRef {
        self.ty
    }
}

/// Parameter list of a constructor.
#[derive(Debug, Clone)]
pub struct Signature {
    name: &'static str,
    params: Vec<Param>,
}

impl Signature {
    pub fn new(name: &'static str) -> Self {
        Signature {
            name,
            params: Vec::new(),
        }
    }

    pub fn param<V: Reflect>(self, name: &'static str) -> Self {
        self.param_for::<V>(name, name)
    }

    /// Declares a parameter read back through the accessor `field`.
    pub fn param_for<V: Reflect>(mut self, name: &'static str, field: &'static str) -> Self {
        self.params.push(Param {
            name,
            field,
            ty: TypeRef::of::<V>(),
        });
        self
    }
}

#[derive(Clone)]
pub struct Constructor {
    name: &'static str,
    params: Vec<Param>,
    invoke: Invoke,
}

impl Constructor {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn invoke(&self, args: Args) -> Result<Object, Error> {
        (self.invoke)(args)
    }
}

impl Debug for Constructor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ClassInfo {
    name: &'static str,
    constructors: Vec<Constructor>,
    fields: Vec<Field>,
    interfaces: Vec<TypeRef>,
}

impl ClassInfo {
    /// Starts a declaration for `T`. `name` is the simple name, which is also
    /// the default tag.
    pub fn builder<T: Reflect>(name: &'static str) -> ClassBuilder<T> {
        ClassBuilder {
            info: ClassInfo {
                name,
                constructors: Vec::new(),
                fields: Vec::new(),
                interfaces: Vec::new(),
            },
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn interfaces(&self) -> &[TypeRef] {
        &self.interfaces
    }
}

pub struct ClassBuilder<T> {
    info: ClassInfo,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Reflect> ClassBuilder<T> {
    pub fn field<V, F>(mut self, name: &'static str, accessor: F) -> Self
    where
        V: Reflect,
        F: for<'a> Fn(&'a T) -> &'a V + Send + Sync + 'static,
    {
        let get = getter(move |owner| owner.downcast_ref::<T>().map(|t| accessor(t).field_ref()));
        self.info.fields.push(Field {
            name,
            ty: TypeRef::of::<V>(),
            get: Arc::new(get),
        });
        self
    }

    pub fn constructor<F>(mut self, signature: Signature, f: F) -> Self
    where
        F: Fn(&mut Args) -> Result<T, Error> + Send + Sync + 'static,
    {
        let invoke: Invoke = Arc::new(move |mut args: Args| {
            f(&mut args).map(|value| Box::new(value) as Object)
        });
        self.info.constructors.push(Constructor {
            name: signature.name,
            params: signature.params,
            invoke,
        });
        self
    }

    pub fn implements<I: Reflect>(mut self) -> Self {
        self.info.interfaces.push(TypeRef::of::<I>());
        self
    }

    pub fn build(self) -> ClassInfo {
        self.info
    }
}

fn getter<F>(f: F) -> F
where
    F: for<'a> Fn(ObjectRef<'a>) -> Option<FieldRef<'a>>,
{
    f
}

#[derive(Debug, Clone)]
pub struct InterfaceInfo {
    name: &'static str,
}

impl InterfaceInfo {
    pub fn new(name: &'static str) -> Self {
        InterfaceInfo { name }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[derive(Clone)]
pub struct EnumConstant {
    name: &'static str,
    make: Arc<dyn Fn() -> Object + Send + Sync>,
    test: Arc<dyn Fn(ObjectRef<'_>) -> bool + Send + Sync>,
}

impl EnumConstant {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn instance(&self) -> Object {
        (self.make)()
    }

    pub fn is_instance(&self, object: ObjectRef<'_>) -> bool {
        (self.test)(object)
    }
}

impl Debug for EnumConstant {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[derive(Debug, Clone)]
pub struct EnumInfo {
    name: &'static str,
    constants: Vec<EnumConstant>,
}

impl EnumInfo {
    pub fn new<T>(name: &'static str, constants: Vec<(&'static str, T)>) -> Self
    where
        T: Reflect + Clone + PartialEq + Send + Sync,
    {
        let constants = constants
            .into_iter()
            .map(|(constant, value)| {
                let made = value.clone();
                EnumConstant {
                    name: constant,
                    make: Arc::new(move || Box::new(made.clone()) as Object),
                    test: Arc::new(move |object: ObjectRef<'_>| {
                        object.downcast_ref::<T>() == Some(&value)
                    }),
                }
            })
            .collect();
        EnumInfo { name, constants }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn constants(&self) -> &[EnumConstant] {
        &self.constants
    }
}
