//! Registration and configuration of types before sealing.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use log::{debug, trace};

use crate::convert::Converter;
use crate::descriptor::{
    ClassDescriptor, DefaultValue, DescriptorId, EnumDescriptor, InterfaceDescriptor, Kind,
    ParamDescriptor, Shape, TypeDescriptor,
};
use crate::discovery::{Discovery, TypeCatalog};
use crate::error::Error;
use crate::info::{ClassInfo, EnumInfo, InterfaceInfo, Param, TypeInfo, TypeRef};
use crate::reflect::Reflect;

/// Collects type descriptors. Call [`RegistryBuilder::seal`] to check them
/// and obtain a [`Registry`](crate::Registry).
pub struct RegistryBuilder {
    pub(crate) discovery: Arc<dyn Discovery + Send + Sync>,
    pub(crate) scope: String,
    pub(crate) descriptors: Vec<TypeDescriptor>,
    pub(crate) by_type: HashMap<TypeId, DescriptorId>,
}

impl RegistryBuilder {
    pub fn new(discovery: impl Discovery + Send + Sync + 'static) -> Self {
        RegistryBuilder {
            discovery: Arc::new(discovery),
            scope: String::new(),
            descriptors: Vec::new(),
            by_type: HashMap::new(),
        }
    }

    /// Restricts implementor discovery to type paths starting with `scope`.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn descriptor<T: Reflect>(&self) -> Option<&TypeDescriptor> {
        let id = self.by_type.get(&TypeId::of::<T>())?;
        Some(&self.descriptors[id.0])
    }

    pub fn descriptors(&self) -> &[TypeDescriptor] {
        &self.descriptors
    }

    /// Registers `T` and, transitively, every type its constructor needs.
    /// Registering a type twice returns the existing descriptor.
    ///
    /// A failed registration leaves the builder as it was.
    pub fn register<T: Reflect>(&mut self) -> Result<&TypeDescriptor, Error> {
        self.register_root(TypeRef::of::<T>(), None)
    }

    /// Registers `T` using the constructor named `constructor`, for classes
    /// that declare more than one.
    pub fn register_with_constructor<T: Reflect>(
        &mut self,
        constructor: &str,
    ) -> Result<&TypeDescriptor, Error> {
        self.register_root(TypeRef::of::<T>(), Some(constructor))
    }

    fn register_root(
        &mut self,
        ty: TypeRef,
        constructor: Option<&str>,
    ) -> Result<&TypeDescriptor, Error> {
        let mark = self.descriptors.len();
        match self.register_type(ty, constructor) {
            Ok(id) => Ok(&self.descriptors[id.0]),
            Err(e) => {
                self.descriptors.truncate(mark);
                self.by_type.retain(|_, id| id.0 < mark);
                Err(e)
            }
        }
    }

    fn register_type(
        &mut self,
        ty: TypeRef,
        constructor: Option<&str>,
    ) -> Result<DescriptorId, Error> {
        if let Some(id) = self.by_type.get(&ty.id()) {
            return Ok(*id);
        }
        match ty.info() {
            TypeInfo::Class(info) => self.register_class(ty, info, constructor),
            TypeInfo::Interface(info) => self.register_interface(ty, info),
            TypeInfo::Enum(info) => Ok(self.register_enum(ty, info)),
            TypeInfo::Scalar(_) | TypeInfo::Optional(_) | TypeInfo::List(_) => {
                Err(Error::UnsupportedType {
                    type_name: ty.path().to_string(),
                    reason: "only classes, interfaces and enums can be registered".to_string(),
                })
            }
        }
    }

    fn insert(&mut self, ty: TypeRef, name: &'static str, shape: Shape) -> DescriptorId {
        let id = DescriptorId(self.descriptors.len());
        self.descriptors.push(TypeDescriptor {
            id,
            ty,
            name,
            alias: None,
            converter: None,
            shape,
        });
        self.by_type.insert(ty.id(), id);
        id
    }

    fn register_class(
        &mut self,
        ty: TypeRef,
        info: ClassInfo,
        constructor: Option<&str>,
    ) -> Result<DescriptorId, Error> {
        let chosen = match constructor {
            Some(name) => info
                .constructors()
                .iter()
                .find(|c| c.name() == name)
                .cloned()
                .ok_or_else(|| Error::SchemaMismatch {
                    type_name: info.name().to_string(),
                    reason: format!("no constructor named `{name}`"),
                })?,
            None => match info.constructors() {
                [only] => only.clone(),
                all => {
                    return Err(Error::AmbiguousConstructor {
                        type_name: info.name().to_string(),
                        count: all.len(),
                    });
                }
            },
        };

        // Inserted before the parameters so that recursive references
        // resolve to this descriptor.
        let id = self.insert(
            ty,
            info.name(),
            Shape::Class(ClassDescriptor {
                constructor: chosen.clone(),
                params: Vec::new(),
                no_order: false,
            }),
        );

        let mut params = Vec::with_capacity(chosen.params().len());
        for param in chosen.params() {
            params.push(self.build_param(&info, param)?);
        }
        if let Shape::Class(class) = &mut self.descriptors[id.0].shape {
            class.params = params;
        }
        debug!("registered class {} as <{}>", ty.path(), info.name());
        Ok(id)
    }

    fn build_param(&mut self, owner: &ClassInfo, param: &Param) -> Result<ParamDescriptor, Error> {
        let mismatch = |reason: String| Error::SchemaMismatch {
            type_name: owner.name().to_string(),
            reason,
        };

        if !param.name().chars().next().is_some_and(char::is_lowercase) {
            return Err(mismatch(format!(
                "parameter `{}` must start with a lower-case letter",
                param.name()
            )));
        }
        let field = owner.field(param.field()).ok_or_else(|| {
            mismatch(format!(
                "no field `{}` for parameter `{}`",
                param.field(),
                param.name()
            ))
        })?;
        if field.ty() != param.ty() {
            return Err(mismatch(format!(
                "field `{}` is {} but parameter `{}` is {}",
                field.name(),
                field.ty().path(),
                param.name(),
                param.ty().path()
            )));
        }

        let (kind, nested, optional) = self.classify(param.ty())?;
        trace!("{}.{}: {kind}", owner.name(), param.name());
        Ok(ParamDescriptor {
            name: param.name(),
            ty: param.ty(),
            kind,
            nested,
            optional,
            alias: None,
            converter: None,
            explicit: false,
            default: None,
            field: field.clone(),
        })
    }

    fn classify(&mut self, ty: TypeRef) -> Result<(Kind, Option<DescriptorId>, bool), Error> {
        let (ty, optional) = match ty.info() {
            TypeInfo::Optional(inner) => (inner, true),
            _ => (ty, false),
        };
        let unsupported = |reason: &str| Error::UnsupportedType {
            type_name: ty.path().to_string(),
            reason: reason.to_string(),
        };

        match ty.info() {
            TypeInfo::Scalar(scalar) => Ok((Kind::from(scalar), None, optional)),
            TypeInfo::Optional(_) => Err(unsupported("nested options are not supported")),
            TypeInfo::List(_) if optional => Err(unsupported(
                "optional lists are not supported, an absent list decodes as empty",
            )),
            TypeInfo::List(item) => match item.info() {
                TypeInfo::Class(_) | TypeInfo::Interface(_) => {
                    let nested = self.register_type(item, None)?;
                    Ok((Kind::List, Some(nested), optional))
                }
                _ => Err(unsupported("list elements must be classes or interfaces")),
            },
            TypeInfo::Class(_) | TypeInfo::Interface(_) | TypeInfo::Enum(_) => {
                let nested = self.register_type(ty, None)?;
                Ok((Kind::Class, Some(nested), optional))
            }
        }
    }

    fn register_interface(
        &mut self,
        ty: TypeRef,
        info: InterfaceInfo,
    ) -> Result<DescriptorId, Error> {
        let id = self.insert(
            ty,
            info.name(),
            Shape::Interface(InterfaceDescriptor {
                implementors: Vec::new(),
            }),
        );

        let found = self.discovery.find_implementors(ty.id(), &self.scope);
        let mut implementors = Vec::with_capacity(found.len());
        for implementor in found {
            let implementor_id = self.register_type(implementor, None)?;
            if !self.descriptors[implementor_id.0].is_class() {
                trace!("{} is not a class, skipped", implementor.path());
                continue;
            }
            if !implementors.contains(&implementor_id) {
                implementors.push(implementor_id);
            }
        }
        debug!(
            "registered interface {} with {} implementors",
            ty.path(),
            implementors.len()
        );
        if let Shape::Interface(interface) = &mut self.descriptors[id.0].shape {
            interface.implementors = implementors;
        }
        Ok(id)
    }

    fn register_enum(&mut self, ty: TypeRef, info: EnumInfo) -> DescriptorId {
        debug!(
            "registered enum {} with {} constants",
            ty.path(),
            info.constants().len()
        );
        self.insert(
            ty,
            info.name(),
            Shape::Enum(EnumDescriptor {
                constants: info.constants().to_vec(),
            }),
        )
    }

    fn descriptor_mut<T: Reflect>(&mut self) -> Result<&mut TypeDescriptor, Error> {
        let id = self
            .by_type
            .get(&TypeId::of::<T>())
            .copied()
            .ok_or_else(|| Error::NotRegistered(type_name::<T>().to_string()))?;
        Ok(&mut self.descriptors[id.0])
    }

    fn class_mut<T: Reflect>(&mut self) -> Result<&mut ClassDescriptor, Error> {
        let descriptor = self.descriptor_mut::<T>()?;
        let name = descriptor.name;
        let kind = descriptor.kind_name();
        match &mut descriptor.shape {
            Shape::Class(class) => Ok(class),
            _ => Err(Error::InvalidConfiguration {
                type_name: name.to_string(),
                reason: format!("{kind} has no constructor parameters"),
            }),
        }
    }

    fn param_mut<T: Reflect>(&mut self, param: &str) -> Result<&mut ParamDescriptor, Error> {
        let name = self.descriptor_mut::<T>()?.name;
        self.class_mut::<T>()?
            .params
            .iter_mut()
            .find(|p| p.name == param)
            .ok_or_else(|| Error::UnknownParameter {
                type_name: name.to_string(),
                param: param.to_string(),
            })
    }

    /// Uses `tag` instead of the simple name of `T`.
    pub fn alias<T: Reflect>(&mut self, tag: impl Into<String>) -> Result<&mut Self, Error> {
        self.descriptor_mut::<T>()?.alias = Some(tag.into());
        Ok(self)
    }

    /// Uses `name` as the attribute name or wrapper tag of `param`.
    pub fn param_alias<T: Reflect>(
        &mut self,
        param: &str,
        name: impl Into<String>,
    ) -> Result<&mut Self, Error> {
        self.param_mut::<T>(param)?.alias = Some(name.into());
        Ok(self)
    }

    /// Wraps a nested or list parameter in a child element named after the
    /// parameter.
    pub fn explicit<T: Reflect>(&mut self, param: &str) -> Result<&mut Self, Error> {
        let name = self.descriptor_mut::<T>()?.name;
        let target = self.param_mut::<T>(param)?;
        if target.kind.is_scalar() {
            return Err(Error::InvalidConfiguration {
                type_name: name.to_string(),
                reason: format!("scalar parameter `{param}` cannot be explicit"),
            });
        }
        target.explicit = true;
        Ok(self)
    }

    /// Uses `value` when the tree has no value for `param`.
    ///
    /// `V` must be the parameter type, the inner type of an `Option`
    /// parameter, or an implementor of an interface parameter.
    pub fn default_value<T, V>(&mut self, param: &str, value: V) -> Result<&mut Self, Error>
    where
        T: Reflect,
        V: Reflect + Clone + Send + Sync,
    {
        let name = self.descriptor_mut::<T>()?.name;
        let (declared, kind, nested) = {
            let target = self.param_mut::<T>(param)?;
            (target.ty, target.kind, target.nested)
        };
        if kind == Kind::List {
            return Err(Error::InvalidConfiguration {
                type_name: name.to_string(),
                reason: format!("list parameter `{param}` cannot have a default"),
            });
        }
        if !self.accepts(declared, nested, TypeId::of::<V>()) {
            return Err(Error::InvalidConfiguration {
                type_name: name.to_string(),
                reason: format!(
                    "default of type {} does not fit parameter `{param}` of type {}",
                    type_name::<V>(),
                    declared.path()
                ),
            });
        }
        self.param_mut::<T>(param)?.default = Some(DefaultValue::of(value));
        Ok(self)
    }

    fn accepts(&self, declared: TypeRef, nested: Option<DescriptorId>, value: TypeId) -> bool {
        if declared.id() == value {
            return true;
        }
        if let TypeInfo::Optional(inner) = declared.info() {
            if inner.id() == value {
                return true;
            }
        }
        let Some(nested) = nested else {
            return false;
        };
        match &self.descriptors[nested.0].shape {
            Shape::Interface(interface) => interface
                .implementors
                .iter()
                .any(|id| self.descriptors[id.0].type_id() == value),
            _ => false,
        }
    }

    /// Declares that `param` may be absent from the tree, and null when
    /// encoding. Only `Option` parameters accept a null default.
    pub fn default_null<T: Reflect>(&mut self, param: &str) -> Result<&mut Self, Error> {
        let name = self.descriptor_mut::<T>()?.name;
        let target = self.param_mut::<T>(param)?;
        if !target.optional {
            return Err(Error::InvalidConfiguration {
                type_name: name.to_string(),
                reason: format!("parameter `{param}` is not an Option and cannot default to null"),
            });
        }
        target.default = Some(DefaultValue::Null);
        Ok(self)
    }

    /// Replaces the mapping of class `T`. Interfaces and enums cannot have a
    /// converter.
    pub fn converter<T: Reflect>(
        &mut self,
        converter: impl Converter + 'static,
    ) -> Result<&mut Self, Error> {
        let descriptor = self.descriptor_mut::<T>()?;
        if !descriptor.is_class() {
            return Err(Error::InvalidConfiguration {
                type_name: descriptor.name.to_string(),
                reason: "only classes can have a converter".to_string(),
            });
        }
        descriptor.converter = Some(Arc::new(converter));
        Ok(self)
    }

    pub fn param_converter<T: Reflect>(
        &mut self,
        param: &str,
        converter: impl Converter + 'static,
    ) -> Result<&mut Self, Error> {
        self.param_mut::<T>(param)?.converter = Some(Arc::new(converter));
        Ok(self)
    }

    /// Matches the children of `T` by type instead of by position.
    pub fn no_order<T: Reflect>(&mut self) -> Result<&mut Self, Error> {
        self.class_mut::<T>()?.no_order = true;
        Ok(self)
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        RegistryBuilder::new(TypeCatalog::new())
    }
}

impl Debug for RegistryBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("scope", &self.scope)
            .field("descriptors", &self.descriptors)
            .finish()
    }
}
