//! Finding the implementors of an interface.

use std::any::TypeId;

use crate::info::{TypeInfo, TypeRef};
use crate::reflect::Reflect;

pub trait Discovery {
    /// Returns the concrete classes that declare `interface`, have at least
    /// one constructor and whose type path starts with `scope`. Each class is
    /// returned once.
    fn find_implementors(&self, interface: TypeId, scope: &str) -> Vec<TypeRef>;
}

/// An explicit list of candidate types, searched in insertion order.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: Vec<TypeRef>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        TypeCatalog::default()
    }

    pub fn with<T: Reflect>(mut self) -> Self {
        self.add::<T>();
        self
    }

    pub fn add<T: Reflect>(&mut self) -> &mut Self {
        self.types.push(TypeRef::of::<T>());
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Discovery for TypeCatalog {
    fn find_implementors(&self, interface: TypeId, scope: &str) -> Vec<TypeRef> {
        let mut found: Vec<TypeRef> = Vec::new();
        for ty in &self.types {
            if !ty.path().starts_with(scope) || found.contains(ty) {
                continue;
            }
            let TypeInfo::Class(info) = ty.info() else {
                continue;
            };
            if info.constructors().is_empty() {
                continue;
            }
            if info.interfaces().iter().any(|i| i.id() == interface) {
                found.push(*ty);
            }
        }
        found
    }
}
