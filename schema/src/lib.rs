//! # schema
//!
//! Bidirectional mapping between Rust values and element trees.
//!
//! Types describe themselves through [`Reflect`]: a class lists its fields
//! and its constructor parameters, an interface is an enum over its
//! implementors, and a fieldless enum lists its constants. A
//! [`RegistryBuilder`] walks these declarations from a root type, collects
//! every type they reach, and lets the mapping be tuned (aliases, defaults,
//! converters, wrapper elements). Sealing the builder checks the result and
//! yields a [`Registry`] that encodes and decodes.
//!
//! ## Mapping
//!
//! - A class instance is an element tagged with the class name.
//! - Scalar parameters (`i32`, `f32`, `bool`, `String`) and enum constants
//!   are attributes named after the parameter.
//! - Nested instances and lists are child elements, matched by position
//!   unless the class is marked `no_order`. A parameter marked explicit is
//!   wrapped in a child element named after the parameter.
//!
//! ```
//! use schema::{ClassInfo, RegistryBuilder, Reflect, Signature, TypeCatalog, TypeInfo};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct IsInRange {
//!     min: f32,
//!     max: f32,
//! }
//!
//! impl Reflect for IsInRange {
//!     fn type_info() -> TypeInfo {
//!         TypeInfo::Class(
//!             ClassInfo::builder::<Self>("IsInRange")
//!                 .field("min", |r| &r.min)
//!                 .field("max", |r| &r.max)
//!                 .constructor(
//!                     Signature::new("new").param::<f32>("min").param::<f32>("max"),
//!                     |args| Ok(IsInRange { min: args.take()?, max: args.take()? }),
//!                 )
//!                 .build(),
//!         )
//!     }
//! }
//!
//! let mut builder = RegistryBuilder::new(TypeCatalog::new());
//! builder.register::<IsInRange>().unwrap();
//! let registry = builder.seal().unwrap();
//!
//! let range = IsInRange { min: 0.0, max: 10.0 };
//! let text = registry.to_xml_string_required(&range).unwrap();
//! assert_eq!("<IsInRange min=\"0.0\" max=\"10.0\"/>\n", text);
//! assert_eq!(range, registry.from_xml_str_required::<IsInRange>(&text).unwrap());
//! ```

#![forbid(unsafe_code)]

pub mod builder;
mod check;
pub mod convert;
mod decode;
pub mod descriptor;
pub mod discovery;
mod encode;
pub mod error;
pub mod info;
pub mod reflect;
pub mod registry;
pub mod view;

pub use builder::RegistryBuilder;
pub use convert::Converter;
pub use descriptor::{
    ClassDescriptor, DefaultValue, DescriptorId, EnumDescriptor, InterfaceDescriptor, Kind,
    ParamDescriptor, Shape, TypeDescriptor,
};
pub use discovery::{Discovery, TypeCatalog};
pub use element::Element;
pub use error::Error;
pub use info::{
    ClassBuilder, ClassInfo, Constructor, EnumConstant, EnumInfo, Field, InterfaceInfo, Param,
    ScalarKind, Signature, TypeInfo, TypeRef,
};
pub use reflect::{Args, FieldRef, Object, ObjectRef, Reflect, Value};
pub use registry::Registry;
pub use view::{Diagnostic, ElementView};
