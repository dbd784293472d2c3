use thiserror::Error;

use crate::descriptor::Kind;

/// Errors raised while registering types, configuring a registry, decoding
/// element trees into objects or encoding objects into element trees.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{type_name}: expected exactly one constructor, found {count}")]
    AmbiguousConstructor { type_name: String, count: usize },

    /// A constructor and the fields of its type do not line up
    #[error("{type_name}: {reason}")]
    SchemaMismatch { type_name: String, reason: String },

    #[error("unsupported type {type_name}: {reason}")]
    UnsupportedType { type_name: String, reason: String },

    #[error("tag <{tag}> is used by both {first} and {second}")]
    DuplicateTag {
        tag: String,
        first: String,
        second: String,
    },

    #[error("type {0} is not registered")]
    NotRegistered(String),

    #[error("{type_name} has no parameter `{param}`")]
    UnknownParameter { type_name: String, param: String },

    #[error("{type_name}: {reason}")]
    InvalidConfiguration { type_name: String, reason: String },

    #[error("missing attribute {element}[{attribute}]")]
    MissingAttribute { element: String, attribute: String },

    #[error("{element}.{param}: no child element of type {expected}")]
    MissingElement {
        element: String,
        param: String,
        expected: String,
    },

    #[error("{enum_name} has no constant matching `{value}`")]
    UnknownEnumValue { enum_name: String, value: String },

    #[error("{element}<{tag}> matched {count} elements, expected exactly one")]
    Ambiguity {
        element: String,
        tag: String,
        count: usize,
    },

    #[error("{element}.{param}: expected {expected}, found {found}")]
    TypeMismatch {
        element: String,
        param: String,
        expected: String,
        found: String,
    },

    #[error("invalid {kind} literal {element}[{attribute}] = `{value}`")]
    InvalidLiteral {
        element: String,
        attribute: String,
        value: String,
        kind: Kind,
    },

    #[error("no class is registered for tag <{0}>")]
    UnknownTag(String),

    #[error("{type_name}.{param} is null but declares no null default")]
    NullValue { type_name: String, param: String },

    #[error("element: {0}")]
    Element(#[from] element::error::Error),
}
