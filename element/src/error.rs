use nom::error::ErrorKind;
use thiserror::Error;

/// Errors that can occur when parsing element markup.
///
/// Offsets are byte offsets into the parsed text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("parser error {kind:?} at offset {offset}")]
    Parser { kind: ErrorKind, offset: usize },

    /// The input ended before the element was closed
    #[error("unexpected end of input inside <{0}>")]
    UnexpectedEnd(String),

    #[error("mismatched end tag at offset {offset}: expected </{expected}>, found </{found}>")]
    MismatchedTag {
        expected: String,
        found: String,
        offset: usize,
    },

    #[error("duplicate attribute {element}[{attribute}]")]
    DuplicateAttribute { element: String, attribute: String },

    #[error("invalid entity reference &{0};")]
    InvalidEntity(String),

    /// Anything other than comments or whitespace after the root element
    #[error("trailing content at offset {0}")]
    TrailingContent(usize),

    #[error("document has no root element")]
    Empty,
}
