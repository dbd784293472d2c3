//! # kumiki
//!
//! Core traits for encoding and decoding in the kumiki object mapping toolkit.
//!
//! This crate defines the fundamental `Decoder` and `Encoder` traits that
//! establish a type-safe conversion pattern used by every kumiki layer.
//!
//! ## Overview
//!
//! The conversion pattern flows like this:
//! ```text
//! text → Element → typed object
//! ```
//!
//! The text layer is handled by the `element` crate, which parses markup into
//! an element tree and prints it back. The `schema` crate maps element trees
//! onto registered Rust types.
//!
//! ## Type Safety
//!
//! The traits use marker traits (`DecodableFrom` and `EncodableTo`) to ensure
//! type safety at compile time. This prevents invalid conversions and catches
//! errors early in the development process.
//!
//! ## Example
//!
//! ```ignore
//! use kumiki::decoder::Decoder;
//! use kumiki::encoder::Encoder;
//! use element::Element;
//!
//! // Parse text into an element tree
//! let element: Element = "<Sword damage=\"3\"/>".decode().unwrap();
//!
//! // Print the tree back to text
//! let text: String = element.encode().unwrap();
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
