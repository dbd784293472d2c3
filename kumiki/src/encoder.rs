//! Encoder trait, the reverse of [`crate::decoder::Decoder`].
//!
//! The `element` crate implements `Encoder<Element, String>` to print an
//! element tree as markup text.

/// Encoder trait for converting from type `T` to type `E`.
pub trait Encoder<T, E: EncodableTo<T>> {
    /// The error type returned when encoding fails.
    type Error;

    /// Encodes `self` into type `E`.
    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker trait indicating that type `E` can be encoded from type `T`.
pub trait EncodableTo<T> {}
