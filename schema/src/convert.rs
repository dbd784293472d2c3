use element::Element;

use crate::error::Error;
use crate::reflect::{FieldRef, Value};
use crate::view::ElementView;

/// Custom mapping for a type or a single parameter.
///
/// A converter runs before the built-in mapping. Returning `Ok(None)` from
/// [`Converter::from_element`] or `Ok(false)` from [`Converter::to_element`]
/// falls through to the built-in behavior, so a converter may handle only
/// one direction.
///
/// Attributes and children a converter reads through the view count as
/// used.
pub trait Converter: Send + Sync {
    fn from_element(&self, view: &mut ElementView<'_>) -> Result<Option<Value>, Error> {
        let _ = view;
        Ok(None)
    }

    /// Writes `value` into `parent`. For a type converter `parent` is the
    /// element the instance is appended to; for a parameter converter it is
    /// the element of the owning instance.
    fn to_element(&self, value: &FieldRef<'_>, parent: &mut Element) -> Result<bool, Error> {
        let _ = (value, parent);
        Ok(false)
    }
}
