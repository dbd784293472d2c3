//! # element
//!
//! A small element tree model for XML-like markup, with a nom based parser and
//! an indenting printer.
//!
//! Only the structure is modelled: a tag, ordered attributes and ordered child
//! elements. Character data, CDATA sections, comments and declarations are
//! accepted by the parser and dropped.
//!
//! ```
//! use element::Element;
//! use kumiki::decoder::Decoder;
//! use kumiki::encoder::Encoder;
//!
//! let text = "<IsInRange min=\"0.0\" max=\"10.0\"/>";
//! let element: Element = text.decode().unwrap();
//! assert_eq!(Some("10.0"), element.attribute("max"));
//!
//! let printed: String = element.encode().unwrap();
//! assert_eq!("<IsInRange min=\"0.0\" max=\"10.0\"/>\n", printed);
//! ```

use std::str::FromStr;

use kumiki::decoder::{DecodableFrom, Decoder};
use kumiki::encoder::{EncodableTo, Encoder};
use serde::Serialize;

pub mod error;
mod parser;
mod printer;

use error::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    name: String,
    value: String,
}

impl Attribute {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// One node of the tree. Attribute names are unique within an element and
/// keep their insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    tag: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<Attribute>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Sets an attribute. An existing attribute keeps its position and gets
    /// the new value; a new one is appended.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(attribute) => attribute.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Appends `child` and returns a mutable reference to it.
    pub fn push_child(&mut self, child: Element) -> &mut Element {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn into_children(self) -> Vec<Element> {
        self.children
    }
}

impl FromStr for Element {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_document(s)
    }
}

impl<'a> DecodableFrom<&'a str> for Element {}

impl<'a> Decoder<&'a str, Element> for &'a str {
    type Error = Error;

    fn decode(&self) -> Result<Element, Self::Error> {
        parser::parse_document(self)
    }
}

impl EncodableTo<Element> for String {}

impl Encoder<Element, String> for Element {
    type Error = Error;

    fn encode(&self) -> Result<String, Self::Error> {
        Ok(self.to_string())
    }
}
