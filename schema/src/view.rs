//! Consumption tracking over a single element.

use std::fmt::{self, Display, Formatter};

use element::Element;
use log::warn;

use crate::error::Error;

/// Something present in the tree that no parameter consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    UnusedAttribute {
        element: String,
        name: String,
        value: String,
    },
    UnusedChild {
        element: String,
        tag: String,
    },
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnusedAttribute {
                element,
                name,
                value,
            } => write!(f, "unused attribute {element}[{name}] = {value:?}"),
            Diagnostic::UnusedChild { element, tag } => {
                write!(f, "unused child {element}<{tag}>")
            }
        }
    }
}

/// Child elements whose tag starts with an upper-case letter name a type;
/// the others are wrappers.
pub fn is_type_tag(tag: &str) -> bool {
    tag.chars().next().is_some_and(char::is_uppercase)
}

/// Read access to an element that remembers which attributes and children
/// were consumed.
#[derive(Debug)]
pub struct ElementView<'a> {
    element: &'a Element,
    attributes_used: Vec<bool>,
    children_used: Vec<bool>,
}

impl<'a> ElementView<'a> {
    pub fn new(element: &'a Element) -> Self {
        ElementView {
            element,
            attributes_used: vec![false; element.attributes().len()],
            children_used: vec![false; element.children().len()],
        }
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn tag(&self) -> &'a str {
        self.element.tag()
    }

    /// Checks for an attribute without consuming it.
    pub fn has_attr(&self, name: &str) -> bool {
        self.element.attribute(name).is_some()
    }

    /// Reads an attribute and marks it used.
    pub fn use_attr(&mut self, name: &str) -> Option<&'a str> {
        let element = self.element;
        let index = element.attributes().iter().position(|a| a.name() == name)?;
        self.attributes_used[index] = true;
        Some(element.attributes()[index].value())
    }

    /// Finds the only child tagged `tag` and marks it used. More than one
    /// such child is an error.
    pub fn use_child_by_tag(&mut self, tag: &str) -> Result<Option<&'a Element>, Error> {
        let element = self.element;
        let matching: Vec<usize> = element
            .children()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.tag() == tag)
            .map(|(i, _)| i)
            .collect();
        match matching.as_slice() {
            [] => Ok(None),
            [index] => Ok(Some(self.use_child(*index))),
            _ => Err(Error::Ambiguity {
                element: element.tag().to_string(),
                tag: tag.to_string(),
                count: matching.len(),
            }),
        }
    }

    /// Indices of the children whose tag names a type, in document order.
    pub(crate) fn candidate_children(&self) -> Vec<usize> {
        self.element
            .children()
            .iter()
            .enumerate()
            .filter(|(_, c)| is_type_tag(c.tag()))
            .map(|(i, _)| i)
            .collect()
    }

    // Indices come from `candidate_children` and are always in range.
    pub(crate) fn child(&self, index: usize) -> &'a Element {
        &self.element.children()[index]
    }

    pub(crate) fn is_child_used(&self, index: usize) -> bool {
        self.children_used[index]
    }

    pub(crate) fn use_child(&mut self, index: usize) -> &'a Element {
        self.children_used[index] = true;
        self.child(index)
    }

    /// Marks every attribute and child used.
    pub fn use_all(&mut self) {
        self.attributes_used.fill(true);
        self.children_used.fill(true);
    }

    /// Attributes and children nobody consumed, in document order.
    pub fn unused(&self) -> Vec<Diagnostic> {
        let tag = self.element.tag();
        let attributes = self
            .element
            .attributes()
            .iter()
            .zip(&self.attributes_used)
            .filter(|(_, used)| !**used)
            .map(|(a, _)| Diagnostic::UnusedAttribute {
                element: tag.to_string(),
                name: a.name().to_string(),
                value: a.value().to_string(),
            });
        let children = self
            .element
            .children()
            .iter()
            .zip(&self.children_used)
            .filter(|(_, used)| !**used)
            .map(|(c, _)| Diagnostic::UnusedChild {
                element: tag.to_string(),
                tag: c.tag().to_string(),
            });
        attributes.chain(children).collect()
    }

    /// Logs every unused item as a warning and returns them.
    pub fn report_unused(&self) -> Vec<Diagnostic> {
        let unused = self.unused();
        for diagnostic in &unused {
            warn!("{diagnostic}");
        }
        unused
    }
}
