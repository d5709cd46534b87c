//! Conversion traits and utilities for converting between XML element trees
//! and Rust types.
//!
//! This module provides traits like [`FromXml`] and [`ToXml`]

use std::{iter::Peekable, vec::IntoIter};

use breadboard_xml::{number::parse_number, XmlElement};

use crate::BoardParseError;

/* ========= DESERIALIZATION ========= */

pub trait FromXml: Sized {
    fn from_xml(parser: Parser) -> Result<Self, BoardParseError>;
}

pub trait MaybeFromXml {
    fn is_present(element: &XmlElement) -> bool;
}

/// A parser used internally for easily lifting attributes and child elements
/// out of XML element trees.
#[derive(Debug, Clone)]
pub struct Parser {
    name: String,
    attributes: Vec<(String, String)>,
    children: Peekable<IntoIter<XmlElement>>,
    text: Option<String>,
}

impl Parser {
    pub fn new(element: XmlElement) -> Self {
        Self {
            name: element.name,
            attributes: element.attributes,
            children: element.children.into_iter().peekable(),
            text: element.text,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks that the element has the expected name.
    pub fn expect_name_matching(&self, expected: &str) -> Result<(), BoardParseError> {
        if self.name != expected {
            return Err(BoardParseError::NonMatchingElement {
                found: self.name.clone(),
                expected: expected.into(),
            });
        }

        Ok(())
    }

    /// Checks that the element is named one of the expected names, returning
    /// the name that matched.
    pub fn expect_name_matching_any(&self, expected: &[&str]) -> Result<String, BoardParseError> {
        if !expected.contains(&self.name.as_str()) {
            return Err(BoardParseError::NonMatchingElement {
                found: self.name.clone(),
                expected: expected.join(", "),
            });
        }

        Ok(self.name.clone())
    }

    /* Attributes */

    /// Removes and returns the named attribute, if present.
    pub fn maybe_attribute(&mut self, name: &str) -> Option<String> {
        let index = self
            .attributes
            .iter()
            .position(|(attribute, _)| attribute == name)?;

        Some(self.attributes.remove(index).1)
    }

    /// Removes and returns the named attribute.
    ///
    /// If the attribute is not present, an error is returned.
    pub fn expect_attribute(&mut self, name: &str) -> Result<String, BoardParseError> {
        self.maybe_attribute(name)
            .ok_or_else(|| BoardParseError::MissingAttribute {
                element: self.name.clone(),
                attribute: name.into(),
            })
    }

    /// Removes and returns the named attribute parsed as a number.
    pub fn expect_number_attribute(&mut self, name: &str) -> Result<f64, BoardParseError> {
        let value = self.expect_attribute(name)?;

        parse_number(&value).map_err(|error| BoardParseError::InvalidNumber {
            attribute: name.into(),
            value,
            error,
        })
    }

    /// Removes and returns the named attribute parsed as a number, if present.
    pub fn maybe_number_attribute(&mut self, name: &str) -> Result<Option<f64>, BoardParseError> {
        self.maybe_attribute(name)
            .map(|value| {
                parse_number(&value).map_err(|error| BoardParseError::InvalidNumber {
                    attribute: name.into(),
                    value,
                    error,
                })
            })
            .transpose()
    }

    /* Text content */

    /// Takes the text content of the element.
    ///
    /// If the element has no text content, an error is returned.
    pub fn expect_text(&mut self) -> Result<String, BoardParseError> {
        self.text.take().ok_or_else(|| BoardParseError::MissingText {
            element: self.name.clone(),
        })
    }

    /// Takes the text content of the element, if present.
    pub fn maybe_text(&mut self) -> Option<String> {
        self.text.take()
    }

    /* Children */

    pub fn peek_child(&mut self) -> Option<&XmlElement> {
        self.children.peek()
    }

    /// Returns a parser for the next child element, if any remain.
    pub fn maybe_child(&mut self) -> Option<Parser> {
        self.children.next().map(Parser::new)
    }

    /// Returns a parser for the next child element.
    ///
    /// If there are no more children, an error is returned.
    pub fn expect_child(&mut self) -> Result<Parser, BoardParseError> {
        self.children
            .next()
            .map(Parser::new)
            .ok_or_else(|| BoardParseError::UnexpectedEndOfChildren {
                element: self.name.clone(),
            })
    }

    /// Returns a parser for the next child element if it has the given name.
    pub fn maybe_child_named(&mut self, name: &str) -> Option<Parser> {
        let next = self.children.peek()?;

        if next.name() != name {
            return None;
        }

        Some(Parser::new(self.children.next().unwrap()))
    }

    /// Returns a parser for the next child element, checking its name.
    ///
    /// If there are no more children or the name does not match, an error is
    /// returned.
    pub fn expect_child_named(&mut self, name: &str) -> Result<Parser, BoardParseError> {
        let child = self.expect_child()?;
        child.expect_name_matching(name)?;

        Ok(child)
    }

    /// Pops children until one with the given name is found, returning a
    /// parser for it. Children before the match are discarded.
    ///
    /// Used for formats that carry elements this library does not consume.
    pub fn find_child_named(&mut self, name: &str) -> Option<Parser> {
        for child in self.children.by_ref() {
            if child.name() == name {
                return Some(Parser::new(child));
            }
        }

        None
    }

    /// Parses the next child element as a specific type.
    pub fn expect<T>(&mut self) -> Result<T, BoardParseError>
    where
        T: FromXml,
    {
        T::from_xml(self.expect_child()?)
    }

    pub fn maybe<T>(&mut self) -> Result<Option<T>, BoardParseError>
    where
        T: FromXml + MaybeFromXml,
    {
        // If there are no more children, return None
        let Some(element) = self.peek_child() else {
            return Ok(None);
        };

        T::is_present(element).then(|| self.expect::<T>()).transpose()
    }

    pub fn expect_many<T>(&mut self) -> Result<Vec<T>, BoardParseError>
    where
        T: FromXml + MaybeFromXml,
    {
        let mut result = Vec::new();

        while let Some(item) = self.maybe::<T>()? {
            result.push(item);
        }

        Ok(result)
    }

    /// Expects the element to be fully consumed: no attributes and no
    /// children may remain.
    pub fn expect_end(mut self) -> Result<(), BoardParseError> {
        if let Some((attribute, _)) = self.attributes.first() {
            return Err(BoardParseError::UnexpectedAttribute {
                element: self.name,
                attribute: attribute.clone(),
            });
        }

        if let Some(child) = self.children.next() {
            return Err(BoardParseError::ExpectedEndOfChildren {
                element: self.name,
                found: child.name,
            });
        }

        Ok(())
    }
}

/* ========= SERIALIZATION ========= */

pub trait ToXml {
    fn to_xml(&self) -> XmlElement;
}
