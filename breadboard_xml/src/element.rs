//! The owned XML element tree.

use std::fmt::Display;

use crate::number::format_number;

/// A single XML element: a name, an ordered attribute list, and either child
/// elements or text content.
///
/// Attribute order is preserved exactly as given, so a tree serializes to the
/// same bytes it was built from. Mixed content (text interleaved with child
/// elements) is not representable; none of the supported file formats use it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    pub text: Option<String>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /* Builder methods */

    /// Appends an attribute.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Appends a numeric attribute, formatted with [`format_number`].
    pub fn number_attribute(mut self, name: impl Into<String>, value: f64) -> Self {
        self.attributes.push((name.into(), format_number(value)));
        self
    }

    /// Appends an attribute if the value is present.
    ///
    /// Takes an [`Option`] so serializers can express optional fields inline:
    ///
    /// ```
    /// use breadboard_xml::XmlElement;
    ///
    /// let value: Option<&str> = None;
    ///
    /// assert_eq!(
    ///     XmlElement::new("part")
    ///         .attribute("name", "R1")
    ///         .maybe_attribute("value", value),
    ///     XmlElement::new("part").attribute("name", "R1"),
    /// )
    /// ```
    pub fn maybe_attribute(
        mut self,
        name: impl Into<String>,
        value: Option<impl Into<String>>,
    ) -> Self {
        if let Some(value) = value {
            self.attributes.push((name.into(), value.into()));
        }
        self
    }

    /// Appends a numeric attribute if the value is present.
    pub fn maybe_number_attribute(mut self, name: impl Into<String>, value: Option<f64>) -> Self {
        if let Some(value) = value {
            self.attributes.push((name.into(), format_number(value)));
        }
        self
    }

    /// Appends a child element.
    pub fn child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Appends a child element if it is present.
    pub fn maybe_child(mut self, child: Option<XmlElement>) -> Self {
        if let Some(child) = child {
            self.children.push(child);
        }
        self
    }

    /// Appends a sequence of child elements.
    pub fn extend(mut self, children: impl IntoIterator<Item = XmlElement>) -> Self {
        self.children.extend(children);
        self
    }

    /// Sets the text content of the element.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /* Accessors */

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of the named attribute, if present.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attribute, _)| attribute == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns all child elements with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Returns the first child element with the given name, if present.
    pub fn first_child_named<'a>(&'a self, name: &'a str) -> Option<&'a XmlElement> {
        self.children_named(name).next()
    }

    pub fn get_text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl Display for XmlElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::to_string(self))
    }
}
