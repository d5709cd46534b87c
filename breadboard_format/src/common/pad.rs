//! Common structures related to part pads

use breadboard_xml::XmlElement;

use crate::{convert::Parser, BoardParseError};

use super::Point;

/// A pad is a connection node which refers to a specific pin of a part.
///
/// The position is relative to the part origin; the owning part's position
/// places the pad on the board. A pad belongs to exactly one part, enforced
/// by ownership: pads live in the part's pad map.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct Pad {
    /// The (physical) pin number of this pad.
    pub pin_number: String,
    pub position: Point,
}

impl Pad {
    pub fn new(pin_number: impl Into<String>, position: Point) -> Self {
        Self {
            pin_number: pin_number.into(),
            position,
        }
    }

    /// Parses a `<pad>` element, returning the node id the file assigned to
    /// it alongside the pad itself. Ids only exist in the file; they are how
    /// traces refer to their endpoints.
    pub(crate) fn from_xml_with_id(mut parser: Parser) -> Result<(String, Self), BoardParseError> {
        parser.expect_name_matching("pad")?;

        let x = parser.expect_number_attribute("x")?;
        let y = parser.expect_number_attribute("y")?;
        let pin_number = parser.expect_attribute("pinNumber")?;
        let id = parser.expect_attribute("id")?;

        parser.expect_end()?;

        Ok((
            id,
            Self {
                pin_number,
                position: Point::new(x, y),
            },
        ))
    }

    pub(crate) fn to_xml_with_id(&self, id: u32) -> XmlElement {
        XmlElement::new("pad")
            .number_attribute("x", self.position.x)
            .number_attribute("y", self.position.y)
            .attribute("pinNumber", &self.pin_number)
            .attribute("id", id.to_string())
    }
}
