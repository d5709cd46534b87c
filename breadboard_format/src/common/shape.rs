//! The drawable primitives a part carries as its package outline.

use breadboard_xml::XmlElement;

use crate::{
    convert::{FromXml, MaybeFromXml, Parser, ToXml},
    BoardParseError,
};

use super::Point;

/// A drawable primitive belonging to a part.
///
/// Shapes are purely graphical: they carry no electrical meaning and no
/// connection points. The electrically relevant nodes of a part are its pads.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub enum PartShape {
    Line(Line),
    Arc(Arc),
    Rectangle(Rectangle),
    Circle(Circle),
    Text(Text),
}

const VALID_ELEMENTS: &[&str] = &["line", "arc", "rectangle", "circle", "text"];

impl FromXml for PartShape {
    fn from_xml(mut parser: Parser) -> Result<Self, BoardParseError> {
        let name = parser.expect_name_matching_any(VALID_ELEMENTS)?;

        let shape = match name.as_str() {
            "line" => Self::Line(Line {
                start: Point::new(
                    parser.expect_number_attribute("x1")?,
                    parser.expect_number_attribute("y1")?,
                ),
                end: Point::new(
                    parser.expect_number_attribute("x2")?,
                    parser.expect_number_attribute("y2")?,
                ),
                width: parser.expect_number_attribute("width")?,
            }),
            "arc" => Self::Arc(Arc {
                center: Point::new(
                    parser.expect_number_attribute("x")?,
                    parser.expect_number_attribute("y")?,
                ),
                radius: parser.expect_number_attribute("radius")?,
                start_angle: parser.expect_number_attribute("start")?,
                length: parser.expect_number_attribute("length")?,
                width: parser.expect_number_attribute("width")?,
            }),
            "rectangle" => Self::Rectangle(Rectangle {
                start: Point::new(
                    parser.expect_number_attribute("x1")?,
                    parser.expect_number_attribute("y1")?,
                ),
                end: Point::new(
                    parser.expect_number_attribute("x2")?,
                    parser.expect_number_attribute("y2")?,
                ),
            }),
            "circle" => Self::Circle(Circle {
                center: Point::new(
                    parser.expect_number_attribute("x")?,
                    parser.expect_number_attribute("y")?,
                ),
                radius: parser.expect_number_attribute("radius")?,
                width: parser.expect_number_attribute("width")?,
            }),
            "text" => Self::Text(Text {
                position: Point::new(
                    parser.expect_number_attribute("x")?,
                    parser.expect_number_attribute("y")?,
                ),
                size: parser.expect_number_attribute("size")?,
                content: parser.expect_text()?,
            }),
            _ => unreachable!(),
        };

        parser.expect_end()?;

        Ok(shape)
    }
}

impl MaybeFromXml for PartShape {
    fn is_present(element: &XmlElement) -> bool {
        VALID_ELEMENTS.contains(&element.name())
    }
}

impl ToXml for PartShape {
    fn to_xml(&self) -> XmlElement {
        match self {
            Self::Line(line) => XmlElement::new("line")
                .number_attribute("x1", line.start.x)
                .number_attribute("y1", line.start.y)
                .number_attribute("x2", line.end.x)
                .number_attribute("y2", line.end.y)
                .number_attribute("width", line.width),
            Self::Arc(arc) => XmlElement::new("arc")
                .number_attribute("x", arc.center.x)
                .number_attribute("y", arc.center.y)
                .number_attribute("radius", arc.radius)
                .number_attribute("start", arc.start_angle)
                .number_attribute("length", arc.length)
                .number_attribute("width", arc.width),
            Self::Rectangle(rectangle) => XmlElement::new("rectangle")
                .number_attribute("x1", rectangle.start.x)
                .number_attribute("y1", rectangle.start.y)
                .number_attribute("x2", rectangle.end.x)
                .number_attribute("y2", rectangle.end.y),
            Self::Circle(circle) => XmlElement::new("circle")
                .number_attribute("x", circle.center.x)
                .number_attribute("y", circle.center.y)
                .number_attribute("radius", circle.radius)
                .number_attribute("width", circle.width),
            Self::Text(text) => XmlElement::new("text")
                .number_attribute("x", text.position.x)
                .number_attribute("y", text.position.y)
                .number_attribute("size", text.size)
                .text(&text.content),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct Line {
    pub start: Point,
    pub end: Point,
    pub width: f64,
}

/// A circular arc.
///
/// Angles are in degrees. `start_angle` is measured from the positive X axis
/// toward negative Y (counterclockwise on screen, since Y points down) and
/// `length` is the signed sweep in the same direction.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct Arc {
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub length: f64,
    pub width: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct Rectangle {
    pub start: Point,
    pub end: Point,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
    pub width: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct Text {
    pub position: Point,
    pub content: String,
    pub size: f64,
}

/// The parameters of an arc derived from its endpoints, in the same form
/// [`Arc`] stores them.
#[derive(Debug, PartialEq, Clone)]
pub struct ArcParameters {
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub length: f64,
}

/// Builds the circular arc that sweeps from `start` to `end` with the given
/// included angle.
///
/// `angle` is the signed sweep in degrees, positive counterclockwise on
/// screen. The center sits on the perpendicular bisector of the chord, at
/// `half_chord / tan(angle / 2)` from the chord midpoint; the radius is
/// `half_chord / sin(angle / 2)`.
///
/// The caller must ensure `angle` is non-zero: a zero sweep has no defined
/// center.
pub fn arc_from_points_and_angle(start: Point, end: Point, angle: f64) -> ArcParameters {
    let half = angle.to_radians() / 2.0;

    let chord = end - start;
    let chord_length = (chord.x * chord.x + chord.y * chord.y).sqrt();
    let half_chord = chord_length / 2.0;

    let radius = (half_chord / half.sin()).abs();
    let offset = half_chord / half.tan();

    let center = Point::new(
        (start.x + end.x) / 2.0 + chord.y / chord_length * offset,
        (start.y + end.y) / 2.0 - chord.x / chord_length * offset,
    );

    let start_angle = (center.y - start.y).atan2(start.x - center.x).to_degrees();

    ArcParameters {
        center,
        radius,
        start_angle,
        length: angle,
    }
}
