//! Eagle schematic file format (`.sch` files), read only
//!
//! Only the subset needed to bootstrap a board from a schematic is modeled:
//! the part list, the library devices and packages the parts refer to, the
//! sheet instances (for initial placement), and the nets with their pin
//! references. Everything else an Eagle file carries is skipped, and
//! attributes this library does not consume are ignored rather than
//! rejected.
//!
//! Coordinates are kept exactly as the file stores them, with Eagle's Y axis
//! pointing up; the importer flips them into board coordinates.

use crate::{
    convert::{FromXml, Parser},
    BoardParseError,
};

mod import;

pub use import::import_schematic;

/// The portions of an Eagle schematic file consumed by the importer.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct EagleSchematic {
    pub parts: Vec<EaglePart>,
    pub libraries: Vec<EagleLibrary>,
    pub sheets: Vec<EagleSheet>,
}

impl EagleSchematic {
    /// The first sheet instance of the given part, if any of its gates is
    /// placed on a sheet.
    pub fn instance_of(&self, part: &str) -> Option<&EagleInstance> {
        self.sheets
            .iter()
            .flat_map(|sheet| &sheet.instances)
            .find(|instance| instance.part == part)
    }

    pub fn library(&self, name: &str) -> Option<&EagleLibrary> {
        self.libraries.iter().find(|library| library.name == name)
    }

    /// Resolves a part's `library`/`deviceset`/`device` triple to the device
    /// entry carrying the package reference and pin connections.
    pub fn device(&self, library: &str, deviceset: &str, device: &str) -> Option<&EagleDevice> {
        self.library(library)?
            .devicesets
            .iter()
            .find(|set| set.name == deviceset)?
            .devices
            .iter()
            .find(|candidate| candidate.name == device)
    }

    pub fn package(&self, library: &str, package: &str) -> Option<&EaglePackage> {
        self.library(library)?
            .packages
            .iter()
            .find(|candidate| candidate.name == package)
    }
}

impl FromXml for EagleSchematic {
    fn from_xml(mut parser: Parser) -> Result<Self, BoardParseError> {
        parser.expect_name_matching("eagle")?;

        let mut drawing = parser
            .find_child_named("drawing")
            .ok_or(BoardParseError::MissingElement("drawing"))?;
        let mut schematic = drawing
            .find_child_named("schematic")
            .ok_or(BoardParseError::MissingElement("schematic"))?;

        let mut parts = Vec::new();
        let mut libraries = Vec::new();
        let mut sheets = Vec::new();

        while let Some(child) = schematic.maybe_child() {
            if child.name() == "parts" {
                parts = parse_named_children(child, "part")?;
            } else if child.name() == "libraries" {
                libraries = parse_named_children(child, "library")?;
            } else if child.name() == "sheets" {
                sheets = parse_named_children(child, "sheet")?;
            }
        }

        Ok(Self {
            parts,
            libraries,
            sheets,
        })
    }
}

/// Parses every child with the given name, skipping the rest.
fn parse_named_children<T: FromXml>(
    mut parser: Parser,
    name: &str,
) -> Result<Vec<T>, BoardParseError> {
    let mut result = Vec::new();

    while let Some(child) = parser.maybe_child() {
        if child.name() == name {
            result.push(T::from_xml(child)?);
        }
    }

    Ok(result)
}

/// A part instantiated by the schematic, referring into a library.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct EaglePart {
    pub name: String,
    pub value: Option<String>,
    pub library: String,
    pub deviceset: String,
    pub device: String,
}

impl FromXml for EaglePart {
    fn from_xml(mut parser: Parser) -> Result<Self, BoardParseError> {
        parser.expect_name_matching("part")?;

        Ok(Self {
            name: parser.expect_attribute("name")?,
            value: parser.maybe_attribute("value"),
            library: parser.expect_attribute("library")?,
            deviceset: parser.expect_attribute("deviceset")?,
            device: parser.expect_attribute("device")?,
        })
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct EagleLibrary {
    pub name: String,
    pub packages: Vec<EaglePackage>,
    pub devicesets: Vec<EagleDeviceSet>,
}

impl FromXml for EagleLibrary {
    fn from_xml(mut parser: Parser) -> Result<Self, BoardParseError> {
        parser.expect_name_matching("library")?;

        let name = parser.expect_attribute("name")?;

        let mut packages = Vec::new();
        let mut devicesets = Vec::new();

        while let Some(child) = parser.maybe_child() {
            if child.name() == "packages" {
                packages = parse_named_children(child, "package")?;
            } else if child.name() == "devicesets" {
                devicesets = parse_named_children(child, "deviceset")?;
            }
        }

        Ok(Self {
            name,
            packages,
            devicesets,
        })
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct EagleDeviceSet {
    pub name: String,
    pub devices: Vec<EagleDevice>,
}

impl FromXml for EagleDeviceSet {
    fn from_xml(mut parser: Parser) -> Result<Self, BoardParseError> {
        parser.expect_name_matching("deviceset")?;

        let name = parser.expect_attribute("name")?;

        let mut devices = Vec::new();
        while let Some(child) = parser.maybe_child() {
            if child.name() == "devices" {
                devices = parse_named_children(child, "device")?;
            }
        }

        Ok(Self { name, devices })
    }
}

/// A concrete device of a device set: the package it is housed in and the
/// mapping from package pads to logical pins.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct EagleDevice {
    pub name: String,
    pub package: Option<String>,
    pub connects: Vec<EagleConnect>,
}

impl EagleDevice {
    /// The connect entry mapping the given package pad to a logical pin.
    pub fn connect_for(&self, pad: &str) -> Option<&EagleConnect> {
        self.connects.iter().find(|connect| connect.pad == pad)
    }
}

impl FromXml for EagleDevice {
    fn from_xml(mut parser: Parser) -> Result<Self, BoardParseError> {
        parser.expect_name_matching("device")?;

        // An unnamed device is legal in Eagle; it shows up as name="".
        let name = parser.maybe_attribute("name").unwrap_or_default();
        let package = parser.maybe_attribute("package");

        let mut connects = Vec::new();
        while let Some(child) = parser.maybe_child() {
            if child.name() == "connects" {
                connects = parse_named_children(child, "connect")?;
            }
        }

        Ok(Self {
            name,
            package,
            connects,
        })
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct EagleConnect {
    pub gate: String,
    pub pin: String,
    pub pad: String,
}

impl FromXml for EagleConnect {
    fn from_xml(mut parser: Parser) -> Result<Self, BoardParseError> {
        parser.expect_name_matching("connect")?;

        Ok(Self {
            gate: parser.expect_attribute("gate")?,
            pin: parser.expect_attribute("pin")?,
            pad: parser.expect_attribute("pad")?,
        })
    }
}

/// A library package: the physical footprint with its pads and outline.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct EaglePackage {
    pub name: String,
    /// Through-hole pads.
    pub pads: Vec<EaglePad>,
    /// Surface-mount pads.
    pub smds: Vec<EagleSmd>,
    pub wires: Vec<EagleWire>,
    pub rectangles: Vec<EagleRectangle>,
    pub circles: Vec<EagleCircle>,
    pub texts: Vec<EagleText>,
}

impl FromXml for EaglePackage {
    fn from_xml(mut parser: Parser) -> Result<Self, BoardParseError> {
        parser.expect_name_matching("package")?;

        let name = parser.expect_attribute("name")?;

        let mut pads = Vec::new();
        let mut smds = Vec::new();
        let mut wires = Vec::new();
        let mut rectangles = Vec::new();
        let mut circles = Vec::new();
        let mut texts = Vec::new();

        while let Some(child) = parser.maybe_child() {
            if child.name() == "pad" {
                pads.push(EaglePad::from_xml(child)?);
            } else if child.name() == "smd" {
                smds.push(EagleSmd::from_xml(child)?);
            } else if child.name() == "wire" {
                wires.push(EagleWire::from_xml(child)?);
            } else if child.name() == "rectangle" {
                rectangles.push(EagleRectangle::from_xml(child)?);
            } else if child.name() == "circle" {
                circles.push(EagleCircle::from_xml(child)?);
            } else if child.name() == "text" {
                texts.push(EagleText::from_xml(child)?);
            }
        }

        Ok(Self {
            name,
            pads,
            smds,
            wires,
            rectangles,
            circles,
            texts,
        })
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct EaglePad {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl FromXml for EaglePad {
    fn from_xml(mut parser: Parser) -> Result<Self, BoardParseError> {
        parser.expect_name_matching("pad")?;

        Ok(Self {
            name: parser.expect_attribute("name")?,
            x: parser.expect_number_attribute("x")?,
            y: parser.expect_number_attribute("y")?,
        })
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct EagleSmd {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl FromXml for EagleSmd {
    fn from_xml(mut parser: Parser) -> Result<Self, BoardParseError> {
        parser.expect_name_matching("smd")?;

        Ok(Self {
            name: parser.expect_attribute("name")?,
            x: parser.expect_number_attribute("x")?,
            y: parser.expect_number_attribute("y")?,
        })
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct EagleWire {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub width: f64,
    /// When present, the wire is drawn as an arc with this included angle
    /// (degrees) instead of a straight line.
    pub curve: Option<f64>,
}

impl FromXml for EagleWire {
    fn from_xml(mut parser: Parser) -> Result<Self, BoardParseError> {
        parser.expect_name_matching("wire")?;

        Ok(Self {
            x1: parser.expect_number_attribute("x1")?,
            y1: parser.expect_number_attribute("y1")?,
            x2: parser.expect_number_attribute("x2")?,
            y2: parser.expect_number_attribute("y2")?,
            width: parser.expect_number_attribute("width")?,
            curve: parser.maybe_number_attribute("curve")?,
        })
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct EagleRectangle {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl FromXml for EagleRectangle {
    fn from_xml(mut parser: Parser) -> Result<Self, BoardParseError> {
        parser.expect_name_matching("rectangle")?;

        Ok(Self {
            x1: parser.expect_number_attribute("x1")?,
            y1: parser.expect_number_attribute("y1")?,
            x2: parser.expect_number_attribute("x2")?,
            y2: parser.expect_number_attribute("y2")?,
        })
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct EagleCircle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub width: f64,
}

impl FromXml for EagleCircle {
    fn from_xml(mut parser: Parser) -> Result<Self, BoardParseError> {
        parser.expect_name_matching("circle")?;

        Ok(Self {
            x: parser.expect_number_attribute("x")?,
            y: parser.expect_number_attribute("y")?,
            radius: parser.expect_number_attribute("radius")?,
            width: parser.expect_number_attribute("width")?,
        })
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct EagleText {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    /// Stroke-to-size ratio in percent. Malformed values are treated as
    /// absent; the importer falls back to 1.0 either way.
    pub ratio: Option<f64>,
    pub content: String,
}

impl FromXml for EagleText {
    fn from_xml(mut parser: Parser) -> Result<Self, BoardParseError> {
        parser.expect_name_matching("text")?;

        Ok(Self {
            x: parser.expect_number_attribute("x")?,
            y: parser.expect_number_attribute("y")?,
            size: parser.expect_number_attribute("size")?,
            ratio: parser
                .maybe_attribute("ratio")
                .and_then(|value| value.parse().ok()),
            content: parser.maybe_text().unwrap_or_default(),
        })
    }
}

/// An instance places one gate of a part on a sheet.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct EagleInstance {
    pub part: String,
    pub gate: String,
    pub x: f64,
    pub y: f64,
}

impl FromXml for EagleInstance {
    fn from_xml(mut parser: Parser) -> Result<Self, BoardParseError> {
        parser.expect_name_matching("instance")?;

        Ok(Self {
            part: parser.expect_attribute("part")?,
            gate: parser.expect_attribute("gate")?,
            x: parser.expect_number_attribute("x")?,
            y: parser.expect_number_attribute("y")?,
        })
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct EagleSheet {
    pub instances: Vec<EagleInstance>,
    pub nets: Vec<EagleNet>,
}

impl FromXml for EagleSheet {
    fn from_xml(mut parser: Parser) -> Result<Self, BoardParseError> {
        parser.expect_name_matching("sheet")?;

        let mut instances = Vec::new();
        let mut nets = Vec::new();

        while let Some(child) = parser.maybe_child() {
            if child.name() == "instances" {
                instances = parse_named_children(child, "instance")?;
            } else if child.name() == "nets" {
                nets = parse_named_children(child, "net")?;
            }
        }

        Ok(Self { instances, nets })
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct EagleNet {
    pub name: String,
    pub segments: Vec<EagleSegment>,
}

impl EagleNet {
    /// All pin references of the net, across its segments, in document
    /// order.
    pub fn pinrefs(&self) -> impl Iterator<Item = &EaglePinref> {
        self.segments.iter().flat_map(|segment| &segment.pinrefs)
    }
}

impl FromXml for EagleNet {
    fn from_xml(mut parser: Parser) -> Result<Self, BoardParseError> {
        parser.expect_name_matching("net")?;

        let name = parser.expect_attribute("name")?;
        let segments = parse_named_children(parser, "segment")?;

        Ok(Self { name, segments })
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct EagleSegment {
    pub pinrefs: Vec<EaglePinref>,
}

impl FromXml for EagleSegment {
    fn from_xml(parser: Parser) -> Result<Self, BoardParseError> {
        parser.expect_name_matching("segment")?;

        Ok(Self {
            pinrefs: parse_named_children(parser, "pinref")?,
        })
    }
}

/// A reference from a net segment to a logical pin of a part gate.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct EaglePinref {
    pub part: String,
    pub gate: String,
    pub pin: String,
}

impl FromXml for EaglePinref {
    fn from_xml(mut parser: Parser) -> Result<Self, BoardParseError> {
        parser.expect_name_matching("pinref")?;

        Ok(Self {
            part: parser.expect_attribute("part")?,
            gate: parser.expect_attribute("gate")?,
            pin: parser.expect_attribute("pin")?,
        })
    }
}
