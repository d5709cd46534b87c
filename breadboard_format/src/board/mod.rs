//! Breadboard layout file format (`.brd` files)
//!
//! This module provides structures and implementations for parsing and
//! generating breadboard layout files. A layout places parts (with their
//! pads and outline shapes) on a board and connects them with nets made of
//! junctions, traces, and air wires.

use std::collections::{BTreeMap, HashMap};

use breadboard_xml::XmlElement;
use tracing::warn;

use crate::{
    common::{pad::Pad, shape::PartShape, Point},
    convert::{FromXml, Parser, ToXml},
    BoardParseError,
};

/// Default board extents, used when the file carries no explicit dimensions.
pub const DEFAULT_BOARD_WIDTH: f64 = 160.0;
pub const DEFAULT_BOARD_HEIGHT: f64 = 100.0;

/// Represents the entire contents of a breadboard layout file.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct BoardFile {
    /// Name of the schematic file this layout was bootstrapped from.
    pub schematic: Option<String>,
    pub width: f64,
    pub height: f64,
    /// The parts on the board, keyed by part name. The key order doubles as
    /// the serialization order.
    pub parts: BTreeMap<String, Part>,
    pub nets: Vec<Net>,
}

impl BoardFile {
    pub fn new() -> Self {
        Self {
            schematic: None,
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            parts: BTreeMap::new(),
            nets: Vec::new(),
        }
    }

    pub fn add_part(&mut self, part: Part) {
        self.parts.insert(part.name.clone(), part);
    }

    pub fn get_part(&self, name: &str) -> Option<&Part> {
        self.parts.get(name)
    }

    pub fn add_net(&mut self, net: Net) {
        self.nets.push(net);
    }

    /// Resolves a node reference to its absolute position on the board.
    ///
    /// Junction references are resolved against the given net, since they
    /// are indices into that net's junction list.
    pub fn node_position(&self, node: &NodeRef, net: &Net) -> Option<Point> {
        match node {
            NodeRef::Pad { part, pin } => {
                let part = self.parts.get(part)?;
                let pad = part.get_pad(pin)?;

                Some(part.position + pad.position)
            }
            NodeRef::Junction { index } => net.junctions.get(*index).map(|j| j.position),
        }
    }
}

impl Default for BoardFile {
    fn default() -> Self {
        Self::new()
    }
}

impl FromXml for BoardFile {
    fn from_xml(mut parser: Parser) -> Result<Self, BoardParseError> {
        parser.expect_name_matching("breadboard")?;

        let schematic = parser.maybe_attribute("schematic");
        let width = parser
            .maybe_number_attribute("width")?
            .unwrap_or(DEFAULT_BOARD_WIDTH);
        let height = parser
            .maybe_number_attribute("height")?
            .unwrap_or(DEFAULT_BOARD_HEIGHT);

        // File node ids shared by pads and junctions; traces refer to these.
        let mut pad_ids = HashMap::new();

        let mut parts = BTreeMap::new();
        while let Some(child) = parser.maybe_child_named("part") {
            let part = Part::from_xml_collecting_ids(child, &mut pad_ids)?;
            parts.insert(part.name.clone(), part);
        }

        let mut nets = Vec::new();
        while let Some(child) = parser.maybe_child_named("net") {
            nets.push(Net::from_xml_with_pads(child, &pad_ids)?);
        }

        parser.expect_end()?;

        Ok(Self {
            schematic,
            width,
            height,
            parts,
            nets,
        })
    }
}

impl ToXml for BoardFile {
    fn to_xml(&self) -> XmlElement {
        // Pads and junctions share a single id space, assigned in
        // serialization order.
        let mut next_id = 0u32;
        let mut pad_ids = HashMap::new();

        let mut root = XmlElement::new("breadboard")
            .maybe_attribute("schematic", self.schematic.as_deref())
            .number_attribute("width", self.width)
            .number_attribute("height", self.height);

        for part in self.parts.values() {
            let mut element = XmlElement::new("part")
                .attribute("name", &part.name)
                .number_attribute("x", part.position.x)
                .number_attribute("y", part.position.y)
                .number_attribute("rotation", part.rotation)
                .maybe_attribute("value", part.value.as_deref())
                .maybe_attribute("package", part.package.as_deref())
                .extend(part.shapes.iter().map(ToXml::to_xml));

            for pad in part.pads.values() {
                pad_ids.insert(pad_key(&part.name, &pad.pin_number), next_id);
                element = element.child(pad.to_xml_with_id(next_id));
                next_id += 1;
            }

            root = root.child(element);
        }

        for net in &self.nets {
            let mut element = XmlElement::new("net").attribute("name", &net.name);

            let junction_base = next_id;
            for junction in &net.junctions {
                element = element.child(junction.to_xml_with_id(next_id));
                next_id += 1;
            }

            for trace in &net.traces {
                let from = node_id(&trace.from, junction_base, net.junctions.len(), &pad_ids);
                let to = node_id(&trace.to, junction_base, net.junctions.len(), &pad_ids);

                let (Some(from), Some(to)) = (from, to) else {
                    warn!("Net {}: trace references a missing node, skipping", net.name);
                    continue;
                };

                element = element.child(trace.to_xml_with_ids(from, to));
            }

            root = root.child(element);
        }

        root
    }
}

/// A board-unique pad id in the form `partName$pinNumber`.
fn pad_key(part: &str, pin: &str) -> String {
    format!("{part}${pin}")
}

fn node_id(
    node: &NodeRef,
    junction_base: u32,
    junction_count: usize,
    pad_ids: &HashMap<String, u32>,
) -> Option<u32> {
    match node {
        NodeRef::Pad { part, pin } => pad_ids.get(&pad_key(part, pin)).copied(),
        NodeRef::Junction { index } => {
            (*index < junction_count).then(|| junction_base + *index as u32)
        }
    }
}

/// Represents a part placed on the board.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct Part {
    pub name: String,
    /// The part value, e.g. `4.7k` for a resistor.
    pub value: Option<String>,
    /// The name of the package the part outline came from.
    pub package: Option<String>,
    pub position: Point,
    /// Rotation around the part origin, in degrees.
    pub rotation: f64,
    /// The part's pads, keyed by pin number. Positions are relative to the
    /// part origin.
    pub pads: BTreeMap<String, Pad>,
    pub shapes: Vec<PartShape>,
}

impl Part {
    pub fn new(
        name: impl Into<String>,
        value: Option<String>,
        package: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value,
            package,
            position: Point::default(),
            rotation: 0.0,
            pads: BTreeMap::new(),
            shapes: Vec::new(),
        }
    }

    pub fn add_pad(&mut self, pad: Pad) {
        self.pads.insert(pad.pin_number.clone(), pad);
    }

    pub fn get_pad(&self, pin_number: &str) -> Option<&Pad> {
        self.pads.get(pin_number)
    }

    pub fn add_shape(&mut self, shape: PartShape) {
        self.shapes.push(shape);
    }

    /// Parses a `<part>` element, recording the file ids of its pads in
    /// `pad_ids` so net traces can refer back to them.
    fn from_xml_collecting_ids(
        mut parser: Parser,
        pad_ids: &mut HashMap<String, NodeRef>,
    ) -> Result<Self, BoardParseError> {
        let name = parser.expect_attribute("name")?;
        let x = parser.expect_number_attribute("x")?;
        let y = parser.expect_number_attribute("y")?;
        let rotation = parser.expect_number_attribute("rotation")?;
        let value = parser.maybe_attribute("value");
        let package = parser.maybe_attribute("package");

        let shapes = parser.expect_many::<PartShape>()?;

        let mut pads = BTreeMap::new();
        while let Some(child) = parser.maybe_child_named("pad") {
            let (id, pad) = Pad::from_xml_with_id(child)?;

            pad_ids.insert(
                id,
                NodeRef::Pad {
                    part: name.clone(),
                    pin: pad.pin_number.clone(),
                },
            );
            pads.insert(pad.pin_number.clone(), pad);
        }

        parser.expect_end()?;

        Ok(Self {
            name,
            value,
            package,
            position: Point::new(x, y),
            rotation,
            pads,
            shapes,
        })
    }
}

/// Represents a net: an electrically connected set of pads, linked through
/// junctions, traces, and air wires.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct Net {
    pub name: String,
    /// Points which connect traces within this net.
    pub junctions: Vec<Junction>,
    pub traces: Vec<Trace>,
}

impl Net {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            junctions: Vec::new(),
            traces: Vec::new(),
        }
    }

    pub fn add_junction(&mut self, junction: Junction) {
        self.junctions.push(junction);
    }

    pub fn add_trace(&mut self, trace: Trace) {
        self.traces.push(trace);
    }

    /// Parses a `<net>` element, resolving trace endpoints against the
    /// junctions declared in the net and the pad ids collected from the
    /// parts.
    ///
    /// A trace whose endpoints cannot be resolved is skipped with a warning
    /// rather than failing the whole load.
    fn from_xml_with_pads(
        mut parser: Parser,
        pad_ids: &HashMap<String, NodeRef>,
    ) -> Result<Self, BoardParseError> {
        let name = parser.expect_attribute("name")?;

        let mut junctions = Vec::new();
        let mut junction_ids = HashMap::new();
        while let Some(child) = parser.maybe_child_named("junction") {
            let (id, junction) = Junction::from_xml_with_id(child)?;

            junction_ids.insert(id, junctions.len());
            junctions.push(junction);
        }

        let mut traces = Vec::new();
        loop {
            let kind = match parser.peek_child().map(XmlElement::name) {
                Some("trace") => TraceKind::Trace,
                Some("airwire") => TraceKind::AirWire,
                _ => break,
            };

            let mut child = parser.expect_child()?;
            let from_id = child.expect_attribute("from")?;
            let to_id = child.expect_attribute("to")?;
            child.expect_end()?;

            let from = resolve_node_id(&from_id, &junction_ids, pad_ids);
            let to = resolve_node_id(&to_id, &junction_ids, pad_ids);

            let (Some(from), Some(to)) = (from, to) else {
                warn!(
                    "Net {}: node {} or {} not found, skipping trace",
                    name, from_id, to_id
                );
                continue;
            };

            traces.push(Trace { from, to, kind });
        }

        parser.expect_end()?;

        Ok(Self {
            name,
            junctions,
            traces,
        })
    }
}

/// Junction ids take precedence over pad ids, matching the lookup order the
/// format was originally written with.
fn resolve_node_id(
    id: &str,
    junction_ids: &HashMap<String, usize>,
    pad_ids: &HashMap<String, NodeRef>,
) -> Option<NodeRef> {
    junction_ids
        .get(id)
        .map(|&index| NodeRef::Junction { index })
        .or_else(|| pad_ids.get(id).cloned())
}

/// A free connection point within a net.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct Junction {
    pub position: Point,
}

impl Junction {
    pub fn new(position: Point) -> Self {
        Self { position }
    }

    fn from_xml_with_id(mut parser: Parser) -> Result<(String, Self), BoardParseError> {
        parser.expect_name_matching("junction")?;

        let x = parser.expect_number_attribute("x")?;
        let y = parser.expect_number_attribute("y")?;
        let id = parser.expect_attribute("id")?;

        parser.expect_end()?;

        Ok((
            id,
            Self {
                position: Point::new(x, y),
            },
        ))
    }

    fn to_xml_with_id(&self, id: u32) -> XmlElement {
        XmlElement::new("junction")
            .number_attribute("x", self.position.x)
            .number_attribute("y", self.position.y)
            .attribute("id", id.to_string())
    }
}

/// A wire segment connecting two nodes of a net.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Clone)]
pub struct Trace {
    pub from: NodeRef,
    pub to: NodeRef,
    pub kind: TraceKind,
}

impl Trace {
    fn to_xml_with_ids(&self, from: u32, to: u32) -> XmlElement {
        let name = match self.kind {
            TraceKind::Trace => "trace",
            TraceKind::AirWire => "airwire",
        };

        XmlElement::new(name)
            .attribute("from", from.to_string())
            .attribute("to", to.to_string())
    }
}

/// Whether a wire segment is routed.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TraceKind {
    /// A realized wire segment.
    Trace,
    /// An unrouted logical connection, shown while laying out an imported
    /// schematic.
    AirWire,
}

/// A reference to a connection node: either a pad on a part or a junction
/// within the referencing net.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum NodeRef {
    Pad { part: String, pin: String },
    Junction { index: usize },
}
