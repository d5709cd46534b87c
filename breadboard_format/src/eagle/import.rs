//! Building a board layout from an imported Eagle schematic.

use tracing::{debug, warn};

use crate::{
    board::{BoardFile, Net, NodeRef, Part, Trace, TraceKind},
    common::{
        pad::Pad,
        shape::{arc_from_points_and_angle, Arc, Circle, Line, PartShape, Rectangle, Text},
        Point,
    },
};

use super::{EagleDevice, EagleNet, EaglePackage, EaglePart, EagleSchematic};

/// Converts an imported Eagle schematic into a board layout.
///
/// Parts are placed at their schematic instance positions so the initial
/// layout resembles the schematic, on the assumption that the schematic is
/// already somewhat formatted. Nets connect their pads through chains of air
/// wires, ready to be routed by hand.
///
/// `source` becomes the board's schematic file name, if given.
pub fn import_schematic(schematic: &EagleSchematic, source: Option<&str>) -> BoardFile {
    let mut board = BoardFile::new();
    board.schematic = source.map(str::to_string);

    let mut min_y = 0.0f64;

    for part in &schematic.parts {
        // Take the part position from its first sheet instance. Eagle's Y
        // axis points up while the board's points down, so Y is negated.
        let mut position = Point::default();
        if let Some(instance) = schematic.instance_of(&part.name) {
            position = Point::new(instance.x, -instance.y);
            min_y = min_y.min(position.y);
        }

        let Some(device) = schematic.device(&part.library, &part.deviceset, &part.device) else {
            warn!(
                "No device {} in deviceset {} of library {}, skipping part {}",
                part.device, part.deviceset, part.library, part.name
            );
            continue;
        };

        // If there is no package for the part, there is nothing we can put
        // onto the board.
        let Some(package) = device
            .package
            .as_deref()
            .and_then(|name| schematic.package(&part.library, name))
        else {
            warn!("No package for part {}, skipping", part.name);
            continue;
        };

        debug!(
            "Part {} uses package {} from library {}",
            part.name, package.name, part.library
        );

        let mut created = create_part(part, package, device);
        created.position = position;
        board.add_part(created);
    }

    for sheet in &schematic.sheets {
        for net in &sheet.nets {
            let net = import_net(&board, net);
            board.add_net(net);
        }
    }

    // Move all parts to "positive" Y coordinates.
    let delta = Point::new(0.0, -min_y);
    for part in board.parts.values_mut() {
        part.position = part.position + delta;
    }

    board
}

/// Builds a part from its library package: pads for the connected package
/// pads, shapes for the outline.
fn create_part(part: &EaglePart, package: &EaglePackage, device: &EagleDevice) -> Part {
    let mut result = Part::new(
        &part.name,
        part.value.clone(),
        Some(package.name.clone()),
    );

    for pad in &package.pads {
        // A package pad without a connect entry is not reachable from any
        // net, so it does not become a connection node.
        if device.connect_for(&pad.name).is_none() {
            continue;
        }

        result.add_pad(Pad::new(&pad.name, Point::new(pad.x, -pad.y)));
    }

    for smd in &package.smds {
        if device.connect_for(&smd.name).is_none() {
            warn!(
                "Part {}: smd pad {} has no connect entry, skipping",
                part.name, smd.name
            );
            continue;
        }

        result.add_pad(Pad::new(&smd.name, Point::new(smd.x, -smd.y)));
    }

    for wire in &package.wires {
        let start = Point::new(wire.x1, -wire.y1);
        let end = Point::new(wire.x2, -wire.y2);

        match wire.curve {
            // The included angle is negated to compensate for the Y flip.
            Some(curve) if curve != 0.0 => {
                let arc = arc_from_points_and_angle(start, end, -curve);

                result.add_shape(PartShape::Arc(Arc {
                    center: arc.center,
                    radius: arc.radius,
                    start_angle: arc.start_angle,
                    length: arc.length,
                    width: wire.width,
                }));
            }
            _ => result.add_shape(PartShape::Line(Line {
                start,
                end,
                width: wire.width,
            })),
        }
    }

    for rectangle in &package.rectangles {
        result.add_shape(PartShape::Rectangle(Rectangle {
            start: Point::new(rectangle.x1, -rectangle.y1),
            end: Point::new(rectangle.x2, -rectangle.y2),
        }));
    }

    for circle in &package.circles {
        result.add_shape(PartShape::Circle(Circle {
            center: Point::new(circle.x, -circle.y),
            radius: circle.radius,
            width: circle.width,
        }));
    }

    for text in &package.texts {
        let content = match text.content.as_str() {
            ">NAME" => part.name.clone(),
            ">VALUE" if part.value.is_some() => part.value.clone().unwrap_or_default(),
            _ => text.content.clone(),
        };

        let ratio = text.ratio.unwrap_or(1.0);

        result.add_shape(PartShape::Text(Text {
            position: Point::new(text.x, -text.y),
            content,
            size: text.size * ratio / 10.0,
        }));
    }

    result
}

/// Creates a net connecting all pads named by the Eagle net's pin
/// references through a chain of air wires.
fn import_net(board: &BoardFile, eagle_net: &EagleNet) -> Net {
    let mut net = Net::new(&eagle_net.name);

    let mut pads: Vec<NodeRef> = Vec::new();
    for pinref in eagle_net.pinrefs() {
        // If there was no package earlier, there is now also no part.
        let Some(part) = board.get_part(&pinref.part) else {
            continue;
        };

        if part.get_pad(&pinref.pin).is_none() {
            warn!(
                "Pad {}@{} not found in part {}, skipping pin reference",
                pinref.pin, pinref.gate, pinref.part
            );
            continue;
        }

        pads.push(NodeRef::Pad {
            part: pinref.part.clone(),
            pin: pinref.pin.clone(),
        });
    }

    for pair in pads.windows(2) {
        net.add_trace(Trace {
            from: pair[0].clone(),
            to: pair[1].clone(),
            kind: TraceKind::AirWire,
        });
    }

    net
}
