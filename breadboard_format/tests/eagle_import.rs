use breadboard_format::{
    board::TraceKind,
    common::shape::PartShape,
    eagle::import_schematic,
    parse_eagle_schematic_file,
};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn import_fixture() -> breadboard_format::board::BoardFile {
    let input = std::fs::read_to_string("./tests/eagle/small.sch").unwrap();
    let schematic = parse_eagle_schematic_file(&input).unwrap();

    import_schematic(&schematic, Some("small.sch"))
}

#[test]
fn test_parts_are_created_from_their_packages() {
    let board = import_fixture();

    assert_eq!(board.schematic.as_deref(), Some("small.sch"));

    let r1 = board.get_part("R1").unwrap();
    assert_eq!(r1.value.as_deref(), Some("4.7k"));
    assert_eq!(r1.package.as_deref(), Some("0207/10"));

    // Pads 1 and 2 have connect entries; the NC pad has none and is not a
    // connection node.
    assert_eq!(r1.pads.len(), 2);
    let pad = r1.get_pad("1").unwrap();
    assert_close(pad.position.x, -5.08);
    assert_close(pad.position.y, 0.0);

    // GND1's device has no package, so the part never makes it to the board.
    assert!(board.get_part("GND1").is_none());
}

#[test]
fn test_parts_are_placed_at_their_instance_positions() {
    let board = import_fixture();

    // Eagle Y points up, the board Y points down; after the flip everything
    // is shifted so the lowest part lands at Y zero.
    let r1 = board.get_part("R1").unwrap();
    assert_close(r1.position.x, 10.16);
    assert_close(r1.position.y, 0.0);

    let r2 = board.get_part("R2").unwrap();
    assert_close(r2.position.x, 10.16);
    assert_close(r2.position.y, 12.7);
}

#[test]
fn test_package_outline_becomes_shapes() {
    let board = import_fixture();
    let r1 = board.get_part("R1").unwrap();

    // 2 straight wires, 1 curved wire, 1 rectangle, 1 circle, 2 texts.
    assert_eq!(r1.shapes.len(), 7);

    let lines = r1
        .shapes
        .iter()
        .filter(|shape| matches!(shape, PartShape::Line(_)))
        .count();
    assert_eq!(lines, 2);

    let rectangle = r1
        .shapes
        .iter()
        .find_map(|shape| match shape {
            PartShape::Rectangle(rectangle) => Some(rectangle),
            _ => None,
        })
        .unwrap();
    assert_close(rectangle.start.y, 1.143);
    assert_close(rectangle.end.y, -1.143);
}

#[test]
fn test_curved_wire_becomes_an_arc() {
    let board = import_fixture();
    let r1 = board.get_part("R1").unwrap();

    let arc = r1
        .shapes
        .iter()
        .find_map(|shape| match shape {
            PartShape::Arc(arc) => Some(arc),
            _ => None,
        })
        .unwrap();

    // The wire runs from (-1.27, 0.889) to (1.27, 0.889) with a 90 degree
    // curve; the Y flip negates both the coordinates and the sweep.
    assert_close(arc.center.x, 0.0);
    assert_close(arc.center.y, 0.381);
    assert_close(arc.radius, 1.27 * std::f64::consts::SQRT_2);
    assert_close(arc.start_angle, 135.0);
    assert_close(arc.length, -90.0);
    assert_close(arc.width, 0.1524);
}

#[test]
fn test_name_and_value_placeholders_are_substituted() {
    let board = import_fixture();

    let texts = |part: &str| {
        board
            .get_part(part)
            .unwrap()
            .shapes
            .iter()
            .filter_map(|shape| match shape {
                PartShape::Text(text) => Some(text.clone()),
                _ => None,
            })
            .collect::<Vec<_>>()
    };

    let r1_texts = texts("R1");
    assert_eq!(r1_texts[0].content, "R1");
    // size * ratio / 10, with ratio 10 on the name text.
    assert_close(r1_texts[0].size, 1.778);
    assert_eq!(r1_texts[1].content, "4.7k");
    assert_close(r1_texts[1].size, 0.1778);

    // R2 has no value, so its >VALUE placeholder is left as-is.
    let r2_texts = texts("R2");
    assert_eq!(r2_texts[1].content, ">VALUE");
}

#[test]
fn test_net_pads_are_chained_with_air_wires() {
    let board = import_fixture();

    assert_eq!(board.nets.len(), 2);

    // N$1 names three pins, but R2 has no pin 3, so only one air wire
    // remains between the two resolvable pads.
    let n1 = board.nets.iter().find(|net| net.name == "N$1").unwrap();
    assert_eq!(n1.traces.len(), 1);
    assert_eq!(n1.traces[0].kind, TraceKind::AirWire);

    let from = board.node_position(&n1.traces[0].from, n1).unwrap();
    assert_close(from.x, 10.16 + 5.08);
    assert_close(from.y, 0.0);

    let to = board.node_position(&n1.traces[0].to, n1).unwrap();
    assert_close(to.x, 10.16 - 5.08);
    assert_close(to.y, 12.7);

    // N$2 references the skipped GND part, leaving a single pad and nothing
    // to connect.
    let n2 = board.nets.iter().find(|net| net.name == "N$2").unwrap();
    assert!(n2.traces.is_empty());
}

// An imported board must survive a save/load cycle unchanged.
#[test]
fn test_imported_board_round_trips_through_the_board_format() {
    let board = import_fixture();

    let output = breadboard_format::serialize_board_file(board.clone());
    let reloaded = breadboard_format::parse_board_file(&output).unwrap();

    assert_eq!(board, reloaded);
}
