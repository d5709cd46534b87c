use std::path::Path;

use breadboard_format::{
    board::{BoardFile, NodeRef, TraceKind},
    convert::{FromXml, Parser, ToXml},
};
use breadboard_xml::XmlElement;

fn assert_elements_eq(input_element: XmlElement, output_element: XmlElement) {
    if input_element == output_element {
        return;
    }

    let mut output = String::new();

    for diff in diff::lines(&format!("{input_element}"), &format!("{output_element}")) {
        match diff {
            diff::Result::Left(l) => output.push_str(&format!(
                "{}",
                ansi_term::Color::Red.paint(format!("-{}\n", l))
            )),
            diff::Result::Both(l, _) => output.push_str(&format!(" {}\n", l)),
            diff::Result::Right(r) => output.push_str(&format!(
                "{}",
                ansi_term::Color::Green.paint(format!("+{}\n", r))
            )),
        }
    }

    panic!("input XML (red) did not match output XML (green): \n{output}");
}

fn assert_in_out_eq<T: FromXml + ToXml>(input: &str, path: &Path) {
    let input_element = breadboard_xml::from_str(input).unwrap();

    let parsed = T::from_xml(Parser::new(input_element.clone()))
        .unwrap_or_else(|e| panic!("Failed to parse file: {}\n{e}\n{e:?}", path.display()));

    let output_element = parsed.to_xml();

    assert_elements_eq(input_element, output_element);
}

fn test_files_in_dir<T: FromXml + ToXml, P: AsRef<Path>>(directory: P) {
    let files = std::fs::read_dir(directory)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    files.iter().for_each(|file| {
        if file.metadata().unwrap().is_dir() {
            return;
        }

        let input = std::fs::read_to_string(file.path()).unwrap();

        assert_in_out_eq::<T>(&input, &file.path());
    });
}

#[test]
fn test_board() {
    test_files_in_dir::<BoardFile, _>("./tests/breadboard")
}

#[test]
fn test_board_defaults() {
    let board = breadboard_format::parse_board_file(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<breadboard/>",
    )
    .unwrap();

    assert_eq!(board.schematic, None);
    assert_eq!(board.width, 160.0);
    assert_eq!(board.height, 100.0);
    assert!(board.parts.is_empty());
    assert!(board.nets.is_empty());
}

// Node ids are renumbered on save, so a file using arbitrary ids must load
// into the same model its canonical serialization loads into.
#[test]
fn test_arbitrary_node_ids_survive_a_round_trip() {
    let input = r#"<?xml version="1.0" encoding="UTF-8"?>
        <breadboard width="160.0" height="100.0">
          <part name="R1" x="10.0" y="10.0" rotation="0.0">
            <pad x="0.0" y="0.0" pinNumber="1" id="107"/>
            <pad x="10.16" y="0.0" pinNumber="2" id="93"/>
          </part>
          <net name="N$1">
            <junction x="20.0" y="10.0" id="4711"/>
            <trace from="93" to="4711"/>
            <airwire from="4711" to="107"/>
          </net>
        </breadboard>"#;

    let board = breadboard_format::parse_board_file(input).unwrap();

    let net = &board.nets[0];
    assert_eq!(
        net.traces[0].from,
        NodeRef::Pad {
            part: "R1".to_string(),
            pin: "2".to_string()
        }
    );
    assert_eq!(net.traces[0].to, NodeRef::Junction { index: 0 });
    assert_eq!(net.traces[0].kind, TraceKind::Trace);
    assert_eq!(net.traces[1].kind, TraceKind::AirWire);

    let output = breadboard_format::serialize_board_file(board.clone());
    let reloaded = breadboard_format::parse_board_file(&output).unwrap();

    assert_eq!(board, reloaded);
}

// A trace referring to a node that does not exist degrades to a warning;
// the rest of the file still loads.
#[test]
fn test_trace_with_missing_node_is_skipped() {
    let input = r#"<?xml version="1.0" encoding="UTF-8"?>
        <breadboard width="160.0" height="100.0">
          <part name="R1" x="10.0" y="10.0" rotation="0.0">
            <pad x="0.0" y="0.0" pinNumber="1" id="0"/>
            <pad x="10.16" y="0.0" pinNumber="2" id="1"/>
          </part>
          <net name="N$1">
            <trace from="0" to="99"/>
            <airwire from="0" to="1"/>
          </net>
        </breadboard>"#;

    let board = breadboard_format::parse_board_file(input).unwrap();

    let net = &board.nets[0];
    assert_eq!(net.traces.len(), 1);
    assert_eq!(net.traces[0].kind, TraceKind::AirWire);
}

#[test]
fn test_unknown_element_is_rejected() {
    let input = r#"<?xml version="1.0" encoding="UTF-8"?>
        <breadboard width="160.0" height="100.0">
          <resistor name="R1"/>
        </breadboard>"#;

    assert!(breadboard_format::parse_board_file(input).is_err());
}

#[test]
fn test_node_positions_resolve_through_the_owning_part() {
    let input = r#"<?xml version="1.0" encoding="UTF-8"?>
        <breadboard width="160.0" height="100.0">
          <part name="R1" x="10.0" y="20.0" rotation="0.0">
            <pad x="2.54" y="1.27" pinNumber="1" id="0"/>
          </part>
          <net name="N$1">
            <junction x="40.0" y="40.0" id="1"/>
            <trace from="0" to="1"/>
          </net>
        </breadboard>"#;

    let board = breadboard_format::parse_board_file(input).unwrap();
    let net = &board.nets[0];
    let trace = &net.traces[0];

    let from = board.node_position(&trace.from, net).unwrap();
    assert!((from.x - 12.54).abs() < 1e-9);
    assert!((from.y - 21.27).abs() < 1e-9);

    let to = board.node_position(&trace.to, net).unwrap();
    assert_eq!((to.x, to.y), (40.0, 40.0));
}
