use breadboard_xml::{from_str, number::format_number, to_string, XmlElement};

#[track_caller]
fn assert_parsed(input: &str, expected: &XmlElement) {
    let element = from_str(input).unwrap_or_else(|e| panic!("Failed to parse input: {e}"));

    assert_eq!(&element, expected);
}

#[track_caller]
fn assert_round_trips(element: XmlElement) {
    let output = to_string(&element);
    let reparsed = from_str(&output).unwrap_or_else(|e| panic!("Failed to reparse output: {e}"));

    assert_eq!(reparsed, element, "serialized form:\n{output}");
}

#[test]
fn test_parse_empty_element() {
    assert_parsed("<breadboard/>", &XmlElement::new("breadboard"));
}

#[test]
fn test_parse_attributes_preserve_order() {
    assert_parsed(
        r#"<pad x="1.0" y="-2.5" pinNumber="3" id="7"/>"#,
        &XmlElement::new("pad")
            .attribute("x", "1.0")
            .attribute("y", "-2.5")
            .attribute("pinNumber", "3")
            .attribute("id", "7"),
    );
}

#[test]
fn test_parse_nested_children_in_document_order() {
    assert_parsed(
        r#"
        <net name="GND">
          <junction id="4" x="0.0" y="0.0"/>
          <trace from="4" to="5"/>
        </net>
        "#,
        &XmlElement::new("net")
            .attribute("name", "GND")
            .child(
                XmlElement::new("junction")
                    .attribute("id", "4")
                    .attribute("x", "0.0")
                    .attribute("y", "0.0"),
            )
            .child(
                XmlElement::new("trace")
                    .attribute("from", "4")
                    .attribute("to", "5"),
            ),
    );
}

#[test]
fn test_parse_text_content_is_trimmed() {
    assert_parsed(
        "<text x=\"1.0\" y=\"2.0\" size=\"1.5\">\n  IC1\n</text>",
        &XmlElement::new("text")
            .attribute("x", "1.0")
            .attribute("y", "2.0")
            .attribute("size", "1.5")
            .text("IC1"),
    );
}

#[test]
fn test_parse_drops_comments_and_whitespace() {
    assert_parsed(
        "<part>\n  <!-- outline -->\n  <line/>\n</part>",
        &XmlElement::new("part").child(XmlElement::new("line")),
    );
}

#[test]
fn test_parse_rejects_malformed_document() {
    assert!(from_str("<breadboard><part></breadboard>").is_err());
}

#[test]
fn test_serialize_self_closes_empty_elements() {
    let output = to_string(
        &XmlElement::new("breadboard").child(XmlElement::new("part").attribute("name", "R1")),
    );

    assert_eq!(
        output,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<breadboard>\n  <part name=\"R1\"/>\n</breadboard>"
    );
}

#[test]
fn test_serialize_escapes_attribute_values_and_text() {
    assert_round_trips(
        XmlElement::new("part")
            .attribute("name", "R<1>")
            .attribute("value", "4.7k \"precision\" & more")
            .child(XmlElement::new("text").text("a < b & c")),
    );
}

#[test]
fn test_round_trip_deep_tree() {
    assert_round_trips(
        XmlElement::new("breadboard")
            .attribute("schematic", "small.sch")
            .number_attribute("width", 160.0)
            .number_attribute("height", 100.0)
            .child(
                XmlElement::new("part")
                    .attribute("name", "IC1")
                    .number_attribute("x", 10.0)
                    .number_attribute("y", 20.5)
                    .child(
                        XmlElement::new("pad")
                            .number_attribute("x", 0.0)
                            .number_attribute("y", 2.54)
                            .attribute("pinNumber", "1")
                            .attribute("id", "0"),
                    )
                    .child(XmlElement::new("text").number_attribute("size", 1.5).text("IC1")),
            )
            .child(XmlElement::new("net").attribute("name", "GND")),
    );
}

#[test]
fn test_format_number() {
    assert_eq!(format_number(160.0), "160.0");
    assert_eq!(format_number(-3.0), "-3.0");
    assert_eq!(format_number(0.6096), "0.6096");
    assert_eq!(format_number(-1.27), "-1.27");
}

#[test]
fn test_maybe_builders_skip_absent_values() {
    let element = XmlElement::new("breadboard")
        .maybe_attribute("schematic", None::<String>)
        .maybe_number_attribute("width", Some(160.0))
        .maybe_child(None);

    assert_eq!(
        element,
        XmlElement::new("breadboard").attribute("width", "160.0")
    );
}
