use board::BoardFile;
use convert::{FromXml, Parser, ToXml};
use eagle::EagleSchematic;
use thiserror::Error;

pub mod board;
pub mod common;
pub mod convert;
pub mod eagle;

/// Errors that can occur when parsing breadboard layout or Eagle schematic
/// files.
#[derive(Debug, Error)]
pub enum BoardParseError {
    #[error(transparent)]
    XmlParseError(#[from] breadboard_xml::XmlParseError),
    #[error("Missing required element: {0}")]
    MissingElement(&'static str),
    #[error("Non-matching element. Expected: `{expected}`; Found: `{found}`")]
    NonMatchingElement { found: String, expected: String },
    #[error("Unexpected end of element `{element}`")]
    UnexpectedEndOfChildren { element: String },
    #[error("Expected end of element `{element}`. Found: `{found}`")]
    ExpectedEndOfChildren { element: String, found: String },
    #[error("Missing required attribute `{attribute}` on element `{element}`")]
    MissingAttribute { element: String, attribute: String },
    #[error("Unexpected attribute `{attribute}` on element `{element}`")]
    UnexpectedAttribute { element: String, attribute: String },
    #[error("Invalid number `{value}` in attribute `{attribute}`: {error}")]
    InvalidNumber {
        attribute: String,
        value: String,
        error: std::num::ParseFloatError,
    },
    #[error("Missing text content in element `{element}`")]
    MissingText { element: String },
}

/* File Helper Functions */

fn parse_file<T: FromXml>(input: &str) -> Result<T, BoardParseError> {
    let element = breadboard_xml::from_str(input)?;

    T::from_xml(Parser::new(element))
}

fn serialize_file<T: ToXml>(file: T) -> String {
    breadboard_xml::to_string(&file.to_xml())
}

/* Exposed APIs */

/// Parses a breadboard layout file from a string.
pub fn parse_board_file(input: &str) -> Result<BoardFile, BoardParseError> {
    parse_file(input)
}

/// Serializes a breadboard layout file to a string.
pub fn serialize_board_file(board: BoardFile) -> String {
    serialize_file(board)
}

/// Parses an Eagle schematic file from a string.
///
/// Import only: there is no serializer for this format. Use
/// [`eagle::import_schematic`] to turn the result into a [`BoardFile`].
pub fn parse_eagle_schematic_file(input: &str) -> Result<EagleSchematic, BoardParseError> {
    parse_file(input)
}
