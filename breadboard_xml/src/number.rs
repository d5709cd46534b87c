/// Formats a float for use as an XML attribute value.
///
/// Whole values keep a single fractional digit (`160` becomes `"160.0"`),
/// matching the representation the original editor wrote; everything else
/// uses the shortest representation that round-trips.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Parses a float attribute value.
pub fn parse_number(value: &str) -> Result<f64, std::num::ParseFloatError> {
    value.trim().parse()
}
