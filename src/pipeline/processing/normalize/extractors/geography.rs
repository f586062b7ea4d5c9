use once_cell::sync::Lazy;
use regex::Regex;

use crate::pipeline::processing::quality_gate::{ProblemCategory, ProblemCollector};

// One or more "(...)" groups at the end of the string
static TRAILING_QUALIFIERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)(?:\s*\([^()]*\))+\s*$").expect("static regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    pub latitude: String,
    pub longitude: String,
}

/// Split a "lat,lon" string. Anything other than two numeric components is
/// recorded as a problem and yields `None`.
pub fn parse_coordinates(
    raw: &str,
    record_id: &str,
    problems: &mut ProblemCollector,
) -> Option<Coordinates> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();

    match parts.as_slice() {
        [lat, lon] if is_decimal(lat) && is_decimal(lon) => Some(Coordinates {
            latitude: lat.to_string(),
            longitude: lon.to_string(),
        }),
        _ => {
            problems.record(ProblemCategory::MalformedCoordinates, raw, record_id);
            None
        }
    }
}

fn is_decimal(value: &str) -> bool {
    !value.is_empty() && value.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

/// Text before any trailing parenthesized qualifier:
/// "Kisumu (Nyanza) (Kenya)" -> "Kisumu".
pub fn strip_qualifier(value: &str) -> &str {
    match TRAILING_QUALIFIERS.captures(value) {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or("").trim(),
        None => value.trim(),
    }
}
