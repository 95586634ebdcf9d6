use serde::Deserialize;

use super::error::ParseError;
use crate::geo::Coordinates;

/// One ISS position report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IssFix {
    pub position: Coordinates,
    /// Unix epoch seconds as reported by the ISS API.
    pub timestamp: i64,
}

/// Degrees as they appear on the wire. open-notify sends decimal strings,
/// most geolocation services send JSON numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Degrees {
    Number(f64),
    Text(String),
}

impl Degrees {
    pub(crate) fn to_f64(&self, field: &'static str) -> Result<f64, ParseError> {
        let value = match self {
            Degrees::Number(n) => *n,
            Degrees::Text(s) => s.trim().parse().map_err(|_| ParseError::InvalidNumber {
                field,
                value: s.clone(),
            })?,
        };
        if !value.is_finite() {
            return Err(ParseError::NonFinite { field, value });
        }
        Ok(value)
    }
}
