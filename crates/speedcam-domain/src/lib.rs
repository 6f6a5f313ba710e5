//! # Speed Camera Alert System - Domain Model
//!
//! Value objects, records and enums shared by the store, the REST API, the
//! analytics engine and the driving simulator. Camera records keep the field
//! names of the national police CSV export so documents round-trip unchanged
//! through the JSON store.

use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// VALUE OBJECTS
// =============================================================================

/// Geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both components are finite numbers.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Axis-aligned window check in degrees, used for marker culling.
    #[must_use]
    pub fn within_window(&self, center: &Self, half_deg: f64) -> bool {
        (self.latitude - center.latitude).abs() <= half_deg
            && (self.longitude - center.longitude).abs() <= half_deg
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

// =============================================================================
// ENUMS
// =============================================================================

/// Coarse compass direction derived from a continuous heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Cardinal {
    North,
    East,
    South,
    West,
}

impl Cardinal {
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Quadrant of a heading in degrees. North owns `[315, 45)`, East
    /// `[45, 135)`, South `[135, 225)`, West everything else.
    #[must_use]
    pub fn from_heading(heading_deg: f64) -> Self {
        if heading_deg >= 315.0 || heading_deg < 45.0 {
            Self::North
        } else if heading_deg < 135.0 {
            Self::East
        } else if heading_deg < 225.0 {
            Self::South
        } else {
            Self::West
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::North => "NORTH",
            Self::East => "EAST",
            Self::South => "SOUTH",
            Self::West => "WEST",
        }
    }

    /// Character used for this direction in camera direction labels.
    pub fn glyph(&self) -> char {
        match self {
            Self::North => '北',
            Self::East => '東',
            Self::South => '南',
            Self::West => '西',
        }
    }

    /// English word accepted in direction labels.
    pub fn word(&self) -> &'static str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        }
    }
}

/// Alert raised for the current pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertState {
    /// No camera ahead within alert range
    #[default]
    None,
    /// Camera ahead enforces the direction the vehicle travels ("RED")
    DirectionMatch,
    /// Camera ahead faces the other way ("GREEN")
    DirectionMismatch,
}

impl AlertState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::DirectionMatch => "RED",
            Self::DirectionMismatch => "GREEN",
        }
    }

    #[must_use]
    pub fn is_alert(&self) -> bool {
        !matches!(self, Self::None)
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// Speed camera as exported by the police open-data feed.
///
/// Every field is text; coordinates are parsed on demand so a malformed
/// record can still be stored, listed and counted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CameraRecord {
    /// Document id assigned by a remote document store, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "CityName", default, deserialize_with = "lenient_string")]
    pub city_name: String,

    #[serde(rename = "RegionName", default, deserialize_with = "lenient_string")]
    pub region_name: String,

    #[serde(rename = "Address", default, deserialize_with = "lenient_string")]
    pub address: String,

    #[serde(rename = "DeptNm", default, deserialize_with = "lenient_string")]
    pub dept_name: String,

    #[serde(rename = "BranchNm", default, deserialize_with = "lenient_string")]
    pub branch_name: String,

    #[serde(rename = "Longitude", default, deserialize_with = "lenient_string")]
    pub longitude: String,

    #[serde(rename = "Latitude", default, deserialize_with = "lenient_string")]
    pub latitude: String,

    /// Free-text direction label, e.g. "南向北" or "雙向"
    #[serde(rename = "direct", default, deserialize_with = "lenient_string")]
    pub direction: String,

    /// Speed limit in km/h
    #[serde(rename = "limit", default, deserialize_with = "lenient_string")]
    pub speed_limit: String,
}

impl CameraRecord {
    /// Column names in export order.
    pub const COLUMNS: [&'static str; 9] = [
        "CityName",
        "RegionName",
        "Address",
        "DeptNm",
        "BranchNm",
        "Longitude",
        "Latitude",
        "direct",
        "limit",
    ];

    /// Build a record from a column lookup. Unknown columns read as empty.
    pub fn from_columns<'a>(mut column: impl FnMut(&str) -> Option<&'a str>) -> Self {
        let mut take = |name: &str| column(name).unwrap_or_default().to_string();
        Self {
            id: None,
            city_name: take("CityName"),
            region_name: take("RegionName"),
            address: take("Address"),
            dept_name: take("DeptNm"),
            branch_name: take("BranchNm"),
            longitude: take("Longitude"),
            latitude: take("Latitude"),
            direction: take("direct"),
            speed_limit: take("limit"),
        }
    }

    /// Parsed position, or `None` when either coordinate is not numeric.
    #[must_use]
    pub fn position(&self) -> Option<GeoPoint> {
        let latitude = parse_leading_float(&self.latitude)?;
        let longitude = parse_leading_float(&self.longitude)?;
        Some(GeoPoint::new(latitude, longitude))
    }

    /// City and speed limit are mandatory for new records.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingFields`] naming both required fields.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.city_name.is_empty() || self.speed_limit.is_empty() {
            return Err(DomainError::MissingFields("CityName, limit".to_string()));
        }
        Ok(())
    }
}

/// Parse the longest numeric prefix of `raw`, ignoring leading whitespace.
///
/// `"121.5"`, `" 22.6 "` and `"22.6N"` all parse; `""`, `"abc"` and `"."`
/// do not.
#[must_use]
pub fn parse_leading_float(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |mut at: usize| {
        while at < bytes.len() && bytes[at].is_ascii_digit() {
            at += 1;
        }
        at
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    text[..end].parse().ok()
}

/// Accept strings, numbers, booleans and null for text fields.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_json::Value;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(other) => Err(D::Error::custom(format!(
            "expected text or number, found {other}"
        ))),
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Domain-level errors
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Missing required fields ({0})")]
    MissingFields(String),
}
