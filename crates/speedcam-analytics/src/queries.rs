//! Query parameters and result rows.

use serde::{Deserialize, Serialize};
use speedcam_domain::CameraRecord;

/// Number of cities shown on the per-city bar chart.
pub const BAR_CHART_CITIES: usize = 20;

/// Number of named slices on the distribution chart before grouping.
pub const DISTRIBUTION_SLICES: usize = 8;

/// Label of the grouped slice.
pub const OTHER_CITIES: &str = "其他縣市";

/// Label for records without a city.
pub const UNKNOWN_CITY: &str = "Unknown";

/// Speed-limit selector applied before every aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedLimitFilter {
    /// Every record
    #[default]
    All,
    /// Records whose limit text equals the value
    Limit(String),
}

impl SpeedLimitFilter {
    /// Build from a query parameter; absent, empty or `All` select everything.
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            None | Some("" | "All") => Self::All,
            Some(limit) => Self::Limit(limit.to_string()),
        }
    }

    /// Whether the record passes the filter.
    pub fn matches(&self, record: &CameraRecord) -> bool {
        match self {
            Self::All => true,
            Self::Limit(limit) => record.speed_limit == *limit,
        }
    }
}

/// Camera count for one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityCount {
    /// City name, or [`UNKNOWN_CITY`]
    pub city: String,
    /// Number of cameras
    pub count: usize,
}
