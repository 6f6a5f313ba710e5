//! # Speed Camera Analytics
//!
//! In-process aggregation over camera records for the dashboard.
//!
//! ## Features
//!
//! - Distinct speed limits
//! - Camera counts per city (bar chart)
//! - City distribution with an "other cities" bucket (pie chart)
//! - Filtered, searchable table rows
//! - JSON and Markdown reports

#![forbid(unsafe_code)]
#![warn(clippy::all, missing_docs)]

pub mod engine;
pub mod error;
pub mod queries;
pub mod reports;

pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use queries::{CityCount, SpeedLimitFilter};
pub use reports::AnalyticsReport;
