//! Report generation for analytics data.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use speedcam_domain::CameraRecord;

use crate::engine::{AnalyticsEngine, Summary};
use crate::error::{AnalyticsError, Result};
use crate::queries::{CityCount, SpeedLimitFilter};

/// Everything the dashboard shows for one filter and search term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// RFC 3339 generation time
    pub generated_at: String,
    /// Speed-limit filter in effect
    pub filter: SpeedLimitFilter,
    /// Table search term
    pub search: String,
    /// Headline numbers
    pub summary: Summary,
    /// Selectable speed limits
    pub speed_limits: Vec<String>,
    /// Bar chart data
    pub city_counts: Vec<CityCount>,
    /// Pie chart data
    pub city_distribution: Vec<CityCount>,
    /// Table rows
    pub rows: Vec<CameraRecord>,
}

impl AnalyticsEngine<'_> {
    /// Generate the dashboard report.
    pub fn generate_report(&self, filter: &SpeedLimitFilter, search: &str) -> AnalyticsReport {
        tracing::debug!(?filter, search, "Generating analytics report");
        AnalyticsReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            filter: filter.clone(),
            search: search.to_string(),
            summary: self.summary(filter),
            speed_limits: self.speed_limits(),
            city_counts: self.city_counts(filter),
            city_distribution: self.city_distribution(filter),
            rows: self.table_rows(filter, search).into_iter().cloned().collect(),
        }
    }

    /// Generate report as JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Conversion`] if serialization fails.
    pub fn generate_report_json(&self, filter: &SpeedLimitFilter, search: &str) -> Result<String> {
        let report = self.generate_report(filter, search);
        serde_json::to_string_pretty(&report).map_err(|e| AnalyticsError::Conversion(e.to_string()))
    }

    /// Generate Markdown report.
    pub fn generate_report_markdown(&self, filter: &SpeedLimitFilter, search: &str) -> String {
        let report = self.generate_report(filter, search);

        let mut md = String::new();
        md.push_str("# Speed Camera Report\n\n");
        let _ = writeln!(md, "**Generated:** {}\n", report.generated_at);

        let filter_label = match &report.filter {
            SpeedLimitFilter::All => "All".to_string(),
            SpeedLimitFilter::Limit(limit) => format!("{limit} km/h"),
        };

        md.push_str("## Summary\n\n");
        md.push_str("| Metric | Value |\n");
        md.push_str("|--------|-------|\n");
        let _ = writeln!(md, "| Speed Limit | {filter_label} |");
        let _ = writeln!(md, "| Cameras | {} |", report.summary.total_count);
        let _ = writeln!(md, "| Cities | {} |", report.summary.city_count);
        let _ = writeln!(md, "| Without Coordinates | {} |", report.summary.unlocated_count);
        md.push('\n');

        if !report.city_counts.is_empty() {
            md.push_str("## Cameras by City\n\n");
            md.push_str("| City | Count |\n");
            md.push_str("|------|-------|\n");
            for c in &report.city_counts {
                let _ = writeln!(md, "| {} | {} |", c.city, c.count);
            }
            md.push('\n');
        }

        md
    }
}
