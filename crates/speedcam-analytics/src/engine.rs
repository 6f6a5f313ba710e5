//! Aggregation engine over a borrowed record slice.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use speedcam_domain::{CameraRecord, parse_leading_float};

use crate::queries::{
    BAR_CHART_CITIES, CityCount, DISTRIBUTION_SLICES, OTHER_CITIES, SpeedLimitFilter,
    UNKNOWN_CITY,
};

/// Headline numbers for a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Records passing the filter
    pub total_count: usize,
    /// Distinct cities among them
    pub city_count: usize,
    /// Records whose coordinates do not parse
    pub unlocated_count: usize,
}

/// Analytics over a fixed set of camera records.
pub struct AnalyticsEngine<'a> {
    records: &'a [CameraRecord],
}

impl<'a> AnalyticsEngine<'a> {
    /// Create an engine over `records`.
    pub const fn new(records: &'a [CameraRecord]) -> Self {
        Self { records }
    }

    fn filtered(&self, filter: &SpeedLimitFilter) -> impl Iterator<Item = &'a CameraRecord> {
        let records = self.records;
        records.iter().filter(move |r| filter.matches(r))
    }

    /// Distinct non-empty speed limits, numerically ascending.
    ///
    /// Limits that do not start with a number keep first-seen order after
    /// the numeric ones.
    pub fn speed_limits(&self) -> Vec<String> {
        let mut limits: Vec<&str> = Vec::new();
        for record in self.records {
            let limit = record.speed_limit.as_str();
            if !limit.is_empty() && !limits.contains(&limit) {
                limits.push(limit);
            }
        }

        let key = |s: &str| parse_leading_float(s).map(f64::trunc);
        limits.sort_by(|a, b| match (key(a), key(b)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        limits.into_iter().map(String::from).collect()
    }

    /// Every city with its count, descending; ties keep first-seen order.
    fn all_city_counts(&self, filter: &SpeedLimitFilter) -> Vec<CityCount> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<CityCount> = Vec::new();

        for record in self.filtered(filter) {
            let city = if record.city_name.is_empty() {
                UNKNOWN_CITY
            } else {
                record.city_name.as_str()
            };
            match index.get(city) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(city, counts.len());
                    counts.push(CityCount {
                        city: city.to_string(),
                        count: 1,
                    });
                }
            }
        }

        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts
    }

    /// Top cities by camera count for the bar chart.
    pub fn city_counts(&self, filter: &SpeedLimitFilter) -> Vec<CityCount> {
        let mut counts = self.all_city_counts(filter);
        counts.truncate(BAR_CHART_CITIES);
        counts
    }

    /// City distribution for the pie chart: the largest cities, then one
    /// slice summing the rest when there are too many to show.
    pub fn city_distribution(&self, filter: &SpeedLimitFilter) -> Vec<CityCount> {
        let mut counts = self.all_city_counts(filter);
        if counts.len() > DISTRIBUTION_SLICES {
            let others: usize = counts[DISTRIBUTION_SLICES..].iter().map(|c| c.count).sum();
            counts.truncate(DISTRIBUTION_SLICES);
            counts.push(CityCount {
                city: OTHER_CITIES.to_string(),
                count: others,
            });
        }
        counts
    }

    /// Table rows passing the filter whose city or address contains
    /// `search`, case-insensitively. An empty search matches everything.
    pub fn table_rows(&self, filter: &SpeedLimitFilter, search: &str) -> Vec<&'a CameraRecord> {
        let needle = search.to_lowercase();
        self.filtered(filter)
            .filter(|r| {
                needle.is_empty()
                    || r.city_name.to_lowercase().contains(&needle)
                    || r.address.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Number of records passing the filter.
    pub fn total_count(&self, filter: &SpeedLimitFilter) -> usize {
        self.filtered(filter).count()
    }

    /// Headline numbers for the filter.
    pub fn summary(&self, filter: &SpeedLimitFilter) -> Summary {
        Summary {
            total_count: self.total_count(filter),
            city_count: self.all_city_counts(filter).len(),
            unlocated_count: self.filtered(filter).filter(|r| r.position().is_none()).count(),
        }
    }
}
