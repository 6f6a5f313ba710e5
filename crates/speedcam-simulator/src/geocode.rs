//! Reverse geocoding of the vehicle position to a road name.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use speedcam_domain::GeoPoint;
use tracing::{debug, warn};

use crate::error::Result;

/// Address shown before the first lookup completes.
pub const LOCATING: &str = "Locating...";
/// Lookup succeeded but named nothing.
pub const UNKNOWN_SEGMENT: &str = "Unknown road segment";
/// Lookup failed.
pub const ADDRESS_UNAVAILABLE: &str = "Road name unavailable";
/// No geocoder configured.
pub const GEOCODING_DISABLED: &str = "Geocoding disabled";

pub type SharedGeocoder = Arc<dyn ReverseGeocoder>;

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Road or area name at `point`, `None` when the service has none.
    async fn lookup(&self, point: GeoPoint) -> Result<Option<String>>;
}

/// Display text for a position. Never fails: errors become a placeholder.
pub async fn describe(geocoder: &dyn ReverseGeocoder, point: GeoPoint) -> String {
    match geocoder.lookup(point).await {
        Ok(Some(name)) => name,
        Ok(None) => UNKNOWN_SEGMENT.to_string(),
        Err(err) => {
            warn!(%point, error = %err, "Reverse geocode failed");
            ADDRESS_UNAVAILABLE.to_string()
        }
    }
}

/// Most specific name in a Nominatim `reverse` response.
///
/// Prefers `address.road`, then `address.pedestrian`, then
/// `address.suburb`, then the first comma-separated part of `display_name`.
#[must_use]
pub fn road_name(body: &Value) -> Option<String> {
    let from_address = ["road", "pedestrian", "suburb"]
        .iter()
        .find_map(|key| {
            body.pointer(&format!("/address/{key}"))?
                .as_str()
                .filter(|s| !s.is_empty())
        });

    let name = from_address.or_else(|| {
        body.get("display_name")?
            .as_str()?
            .split(',')
            .next()
            .map(str::trim)
    })?;

    (!name.is_empty()).then(|| name.to_string())
}

/// OpenStreetMap Nominatim client.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
}

impl NominatimGeocoder {
    pub const DEFAULT_ENDPOINT: &'static str = "https://nominatim.openstreetmap.org/reverse";

    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        // Nominatim rejects requests without an identifying agent
        let client = Client::builder()
            .user_agent(concat!("speedcam-simulator/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn lookup(&self, point: GeoPoint) -> Result<Option<String>> {
        let body: Value = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("format", "json".to_string()),
                ("lat", point.latitude.to_string()),
                ("lon", point.longitude.to_string()),
                ("zoom", "18".to_string()),
                ("addressdetails", "1".to_string()),
                ("accept-language", "zh-TW".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let name = road_name(&body);
        debug!(%point, name = ?name, "Reverse geocode");
        Ok(name)
    }
}

/// Geocoder with a canned answer, for offline runs and tests.
#[derive(Debug, Clone, Default)]
pub struct FixedGeocoder {
    answer: Option<String>,
}

impl FixedGeocoder {
    #[must_use]
    pub fn new(answer: Option<String>) -> Self {
        Self { answer }
    }
}

#[async_trait]
impl ReverseGeocoder for FixedGeocoder {
    async fn lookup(&self, _point: GeoPoint) -> Result<Option<String>> {
        Ok(self.answer.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimulatorError;
    use serde_json::json;

    struct Failing;

    #[async_trait]
    impl ReverseGeocoder for Failing {
        async fn lookup(&self, _point: GeoPoint) -> Result<Option<String>> {
            Err(SimulatorError::Geocode("service down".to_string()))
        }
    }

    #[test]
    fn test_road_preferred() {
        let body = json!({
            "display_name": "中山路, 花蓮市, 花蓮縣",
            "address": {"road": "台9線", "suburb": "新城鄉"}
        });
        assert_eq!(road_name(&body).as_deref(), Some("台9線"));
    }

    #[test]
    fn test_fallback_chain() {
        let body = json!({"address": {"pedestrian": "步道"}, "display_name": "x"});
        assert_eq!(road_name(&body).as_deref(), Some("步道"));

        let body = json!({"address": {"road": "", "suburb": "秀林鄉"}});
        assert_eq!(road_name(&body).as_deref(), Some("秀林鄉"));

        let body = json!({"address": {}, "display_name": "太魯閣, 秀林鄉"});
        assert_eq!(road_name(&body).as_deref(), Some("太魯閣"));

        let body = json!({"display_name": "只有名稱"});
        assert_eq!(road_name(&body).as_deref(), Some("只有名稱"));
    }

    #[test]
    fn test_empty_answer() {
        assert_eq!(road_name(&json!({"error": "Unable to geocode"})), None);
        assert_eq!(road_name(&json!({"address": {"road": ""}, "display_name": ""})), None);
    }

    #[tokio::test]
    async fn test_describe_placeholders() {
        let p = GeoPoint::new(24.0, 121.6);
        assert_eq!(describe(&FixedGeocoder::new(None), p).await, UNKNOWN_SEGMENT);
        assert_eq!(
            describe(&FixedGeocoder::new(Some("台9線".to_string())), p).await,
            "台9線"
        );
        assert_eq!(describe(&Failing, p).await, ADDRESS_UNAVAILABLE);
    }
}
