//! Manual relocation of the vehicle.

use speedcam_domain::{GeoPoint, parse_leading_float};
use thiserror::Error;

use crate::config::EngineConfig;

/// Teleport request that could not be read as coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TeleportError {
    #[error("format error: latitude and longitude must be numbers (got {lat:?}, {lon:?})")]
    Format { lat: String, lon: String },
}

/// Where a valid teleport request ends up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TeleportOutcome {
    /// Requested point accepted
    Moved(GeoPoint),
    /// Requested point outside the allowed area; sent to the fallback instead
    Fallback { requested: GeoPoint, fallback: GeoPoint },
}

impl TeleportOutcome {
    #[must_use]
    pub fn destination(&self) -> GeoPoint {
        match self {
            Self::Moved(p) => *p,
            Self::Fallback { fallback, .. } => *fallback,
        }
    }

    /// Informational text for the operator, if any.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Moved(_) => None,
            Self::Fallback { requested, fallback } => Some(format!(
                "{requested} is outside the service area; moved to {fallback}"
            )),
        }
    }
}

/// Validate raw teleport input against the configured bounds.
///
/// # Errors
///
/// Returns [`TeleportError::Format`] when either value has no numeric
/// prefix.
pub fn resolve_teleport(
    lat: &str,
    lon: &str,
    config: &EngineConfig,
) -> Result<TeleportOutcome, TeleportError> {
    let (Some(latitude), Some(longitude)) = (parse_leading_float(lat), parse_leading_float(lon))
    else {
        return Err(TeleportError::Format {
            lat: lat.to_string(),
            lon: lon.to_string(),
        });
    };

    let requested = GeoPoint::new(latitude, longitude);
    if config.teleport_bounds.contains(requested) {
        Ok(TeleportOutcome::Moved(requested))
    } else {
        Ok(TeleportOutcome::Fallback {
            requested,
            fallback: config.fallback,
        })
    }
}
