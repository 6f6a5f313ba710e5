//! Simulator error types

use thiserror::Error;

/// Errors raised outside the tick loop (camera loading, geocoding).
#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Store(#[from] speedcam_store::StoreError),

    #[error("Camera source error: {0}")]
    Source(String),

    #[error("Geocode error: {0}")]
    Geocode(String),
}

pub type Result<T> = std::result::Result<T, SimulatorError>;
