//! # Repository Traits
//!
//! Abstract repository interface for camera records.
//! Implementations can be swapped for different backends (JSON file, memory).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use speedcam_domain::CameraRecord;

/// Shared handle used by the API layer
pub type SharedCameraRepository = Arc<dyn CameraRepository>;

/// Repository for camera record operations
#[async_trait]
pub trait CameraRepository: Send + Sync {
    /// Get every record in storage order
    async fn list(&self) -> Result<Vec<CameraRecord>>;

    /// Validate and append a record, returning it as stored
    async fn create(&self, record: CameraRecord) -> Result<CameraRecord>;

    /// Overwrite the whole collection, returning the new record count
    async fn replace_all(&self, records: Vec<CameraRecord>) -> Result<usize>;

    /// Number of stored records
    async fn count(&self) -> Result<usize> {
        Ok(self.list().await?.len())
    }
}
