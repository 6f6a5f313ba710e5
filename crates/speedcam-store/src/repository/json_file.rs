//! JSON document repository.
//!
//! The whole collection lives in one file shaped `{"points": [...]}`. Reads
//! go to disk every time so edits made by other tools are picked up; writes
//! rewrite the document through a sibling temp file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use super::traits::CameraRepository;
use crate::error::Result;
use speedcam_domain::CameraRecord;

/// On-disk document layout
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub points: Vec<CameraRecord>,
}

/// Repository persisting records to a single JSON file
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    /// Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl JsonFileRepository {
    /// Open the document at `path`, creating an empty one if it is missing.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be created or holds invalid JSON.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let repo = Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        };

        if tokio::fs::try_exists(&repo.path).await? {
            let doc = repo.read_document().await?;
            info!(path = %repo.path.display(), points = doc.points.len(), "Opened camera store");
        } else {
            repo.write_document(&Document::default()).await?;
            info!(path = %repo.path.display(), "Created empty camera store");
        }

        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Document> {
        let raw = tokio::fs::read(&self.path).await?;
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Document::default());
        }
        Ok(serde_json::from_slice(&raw)?)
    }

    async fn write_document(&self, doc: &Document) -> Result<()> {
        let body = serde_json::to_vec_pretty(doc)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), points = doc.points.len(), "Wrote camera store");
        Ok(())
    }
}

#[async_trait]
impl CameraRepository for JsonFileRepository {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn list(&self) -> Result<Vec<CameraRecord>> {
        Ok(self.read_document().await?.points)
    }

    #[instrument(skip_all, fields(city = %record.city_name))]
    async fn create(&self, record: CameraRecord) -> Result<CameraRecord> {
        record.validate()?;

        let _guard = self.write_lock.lock().await;
        let mut doc = self.read_document().await?;
        doc.points.push(record.clone());
        self.write_document(&doc).await?;

        info!(total = doc.points.len(), "Camera record added");
        Ok(record)
    }

    #[instrument(skip_all, fields(count = records.len()))]
    async fn replace_all(&self, records: Vec<CameraRecord>) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let doc = Document { points: records };
        self.write_document(&doc).await?;
        Ok(doc.points.len())
    }
}
