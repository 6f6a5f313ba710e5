//! Where the simulator gets its cameras from.

use std::path::PathBuf;

use reqwest::Client;
use speedcam_domain::CameraRecord;
use speedcam_store::repository::json_file::Document;
use tracing::info;

use crate::error::{Result, SimulatorError};

/// One-shot camera source, read at session start.
#[derive(Debug, Clone)]
pub enum CameraFeed {
    /// `GET` returning a JSON array of records (the REST API's `/points`)
    Http { url: String },
    /// JSON store document `{"points": [...]}`; must already exist
    File { path: PathBuf },
    Inline(Vec<CameraRecord>),
}

impl CameraFeed {
    /// Fetch the full record list.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-success HTTP status, a missing file or
    /// malformed JSON.
    pub async fn load(&self) -> Result<Vec<CameraRecord>> {
        let records = match self {
            Self::Http { url } => {
                Client::new()
                    .get(url)
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<Vec<CameraRecord>>()
                    .await?
            }
            Self::File { path } => {
                let raw = tokio::fs::read(path)
                    .await
                    .map_err(speedcam_store::StoreError::from)?;
                serde_json::from_slice::<Document>(&raw)
                    .map_err(|e| SimulatorError::Source(format!("{}: {e}", path.display())))?
                    .points
            }
            Self::Inline(records) => records.clone(),
        };

        info!(source = %self, count = records.len(), "Cameras loaded");
        Ok(records)
    }
}

impl std::fmt::Display for CameraFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http { url } => write!(f, "{url}"),
            Self::File { path } => write!(f, "{}", path.display()),
            Self::Inline(records) => write!(f, "inline({})", records.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_feed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(
            &path,
            r#"{"points":[{"CityName":"花蓮縣","Latitude":"24.0","Longitude":"121.6","limit":"50"}]}"#,
        )
        .unwrap();

        let records = CameraFeed::File { path }.load().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].speed_limit, "50");
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let feed = CameraFeed::File {
            path: dir.path().join("absent.json"),
        };
        assert!(matches!(feed.load().await, Err(SimulatorError::Store(_))));
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            CameraFeed::File { path }.load().await,
            Err(SimulatorError::Source(_))
        ));
    }

    #[tokio::test]
    async fn test_inline() {
        let feed = CameraFeed::Inline(vec![CameraRecord::default(); 3]);
        assert_eq!(feed.load().await.unwrap().len(), 3);
        assert_eq!(feed.to_string(), "inline(3)");
    }
}
