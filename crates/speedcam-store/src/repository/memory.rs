//! In-memory repository, used by tests and offline runs.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::traits::CameraRepository;
use crate::error::Result;
use speedcam_domain::CameraRecord;

/// Repository holding records in process memory
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    records: RwLock<Vec<CameraRecord>>,
}

impl InMemoryRepository {
    pub fn new(records: Vec<CameraRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl CameraRepository for InMemoryRepository {
    async fn list(&self) -> Result<Vec<CameraRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn create(&self, record: CameraRecord) -> Result<CameraRecord> {
        record.validate()?;
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn replace_all(&self, records: Vec<CameraRecord>) -> Result<usize> {
        let mut guard = self.records.write().await;
        *guard = records;
        Ok(guard.len())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(city: &str, limit: &str) -> CameraRecord {
        CameraRecord {
            city_name: city.to_string(),
            speed_limit: limit.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let repo = InMemoryRepository::default();
        repo.create(camera("臺中市", "60")).await.unwrap();
        repo.create(camera("臺南市", "50")).await.unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].city_name, "臺中市");
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_limit() {
        let repo = InMemoryRepository::default();
        let err = repo.create(camera("臺中市", "")).await.unwrap_err();
        assert!(err.to_string().contains("CityName, limit"));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_replace_all() {
        let repo = InMemoryRepository::new(vec![camera("A", "1")]);
        let n = repo
            .replace_all(vec![camera("B", "2"), camera("C", "3")])
            .await
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(repo.list().await.unwrap()[0].city_name, "B");
    }
}
