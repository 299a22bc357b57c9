use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::snapshot::Document;
use crate::core::errors::ApiError;

/// Backing store for corpus snapshots.
///
/// A source performs one bulk read of `{id, text, embedding}` records.
/// Failures map to [`ApiError::CorpusIntegrity`]: the refresh is rejected
/// and the previous snapshot stays authoritative.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Document>, ApiError>;
}

/// Fetches the snapshot JSON from a remote URL (e.g. a raw GitHub file).
pub struct RemoteJsonSource {
    url: String,
    client: Client,
}

impl RemoteJsonSource {
    pub fn new(url: String, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::internal)?;
        Ok(Self { url, client })
    }
}

#[async_trait]
impl SnapshotSource for RemoteJsonSource {
    async fn fetch(&self) -> Result<Vec<Document>, ApiError> {
        let res = self.client.get(&self.url).send().await.map_err(|err| {
            ApiError::CorpusIntegrity(format!("snapshot fetch failed: {err}"))
        })?;

        if !res.status().is_success() {
            return Err(ApiError::CorpusIntegrity(format!(
                "snapshot fetch returned {}",
                res.status()
            )));
        }

        res.json::<Vec<Document>>().await.map_err(|err| {
            ApiError::CorpusIntegrity(format!("snapshot decode failed: {err}"))
        })
    }
}

/// Reads the snapshot JSON from local disk.
pub struct FileJsonSource {
    path: PathBuf,
}

impl FileJsonSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl SnapshotSource for FileJsonSource {
    async fn fetch(&self) -> Result<Vec<Document>, ApiError> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|err| {
            ApiError::CorpusIntegrity(format!(
                "snapshot read failed for {}: {err}",
                self.path.display()
            ))
        })?;

        serde_json::from_str::<Vec<Document>>(&contents).map_err(|err| {
            ApiError::CorpusIntegrity(format!("snapshot decode failed: {err}"))
        })
    }
}
