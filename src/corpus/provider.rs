use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use super::snapshot::CorpusSnapshot;
use super::source::SnapshotSource;
use crate::core::errors::ApiError;

/// Holds the current corpus snapshot and refreshes it from a source.
///
/// Readers take an `Arc` to the current snapshot and keep using it for the
/// rest of their request; a refresh in flight never blocks them and a
/// failed refresh leaves the previous snapshot in place. Refreshes are
/// serialized so at most one fetch runs at a time.
pub struct CorpusProvider {
    source: Arc<dyn SnapshotSource>,
    current: RwLock<Option<Arc<CorpusSnapshot>>>,
    refresh_gate: Mutex<()>,
}

impl CorpusProvider {
    pub fn new(source: Arc<dyn SnapshotSource>) -> Self {
        Self {
            source,
            current: RwLock::new(None),
            refresh_gate: Mutex::new(()),
        }
    }

    /// The current snapshot; [`ApiError::CorpusUnavailable`] until a load
    /// has succeeded.
    pub async fn snapshot(&self) -> Result<Arc<CorpusSnapshot>, ApiError> {
        self.current
            .read()
            .await
            .clone()
            .ok_or(ApiError::CorpusUnavailable)
    }

    pub async fn is_loaded(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Fetch, validate, and atomically swap in a new snapshot.
    pub async fn refresh(&self) -> Result<Arc<CorpusSnapshot>, ApiError> {
        let _gate = self.refresh_gate.lock().await;

        let documents = self.source.fetch().await?;
        let snapshot = Arc::new(CorpusSnapshot::from_documents(documents)?);

        *self.current.write().await = Some(snapshot.clone());
        tracing::info!(
            documents = snapshot.len(),
            dimension = snapshot.dimension(),
            "corpus snapshot refreshed"
        );
        Ok(snapshot)
    }
}
