use std::sync::Arc;
use std::time::Duration;

use crate::core::config::{AppSettings, CorpusSettings};
use crate::core::errors::ApiError;
use crate::corpus::{CorpusProvider, FileJsonSource, RemoteJsonSource, SnapshotSource};
use crate::llm::{LlmProvider, OpenAiCompatProvider};
use crate::qa::QueryPipeline;

/// Global application state shared across all routes.
pub struct AppState {
    pub settings: AppSettings,
    pub corpus: Arc<CorpusProvider>,
    pub pipeline: QueryPipeline,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Initializes the application state from `config.yml`.
    pub fn initialize() -> Result<Arc<Self>, ApiError> {
        let settings = AppSettings::load()?;
        Self::with_settings(settings)
    }

    pub fn with_settings(settings: AppSettings) -> Result<Arc<Self>, ApiError> {
        let source = build_snapshot_source(&settings.corpus)?;
        let corpus = Arc::new(CorpusProvider::new(source));
        let llm: Arc<dyn LlmProvider> = Arc::new(OpenAiCompatProvider::new(&settings.llm)?);

        let pipeline = QueryPipeline::new(
            llm,
            corpus.clone(),
            settings.retrieval.clone(),
            settings.answer.clone(),
        );

        Ok(Arc::new(AppState {
            settings,
            corpus,
            pipeline,
        }))
    }
}

fn build_snapshot_source(
    settings: &CorpusSettings,
) -> Result<Arc<dyn SnapshotSource>, ApiError> {
    if let Some(url) = &settings.snapshot_url {
        let source = RemoteJsonSource::new(
            url.clone(),
            Duration::from_secs(settings.fetch_timeout_secs),
        )?;
        return Ok(Arc::new(source));
    }

    if let Some(path) = &settings.snapshot_path {
        return Ok(Arc::new(FileJsonSource::new(path.clone())));
    }

    Err(ApiError::Internal(
        "no corpus source configured: set corpus.snapshot_url or corpus.snapshot_path"
            .to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_requires_a_corpus_source() {
        let settings = AppSettings::default();
        let err = AppState::with_settings(settings).unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[tokio::test]
    async fn state_builds_with_a_file_source() {
        let mut settings = AppSettings::default();
        settings.corpus.snapshot_path = Some(std::path::PathBuf::from("snapshot.json"));

        let state = AppState::with_settings(settings).unwrap();
        assert_eq!(state.settings.retrieval.top_k, 3);
    }
}
