//! Application settings.
//!
//! Loaded from `config.yml` (path overridable via `ANKORA_CONFIG_PATH`),
//! with every section falling back to usable defaults. The LLM API key may
//! also come from the `OPENAI_API_KEY` environment variable.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::ApiError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub server: ServerSettings,
    pub corpus: CorpusSettings,
    pub retrieval: RetrievalSettings,
    pub answer: AnswerSettings,
    pub llm: LlmSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub port: u16,
    /// Exact origins allowed by CORS; empty means any origin.
    pub cors_allowed_origins: Vec<String>,
    pub log_dir: PathBuf,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 10000,
            cors_allowed_origins: Vec::new(),
            log_dir: PathBuf::from("logs"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusSettings {
    /// HTTP(S) URL of the JSON snapshot. Takes precedence over `snapshot_path`.
    pub snapshot_url: Option<String>,
    /// Local path of the JSON snapshot.
    pub snapshot_path: Option<PathBuf>,
    pub fetch_timeout_secs: u64,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            snapshot_url: None,
            snapshot_path: None,
            fetch_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub top_k: usize,
    pub max_context_chars: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 3,
            max_context_chars: 4000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerSettings {
    /// Returned verbatim when retrieval finds no relevant context.
    pub fallback: String,
    /// System instruction placed before the assembled context.
    pub system_instruction: String,
}

impl Default for AnswerSettings {
    fn default() -> Self {
        Self {
            fallback: "I don't have that information in my documents.".to_string(),
            system_instruction: "You are an assistant that answers questions using only the \
                                 documents below. If the documents do not contain the answer, \
                                 say you do not know."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    /// Bearer key; falls back to `OPENAI_API_KEY` when unset.
    pub api_key: Option<String>,
    pub embed_model: String,
    pub chat_model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: None,
            embed_model: "text-embedding-3-small".to_string(),
            chat_model: "gpt-4-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 500,
            timeout_secs: 30,
        }
    }
}

impl AppSettings {
    pub fn load() -> Result<Self, ApiError> {
        Self::from_path(&config_path())
    }

    pub fn from_path(path: &Path) -> Result<Self, ApiError> {
        let mut settings = if path.exists() {
            let contents = fs::read_to_string(path).map_err(ApiError::internal)?;
            serde_yaml::from_str::<AppSettings>(&contents).map_err(|err| {
                ApiError::Internal(format!("invalid config {}: {}", path.display(), err))
            })?
        } else {
            AppSettings::default()
        };

        if settings.llm.api_key.is_none() {
            settings.llm.api_key = env::var("OPENAI_API_KEY").ok();
        }

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApiError> {
        if self.retrieval.top_k == 0 {
            return Err(ApiError::Internal(
                "retrieval.top_k must be at least 1".to_string(),
            ));
        }
        if self.retrieval.max_context_chars == 0 {
            return Err(ApiError::Internal(
                "retrieval.max_context_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn config_path() -> PathBuf {
    if let Ok(path) = env::var("ANKORA_CONFIG_PATH") {
        return PathBuf::from(path);
    }
    PathBuf::from("config.yml")
}
