use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::provider::LlmProvider;
use crate::core::config::LlmSettings;
use crate::core::errors::ApiError;

/// Provider for any OpenAI-compatible API (`/v1/embeddings`,
/// `/v1/chat/completions`), including local servers speaking the same
/// protocol. The client timeout applies per request; a timeout surfaces
/// as the same upstream failure as any other transport error.
#[derive(Clone)]
pub struct OpenAiCompatProvider {
    base_url: String,
    api_key: Option<String>,
    embed_model: String,
    chat_model: String,
    temperature: f64,
    max_tokens: u32,
    client: Client,
}

impl OpenAiCompatProvider {
    pub fn new(settings: &LlmSettings) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(ApiError::internal)?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            embed_model: settings.embed_model.clone(),
            chat_model: settings.chat_model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            client,
        })
    }

    fn post(&self, url: &str, body: &Value) -> reqwest::RequestBuilder {
        let mut req = self.client.post(url).json(body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        req
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ApiError> {
        let url = format!("{}/v1/embeddings", self.base_url);
        let body = json!({
            "model": self.embed_model,
            "input": text,
        });

        let res = self
            .post(&url, &body)
            .send()
            .await
            .map_err(|err| ApiError::EmbeddingUpstream(err.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::EmbeddingUpstream(format!("{status}: {text}")));
        }

        let payload: Value = res
            .json()
            .await
            .map_err(|err| ApiError::EmbeddingUpstream(err.to_string()))?;

        let embedding: Vec<f32> = payload["data"][0]["embedding"]
            .as_array()
            .map(|vals| {
                vals.iter()
                    .filter_map(|v| v.as_f64().map(|f| f as f32))
                    .collect()
            })
            .unwrap_or_default();

        if embedding.is_empty() {
            return Err(ApiError::EmbeddingUpstream(
                "embedding response had no vector".to_string(),
            ));
        }

        Ok(embedding)
    }

    async fn generate(&self, system: &str, user: &str) -> Result<String, ApiError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = json!({
            "model": self.chat_model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user }
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "stream": false,
        });

        let res = self
            .post(&url, &body)
            .send()
            .await
            .map_err(|err| ApiError::GenerationUpstream(err.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::GenerationUpstream(format!("{status}: {text}")));
        }

        let payload: Value = res
            .json()
            .await
            .map_err(|err| ApiError::GenerationUpstream(err.to_string()))?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        if content.is_empty() {
            return Err(ApiError::GenerationUpstream(
                "generation response had no content".to_string(),
            ));
        }

        Ok(content)
    }
}
