use async_trait::async_trait;

use crate::core::errors::ApiError;

/// A remote language-model collaborator.
///
/// `generate` takes a system instruction and the user content and returns
/// answer text; which wire shape (chat vs. completion) the backing API
/// speaks is the implementation's business, callers never branch on it.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// return the provider name for logs (e.g. "openai")
    fn name(&self) -> &str;

    /// embed a single text into a vector
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ApiError>;

    /// generate an answer from a system instruction and user content
    async fn generate(&self, system: &str, user: &str) -> Result<String, ApiError>;
}
