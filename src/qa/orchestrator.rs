use std::sync::Arc;

use uuid::Uuid;

use crate::core::config::{AnswerSettings, RetrievalSettings};
use crate::core::errors::ApiError;
use crate::corpus::CorpusProvider;
use crate::llm::LlmProvider;
use crate::rag::{assemble, rank};

/// Phases a request moves through, in order. A failure ends the request
/// in whatever phase produced it; the error kind identifies the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Received,
    Embedding,
    Retrieving,
    Assembling,
    Generating,
    Done,
}

impl Phase {
    fn as_str(self) -> &'static str {
        match self {
            Phase::Received => "received",
            Phase::Embedding => "embedding",
            Phase::Retrieving => "retrieving",
            Phase::Assembling => "assembling",
            Phase::Generating => "generating",
            Phase::Done => "done",
        }
    }
}

/// The outcome of a query: answer text plus whether it was grounded in
/// retrieved context or is the configured fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    pub grounded: bool,
}

pub struct QueryPipeline {
    llm: Arc<dyn LlmProvider>,
    corpus: Arc<CorpusProvider>,
    retrieval: RetrievalSettings,
    answer: AnswerSettings,
}

impl QueryPipeline {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        corpus: Arc<CorpusProvider>,
        retrieval: RetrievalSettings,
        answer: AnswerSettings,
    ) -> Self {
        Self {
            llm,
            corpus,
            retrieval,
            answer,
        }
    }

    /// Run one query through the pipeline.
    ///
    /// Each phase makes at most one call to one collaborator. When
    /// assembly finds no relevant context the configured fallback answer
    /// is returned without invoking generation.
    pub async fn answer(&self, query: &str) -> Result<Answer, ApiError> {
        let request_id = Uuid::new_v4();

        tracing::debug!(%request_id, phase = Phase::Received.as_str(), "query received");
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::InvalidRequest(
                "query must not be empty".to_string(),
            ));
        }

        tracing::debug!(%request_id, phase = Phase::Embedding.as_str(), provider = self.llm.name(), "embedding query");
        let query_embedding = self.llm.embed(query).await?;

        tracing::debug!(%request_id, phase = Phase::Retrieving.as_str(), "ranking corpus");
        let snapshot = self.corpus.snapshot().await?;
        let ranked = rank(&query_embedding, &snapshot, self.retrieval.top_k);

        tracing::debug!(%request_id, phase = Phase::Assembling.as_str(), candidates = ranked.len(), "assembling context");
        let Some(context) = assemble(&ranked, &snapshot, self.retrieval.max_context_chars)
        else {
            tracing::info!(%request_id, phase = Phase::Done.as_str(), "no relevant context, returning fallback answer");
            return Ok(Answer {
                text: self.answer.fallback.clone(),
                grounded: false,
            });
        };

        tracing::debug!(%request_id, phase = Phase::Generating.as_str(), provider = self.llm.name(), "generating answer");
        let system = format!("{}\n\n{}", self.answer.system_instruction, context);
        let text = self.llm.generate(&system, query).await?;

        tracing::debug!(%request_id, phase = Phase::Done.as_str(), "answer ready");
        Ok(Answer {
            text,
            grounded: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::corpus::{Document, SnapshotSource};

    struct MockLlm {
        embedding: Result<Vec<f32>, ()>,
        reply: String,
        embed_calls: AtomicUsize,
        generate_calls: AtomicUsize,
        last_system: Mutex<Option<String>>,
        last_user: Mutex<Option<String>>,
    }

    impl MockLlm {
        fn new(embedding: Result<Vec<f32>, ()>, reply: &str) -> Arc<Self> {
            Arc::new(Self {
                embedding,
                reply: reply.to_string(),
                embed_calls: AtomicUsize::new(0),
                generate_calls: AtomicUsize::new(0),
                last_system: Mutex::new(None),
                last_user: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlm {
        fn name(&self) -> &str {
            "mock"
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>, ApiError> {
            self.embed_calls.fetch_add(1, Ordering::SeqCst);
            self.embedding
                .clone()
                .map_err(|_| ApiError::EmbeddingUpstream("mock embed failure".to_string()))
        }

        async fn generate(&self, system: &str, user: &str) -> Result<String, ApiError> {
            self.generate_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_system.lock().unwrap() = Some(system.to_string());
            *self.last_user.lock().unwrap() = Some(user.to_string());
            Ok(self.reply.clone())
        }
    }

    struct StaticSource {
        documents: Vec<Document>,
    }

    #[async_trait]
    impl SnapshotSource for StaticSource {
        async fn fetch(&self) -> Result<Vec<Document>, ApiError> {
            Ok(self.documents.clone())
        }
    }

    async fn corpus_with(documents: Vec<Document>) -> Arc<CorpusProvider> {
        let provider = Arc::new(CorpusProvider::new(Arc::new(StaticSource { documents })));
        provider.refresh().await.unwrap();
        provider
    }

    fn pipeline(llm: Arc<MockLlm>, corpus: Arc<CorpusProvider>) -> QueryPipeline {
        QueryPipeline::new(
            llm,
            corpus,
            RetrievalSettings::default(),
            AnswerSettings {
                fallback: "I don't know.".to_string(),
                system_instruction: "Answer from the context.".to_string(),
            },
        )
    }

    fn paris_doc() -> Document {
        Document {
            id: "doc1".to_string(),
            text: "Paris is the capital of France".to_string(),
            embedding: vec![1.0, 0.0],
        }
    }

    #[tokio::test]
    async fn grounded_answer_invokes_generation_with_context() {
        let llm = MockLlm::new(Ok(vec![1.0, 0.0]), "Paris.");
        let corpus = corpus_with(vec![paris_doc()]).await;

        let answer = pipeline(llm.clone(), corpus)
            .answer("What is the capital of France?")
            .await
            .unwrap();

        assert_eq!(answer.text, "Paris.");
        assert!(answer.grounded);
        assert_eq!(llm.embed_calls.load(Ordering::SeqCst), 1);
        assert_eq!(llm.generate_calls.load(Ordering::SeqCst), 1);

        let system = llm.last_system.lock().unwrap().clone().unwrap();
        assert!(system.contains("Paris is the capital of France"));
        let user = llm.last_user.lock().unwrap().clone().unwrap();
        assert_eq!(user, "What is the capital of France?");
    }

    #[tokio::test]
    async fn empty_corpus_short_circuits_to_fallback() {
        let llm = MockLlm::new(Ok(vec![1.0, 0.0]), "unused");
        let corpus = corpus_with(vec![]).await;

        let answer = pipeline(llm.clone(), corpus)
            .answer("anything")
            .await
            .unwrap();

        assert_eq!(answer.text, "I don't know.");
        assert!(!answer.grounded);
        assert_eq!(llm.generate_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_query_fails_before_any_collaborator_call() {
        let llm = MockLlm::new(Ok(vec![1.0, 0.0]), "unused");
        let corpus = corpus_with(vec![paris_doc()]).await;

        let err = pipeline(llm.clone(), corpus).answer("   ").await.unwrap_err();

        assert!(matches!(err, ApiError::InvalidRequest(_)));
        assert_eq!(llm.embed_calls.load(Ordering::SeqCst), 0);
        assert_eq!(llm.generate_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn embedding_failure_ends_request_without_generation() {
        let llm = MockLlm::new(Err(()), "unused");
        let corpus = corpus_with(vec![paris_doc()]).await;

        let err = pipeline(llm.clone(), corpus)
            .answer("a question")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::EmbeddingUpstream(_)));
        assert_eq!(llm.generate_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_corpus_is_fatal_not_empty() {
        let llm = MockLlm::new(Ok(vec![1.0, 0.0]), "unused");
        let corpus = Arc::new(CorpusProvider::new(Arc::new(StaticSource {
            documents: vec![],
        })));

        let err = pipeline(llm.clone(), corpus)
            .answer("a question")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::CorpusUnavailable));
        assert_eq!(llm.generate_calls.load(Ordering::SeqCst), 0);
    }
}
