use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::errors::ApiError;

/// A single indexed document with its precomputed embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// Immutable point-in-time view of the corpus.
///
/// Every embedding in a snapshot shares one dimension; construction
/// rejects mixed dimensions so readers never have to re-validate.
#[derive(Debug, Default)]
pub struct CorpusSnapshot {
    documents: HashMap<String, Document>,
    dimension: usize,
}

impl CorpusSnapshot {
    pub fn from_documents(documents: Vec<Document>) -> Result<Self, ApiError> {
        let mut map = HashMap::with_capacity(documents.len());
        let mut dimension = None;

        for doc in documents {
            match dimension {
                None => dimension = Some(doc.embedding.len()),
                Some(dim) if dim != doc.embedding.len() => {
                    return Err(ApiError::CorpusIntegrity(format!(
                        "document '{}' has embedding dimension {}, expected {}",
                        doc.id,
                        doc.embedding.len(),
                        dim
                    )));
                }
                Some(_) => {}
            }

            let id = doc.id.clone();
            if map.insert(id.clone(), doc).is_some() {
                tracing::warn!(%id, "duplicate document id in snapshot, keeping the last record");
            }
        }

        Ok(Self {
            documents: map,
            dimension: dimension.unwrap_or(0),
        })
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}
