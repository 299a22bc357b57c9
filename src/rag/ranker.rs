use std::cmp::Ordering;

use crate::corpus::CorpusSnapshot;
use crate::vector_math::cosine_similarity;

/// A document id paired with its similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub id: String,
    pub score: f64,
}

/// Score every document in the snapshot against the query embedding and
/// return the `top_k` best matches.
///
/// Ordering is deterministic regardless of snapshot iteration order:
/// similarity descending, ties broken by ascending document id. An empty
/// corpus yields an empty result, not an error.
pub fn rank(
    query_embedding: &[f32],
    snapshot: &CorpusSnapshot,
    top_k: usize,
) -> Vec<ScoredDocument> {
    let mut scored: Vec<ScoredDocument> = snapshot
        .documents()
        .map(|doc| ScoredDocument {
            id: doc.id.clone(),
            score: cosine_similarity(query_embedding, &doc.embedding),
        })
        .collect();

    scored.sort_by(|left, right| {
        right
            .score
            .partial_cmp(&left.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| left.id.cmp(&right.id))
    });
    scored.truncate(top_k);
    scored
}
