use crate::corpus::CorpusSnapshot;
use crate::rag::ranker::ScoredDocument;

const SEPARATOR: &str = "\n\n";

/// Join the ranked documents' texts into a single grounding context.
///
/// Ids are resolved through the snapshot; an id the snapshot no longer
/// knows is skipped and logged (the corpus may have been refreshed between
/// ranking and assembly). Texts are joined in rank order with one blank
/// line, and assembly stops before the first document that would push the
/// total past `max_chars`; a document is never split. Returns `None`
/// when nothing makes it in, so callers can short-circuit instead of
/// prompting against an empty context.
pub fn assemble(
    ranked: &[ScoredDocument],
    snapshot: &CorpusSnapshot,
    max_chars: usize,
) -> Option<String> {
    let mut context = String::new();

    for entry in ranked {
        let Some(doc) = snapshot.get(&entry.id) else {
            tracing::warn!(id = %entry.id, "ranked document missing from snapshot, skipping");
            continue;
        };

        let addition = if context.is_empty() {
            doc.text.len()
        } else {
            SEPARATOR.len() + doc.text.len()
        };
        if context.len() + addition > max_chars {
            break;
        }

        if !context.is_empty() {
            context.push_str(SEPARATOR);
        }
        context.push_str(&doc.text);
    }

    if context.is_empty() {
        None
    } else {
        Some(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Document;

    fn snapshot(docs: Vec<(&str, &str)>) -> CorpusSnapshot {
        CorpusSnapshot::from_documents(
            docs.into_iter()
                .map(|(id, text)| Document {
                    id: id.to_string(),
                    text: text.to_string(),
                    embedding: vec![1.0, 0.0],
                })
                .collect(),
        )
        .unwrap()
    }

    fn scored(ids: &[&str]) -> Vec<ScoredDocument> {
        ids.iter()
            .map(|id| ScoredDocument {
                id: id.to_string(),
                score: 1.0,
            })
            .collect()
    }

    #[test]
    fn joins_texts_in_rank_order_with_blank_lines() {
        let snapshot = snapshot(vec![("a", "First."), ("b", "Second.")]);

        let context = assemble(&scored(&["b", "a"]), &snapshot, 1000).unwrap();

        assert_eq!(context, "Second.\n\nFirst.");
    }

    #[test]
    fn empty_ranking_yields_sentinel() {
        let snapshot = snapshot(vec![("a", "First.")]);
        assert_eq!(assemble(&[], &snapshot, 1000), None);
    }

    #[test]
    fn unresolved_ids_are_skipped_not_fatal() {
        let snapshot = snapshot(vec![("a", "First.")]);

        let context = assemble(&scored(&["gone", "a"]), &snapshot, 1000).unwrap();

        assert_eq!(context, "First.");
    }

    #[test]
    fn all_ids_unresolved_yields_sentinel() {
        let snapshot = snapshot(vec![("a", "First.")]);
        assert_eq!(assemble(&scored(&["gone", "missing"]), &snapshot, 1000), None);
    }

    #[test]
    fn truncates_at_whole_document_boundary() {
        let snapshot = snapshot(vec![("a", "0123456789"), ("b", "0123456789")]);

        // Two documents plus separator need 22 chars; 20 only fits the first.
        let context = assemble(&scored(&["a", "b"]), &snapshot, 20).unwrap();

        assert_eq!(context, "0123456789");
    }

    #[test]
    fn first_document_too_large_yields_sentinel() {
        let snapshot = snapshot(vec![("a", "0123456789")]);
        assert_eq!(assemble(&scored(&["a"]), &snapshot, 5), None);
    }

    #[test]
    fn exact_fit_is_kept() {
        let snapshot = snapshot(vec![("a", "0123456789"), ("b", "0123456789")]);

        let context = assemble(&scored(&["a", "b"]), &snapshot, 22).unwrap();

        assert_eq!(context, "0123456789\n\n0123456789");
    }
}
