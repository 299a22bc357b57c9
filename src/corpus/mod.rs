//! Corpus loading and caching.
//!
//! The corpus is a set of documents with precomputed embeddings, exposed
//! to the rest of the service as an immutable [`CorpusSnapshot`] behind a
//! [`CorpusProvider`] that supports atomic refresh.

mod provider;
mod snapshot;
mod source;

pub use provider::CorpusProvider;
pub use snapshot::{CorpusSnapshot, Document};
pub use source::{FileJsonSource, RemoteJsonSource, SnapshotSource};
