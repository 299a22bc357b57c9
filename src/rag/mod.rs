//! Retrieval over a corpus snapshot.
//!
//! This module provides:
//! - `rank`: scores every document against a query embedding and returns
//!   a deterministic top-k
//! - `assemble`: joins the ranked documents into one bounded grounding
//!   context string

mod context_builder;
mod ranker;

pub use context_builder::assemble;
pub use ranker::{rank, ScoredDocument};
