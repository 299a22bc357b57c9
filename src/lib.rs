//! Retrieval-grounded question answering backend.
//!
//! A query is embedded, matched against a corpus of precomputed document
//! embeddings by cosine similarity, and answered by a language model that
//! is constrained to the retrieved context.

pub mod core;
pub mod corpus;
pub mod llm;
pub mod qa;
pub mod rag;
pub mod server;
pub mod state;
pub mod vector_math;
