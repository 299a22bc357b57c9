//! Query orchestration.
//!
//! Drives a request through embed → retrieve → assemble → generate, with
//! the no-context short-circuit and the typed failure taxonomy.

mod orchestrator;

pub use orchestrator::{Answer, Phase, QueryPipeline};
