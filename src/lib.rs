// src/lib.rs
// Public library surface for the binary and integration tests.

// Relevance scoring and extraction core
pub mod extract;
pub mod record;
pub mod relevance;
pub mod vocab;

// Collection, storage and delivery around the core
pub mod api;
pub mod config;
pub mod export;
pub mod ingest;
pub mod metrics;
pub mod store;
pub mod summarize;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::extract::{extract, Attributes};
pub use crate::record::{build, clean_text, NewsRecord, Origin, RecordInput};
pub use crate::relevance::{is_admissible, score, Relevance, RelevanceEngine};
pub use crate::vocab::{Vocabulary, MIN_RELEVANCE_SCORE};
