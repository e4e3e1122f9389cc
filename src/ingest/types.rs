// src/ingest/types.rs
use anyhow::Result;

use crate::record::{Origin, RecordInput};

/// A raw article produced by retrieval; discarded once converted to a record.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Candidate {
    pub title: String,
    pub summary_snippet: String,
    /// Full article text; empty when the page could not be fetched.
    pub raw_text: String,
    pub url: String,
    /// Free-form date text as published by the source.
    pub published: String,
    pub source_name: String,
    pub origin: Origin,
}

impl Candidate {
    /// Record-builder inputs for this candidate, using `snippet` as the summary.
    pub fn record_input<'a>(&'a self, snippet: &'a str) -> RecordInput<'a> {
        RecordInput {
            title: &self.title,
            url: &self.url,
            summary: snippet,
            published: &self.published,
            source: &self.source_name,
            text: &self.raw_text,
            origin: self.origin,
        }
    }
}

#[async_trait::async_trait]
pub trait CandidateSource: Send + Sync {
    async fn fetch_candidates(&self) -> Result<Vec<Candidate>>;
    fn name(&self) -> &str;
}
