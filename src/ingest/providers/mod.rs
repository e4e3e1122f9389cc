// src/ingest/providers/mod.rs
pub mod google_news_rss;

use anyhow::Result;
use async_trait::async_trait;

use crate::ingest::types::{Candidate, CandidateSource};

/// Candidates supplied up front (push mode, tests).
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    name: String,
    candidates: Vec<Candidate>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, candidates: Vec<Candidate>) -> Self {
        Self {
            name: name.into(),
            candidates,
        }
    }
}

#[async_trait]
impl CandidateSource for StaticSource {
    async fn fetch_candidates(&self) -> Result<Vec<Candidate>> {
        Ok(self.candidates.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
