// src/record.rs
//! Canonical news record assembly: normalize → extract → score.

use serde::{Deserialize, Serialize};

use crate::extract::extract_with;
use crate::relevance::RelevanceEngine;

/// Maximum length (in characters) of a record's `summary`.
pub const SUMMARY_MAX_CHARS: usize = 700;

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    #[default]
    Feed,
    Web,
}

/// The unit persisted and exported by the rest of the system. `url` is the key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsRecord {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub published: String,
    pub source: String,
    pub content: String,
    pub relevance_score: i32,
    pub countries: Vec<String>,
    pub country: String,
    pub sectors: Vec<String>,
    pub sector: String,
    pub amount: String,
    pub company: String,
    pub origin: Origin,
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn clean_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max` characters (not bytes) of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Borrowed inputs for [`build`]; `origin` defaults to [`Origin::Feed`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordInput<'a> {
    pub title: &'a str,
    pub url: &'a str,
    pub summary: &'a str,
    pub published: &'a str,
    pub source: &'a str,
    pub text: &'a str,
    pub origin: Origin,
}

/// Build a record with the built-in vocabulary.
pub fn build(input: RecordInput<'_>) -> NewsRecord {
    build_with(RelevanceEngine::builtin(), input)
}

/// Build a record. Extraction runs on the normalized text (or the truncated summary
/// when the text is empty); scoring uses the raw summary and the full normalized text.
pub fn build_with(engine: &RelevanceEngine, input: RecordInput<'_>) -> NewsRecord {
    let summary = truncate_chars(&clean_text(input.summary), SUMMARY_MAX_CHARS);
    let content = clean_text(input.text);

    let source_for_extract = if content.is_empty() {
        &summary
    } else {
        &content
    };
    let attrs = extract_with(engine.vocabulary(), source_for_extract);
    let relevance_score = engine.score(input.title, input.summary, &content);

    NewsRecord {
        title: input.title.to_string(),
        url: input.url.to_string(),
        summary,
        published: input.published.to_string(),
        source: input.source.to_string(),
        content,
        relevance_score,
        country: attrs.country().to_string(),
        sector: attrs.sector().to_string(),
        countries: attrs.countries,
        sectors: attrs.sectors,
        amount: attrs.amount,
        company: attrs.company,
        origin: input.origin,
    }
}
