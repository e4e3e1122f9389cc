// src/relevance.rs
//! Relevance gate: additive keyword scoring over the combined title/summary/text.
//!
//! Every check is plain substring containment on the lower-cased text (no word
//! boundaries), which the admission threshold was tuned against.

use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::info;

use crate::vocab::Vocabulary;

/// Short stable id for a text so logs never carry article content.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    Sha256::digest(text.as_bytes())[..6]
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn dev_log_relevance(event: &str, text: &str, rel: &Relevance, threshold: i32) {
    if !crate::config::dev_logging_enabled() {
        return;
    }
    let id = anon_hash(text);
    let matched_short = truncate_vec(&rel.matched, 5);
    let reasons_short = truncate_vec(&rel.reasons, 5);
    info!(
        target: "relevance",
        %id, score = rel.score, %threshold, event,
        matched = ?matched_short,
        reasons = ?reasons_short
    );
}

pub(crate) fn truncate_vec<T: ToString>(v: &[T], max: usize) -> Vec<String> {
    v.iter().take(max).map(|x| x.to_string()).collect()
}

/// Result of relevance evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Relevance {
    pub score: i32,
    /// `fdi:<kw>`, `deal:<kw>`, `country:<name>` in vocabulary order.
    pub matched: Vec<String>,
    /// `exclude:<kw>` hits, then `threshold_ok:<n>` / `threshold_fail:<n>`.
    pub reasons: Vec<String>,
}

impl Relevance {
    pub fn admissible(&self, threshold: i32) -> bool {
        self.score >= threshold
    }
}

/// Lower-cased `title summary text`, joined with single spaces.
pub fn combined_text(title: &str, summary: &str, text: &str) -> String {
    format!("{title} {summary} {text}").to_lowercase()
}

/// Scores candidates against a fixed vocabulary.
#[derive(Debug, Clone)]
pub struct RelevanceEngine {
    vocab: Arc<Vocabulary>,
}

static DEFAULT_ENGINE: Lazy<RelevanceEngine> =
    Lazy::new(|| RelevanceEngine::new(Vocabulary::builtin_ref().clone()));

impl Default for RelevanceEngine {
    fn default() -> Self {
        DEFAULT_ENGINE.clone()
    }
}

impl RelevanceEngine {
    pub fn new(vocab: Vocabulary) -> Self {
        Self {
            vocab: Arc::new(vocab),
        }
    }

    /// Engine over the built-in tables.
    pub fn builtin() -> &'static RelevanceEngine {
        &DEFAULT_ENGINE
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn threshold(&self) -> i32 {
        self.vocab.min_score
    }

    /// Integer score; may be negative.
    pub fn score(&self, title: &str, summary: &str, text: &str) -> i32 {
        score_combined(&self.vocab, &combined_text(title, summary, text))
    }

    pub fn is_admissible(&self, title: &str, summary: &str, text: &str) -> bool {
        self.score(title, summary, text) >= self.threshold()
    }

    /// Score plus an explanation of which terms contributed.
    pub fn evaluate(&self, title: &str, summary: &str, text: &str) -> Relevance {
        let combined = combined_text(title, summary, text);
        let v = &*self.vocab;
        let mut rel = Relevance::default();

        for kw in v.fdi_core.iter().filter(|kw| combined.contains(kw.as_str())) {
            rel.score += v.weights.fdi_core;
            rel.matched.push(format!("fdi:{kw}"));
        }
        for kw in v.deal_terms.iter().filter(|kw| combined.contains(kw.as_str())) {
            rel.score += v.weights.deal;
            rel.matched.push(format!("deal:{kw}"));
        }
        for country in &v.countries {
            if combined.contains(&country.to_lowercase()) {
                rel.score += v.weights.country;
                rel.matched.push(format!("country:{country}"));
            }
        }

        let excluded: Vec<&String> = v
            .exclude
            .iter()
            .filter(|kw| combined.contains(kw.as_str()))
            .collect();
        if !excluded.is_empty() {
            rel.score -= v.weights.exclude_penalty;
            rel.reasons
                .extend(excluded.iter().map(|kw| format!("exclude:{kw}")));
        }

        let threshold = self.threshold();
        if rel.admissible(threshold) {
            rel.reasons.push(format!("threshold_ok:{threshold}"));
            dev_log_relevance("admitted", &combined, &rel, threshold);
        } else {
            rel.reasons.push(format!("threshold_fail:{threshold}"));
            dev_log_relevance("rejected", &combined, &rel, threshold);
        }
        rel
    }
}

fn score_combined(v: &Vocabulary, combined: &str) -> i32 {
    let hits = |kws: &[String]| kws.iter().filter(|kw| combined.contains(kw.as_str())).count() as i32;

    let mut score = hits(&v.fdi_core) * v.weights.fdi_core + hits(&v.deal_terms) * v.weights.deal;
    score += v
        .countries
        .iter()
        .filter(|c| combined.contains(&c.to_lowercase()))
        .count() as i32
        * v.weights.country;

    if v.exclude.iter().any(|kw| combined.contains(kw.as_str())) {
        score -= v.weights.exclude_penalty;
    }
    score
}

/// Score with the built-in vocabulary.
pub fn score(title: &str, summary: &str, text: &str) -> i32 {
    DEFAULT_ENGINE.score(title, summary, text)
}

/// `score(..) >= MIN_RELEVANCE_SCORE` with the built-in vocabulary.
pub fn is_admissible(title: &str, summary: &str, text: &str) -> bool {
    DEFAULT_ENGINE.is_admissible(title, summary, text)
}

/* ----------------------------
Tests
---------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::MIN_RELEVANCE_SCORE;

    const LATAM_TEXT: &str = "Brazil and Mexico are attracting manufacturing investment as a \
        factory expansion project announces $50 million in capital expenditure";

    #[test]
    fn empty_input_scores_zero() {
        assert_eq!(score("", "", ""), 0);
        assert!(!is_admissible("", "", ""));
    }

    #[test]
    fn worked_example_scores_all_signals() {
        // fdi: capital expenditure, manufacturing investment, factory expansion (3 x 3)
        // deal: investment, announce, project, expansion (4 x 2)
        // countries: brazil, mexico (2 x 2)
        assert_eq!(score("", "", LATAM_TEXT), 21);
        assert!(is_admissible("", "", LATAM_TEXT));
    }

    #[test]
    fn fields_are_joined_with_spaces() {
        // "foreign direct" + "investment" only forms the phrase across the separator
        assert_eq!(score("foreign direct", "investment", ""), 3 + 2);
        assert_eq!(combined_text("A", "B", "C"), "a b c");
    }

    #[test]
    fn substring_matching_ignores_word_boundaries() {
        // "asia" inside "Caucasian", "develop" inside "redevelopment"
        assert_eq!(score("Caucasian redevelopment", "", ""), 2 - 4);
    }

    #[test]
    fn exclusion_penalty_is_flat() {
        let one = score("", "", "investment in asia");
        let three = score("", "", "investment in asia, europe and australia");
        assert_eq!(one, 2 - 4);
        assert_eq!(three, one);
    }

    #[test]
    fn threshold_tie_is_admissible() {
        // fdi (3) + greenfield (3) = 6
        let text = "fdi greenfield";
        assert_eq!(score("", "", text), MIN_RELEVANCE_SCORE);
        assert!(is_admissible("", "", text));
    }

    #[test]
    fn evaluate_matches_score_and_explains() {
        let eng = RelevanceEngine::builtin();
        let text = "Greenfield plant in Chile; rivals in Asia and Europe";
        let rel = eng.evaluate("", "", text);
        assert_eq!(rel.score, eng.score("", "", text));
        assert!(rel.matched.contains(&"fdi:greenfield".to_string()));
        assert!(rel.matched.contains(&"country:Chile".to_string()));
        assert!(rel.reasons.contains(&"exclude:asia".to_string()));
        assert!(rel.reasons.contains(&"exclude:europe".to_string()));
        assert_eq!(rel.score, 3 + 2 - 4);
        assert_eq!(rel.reasons.last().map(String::as_str), Some("threshold_fail:6"));
    }

    #[test]
    fn custom_vocabulary_changes_threshold() {
        let mut v = Vocabulary::default();
        v.min_score = 2;
        let eng = RelevanceEngine::new(v);
        assert!(eng.is_admissible("Chile", "", ""));
        assert!(!is_admissible("Chile", "", ""));
    }

    #[test]
    fn non_latin_and_long_input_do_not_panic() {
        let long = "inversión extranjera directa 外国直接投资 ".repeat(5_000);
        let s = score("タイトル", "резюме", &long);
        assert!(s >= 3);
    }

    #[test]
    fn anon_hash_is_short_and_stable() {
        let a = anon_hash("hello");
        assert_eq!(a.len(), 12);
        assert_eq!(a, anon_hash("hello"));
        assert_ne!(a, anon_hash("hello!"));
    }
}
