// src/summarize.rs
//! Summarization seam. The record builder never calls this; the API layer attaches a
//! summary to admitted records whose own snippet is empty.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::truncate_chars;

pub const NO_CONTENT_SUMMARY: &str = "Unable to extract content from article.";

pub trait Summarizer: Send + Sync {
    fn summarize(&self, text: &str) -> String;
}

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("sentence regex"));
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?u)\w+").expect("word regex"));

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // en
        "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "for", "from", "has",
        "have", "he", "her", "his", "in", "is", "it", "its", "of", "on", "or", "said", "she",
        "that", "the", "their", "they", "this", "to", "was", "were", "will", "with", "would",
        // es
        "al", "como", "con", "de", "del", "el", "en", "es", "la", "las", "lo", "los", "para",
        "por", "que", "se", "su", "un", "una", "y",
    ]
    .into_iter()
    .collect()
});

/// Frequency-based extractive summary: the top-scoring sentences, in score order.
#[derive(Debug, Clone, Copy)]
pub struct ExtractiveSummarizer {
    pub max_sentences: usize,
    pub max_chars: usize,
}

impl Default for ExtractiveSummarizer {
    fn default() -> Self {
        Self {
            max_sentences: 3,
            max_chars: 500,
        }
    }
}

pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for m in SENTENCE_END.find_iter(text) {
        let s = text[start..m.end()].trim();
        if !s.is_empty() {
            out.push(s);
        }
        start = m.end();
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        out.push(tail);
    }
    out
}

fn content_words(s: &str) -> impl Iterator<Item = String> + '_ {
    WORD.find_iter(s)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| !STOPWORDS.contains(w.as_str()))
}

impl Summarizer for ExtractiveSummarizer {
    fn summarize(&self, text: &str) -> String {
        let sentences = split_sentences(text);
        if sentences.is_empty() {
            return NO_CONTENT_SUMMARY.to_string();
        }

        let mut freq: HashMap<String, usize> = HashMap::new();
        for w in content_words(text) {
            *freq.entry(w).or_insert(0) += 1;
        }

        let mut scored: Vec<(usize, usize)> = sentences
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let score = content_words(s)
                    .map(|w| freq.get(&w).copied().unwrap_or(0))
                    .sum::<usize>();
                (i, score)
            })
            .collect();
        // stable: equal scores keep document order
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        let joined = scored
            .iter()
            .take(self.max_sentences)
            .map(|(i, _)| sentences[*i])
            .collect::<Vec<_>>()
            .join(" ");
        truncate_chars(&joined, self.max_chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_gets_placeholder() {
        let s = ExtractiveSummarizer::default();
        assert_eq!(s.summarize(""), NO_CONTENT_SUMMARY);
        assert_eq!(s.summarize("   \n"), NO_CONTENT_SUMMARY);
    }

    #[test]
    fn splits_on_terminal_punctuation() {
        let v = split_sentences("One. Two!  Three? Four");
        assert_eq!(v, vec!["One.", "Two!", "Three?", "Four"]);
    }

    #[test]
    fn keeps_decimal_numbers_inside_sentences() {
        let v = split_sentences("It costs 1.5 billion. Done.");
        assert_eq!(v, vec!["It costs 1.5 billion.", "Done."]);
    }

    #[test]
    fn picks_most_representative_sentences() {
        let text = "Lithium investment in Chile grows. The weather was mild. \
                    Chile lithium investment doubles again. Cats sleep.";
        let s = ExtractiveSummarizer {
            max_sentences: 2,
            max_chars: 500,
        };
        let out = s.summarize(text);
        assert!(out.contains("Lithium investment in Chile grows."));
        assert!(out.contains("Chile lithium investment doubles again."));
        assert!(!out.contains("Cats"));
    }

    #[test]
    fn respects_char_cap() {
        let text = "word ".repeat(400);
        let s = ExtractiveSummarizer::default();
        assert!(s.summarize(&text).chars().count() <= 500);
    }
}
