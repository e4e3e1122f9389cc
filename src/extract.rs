// src/extract.rs
//! Structured hints (countries, sectors, amount, company) pulled from free text.
//!
//! Countries and sectors use substring containment on the lower-cased text and come
//! back alphabetically sorted. Amount and company are the first regex match on the
//! original-case text, or `""` when nothing matches. The amount is returned verbatim,
//! surrounding punctuation and whitespace included; the company name is trimmed.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::vocab::Vocabulary;

/// Optional currency marker, a run of digits/commas/dots, optional scale word.
/// A lone `,` or `.` is a valid run, so list punctuation can match before any figure.
static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:US\$|\$|USD\s?)?[\d,.]+\s?(?:million|billion|m|bn|b)?")
        .expect("amount regex")
});

/// Capitalized phrase followed by a corporate suffix. Case-sensitive.
static COMPANY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<name>[A-Z][A-Za-z0-9&\- ]{2,})\s+(?:Corp|Corporation|S\.A\.|SA|Inc|LLC|Group|Holdings|S\.A\. de C\.V\.)",
    )
    .expect("company regex")
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub countries: Vec<String>,
    pub sectors: Vec<String>,
    pub amount: String,
    pub company: String,
}

impl Attributes {
    /// Primary country: first of the sorted set, or `""`.
    pub fn country(&self) -> &str {
        self.countries.first().map(String::as_str).unwrap_or_default()
    }

    /// Primary sector: first of the sorted set, or `""`.
    pub fn sector(&self) -> &str {
        self.sectors.first().map(String::as_str).unwrap_or_default()
    }
}

/// Extract with the built-in vocabulary.
pub fn extract(text: &str) -> Attributes {
    extract_with(Vocabulary::builtin_ref(), text)
}

pub fn extract_with(vocab: &Vocabulary, text: &str) -> Attributes {
    let lower = text.to_lowercase();

    let mut countries: Vec<String> = vocab
        .countries
        .iter()
        .filter(|c| lower.contains(&c.to_lowercase()))
        .cloned()
        .collect();
    countries.sort();
    countries.dedup();

    let mut sectors: Vec<String> = vocab
        .sectors
        .iter()
        .filter(|(_, kws)| kws.iter().any(|kw| lower.contains(kw.as_str())))
        .map(|(name, _)| name.clone())
        .collect();
    sectors.sort();
    sectors.dedup();

    Attributes {
        countries,
        sectors,
        amount: find_amount(text),
        company: find_company(text),
    }
}

/// First monetary amount in `text`, e.g. `"US$1.2 billion"`, exactly as matched.
pub fn find_amount(text: &str) -> String {
    AMOUNT_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// First company name (without its corporate suffix) in `text`.
pub fn find_company(text: &str) -> String {
    COMPANY_RE
        .captures(text)
        .and_then(|caps| caps.name("name"))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}
