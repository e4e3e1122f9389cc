// src/vocab.rs
//! Keyword vocabularies behind relevance scoring and attribute extraction.
//!
//! The built-in tables are process-wide constants. A `Vocabulary` value carries them
//! together with the scoring weights; it can optionally be loaded from a TOML override
//! once at startup (`FDI_VOCABULARY_PATH` or `config/vocabulary.toml`). Nothing mutates a
//! vocabulary after construction.

use anyhow::Context;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_VOCABULARY_PATH: &str = "config/vocabulary.toml";
pub const ENV_VOCABULARY_PATH: &str = "FDI_VOCABULARY_PATH";
pub const ENV_MIN_RELEVANCE_SCORE: &str = "FDI_MIN_RELEVANCE_SCORE";

/// Admission threshold: `score >= MIN_RELEVANCE_SCORE` is admissible.
pub const MIN_RELEVANCE_SCORE: i32 = 6;

pub const LATAM_COUNTRIES: [&str; 19] = [
    "Argentina",
    "Bolivia",
    "Brazil",
    "Chile",
    "Colombia",
    "Costa Rica",
    "Cuba",
    "Dominican Republic",
    "Ecuador",
    "El Salvador",
    "Guatemala",
    "Honduras",
    "Mexico",
    "Nicaragua",
    "Panama",
    "Paraguay",
    "Peru",
    "Uruguay",
    "Venezuela",
];

pub const SECTOR_KEYWORDS: &[(&str, &[&str])] = &[
    ("Energy", &["energy", "renewable", "solar", "wind", "hydro"]),
    (
        "Manufacturing",
        &["plant", "factory", "manufacturing", "assembly"],
    ),
    (
        "Technology",
        &["technology", "software", "data center", "ai", "cloud"],
    ),
    (
        "Infrastructure",
        &["port", "rail", "infrastructure", "airport"],
    ),
    (
        "Finance",
        &["bank", "financial", "fintech", "investment fund"],
    ),
    ("Mining", &["mining", "copper", "lithium", "extractive"]),
];

pub const FDI_CORE_KEYWORDS: &[&str] = &[
    "fdi",
    "foreign direct investment",
    "inversión extranjera",
    "greenfield",
    "capital expenditure",
    "capex",
    "investment project",
    "manufacturing investment",
    "plant expansion",
    "factory expansion",
];

pub const DEAL_TERMS: &[&str] = &[
    "investment",
    "invests",
    "investirá",
    "announce",
    "project",
    "facility",
    "expansion",
    "build",
    "construct",
    "develop",
    "partnership",
];

pub const EXCLUDE_KEYWORDS: &[&str] = &[
    "middle east",
    "africa",
    "asia",
    "europe",
    "australia",
    "new zealand",
];

/// Points added or removed per signal class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Weights {
    #[serde(default = "default_fdi_core_weight")]
    pub fdi_core: i32,
    #[serde(default = "default_deal_weight")]
    pub deal: i32,
    #[serde(default = "default_country_weight")]
    pub country: i32,
    /// Flat deduction, applied at most once per text.
    #[serde(default = "default_exclude_penalty")]
    pub exclude_penalty: i32,
}

fn default_fdi_core_weight() -> i32 {
    3
}

fn default_deal_weight() -> i32 {
    2
}

fn default_country_weight() -> i32 {
    2
}

fn default_exclude_penalty() -> i32 {
    4
}

fn default_min_score() -> i32 {
    MIN_RELEVANCE_SCORE
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            fdi_core: default_fdi_core_weight(),
            deal: default_deal_weight(),
            country: default_country_weight(),
            exclude_penalty: default_exclude_penalty(),
        }
    }
}

/// Complete keyword configuration for scoring and extraction.
///
/// Sectors live in a `BTreeMap`, so iteration is already alphabetical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    pub countries: Vec<String>,
    pub sectors: BTreeMap<String, Vec<String>>,
    pub fdi_core: Vec<String>,
    pub deal_terms: Vec<String>,
    pub exclude: Vec<String>,
    pub weights: Weights,
    pub min_score: i32,
}

/// TOML shape of an override file. Every section is optional.
#[derive(Debug, Default, Deserialize)]
struct VocabularyFile {
    #[serde(default)]
    countries: Option<Vec<String>>,
    #[serde(default)]
    sectors: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    fdi_core: Option<Vec<String>>,
    #[serde(default)]
    deal_terms: Option<Vec<String>>,
    #[serde(default)]
    exclude: Option<Vec<String>>,
    #[serde(default)]
    weights: Option<Weights>,
    #[serde(default = "default_min_score")]
    min_score: i32,
}

static BUILTIN: Lazy<Vocabulary> = Lazy::new(Vocabulary::builtin);

impl Default for Vocabulary {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

impl Vocabulary {
    /// Shared, read-only built-in tables.
    pub fn builtin_ref() -> &'static Vocabulary {
        &BUILTIN
    }

    fn builtin() -> Self {
        Self {
            countries: LATAM_COUNTRIES.iter().map(|c| c.to_string()).collect(),
            sectors: SECTOR_KEYWORDS
                .iter()
                .map(|(name, kws)| (name.to_string(), owned(kws)))
                .collect(),
            fdi_core: owned(FDI_CORE_KEYWORDS),
            deal_terms: owned(DEAL_TERMS),
            exclude: owned(EXCLUDE_KEYWORDS),
            weights: Weights::default(),
            min_score: MIN_RELEVANCE_SCORE,
        }
    }

    /// Parse an override; absent sections keep their built-in values.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let file: VocabularyFile = toml::from_str(toml_str).context("parsing vocabulary toml")?;
        let base = Self::builtin();

        let vocab = Self {
            countries: clean_names(file.countries.unwrap_or(base.countries)),
            sectors: file
                .sectors
                .unwrap_or(base.sectors)
                .into_iter()
                .map(|(name, kws)| (name.trim().to_string(), lowered(kws)))
                .filter(|(name, kws)| !name.is_empty() && !kws.is_empty())
                .collect(),
            fdi_core: lowered(file.fdi_core.unwrap_or(base.fdi_core)),
            deal_terms: lowered(file.deal_terms.unwrap_or(base.deal_terms)),
            exclude: lowered(file.exclude.unwrap_or(base.exclude)),
            weights: file.weights.unwrap_or(base.weights),
            min_score: file.min_score,
        };
        Ok(vocab)
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading vocabulary from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Resolve the startup vocabulary:
    /// 1) explicit `path` (from app config), 2) `$FDI_VOCABULARY_PATH`,
    /// 3) `config/vocabulary.toml` if present, 4) built-ins.
    /// `$FDI_MIN_RELEVANCE_SCORE` then overrides the threshold.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let env_path = std::env::var(ENV_VOCABULARY_PATH).ok().map(PathBuf::from);
        let default_path = PathBuf::from(DEFAULT_VOCABULARY_PATH);

        let mut vocab = match path.map(Path::to_path_buf).or(env_path) {
            Some(p) => Self::from_path(&p)?,
            None if default_path.exists() => Self::from_path(&default_path)?,
            None => Self::builtin(),
        };

        if let Some(min) = parse_min_score_env(std::env::var(ENV_MIN_RELEVANCE_SCORE).ok()) {
            vocab.min_score = min;
        }
        Ok(vocab)
    }
}

fn parse_min_score_env(raw: Option<String>) -> Option<i32> {
    raw.and_then(|s| s.trim().parse::<i32>().ok())
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// Matching is substring containment against lower-cased text, so keywords are stored
// lower-case, once each, in first-seen order.
fn lowered(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty() && seen.insert(s.clone()))
        .collect()
}

// Country names keep their display case; duplicates are judged case-insensitively.
fn clean_names(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .collect()
}
