// src/config/app.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_PATH: &str = "FDI_CONFIG_PATH";
pub const DEFAULT_CONFIG_TOML: &str = "config/app.toml";
pub const DEFAULT_CONFIG_JSON: &str = "config/app.json";

/// Hard upper bound on `num_results` for a single collection run.
pub const RESULTS_CEILING: usize = 50;

fn default_results() -> usize {
    10
}
fn default_max_results() -> usize {
    RESULTS_CEILING
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// RSS snapshots dropped by the external feed poller, read on each search.
    #[serde(default)]
    pub feed_paths: Vec<PathBuf>,
    #[serde(default = "default_results")]
    pub default_results: usize,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Optional vocabulary override (TOML).
    #[serde(default)]
    pub vocabulary_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed_paths: Vec::new(),
            default_results: default_results(),
            max_results: default_max_results(),
            vocabulary_path: None,
        }
    }
}

impl AppConfig {
    /// Load from an explicit path. TOML or JSON, chosen by extension.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading app config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = parse_config(&data, &ext)?;
        Ok(cfg.sanitized())
    }

    /// Load using env var + fallbacks:
    /// 1) $FDI_CONFIG_PATH
    /// 2) config/app.toml
    /// 3) config/app.json
    /// 4) defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from_file(&pb);
            }
            return Err(anyhow!("FDI_CONFIG_PATH points to non-existent path"));
        }
        for candidate in [DEFAULT_CONFIG_TOML, DEFAULT_CONFIG_JSON] {
            let p = PathBuf::from(candidate);
            if p.exists() {
                return Self::load_from_file(&p);
            }
        }
        Ok(Self::default())
    }

    /// Clamp result counts into `1..=RESULTS_CEILING` with default <= max.
    pub fn sanitized(mut self) -> Self {
        self.max_results = self.max_results.clamp(1, RESULTS_CEILING);
        self.default_results = self.default_results.clamp(1, self.max_results);
        self
    }

    /// Requested count, falling back to the default and capped at the max.
    pub fn effective_results(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_results)
            .clamp(1, self.max_results)
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<AppConfig> {
    match hint_ext {
        "json" => serde_json::from_str(s).context("parsing app config json"),
        "toml" => toml::from_str(s).context("parsing app config toml"),
        _ => toml::from_str(s)
            .or_else(|_| serde_json::from_str(s))
            .map_err(|_| anyhow!("unsupported app config format")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_and_json_forms() {
        let toml = r#"
feed_paths = ["data/feeds/google_news.xml"]
default_results = 5
vocabulary_path = "config/vocabulary.toml"
"#;
        let c = parse_config(toml, "toml").unwrap().sanitized();
        assert_eq!(c.feed_paths, vec![PathBuf::from("data/feeds/google_news.xml")]);
        assert_eq!(c.default_results, 5);
        assert_eq!(c.max_results, RESULTS_CEILING);

        let json = r#"{"default_results": 7, "max_results": 20}"#;
        let c = parse_config(json, "").unwrap().sanitized();
        assert_eq!(c.default_results, 7);
        assert_eq!(c.max_results, 20);
        assert!(c.feed_paths.is_empty());
    }

    #[test]
    fn sanitize_clamps_counts() {
        let c = AppConfig {
            default_results: 500,
            max_results: 0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(c.max_results, 1);
        assert_eq!(c.default_results, 1);
    }

    #[test]
    fn effective_results_caps_requests() {
        let c = AppConfig::default();
        assert_eq!(c.effective_results(None), 10);
        assert_eq!(c.effective_results(Some(3)), 3);
        assert_eq!(c.effective_results(Some(999)), RESULTS_CEILING);
        assert_eq!(c.effective_results(Some(0)), 1);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_config("{{{{", "").is_err());
        assert!(parse_config("default_results = \"x\"", "toml").is_err());
    }
}
