// src/ingest/providers/google_news_rss.rs
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::ingest::strip_html;
use crate::ingest::types::{Candidate, CandidateSource};
use crate::record::Origin;

pub const DEFAULT_SOURCE_NAME: &str = "Google News";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    source: Option<ItemSource>,
}

#[derive(Debug, Deserialize)]
struct ItemSource {
    #[serde(rename = "$text")]
    name: Option<String>,
}

/// Parses a Google News RSS snapshot into feed candidates. Polling the feed is
/// someone else's job: this reads XML handed over as a string or a file.
pub struct GoogleNewsRss {
    mode: Mode,
}

enum Mode {
    Inline(String),
    File(PathBuf),
}

impl GoogleNewsRss {
    pub fn from_fixture(content: &str) -> Self {
        Self {
            mode: Mode::Inline(content.to_string()),
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            mode: Mode::File(path.into()),
        }
    }

    async fn load_xml(&self) -> Result<String> {
        match &self.mode {
            Mode::Inline(s) => Ok(s.clone()),
            Mode::File(p) => tokio::fs::read_to_string(p)
                .await
                .with_context(|| format!("reading feed snapshot {}", p.display())),
        }
    }
}

/// Parse RSS XML into candidates. Items without a link are skipped.
pub fn parse_feed(xml: &str) -> Result<Vec<Candidate>> {
    let rss: Rss = from_str(xml).context("parsing google news rss xml")?;
    let mut out = Vec::with_capacity(rss.channel.item.len());

    for it in rss.channel.item {
        let Some(url) = it.link.map(|l| l.trim().to_string()).filter(|l| !l.is_empty()) else {
            continue;
        };
        let source_name = it
            .source
            .and_then(|s| s.name)
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_SOURCE_NAME.to_string());

        out.push(Candidate {
            title: strip_html(it.title.as_deref().unwrap_or_default()),
            summary_snippet: strip_html(it.description.as_deref().unwrap_or_default()),
            raw_text: String::new(),
            url,
            published: it.pub_date.unwrap_or_default().trim().to_string(),
            source_name,
            origin: Origin::Feed,
        });
    }
    Ok(out)
}

#[async_trait]
impl CandidateSource for GoogleNewsRss {
    async fn fetch_candidates(&self) -> Result<Vec<Candidate>> {
        let xml = self.load_xml().await?;
        parse_feed(&xml)
    }

    fn name(&self) -> &str {
        DEFAULT_SOURCE_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>feed</title>
<item>
  <title>Vale to build &amp; expand plant in Brazil</title>
  <link>https://news.example/1</link>
  <pubDate>Mon, 14 Oct 2024 07:00:00 GMT</pubDate>
  <description>&lt;a href="https://x"&gt;Vale invests&lt;/a&gt;&amp;nbsp;</description>
  <source url="https://www.reuters.com">Reuters</source>
</item>
<item>
  <title>No link item</title>
</item>
<item>
  <title>Sourceless</title>
  <link>https://news.example/2</link>
</item>
</channel></rss>"#;

    #[test]
    fn parses_items_and_defaults() {
        let c = parse_feed(XML).expect("parse");
        assert_eq!(c.len(), 2);
        assert_eq!(c[0].title, "Vale to build & expand plant in Brazil");
        assert_eq!(c[0].summary_snippet, "Vale invests");
        assert_eq!(c[0].source_name, "Reuters");
        assert_eq!(c[0].published, "Mon, 14 Oct 2024 07:00:00 GMT");
        assert!(c[0].raw_text.is_empty());
        assert_eq!(c[1].source_name, DEFAULT_SOURCE_NAME);
        assert_eq!(c[1].published, "");
    }

    #[test]
    fn empty_channel_is_ok() {
        let c = parse_feed("<rss><channel><title>x</title></channel></rss>").expect("parse");
        assert!(c.is_empty());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_feed("not xml at all").is_err());
    }
}
