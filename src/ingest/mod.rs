// src/ingest/mod.rs
//! Collection pipeline around the record builder: pull candidates from sources,
//! drop duplicates and off-date items, build records, keep only admissible ones.

pub mod providers;
pub mod types;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;

use crate::ingest::types::{Candidate, CandidateSource};
use crate::record::{build_with, truncate_chars, NewsRecord, Origin};
use crate::relevance::RelevanceEngine;

/// Characters of fetched article text used as the display snippet.
pub const SNIPPET_MAX_CHARS: usize = 600;
/// Characters of article text standing in for a missing snippet on web candidates.
pub const WEB_GATE_SUMMARY_CHARS: usize = 300;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "ingest_candidates_total",
            "Candidates pulled from all sources."
        );
        describe_counter!(
            "ingest_admitted_total",
            "Records that met the relevance threshold."
        );
        describe_counter!(
            "ingest_rejected_total",
            "Candidates dropped below the relevance threshold."
        );
        describe_counter!(
            "ingest_duplicates_total",
            "Candidates skipped because their URL was already seen."
        );
        describe_counter!(
            "ingest_source_errors_total",
            "Source fetch/parse errors."
        );
        describe_histogram!("ingest_build_ms", "Record build time in milliseconds.");
    });
}

/// Strip markup from feed text: decode entities, drop tags, collapse whitespace.
pub fn strip_html(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    let no_tags = re_tags.replace_all(&decoded, " ");

    crate::record::clean_text(&no_tags)
}

/// Summary handed to the record builder: start of the article when it was fetched,
/// the feed snippet otherwise.
pub fn display_snippet(c: &Candidate) -> String {
    if c.raw_text.is_empty() {
        c.summary_snippet.clone()
    } else {
        truncate_chars(&c.raw_text, SNIPPET_MAX_CHARS)
    }
}

/// Summary seen by the admission gate: the feed snippet as delivered. Web candidates
/// carry no snippet, so the start of their article stands in.
pub fn admission_summary(c: &Candidate) -> String {
    if c.origin == Origin::Web && c.summary_snippet.is_empty() {
        truncate_chars(&c.raw_text, WEB_GATE_SUMMARY_CHARS)
    } else {
        c.summary_snippet.clone()
    }
}

/// Best-effort calendar date of a free-form `published` string.
pub fn parse_published_date(published: &str) -> Option<NaiveDate> {
    let s = published.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    s.get(..10)
        .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
}

/// Unparsable dates are kept; only a known, different date excludes a candidate.
pub fn matches_search_date(published: &str, date: NaiveDate) -> bool {
    parse_published_date(published).map_or(true, |d| d == date)
}

#[derive(Debug, Clone, Copy)]
pub struct CollectOptions {
    pub num_results: usize,
    pub search_date: Option<NaiveDate>,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            num_results: 10,
            search_date: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CollectOutcome {
    pub records: Vec<NewsRecord>,
    pub rejected: usize,
    pub duplicates: usize,
    pub off_date: usize,
    pub source_errors: usize,
}

impl CollectOutcome {
    fn is_full(&self, opts: &CollectOptions) -> bool {
        self.records.len() >= opts.num_results
    }
}

/// Run candidates through admit → build, in order, until `num_results` are admitted.
/// The gate scores the candidate's own title, feed snippet and article text; the built
/// record's `relevance_score` is computed over the display snippet instead, so it can
/// differ from the gate score.
/// `seen` carries URLs across calls so one run never yields the same URL twice.
pub fn process_candidates(
    candidates: Vec<Candidate>,
    engine: &RelevanceEngine,
    opts: &CollectOptions,
    seen: &mut HashSet<String>,
    out: &mut CollectOutcome,
) {
    ensure_metrics_described();
    counter!("ingest_candidates_total").increment(candidates.len() as u64);

    for c in candidates {
        if out.is_full(opts) {
            break;
        }
        if c.url.is_empty() || seen.contains(&c.url) {
            out.duplicates += 1;
            counter!("ingest_duplicates_total").increment(1);
            continue;
        }
        if let Some(date) = opts.search_date {
            if !matches_search_date(&c.published, date) {
                out.off_date += 1;
                continue;
            }
        }

        let gate_summary = admission_summary(&c);
        let gate_score = engine.score(&c.title, &gate_summary, &c.raw_text);
        if gate_score < engine.threshold() {
            tracing::debug!(
                target: "ingest",
                score = gate_score,
                url = %c.url,
                "candidate below threshold"
            );
            out.rejected += 1;
            counter!("ingest_rejected_total").increment(1);
            continue;
        }

        let t0 = std::time::Instant::now();
        let snippet = display_snippet(&c);
        let record = build_with(engine, c.record_input(&snippet));
        histogram!("ingest_build_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        seen.insert(record.url.clone());
        counter!("ingest_admitted_total").increment(1);
        out.records.push(record);
    }
}

/// Pull from every source in order. A failing source is logged and skipped.
pub async fn collect(
    sources: &[Arc<dyn CandidateSource>],
    engine: &RelevanceEngine,
    opts: CollectOptions,
) -> CollectOutcome {
    ensure_metrics_described();

    let mut out = CollectOutcome::default();
    let mut seen = HashSet::new();

    for src in sources {
        if out.is_full(&opts) {
            break;
        }
        match src.fetch_candidates().await {
            Ok(candidates) => process_candidates(candidates, engine, &opts, &mut seen, &mut out),
            Err(e) => {
                tracing::warn!(target: "ingest", error = ?e, source = src.name(), "source error");
                counter!("ingest_source_errors_total").increment(1);
                out.source_errors += 1;
            }
        }
    }

    tracing::info!(
        target: "ingest",
        admitted = out.records.len(),
        rejected = out.rejected,
        duplicates = out.duplicates,
        off_date = out.off_date,
        source_errors = out.source_errors,
        "collect finished"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(url: &str, title: &str, text: &str) -> Candidate {
        Candidate {
            title: title.into(),
            url: url.into(),
            raw_text: text.into(),
            ..Default::default()
        }
    }

    const GOOD: &str = "Greenfield FDI: a new factory expansion project in Mexico";

    #[test]
    fn strip_html_decodes_and_removes_tags() {
        let s = "<a href=\"x\">Vale&nbsp;invests</a>&nbsp;&nbsp;<font>Reuters</font>";
        assert_eq!(strip_html(s), "Vale invests Reuters");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn snippet_prefers_article_text() {
        let mut c = cand("u", "t", &"x".repeat(1_000));
        c.summary_snippet = "feed".into();
        assert_eq!(display_snippet(&c).chars().count(), SNIPPET_MAX_CHARS);
        c.raw_text.clear();
        assert_eq!(display_snippet(&c), "feed");
    }

    #[test]
    fn published_date_formats() {
        let d = NaiveDate::from_ymd_opt(2024, 10, 14).unwrap();
        assert_eq!(parse_published_date("Mon, 14 Oct 2024 07:00:00 GMT"), Some(d));
        assert_eq!(parse_published_date("2024-10-14T07:00:00Z"), Some(d));
        assert_eq!(parse_published_date("2024-10-14"), Some(d));
        assert_eq!(parse_published_date("2024-10-14 09:30:00"), Some(d));
        assert_eq!(parse_published_date("last Tuesday"), None);
        assert_eq!(parse_published_date(""), None);
    }

    #[test]
    fn date_filter_keeps_unknown_dates() {
        let d = NaiveDate::from_ymd_opt(2024, 10, 14).unwrap();
        assert!(matches_search_date("2024-10-14", d));
        assert!(!matches_search_date("2024-10-15", d));
        assert!(matches_search_date("sometime", d));
    }

    #[test]
    fn process_admits_dedups_and_rejects() {
        let eng = RelevanceEngine::builtin();
        let opts = CollectOptions::default();
        let mut seen = HashSet::new();
        let mut out = CollectOutcome::default();

        let cands = vec![
            cand("https://a.test/1", "FDI", GOOD),
            cand("https://a.test/1", "FDI", GOOD),
            cand("https://a.test/2", "Weather", "sunny day"),
            cand("", "FDI", GOOD),
        ];
        process_candidates(cands, eng, &opts, &mut seen, &mut out);

        assert_eq!(out.records.len(), 1);
        assert_eq!(out.duplicates, 2);
        assert_eq!(out.rejected, 1);
        assert_eq!(out.records[0].origin, Origin::Feed);
        assert!(seen.contains("https://a.test/1"));
    }

    #[test]
    fn process_stops_at_num_results() {
        let eng = RelevanceEngine::builtin();
        let opts = CollectOptions {
            num_results: 2,
            search_date: None,
        };
        let mut seen = HashSet::new();
        let mut out = CollectOutcome::default();
        let cands = (0..5)
            .map(|i| cand(&format!("https://a.test/{i}"), "FDI", GOOD))
            .collect();
        process_candidates(cands, eng, &opts, &mut seen, &mut out);
        assert_eq!(out.records.len(), 2);
    }

    #[test]
    fn process_applies_search_date() {
        let eng = RelevanceEngine::builtin();
        let opts = CollectOptions {
            num_results: 10,
            search_date: NaiveDate::from_ymd_opt(2024, 10, 14),
        };
        let mut seen = HashSet::new();
        let mut out = CollectOutcome::default();
        let mut on = cand("https://a.test/on", "FDI", GOOD);
        on.published = "Mon, 14 Oct 2024 07:00:00 GMT".into();
        let mut off = cand("https://a.test/off", "FDI", GOOD);
        off.published = "Tue, 15 Oct 2024 07:00:00 GMT".into();
        process_candidates(vec![on, off], eng, &opts, &mut seen, &mut out);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].url, "https://a.test/on");
        assert_eq!(out.off_date, 1);
    }

    #[test]
    fn gate_scores_feed_snippet_alongside_article_text() {
        let eng = RelevanceEngine::builtin();
        let opts = CollectOptions::default();
        let mut seen = HashSet::new();
        let mut out = CollectOutcome::default();
        let c = Candidate {
            title: "Plant news".into(),
            summary_snippet: "Greenfield FDI in Mexico".into(),
            raw_text: "The company will build a facility.".into(),
            url: "https://a.test/plant".into(),
            ..Default::default()
        };
        // greenfield, fdi (3 x 2) + build, facility (2 x 2) + mexico (2)
        assert_eq!(eng.score(&c.title, &c.summary_snippet, &c.raw_text), 12);

        process_candidates(vec![c], eng, &opts, &mut seen, &mut out);
        assert_eq!(out.rejected, 0);
        assert_eq!(out.records.len(), 1);
        let r = &out.records[0];
        // the record itself is built from the article text, not the feed snippet
        assert_eq!(r.summary, "The company will build a facility.");
        assert!(r.countries.is_empty());
    }

    #[test]
    fn web_candidates_gate_on_article_start() {
        let mut c = cand("u", "t", "Greenfield FDI in Peru");
        c.origin = Origin::Web;
        assert_eq!(admission_summary(&c), "Greenfield FDI in Peru");
        c.raw_text = "x".repeat(1_000);
        assert_eq!(admission_summary(&c).chars().count(), WEB_GATE_SUMMARY_CHARS);
        c.summary_snippet = "given".into();
        assert_eq!(admission_summary(&c), "given");
        c.origin = Origin::Feed;
        c.summary_snippet.clear();
        assert_eq!(admission_summary(&c), "");
    }
}
