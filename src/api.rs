// src/api.rs
//! HTTP surface: collection runs, the stored collection, export and a scoring probe.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::config::AppConfig;
use crate::export::{export_file_name, export_workbook, XLSX_CONTENT_TYPE};
use crate::extract::{extract_with, Attributes};
use crate::ingest::providers::google_news_rss::GoogleNewsRss;
use crate::ingest::providers::StaticSource;
use crate::ingest::types::{Candidate, CandidateSource};
use crate::ingest::{collect, CollectOptions};
use crate::record::{clean_text, NewsRecord};
use crate::relevance::RelevanceEngine;
use crate::store::{now_stamp, CollectedItem, NewsStore};
use crate::summarize::{ExtractiveSummarizer, Summarizer};
use crate::vocab::Vocabulary;

pub const DEFAULT_PAGE_LIMIT: usize = 100;
pub const MAX_PAGE_LIMIT: usize = 1_000;

#[derive(Clone)]
pub struct AppState {
    pub engine: RelevanceEngine,
    pub store: Arc<NewsStore>,
    pub sources: Arc<Vec<Arc<dyn CandidateSource>>>,
    pub summarizer: Arc<dyn Summarizer>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// State with feed-file sources taken from `config.feed_paths`.
    pub fn new(config: AppConfig, engine: RelevanceEngine) -> Self {
        let sources: Vec<Arc<dyn CandidateSource>> = config
            .feed_paths
            .iter()
            .map(|p| Arc::new(GoogleNewsRss::from_path(p.clone())) as Arc<dyn CandidateSource>)
            .collect();
        Self::with_sources(config, engine, sources)
    }

    pub fn with_sources(
        config: AppConfig,
        engine: RelevanceEngine,
        sources: Vec<Arc<dyn CandidateSource>>,
    ) -> Self {
        Self {
            engine,
            store: Arc::new(NewsStore::default()),
            sources: Arc::new(sources),
            summarizer: Arc::new(ExtractiveSummarizer::default()),
            config: Arc::new(config),
        }
    }

    /// Load app config and vocabulary from the environment / `config/`.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = AppConfig::load_default()?;
        let vocab = Vocabulary::load(config.vocabulary_path.as_deref())?;
        Ok(Self::new(config, RelevanceEngine::new(vocab)))
    }

    /// Attach summaries and stamps to admitted records, then merge them into the store.
    fn persist(&self, records: Vec<NewsRecord>, search_date: Option<&str>) -> Vec<CollectedItem> {
        let stamp = now_stamp();
        let items: Vec<CollectedItem> = records
            .into_iter()
            .map(|mut r| {
                if r.summary.is_empty() {
                    let basis = if r.content.is_empty() {
                        &r.title
                    } else {
                        &r.content
                    };
                    r.summary = self.summarizer.summarize(basis);
                }
                let item = CollectedItem::new(r, stamp.clone());
                match search_date {
                    Some(d) => item.with_search_date(d),
                    None => item,
                }
            })
            .collect();

        let stats = self.store.merge(items.clone());
        tracing::info!(
            target: "api",
            inserted = stats.inserted,
            updated = stats.updated,
            total = self.store.len(),
            "collection merged"
        );
        items
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/search", post(search))
        .route("/api/search/date", post(search_by_date))
        .route("/api/ingest", post(ingest))
        .route("/api/news", get(list_news))
        .route("/api/export", get(export))
        .route("/api/clear", post(clear))
        .route("/api/score", post(score))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct ErrorResp {
    success: bool,
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResp>);

fn bad_request(msg: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResp {
            success: false,
            error: msg.into(),
        }),
    )
}

fn internal_error(msg: impl Into<String>) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResp {
            success: false,
            error: msg.into(),
        }),
    )
}

#[derive(Debug, Serialize)]
struct NewsResp {
    success: bool,
    news: Vec<CollectedItem>,
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_date: Option<String>,
}

impl NewsResp {
    fn of(news: Vec<CollectedItem>) -> Self {
        Self {
            success: true,
            count: news.len(),
            news,
            total: None,
            search_date: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchReq {
    num_results: Option<usize>,
}

async fn search(State(state): State<AppState>, Json(req): Json<SearchReq>) -> Json<NewsResp> {
    let opts = CollectOptions {
        num_results: state.config.effective_results(req.num_results),
        search_date: None,
    };
    let outcome = collect(&state.sources, &state.engine, opts).await;
    Json(NewsResp::of(state.persist(outcome.records, None)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DateSearchReq {
    date: Option<String>,
    num_results: Option<usize>,
}

async fn search_by_date(
    State(state): State<AppState>,
    Json(req): Json<DateSearchReq>,
) -> Result<Json<NewsResp>, ApiError> {
    let raw = req
        .date
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .ok_or_else(|| bad_request("Date is required"))?;
    let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|_| bad_request("Date must be YYYY-MM-DD"))?;

    let opts = CollectOptions {
        num_results: state.config.effective_results(req.num_results),
        search_date: Some(date),
    };
    let outcome = collect(&state.sources, &state.engine, opts).await;
    let mut resp = NewsResp::of(state.persist(outcome.records, Some(&raw)));
    resp.search_date = Some(raw);
    Ok(Json(resp))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IngestReq {
    candidates: Vec<Candidate>,
    num_results: Option<usize>,
}

async fn ingest(State(state): State<AppState>, Json(req): Json<IngestReq>) -> Json<NewsResp> {
    let opts = CollectOptions {
        num_results: state.config.effective_results(req.num_results),
        search_date: None,
    };
    let sources: Vec<Arc<dyn CandidateSource>> =
        vec![Arc::new(StaticSource::new("ingest", req.candidates))];
    let outcome = collect(&sources, &state.engine, opts).await;
    Json(NewsResp::of(state.persist(outcome.records, None)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PageQuery {
    offset: Option<usize>,
    limit: Option<usize>,
}

async fn list_news(State(state): State<AppState>, Query(q): Query<PageQuery>) -> Json<NewsResp> {
    let limit = q.limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT);
    let page = state.store.page(q.offset.unwrap_or(0), limit);
    let mut resp = NewsResp::of(page);
    resp.total = Some(state.store.len());
    Json(resp)
}

async fn export(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let items = state.store.snapshot();
    let bytes = export_workbook(&items).map_err(|e| {
        tracing::error!(target: "api", error = ?e, "export failed");
        internal_error(e.to_string())
    })?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(chrono::Local::now())
    );
    tracing::info!(target: "api", rows = items.len(), "workbook exported");
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

#[derive(Debug, Serialize)]
struct ClearResp {
    success: bool,
    message: &'static str,
}

async fn clear(State(state): State<AppState>) -> Json<ClearResp> {
    state.store.clear();
    Json(ClearResp {
        success: true,
        message: "News cleared",
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScoreReq {
    title: String,
    summary: String,
    text: String,
}

#[derive(Debug, Serialize)]
struct ScoreResp {
    score: i32,
    threshold: i32,
    admissible: bool,
    matched: Vec<String>,
    reasons: Vec<String>,
    attributes: Attributes,
}

async fn score(State(state): State<AppState>, Json(req): Json<ScoreReq>) -> Json<ScoreResp> {
    let text = clean_text(&req.text);
    let rel = state.engine.evaluate(&req.title, &req.summary, &text);
    let basis = if text.is_empty() {
        clean_text(&req.summary)
    } else {
        text
    };
    let threshold = state.engine.threshold();
    Json(ScoreResp {
        score: rel.score,
        threshold,
        admissible: rel.admissible(threshold),
        matched: rel.matched,
        reasons: rel.reasons,
        attributes: extract_with(state.engine.vocabulary(), &basis),
    })
}
