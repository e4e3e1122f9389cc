//! FDI news monitor: binary entrypoint.
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fdi_latam_monitor::config::dev_logging_enabled;
use fdi_latam_monitor::metrics::Metrics;
use fdi_latam_monitor::{router, AppState};

/// Compact tracing logs, only when `config::dev_logging_enabled()` allows it.
fn enable_dev_tracing() {
    if !dev_logging_enabled() {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("relevance=info,ingest=info,api=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    // Config + vocabulary are read once here and never reloaded.
    let state = AppState::from_env()?;
    tracing::info!(
        target: "api",
        min_score = state.engine.threshold(),
        feeds = state.sources.len(),
        "state initialized"
    );

    let mut app = router(state.clone());
    match Metrics::init(state.engine.threshold()) {
        Ok(m) => app = app.merge(m.router()),
        Err(e) => tracing::warn!(error = ?e, "metrics disabled"),
    }

    Ok(app.into())
}
