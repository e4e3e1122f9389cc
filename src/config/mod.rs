// src/config/mod.rs
pub mod app;

pub use app::AppConfig;

pub const ENV_DEV_LOG: &str = "FDI_DEV_LOG";

/// Dev logging is on when `FDI_DEV_LOG=1` in a development environment: a debug build,
/// or `SHUTTLE_ENV` one of `local`, `development`, `dev`.
pub fn dev_logging_enabled() -> bool {
    dev_logging_allowed(
        std::env::var(ENV_DEV_LOG).ok().as_deref(),
        std::env::var("SHUTTLE_ENV").ok().as_deref(),
        cfg!(debug_assertions),
    )
}

fn dev_logging_allowed(flag: Option<&str>, shuttle_env: Option<&str>, debug_build: bool) -> bool {
    if flag.map(str::trim) != Some("1") {
        return false;
    }
    debug_build
        || shuttle_env.is_some_and(|e| {
            matches!(
                e.trim().to_ascii_lowercase().as_str(),
                "local" | "development" | "dev"
            )
        })
}
