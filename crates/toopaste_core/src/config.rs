//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_ADMIN_PASSWORD, DEFAULT_MAX_BODY_SIZE, DEFAULT_PAGE_TITLE, DEFAULT_PORT,
    DEFAULT_RECENT_PASTES_LIMIT, DEFAULT_THEME,
};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Runtime configuration for Toopaste.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    /// Upper bound for request bodies accepted by the HTTP layer.
    pub max_body_size: usize,
    pub admin_password: String,
    pub default_theme: String,
    pub page_title: String,
    pub recent_pastes_limit: usize,
    pub preferred_languages: Vec<String>,
    /// Webhook target for creation announcements; `None` disables them.
    pub announce_url: Option<String>,
    /// Public base URL used in announcements; request host is used when unset.
    pub base_url: Option<String>,
    /// Seconds between expired-paste sweeps; `0` disables the sweeper.
    pub sweep_interval_secs: u64,
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    // Windows
    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    std::env::current_dir().ok()
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

/// Split a comma-separated list, dropping empty items.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn default_preferred_languages() -> Vec<String> {
    [
        "text.plain",
        "source.ruby",
        "source.python",
        "source.tcl",
        "source.js",
        "text.html.basic",
        "source.c",
        "source.c++",
        "source.java",
    ]
    .iter()
    .map(|tag| tag.to_string())
    .collect()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        Self {
            db_path: env::var("DB_PATH").map(expand_tilde).unwrap_or_else(|_| {
                let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
                let cache_dir = home.join(".cache").join("toopaste");
                cache_dir.join("db").to_string_lossy().to_string()
            }),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            max_body_size: env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_BODY_SIZE),
            admin_password: non_empty_env("ADMIN_PASSWORD")
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
            default_theme: non_empty_env("DEFAULT_THEME")
                .unwrap_or_else(|| DEFAULT_THEME.to_string()),
            page_title: non_empty_env("PAGE_TITLE")
                .unwrap_or_else(|| DEFAULT_PAGE_TITLE.to_string()),
            recent_pastes_limit: env::var("RECENT_PASTES_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_RECENT_PASTES_LIMIT),
            preferred_languages: non_empty_env("PREFERRED_LANGUAGES")
                .map(|value| parse_list(&value))
                .unwrap_or_else(default_preferred_languages),
            announce_url: non_empty_env("ANNOUNCE_URL"),
            base_url: non_empty_env("BASE_URL").map(|url| url.trim_end_matches('/').to_string()),
            sweep_interval_secs: env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
        }
    }

    /// Configuration suitable for tests and embedding, rooted at `db_path`.
    pub fn with_db_path(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            port: 0,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            default_theme: DEFAULT_THEME.to_string(),
            page_title: DEFAULT_PAGE_TITLE.to_string(),
            recent_pastes_limit: DEFAULT_RECENT_PASTES_LIMIT,
            preferred_languages: default_preferred_languages(),
            announce_url: None,
            base_url: None,
            sweep_interval_secs: 0,
        }
    }
}
