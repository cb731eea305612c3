//! Index and metadata handlers.

use super::{normalize::theme_from_cookies, run_blocking};
use crate::{error::HttpError, AppState};
use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;
use toopaste_core::models::paste::PasteSummary;
use toopaste_core::policy;
use toopaste_core::registry::LanguageEntry;

/// Data backing the new-paste page.
#[derive(Debug, Serialize)]
pub struct IndexView {
    pub page_title: String,
    pub theme: String,
    /// Short list offered first in language pickers.
    pub preferred_languages: Vec<LanguageEntry>,
    pub recent: Vec<PasteSummary>,
}

#[derive(Debug, Serialize)]
pub struct ThemeList {
    pub default: String,
    pub themes: Vec<String>,
}

/// New-paste page data: title, theme, preferred languages, recent pastes.
///
/// # Errors
/// Returns an error if the recent listing cannot be read.
pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<IndexView>, HttpError> {
    let store = state.store.clone();
    let limit = state.config.recent_pastes_limit;
    let recent = run_blocking(move || {
        let pastes = store.list_public(limit)?;
        Ok(pastes
            .iter()
            .map(|paste| policy::summary(paste, store.registry()))
            .collect::<Vec<_>>())
    })
    .await?;

    let cookie_theme = theme_from_cookies(&headers);
    let theme = state.delivery.select_theme(cookie_theme.as_deref()).to_string();
    let preferred_languages = state
        .store
        .registry()
        .select(&state.config.preferred_languages)
        .cloned()
        .collect();

    Ok(Json(IndexView {
        page_title: state.config.page_title.clone(),
        theme,
        preferred_languages,
        recent,
    }))
}

/// Every language the renderer supports, sorted by tag.
pub async fn list_languages(State(state): State<AppState>) -> Json<Vec<LanguageEntry>> {
    Json(state.store.registry().entries().cloned().collect())
}

/// Theme names accepted by `?theme=`.
pub async fn list_themes(State(state): State<AppState>) -> Json<ThemeList> {
    Json(ThemeList {
        default: state.delivery.default_theme().to_string(),
        themes: state.delivery.renderer().themes(),
    })
}
