//! Paste HTTP handlers.

use super::normalize::{
    normalize_optional, normalized_limit, request_base_url, theme_cookie, theme_from_cookies,
};
use super::run_blocking;
use crate::{auth, error::HttpError, AppError, AppState};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use toopaste_core::announce::Announcement;
use toopaste_core::delivery::{Delivery, DeliveryMode, Disposition};
use toopaste_core::ids;
use toopaste_core::models::paste::{
    CreatePasteRequest, ListQuery, Paste, PasteSummary, PasteView,
};
use toopaste_core::policy;

/// Query accepted by the paste display routes.
#[derive(Debug, Default, Deserialize)]
pub struct ShowQuery {
    /// Theme to render with; remembered in a cookie when valid.
    pub theme: Option<String>,
}

/// Outcome of an admin delete.
#[derive(Debug, Serialize)]
pub struct DeleteOutcome {
    pub id: String,
    pub deleted: bool,
    pub message: String,
}

/// Validate and store a new paste, announcing it only when requested and public.
async fn create_from_request(
    state: &AppState,
    headers: &HeaderMap,
    req: CreatePasteRequest,
) -> Result<Paste, HttpError> {
    let wants_announcement = req.wants_announcement();
    let store = state.store.clone();
    let paste = run_blocking(move || {
        let new_paste = policy::normalize_create(&req, store.registry(), Utc::now())?;
        store.create(new_paste)
    })
    .await?;

    if wants_announcement {
        if paste.is_public() {
            let base_url = request_base_url(state.config.base_url.as_deref(), headers);
            state
                .announcer
                .announce(Announcement::for_paste(&paste, &base_url));
        } else {
            tracing::debug!(id = %paste.id, "Not announcing private paste");
        }
    }

    Ok(paste)
}

/// Create a paste from a JSON body.
///
/// # Returns
/// The created paste as JSON, with display fallbacks resolved.
///
/// # Errors
/// Returns 400 with per-field messages when validation fails.
pub async fn create_paste(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreatePasteRequest>,
) -> Result<Json<PasteView>, HttpError> {
    let paste = create_from_request(&state, &headers, req).await?;
    Ok(Json(policy::view(&paste, state.store.registry())))
}

/// Create a paste from an HTML form post and redirect to it.
///
/// # Errors
/// Returns 400 with per-field messages when validation fails.
pub async fn create_paste_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(req): Form<CreatePasteRequest>,
) -> Result<Redirect, HttpError> {
    let paste = create_from_request(&state, &headers, req).await?;
    Ok(Redirect::to(&format!("/{}", paste.id)))
}

/// Fetch a paste by id as JSON.
///
/// # Errors
/// Returns 404 for unknown or expired ids.
pub async fn get_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PasteView>, HttpError> {
    let store = state.store.clone();
    let view = run_blocking(move || {
        let paste = fetch_live(&store, &id)?;
        Ok(policy::view(&paste, store.registry()))
    })
    .await?;
    Ok(Json(view))
}

/// Recent public pastes, newest first.
///
/// # Errors
/// Returns an error if the listing cannot be read.
pub async fn list_pastes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<PasteSummary>>, HttpError> {
    let limit = normalized_limit(query.limit, state.config.recent_pastes_limit);
    let store = state.store.clone();
    let items = run_blocking(move || {
        let pastes = store.list_public(limit)?;
        Ok(pastes
            .iter()
            .map(|paste| policy::summary(paste, store.registry()))
            .collect::<Vec<_>>())
    })
    .await?;
    Ok(Json(items))
}

/// Display a paste: highlighted HTML for browsers, raw text for `curl`/`wget`.
pub async fn show_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ShowQuery>,
    headers: HeaderMap,
) -> Result<Response, HttpError> {
    deliver(state, id, DeliveryMode::Rendered, query, headers).await
}

/// The paste body as inline `text/plain`.
pub async fn raw_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, HttpError> {
    deliver(state, id, DeliveryMode::Raw, ShowQuery::default(), headers).await
}

/// The paste body as a `text/plain` attachment.
pub async fn download_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, HttpError> {
    deliver(state, id, DeliveryMode::Download, ShowQuery::default(), headers).await
}

/// Delete a paste. Requires admin basic auth; deleting a missing id succeeds.
///
/// # Errors
/// Returns 401 without valid admin credentials.
pub async fn delete_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<DeleteOutcome>, HttpError> {
    auth::require_admin(&headers, &state.config.admin_password)?;

    let store = state.store.clone();
    let target = id.clone();
    let deleted = run_blocking(move || store.delete(&target)).await?;
    let message = if deleted {
        format!("Paste #{} deleted", id)
    } else {
        format!("Paste #{} was already gone", id)
    };
    Ok(Json(DeleteOutcome {
        id,
        deleted,
        message,
    }))
}

fn fetch_live(store: &toopaste_core::PasteStore, id: &str) -> Result<Paste, AppError> {
    if !ids::is_valid_id(id) {
        return Err(AppError::NotFound);
    }
    store.get(id)
}

async fn deliver(
    state: AppState,
    id: String,
    mode: DeliveryMode,
    query: ShowQuery,
    headers: HeaderMap,
) -> Result<Response, HttpError> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok());
    let mode = mode.for_client(user_agent);

    let chosen_theme = normalize_optional(query.theme.as_deref())
        .filter(|theme| state.delivery.renderer().has_theme(theme))
        .map(str::to_string);
    let preferred_theme = chosen_theme
        .clone()
        .or_else(|| theme_from_cookies(&headers));

    let store = state.store.clone();
    let resolver = state.delivery.clone();
    let delivery = run_blocking(move || {
        let paste = fetch_live(&store, &id)?;
        Ok(
            match resolver.resolve(&paste, mode, preferred_theme.as_deref()) {
                Ok(delivery) => delivery,
                Err(err) => {
                    tracing::warn!(id = %paste.id, "Rendering failed, serving raw text: {}", err);
                    resolver.plain(&paste, Disposition::Inline)
                }
            },
        )
    })
    .await?;

    let mut response = delivery_response(delivery);
    if let Some(theme) = chosen_theme {
        if let Ok(value) = HeaderValue::from_str(&theme_cookie(&theme)) {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
    }
    Ok(response)
}

fn delivery_response(delivery: Delivery) -> Response {
    let mut response = (
        StatusCode::OK,
        [(header::CONTENT_TYPE, delivery.content_type)],
        delivery.body,
    )
        .into_response();
    if let Some(disposition) = delivery.content_disposition {
        match HeaderValue::from_str(&disposition) {
            Ok(value) => {
                response
                    .headers_mut()
                    .insert(header::CONTENT_DISPOSITION, value);
            }
            Err(err) => tracing::warn!("Dropping invalid Content-Disposition: {}", err),
        }
    }
    response
}
