//! Request-level normalization: limits, theme cookies, and announcement URLs.

use axum::http::{header, HeaderMap};
use toopaste_core::constants::MAX_RECENT_PASTES_LIMIT;

/// Cookie remembering the caller's last chosen theme.
pub(crate) const THEME_COOKIE: &str = "toopaste_theme";
const THEME_COOKIE_MAX_AGE_SECS: u64 = 365 * 24 * 60 * 60;

/// Listing limit from the query, defaulted and capped.
pub(super) fn normalized_limit(limit: Option<usize>, default: usize) -> usize {
    limit
        .unwrap_or(default)
        .clamp(1, MAX_RECENT_PASTES_LIMIT)
}

/// Trimmed optional string, with empty values treated as absent.
pub(super) fn normalize_optional(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

// Theme names may contain spaces ("Solarized (dark)"), which cookie values
// cannot carry. No bundled theme name contains '+'.
fn encode_cookie_value(value: &str) -> String {
    value.replace(' ', "+")
}

fn decode_cookie_value(value: &str) -> String {
    value.replace('+', " ")
}

/// `Set-Cookie` value persisting `theme`.
pub(super) fn theme_cookie(theme: &str) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax",
        THEME_COOKIE,
        encode_cookie_value(theme),
        THEME_COOKIE_MAX_AGE_SECS
    )
}

/// Theme stored in the request's cookie, if any.
pub(super) fn theme_from_cookies(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == THEME_COOKIE)
        .map(|(_, value)| decode_cookie_value(value.trim_matches('"')))
        .filter(|value| !value.is_empty())
}

/// Base URL used in announcement links.
///
/// `configured` wins; otherwise it is derived from the request's `Host` and
/// `X-Forwarded-Proto` headers.
pub(super) fn request_base_url(configured: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(base) = configured {
        return base.trim_end_matches('/').to_string();
    }
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("http");
    format!("{}://{}", scheme, host)
}
