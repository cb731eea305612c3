//! Lifecycle decisions for paste records.
//!
//! Everything here is a pure function of its inputs. Request fields are parsed
//! by total functions into typed values or explicit field errors.

use crate::constants::{DEFAULT_FILE_EXTENSION, DEFAULT_PLAINTEXT_TAG, FILENAME_PREFIX};
use crate::error::{AppError, FieldError};
use crate::models::paste::{
    CreatePasteRequest, NewPaste, Paste, PasteSummary, PasteView, Visibility,
};
use crate::registry::LanguageRegistry;
use chrono::{DateTime, Duration, Utc};

/// Title to display: the stored title, or `#<id>` when it is empty.
pub fn effective_title(paste: &Paste) -> String {
    if paste.title.is_empty() {
        format!("#{}", paste.id)
    } else {
        paste.title.clone()
    }
}

/// Stored language if the registry knows it, otherwise the plaintext tag.
pub fn effective_language<'a>(paste: &'a Paste, registry: &LanguageRegistry) -> &'a str {
    if registry.is_supported(&paste.language) {
        paste.language.as_str()
    } else {
        DEFAULT_PLAINTEXT_TAG
    }
}

/// Normalize a requested language tag for storage.
///
/// Absent, blank, or unregistered input becomes [`DEFAULT_PLAINTEXT_TAG`].
pub fn normalize_language(input: Option<&str>, registry: &LanguageRegistry) -> String {
    input
        .map(str::trim)
        .filter(|tag| registry.is_supported(tag))
        .unwrap_or(DEFAULT_PLAINTEXT_TAG)
        .to_string()
}

/// Keep only `[A-Za-z0-9_.-]`.
pub fn sanitize_filename(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'))
        .collect()
}

/// Download filename: prefix + sanitized title + language extension (or `txt`).
pub fn effective_filename(paste: &Paste, registry: &LanguageRegistry) -> String {
    let safe_title = sanitize_filename(&effective_title(paste));
    let extension = registry
        .default_extension(effective_language(paste, registry))
        .unwrap_or(DEFAULT_FILE_EXTENSION);
    format!("{}{}.{}", FILENAME_PREFIX, safe_title, extension)
}

/// A paste is expired when `expires_at` is strictly before `now`.
pub fn is_expired(paste: &Paste, now: DateTime<Utc>) -> bool {
    paste.expires_at.is_some_and(|expires_at| expires_at < now)
}

/// Recognized expiration units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl ExpiryUnit {
    /// Parse a unit name; singular and plural forms are accepted.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "minute" | "minutes" => Some(Self::Minutes),
            "hour" | "hours" => Some(Self::Hours),
            "day" | "days" => Some(Self::Days),
            "week" | "weeks" => Some(Self::Weeks),
            _ => None,
        }
    }

    /// Duration of `magnitude` units, or `None` on overflow.
    pub fn duration(self, magnitude: i64) -> Option<Duration> {
        match self {
            Self::Minutes => Duration::try_minutes(magnitude),
            Self::Hours => Duration::try_hours(magnitude),
            Self::Days => Duration::try_days(magnitude),
            Self::Weeks => Duration::try_weeks(magnitude),
        }
    }
}

/// Parse the raw expiration fields into a magnitude and unit.
///
/// An absent or blank magnitude yields `Ok(None)`.
///
/// # Errors
/// Returns a [`FieldError`] when the magnitude is not a positive integer or
/// the unit is missing or unrecognized.
pub fn parse_expiry(
    magnitude: Option<&str>,
    unit: Option<&str>,
) -> Result<Option<(i64, ExpiryUnit)>, FieldError> {
    let Some(magnitude) = magnitude.map(str::trim).filter(|m| !m.is_empty()) else {
        return Ok(None);
    };
    let magnitude: i64 = magnitude
        .parse()
        .ok()
        .filter(|m| *m > 0)
        .ok_or_else(|| FieldError::new("expires_in", "must be a positive whole number"))?;
    let unit = unit
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| FieldError::new("expires_unit", "is required when expires_in is set"))?;
    let unit = ExpiryUnit::parse(unit).ok_or_else(|| {
        FieldError::new("expires_unit", "must be one of minutes, hours, days, weeks")
    })?;
    Ok(Some((magnitude, unit)))
}

/// Compute the deletion time for a create request.
///
/// # Errors
/// Returns a [`FieldError`] for anything [`parse_expiry`] rejects, or when the
/// deadline overflows.
pub fn delete_at(
    magnitude: Option<&str>,
    unit: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, FieldError> {
    let Some((magnitude, unit)) = parse_expiry(magnitude, unit)? else {
        return Ok(None);
    };
    unit.duration(magnitude)
        .and_then(|duration| now.checked_add_signed(duration))
        .map(Some)
        .ok_or_else(|| FieldError::new("expires_in", "is too large"))
}

/// Turn a loosely-typed create request into a validated [`NewPaste`].
///
/// # Errors
/// Returns [`AppError::Validation`] listing every invalid field.
pub fn normalize_create(
    req: &CreatePasteRequest,
    registry: &LanguageRegistry,
    now: DateTime<Utc>,
) -> Result<NewPaste, AppError> {
    let mut errors = Vec::new();

    if req.body.trim().is_empty() {
        errors.push(FieldError::new("body", "must not be empty"));
    }

    let magnitude = req.expires_in.as_ref().map(|value| value.as_text());
    let expires_at = match delete_at(magnitude.as_deref(), req.expires_unit.as_deref(), now) {
        Ok(expires_at) => expires_at,
        Err(err) => {
            errors.push(err);
            None
        }
    };

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    Ok(NewPaste {
        title: req.title.as_deref().map(str::trim).unwrap_or_default().to_string(),
        language: normalize_language(req.language.as_deref(), registry),
        author: req.author.as_deref().map(str::trim).unwrap_or_default().to_string(),
        visibility: Visibility::parse(req.visibility.as_deref()),
        body: req.body.clone(),
        expires_at,
    })
}

/// API view of a paste with fallbacks resolved.
pub fn view(paste: &Paste, registry: &LanguageRegistry) -> PasteView {
    let language = effective_language(paste, registry);
    PasteView {
        id: paste.id.clone(),
        title: effective_title(paste),
        language: language.to_string(),
        language_name: registry
            .display_name(language)
            .unwrap_or(language)
            .to_string(),
        filename: effective_filename(paste, registry),
        author: paste.author.clone(),
        visibility: paste.visibility,
        body: paste.body.clone(),
        expires_at: paste.expires_at,
        created_at: paste.created_at,
    }
}

/// Listing row for a paste.
pub fn summary(paste: &Paste, registry: &LanguageRegistry) -> PasteSummary {
    PasteSummary {
        id: paste.id.clone(),
        title: effective_title(paste),
        language: effective_language(paste, registry).to_string(),
        author: paste.author.clone(),
        created_at: paste.created_at,
        expires_at: paste.expires_at,
    }
}
