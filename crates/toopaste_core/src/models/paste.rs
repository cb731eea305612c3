//! Paste records and the loosely-typed payloads that create them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a paste appears in the recent pastes listing.
///
/// Visibility never gates direct fetch by id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    /// Parse request input. Absent or unrecognized values map to [`Visibility::Public`].
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("private") => Self::Private,
            _ => Self::Public,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

/// Paste record stored in the database.
///
/// Records are immutable once stored; `updated_at` always equals `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paste {
    pub id: String,
    pub title: String,
    pub language: String,
    pub author: String,
    pub visibility: Visibility,
    pub body: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Paste {
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// Normalized creation input. Every field has already passed policy checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaste {
    pub title: String,
    pub language: String,
    pub author: String,
    pub visibility: Visibility,
    pub body: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewPaste {
    /// Stamp this input with an identifier and creation time.
    pub fn into_paste(self, id: String, now: DateTime<Utc>) -> Paste {
        Paste {
            id,
            title: self.title,
            language: self.language,
            author: self.author,
            visibility: self.visibility,
            body: self.body,
            expires_at: self.expires_at,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A request value that may arrive as a JSON bool/number or as form text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseValue {
    Bool(bool),
    Number(i64),
    Text(String),
}

impl LooseValue {
    /// Text form of the value, trimmed.
    pub fn as_text(&self) -> String {
        match self {
            Self::Bool(value) => value.to_string(),
            Self::Number(value) => value.to_string(),
            Self::Text(value) => value.trim().to_string(),
        }
    }

    /// Checkbox/flag semantics: `true`, `1`, `on`, `yes` are set.
    pub fn is_set(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Number(value) => *value != 0,
            Self::Text(value) => matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            ),
        }
    }
}

/// Request payload for creating a paste, accepted from JSON or HTML forms.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePasteRequest {
    #[serde(default)]
    pub body: String,
    pub title: Option<String>,
    pub language: Option<String>,
    pub author: Option<String>,
    pub visibility: Option<String>,
    /// Expiration magnitude; empty or absent means never.
    pub expires_in: Option<LooseValue>,
    /// One of `minutes`, `hours`, `days`, `weeks` (singular accepted).
    pub expires_unit: Option<String>,
    /// Request an announcement for this paste.
    pub announce: Option<LooseValue>,
}

impl CreatePasteRequest {
    pub fn wants_announcement(&self) -> bool {
        self.announce.as_ref().is_some_and(LooseValue::is_set)
    }
}

/// Query parameters for listing recent public pastes.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

/// Paste as returned by the API, with display fallbacks resolved.
#[derive(Debug, Clone, Serialize)]
pub struct PasteView {
    pub id: String,
    pub title: String,
    pub language: String,
    pub language_name: String,
    pub filename: String,
    pub author: String,
    pub visibility: Visibility,
    pub body: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Listing row without the body.
#[derive(Debug, Clone, Serialize)]
pub struct PasteSummary {
    pub id: String,
    pub title: String,
    pub language: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}
