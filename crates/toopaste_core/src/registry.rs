//! Read-only language table built once from the renderer's grammar set.
//!
//! Tags are TextMate top-level scopes (`source.python`, `text.html.basic`).

use crate::constants::{DEFAULT_FILE_EXTENSION, DEFAULT_PLAINTEXT_NAME, DEFAULT_PLAINTEXT_TAG};
use crate::error::AppError;
use serde::Serialize;
use std::collections::BTreeMap;
use syntect::parsing::SyntaxSet;

/// One grammar known to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageEntry {
    pub tag: String,
    pub name: String,
    /// Conventional file extensions, most common first.
    pub extensions: Vec<String>,
}

impl LanguageEntry {
    pub fn new(tag: impl Into<String>, name: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            tag: tag.into(),
            name: name.into(),
            extensions: extensions.iter().map(|ext| ext.to_string()).collect(),
        }
    }
}

/// Immutable tag -> display metadata table.
///
/// Always contains [`DEFAULT_PLAINTEXT_TAG`].
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    entries: BTreeMap<String, LanguageEntry>,
}

impl LanguageRegistry {
    /// Build a registry from explicit entries. The first entry for a tag wins.
    pub fn from_entries(entries: impl IntoIterator<Item = LanguageEntry>) -> Self {
        let mut table = BTreeMap::new();
        for entry in entries {
            if entry.tag.trim().is_empty() {
                continue;
            }
            table.entry(entry.tag.clone()).or_insert(entry);
        }
        table
            .entry(DEFAULT_PLAINTEXT_TAG.to_string())
            .or_insert_with(|| {
                LanguageEntry::new(
                    DEFAULT_PLAINTEXT_TAG,
                    DEFAULT_PLAINTEXT_NAME,
                    &[DEFAULT_FILE_EXTENSION],
                )
            });
        Self { entries: table }
    }

    /// Build a registry from every grammar in a syntect syntax set.
    pub fn from_syntax_set(syntaxes: &SyntaxSet) -> Self {
        let registry = Self::from_entries(syntaxes.syntaxes().iter().map(|syntax| LanguageEntry {
            tag: syntax.scope.build_string(),
            name: syntax.name.clone(),
            extensions: syntax.file_extensions.clone(),
        }));
        tracing::debug!("Language registry loaded {} grammars", registry.len());
        registry
    }

    pub fn is_supported(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    /// Human-readable name for `tag`.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] when `tag` is not registered.
    pub fn display_name(&self, tag: &str) -> Result<&str, AppError> {
        self.entries
            .get(tag)
            .map(|entry| entry.name.as_str())
            .ok_or(AppError::NotFound)
    }

    /// First conventional extension for `tag`, if any.
    pub fn default_extension(&self, tag: &str) -> Option<&str> {
        self.entries
            .get(tag)
            .and_then(|entry| entry.extensions.first())
            .map(String::as_str)
    }

    pub fn get(&self, tag: &str) -> Option<&LanguageEntry> {
        self.entries.get(tag)
    }

    /// All entries ordered by tag.
    pub fn entries(&self) -> impl Iterator<Item = &LanguageEntry> {
        self.entries.values()
    }

    /// Entries for the given tags, in the given order, skipping unknown tags.
    pub fn select<'a>(&'a self, tags: &'a [String]) -> impl Iterator<Item = &'a LanguageEntry> {
        tags.iter().filter_map(|tag| self.entries.get(tag.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
