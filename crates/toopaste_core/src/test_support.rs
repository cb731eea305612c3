//! Shared test-only helpers for toopaste_core.

use crate::models::paste::{NewPaste, Visibility};
use crate::registry::{LanguageEntry, LanguageRegistry};
use crate::{Database, PasteStore};
use std::sync::Arc;
use tempfile::TempDir;

/// Small registry with a handful of grammars, independent of syntect bundles.
pub(crate) fn test_registry() -> LanguageRegistry {
    LanguageRegistry::from_entries([
        LanguageEntry::new("source.python", "Python", &["py"]),
        LanguageEntry::new("source.rust", "Rust", &["rs"]),
        LanguageEntry::new("source.makefile", "Makefile", &[]),
    ])
}

/// Creates a store over an isolated temporary database.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing files.
///
/// # Panics
/// Panics if temp-dir creation or database initialization fails.
pub(crate) fn setup_store() -> (PasteStore, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db = Database::new(db_path.to_str().expect("db path")).expect("db");
    (PasteStore::new(db, Arc::new(test_registry())), temp_dir)
}

/// Public, never-expiring plaintext paste input with the given body.
pub(crate) fn new_paste(body: &str) -> NewPaste {
    NewPaste {
        title: String::new(),
        language: "text.plain".to_string(),
        author: String::new(),
        visibility: Visibility::Public,
        body: body.to_string(),
        expires_at: None,
    }
}
