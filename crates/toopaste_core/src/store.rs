//! Paste record store: id allocation, persistence, and lazy expiration.

use crate::db::Database;
use crate::error::AppError;
use crate::ids::IdAllocator;
use crate::models::paste::{NewPaste, Paste};
use crate::policy;
use crate::registry::LanguageRegistry;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Owns every paste record. Callers hand in normalized [`NewPaste`] values.
pub struct PasteStore {
    db: Database,
    registry: Arc<LanguageRegistry>,
    allocator: IdAllocator,
}

impl PasteStore {
    pub fn new(db: Database, registry: Arc<LanguageRegistry>) -> Self {
        Self {
            db,
            registry,
            allocator: IdAllocator::default(),
        }
    }

    /// Replace the identifier allocator.
    pub fn with_allocator(mut self, allocator: IdAllocator) -> Self {
        self.allocator = allocator;
        self
    }

    pub fn registry(&self) -> &Arc<LanguageRegistry> {
        &self.registry
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Persist a new paste under a freshly allocated id.
    ///
    /// # Errors
    /// [`AppError::Validation`] for an empty body,
    /// [`AppError::AllocationExhausted`] when no id could be claimed, or a
    /// storage error.
    pub fn create(&self, new_paste: NewPaste) -> Result<Paste, AppError> {
        self.create_at(new_paste, Utc::now())
    }

    /// [`PasteStore::create`] with an explicit creation time.
    pub fn create_at(&self, new_paste: NewPaste, now: DateTime<Utc>) -> Result<Paste, AppError> {
        if new_paste.body.trim().is_empty() {
            return Err(AppError::invalid("body", "must not be empty"));
        }

        let paste = self.allocator.allocate(|id| {
            // Cheap read first; the insert below re-checks under the write lock.
            if self.db.pastes.contains(&id)? {
                return Err(AppError::IdConflict(id));
            }
            let paste = new_paste.clone().into_paste(id, now);
            self.db.pastes.create(&paste)?;
            Ok(paste)
        })?;

        tracing::info!(
            id = %paste.id,
            language = %paste.language,
            visibility = paste.visibility.as_str(),
            "Created paste"
        );
        Ok(paste)
    }

    /// Fetch a live paste. Expired rows are deleted and reported as missing.
    ///
    /// # Errors
    /// [`AppError::NotFound`] when the id is unknown or expired.
    pub fn get(&self, id: &str) -> Result<Paste, AppError> {
        self.get_at(id, Utc::now())
    }

    /// [`PasteStore::get`] evaluated at `now`.
    pub fn get_at(&self, id: &str, now: DateTime<Utc>) -> Result<Paste, AppError> {
        let paste = self.db.pastes.get(id)?.ok_or(AppError::NotFound)?;
        if policy::is_expired(&paste, now) {
            if self.db.pastes.delete_if_expired(id, now)? {
                tracing::info!(id = %id, "Deleted expired paste on read");
            }
            return Err(AppError::NotFound);
        }
        Ok(paste)
    }

    /// Remove a paste. Absent ids are a no-op.
    ///
    /// # Returns
    /// `true` when a row was removed.
    pub fn delete(&self, id: &str) -> Result<bool, AppError> {
        let deleted = self.db.pastes.delete(id)?;
        if deleted {
            tracing::info!(id = %id, "Deleted paste");
        }
        Ok(deleted)
    }

    /// Public, unexpired pastes, newest first, at most `limit`.
    pub fn list_public(&self, limit: usize) -> Result<Vec<Paste>, AppError> {
        self.db.pastes.list_public(limit, Utc::now())
    }

    /// Remove every paste that has expired by now.
    pub fn purge_expired(&self) -> Result<usize, AppError> {
        self.purge_expired_at(Utc::now())
    }

    /// [`PasteStore::purge_expired`] evaluated at `now`.
    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let removed = self.db.pastes.purge_expired(now)?;
        if removed > 0 {
            tracing::info!("Purged {} expired paste(s)", removed);
        }
        Ok(removed)
    }
}
