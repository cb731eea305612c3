//! Paste storage operations backed by redb.

mod helpers;

use crate::{db::tables::*, error::AppError, models::paste::*};
use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable, ReadableTableMetadata};
use std::sync::Arc;

pub(crate) use self::helpers::{deserialize_paste, reverse_timestamp_key};

/// Accessor for paste-related redb tables.
pub struct PasteDb {
    db: Arc<redb::Database>,
}

impl PasteDb {
    /// Initialize paste tables if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(PASTES)?;
        write_txn.open_table(PASTES_BY_CREATED)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Insert a new paste row and its recency index row atomically.
    ///
    /// The existence check runs inside the write transaction, and redb admits a
    /// single writer at a time, so two inserts can never both claim one id.
    ///
    /// # Errors
    /// Returns [`AppError::IdConflict`] when the id already exists, or a
    /// storage/serialization error.
    pub fn create(&self, paste: &Paste) -> Result<(), AppError> {
        let encoded_paste = bincode::serialize(paste)?;
        let recency_key = reverse_timestamp_key(paste.created_at);

        let write_txn = self.db.begin_write()?;
        {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut created = write_txn.open_table(PASTES_BY_CREATED)?;

            if pastes.get(paste.id.as_str())?.is_some() {
                return Err(AppError::IdConflict(paste.id.clone()));
            }

            pastes.insert(paste.id.as_str(), encoded_paste.as_slice())?;
            created.insert((recency_key, paste.id.as_str()), ())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Fetch a paste by id without any expiration handling.
    ///
    /// # Returns
    /// `Ok(Some(paste))` when found, `Ok(None)` when missing.
    pub fn get(&self, id: &str) -> Result<Option<Paste>, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        match pastes.get(id)? {
            Some(value) => Ok(Some(deserialize_paste(value.value())?)),
            None => Ok(None),
        }
    }

    /// Whether a row exists for `id`, expired or not.
    pub fn contains(&self, id: &str) -> Result<bool, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        Ok(pastes.get(id)?.is_some())
    }

    /// Delete a paste and return the deleted row.
    ///
    /// # Returns
    /// `Ok(Some(paste))` when deleted, `Ok(None)` when already absent.
    pub fn delete_and_return(&self, id: &str) -> Result<Option<Paste>, AppError> {
        self.delete_matching(id, |_| true)
    }

    /// Delete a paste by id.
    ///
    /// # Returns
    /// `true` when a row was deleted, `false` when it was already gone.
    pub fn delete(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.delete_and_return(id)?.is_some())
    }

    /// Delete `id` only if it is expired at `now`, checked inside the write
    /// transaction.
    ///
    /// # Returns
    /// `true` when an expired row was removed.
    pub fn delete_if_expired(&self, id: &str, now: DateTime<Utc>) -> Result<bool, AppError> {
        Ok(self
            .delete_matching(id, |paste| crate::policy::is_expired(paste, now))?
            .is_some())
    }

    fn delete_matching<F>(&self, id: &str, should_delete: F) -> Result<Option<Paste>, AppError>
    where
        F: FnOnce(&Paste) -> bool,
    {
        let write_txn = self.db.begin_write()?;
        let deleted = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut created = write_txn.open_table(PASTES_BY_CREATED)?;

            let Some(old_guard) = pastes.get(id)? else {
                return Ok(None);
            };
            let paste = deserialize_paste(old_guard.value())?;
            drop(old_guard);
            if !should_delete(&paste) {
                return Ok(None);
            }

            let recency_key = reverse_timestamp_key(paste.created_at);
            let _ = created.remove((recency_key, id))?;
            let _ = pastes.remove(id)?;
            Some(paste)
        };

        write_txn.commit()?;
        Ok(deleted)
    }

    /// List public, unexpired pastes, newest first.
    ///
    /// Expired rows are skipped but not removed; removal belongs to the read
    /// path and [`PasteDb::purge_expired`].
    ///
    /// # Returns
    /// Up to `limit` rows in descending creation order.
    pub fn list_public(&self, limit: usize, now: DateTime<Utc>) -> Result<Vec<Paste>, AppError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let read_txn = self.db.begin_read()?;
        let created_table = read_txn.open_table(PASTES_BY_CREATED)?;
        let pastes_table = read_txn.open_table(PASTES)?;
        let mut pastes = Vec::new();

        for item in created_table.iter()? {
            let (key, _) = item?;
            let (_, paste_id) = key.value();
            let Some(paste_guard) = pastes_table.get(paste_id)? else {
                continue;
            };
            let paste = deserialize_paste(paste_guard.value())?;
            if !paste.is_public() || crate::policy::is_expired(&paste, now) {
                continue;
            }
            pastes.push(paste);
            if pastes.len() >= limit {
                break;
            }
        }

        Ok(pastes)
    }

    /// Remove every paste expired at `now` in a single transaction.
    ///
    /// # Returns
    /// Number of rows removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut created = write_txn.open_table(PASTES_BY_CREATED)?;

            let mut expired = Vec::new();
            for item in pastes.iter()? {
                let (_, value) = item?;
                let paste = deserialize_paste(value.value())?;
                if crate::policy::is_expired(&paste, now) {
                    expired.push((paste.id, reverse_timestamp_key(paste.created_at)));
                }
            }

            for (id, recency_key) in &expired {
                let _ = created.remove((*recency_key, id.as_str()))?;
                let _ = pastes.remove(id.as_str())?;
            }
            expired.len()
        };

        write_txn.commit()?;
        Ok(removed)
    }

    /// Number of stored rows, expired ones included.
    pub fn len(&self) -> Result<u64, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        Ok(pastes.len()?)
    }

    pub fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.len()? == 0)
    }
}
