//! Helper functions shared by paste storage operations.

use crate::{error::AppError, models::paste::Paste};
use chrono::{DateTime, Utc};

pub(crate) fn reverse_timestamp_key(created_at: DateTime<Utc>) -> u64 {
    // Pre-epoch timestamps are clamped to keep ordering total without underflow.
    let micros = created_at.timestamp_micros().max(0) as u64;
    u64::MAX.saturating_sub(micros)
}

pub(crate) fn deserialize_paste(bytes: &[u8]) -> Result<Paste, AppError> {
    Ok(bincode::deserialize(bytes)?)
}
