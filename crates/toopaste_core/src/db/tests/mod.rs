//! Database integration tests.

use super::*;
use crate::error::AppError;
use crate::models::paste::*;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

fn setup_test_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db = Database::new(db_path.to_str().unwrap()).unwrap();
    (db, temp_dir)
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
}

fn paste_at(id: &str, visibility: Visibility, created_at: DateTime<Utc>) -> Paste {
    NewPaste {
        title: format!("title-{}", id),
        language: "text.plain".to_string(),
        author: "tester".to_string(),
        visibility,
        body: format!("body of {}", id),
        expires_at: None,
    }
    .into_paste(id.to_string(), created_at)
}

mod basic_ops;
