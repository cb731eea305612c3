//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use toopaste_core::announce::{Announcement, Announcer};
use toopaste_server::{create_app, AppState, Config, Database};

pub(crate) const TEST_ADMIN_PASSWORD: &str = "hunter2";

/// Announcer that records every announcement for later inspection.
#[derive(Clone, Default)]
pub(crate) struct RecordingAnnouncer {
    sent: Arc<Mutex<Vec<Announcement>>>,
}

impl RecordingAnnouncer {
    pub(crate) fn sent(&self) -> Vec<Announcement> {
        self.sent.lock().expect("announcements lock").clone()
    }
}

impl Announcer for RecordingAnnouncer {
    fn announce(&self, announcement: Announcement) {
        self.sent
            .lock()
            .expect("announcements lock")
            .push(announcement);
    }
}

pub(crate) fn test_config(temp_dir: &TempDir) -> Config {
    let db_path = temp_dir.path().join("test.db");
    let mut config = Config::with_db_path(db_path.to_str().expect("db path"));
    config.admin_password = TEST_ADMIN_PASSWORD.to_string();
    config
}

pub(crate) fn test_state_for_config(config: Config) -> (AppState, RecordingAnnouncer) {
    let db = Database::new(config.db_path.as_str()).expect("open db");
    let announcer = RecordingAnnouncer::default();
    let state = AppState::with_announcer(config, db, Arc::new(announcer.clone()));
    (state, announcer)
}

pub(crate) fn test_server_for_state(state: AppState) -> TestServer {
    TestServer::new(create_app(state, false)).expect("server")
}

pub(crate) fn test_server_for_config(config: Config) -> (TestServer, RecordingAnnouncer) {
    let (state, announcer) = test_state_for_config(config);
    (test_server_for_state(state), announcer)
}

/// Server over an isolated temp database; keep the [`TempDir`] alive.
pub(crate) fn setup_test_server() -> (TestServer, TempDir, RecordingAnnouncer) {
    let temp_dir = TempDir::new().expect("temp dir");
    let config = test_config(&temp_dir);
    let (server, announcer) = test_server_for_config(config);
    (server, temp_dir, announcer)
}

pub(crate) fn basic_auth(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", user, password)))
}
