//! Announcement side-channel for newly created pastes.
//!
//! Announcing is fire-and-forget: implementations must never block paste
//! creation or report failures back to it.

use crate::models::paste::Paste;
use serde::Serialize;

/// Notification payload for one new paste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Announcement {
    pub author: String,
    pub title: String,
    pub url: String,
}

impl Announcement {
    /// Build an announcement pointing at `<base_url>/<id>`.
    pub fn for_paste(paste: &Paste, base_url: &str) -> Self {
        Self {
            author: paste.author.clone(),
            title: paste.title.clone(),
            url: format!("{}/{}", base_url.trim_end_matches('/'), paste.id),
        }
    }

    /// One-line chat message, e.g. `new toopaste snippet by ann: notes https://host/ab12`.
    pub fn message(&self) -> String {
        let mut message = String::from("new toopaste snippet");
        if !self.author.is_empty() {
            message.push_str(" by ");
            message.push_str(&self.author);
        }
        if !self.title.is_empty() {
            message.push_str(": ");
            message.push_str(&self.title);
        }
        message.push(' ');
        message.push_str(&self.url);
        message
    }
}

/// Sink for [`Announcement`]s.
pub trait Announcer: Send + Sync {
    /// Dispatch without waiting for delivery.
    fn announce(&self, announcement: Announcement);
}

/// Announcer used when announcements are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAnnouncer;

impl Announcer for NoopAnnouncer {
    fn announce(&self, announcement: Announcement) {
        tracing::debug!("Announcements disabled; dropping '{}'", announcement.message());
    }
}
