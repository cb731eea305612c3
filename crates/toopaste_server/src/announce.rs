//! Webhook delivery for paste announcements.

use std::time::Duration;
use toopaste_core::announce::{Announcement, Announcer};

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);

/// Posts each announcement as JSON to a fixed URL in a background task.
///
/// The payload carries a chat-style `text` line alongside the raw fields, so
/// Slack-compatible incoming webhooks accept it as-is.
#[derive(Clone)]
pub struct WebhookAnnouncer {
    client: reqwest::Client,
    url: String,
}

impl WebhookAnnouncer {
    /// Build an announcer for `url`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .user_agent(concat!("toopaste/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn payload(announcement: &Announcement) -> serde_json::Value {
    serde_json::json!({
        "text": announcement.message(),
        "author": announcement.author,
        "title": announcement.title,
        "url": announcement.url,
    })
}

impl Announcer for WebhookAnnouncer {
    fn announce(&self, announcement: Announcement) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime available; dropping announcement");
            return;
        };
        let client = self.client.clone();
        let url = self.url.clone();
        runtime.spawn(async move {
            match client.post(&url).json(&payload(&announcement)).send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!("Announced {}", announcement.url);
                }
                Ok(response) => {
                    tracing::warn!(
                        "Announcement webhook returned {} for {}",
                        response.status(),
                        announcement.url
                    );
                }
                Err(err) => {
                    tracing::warn!("Announcement webhook failed: {}", err);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_message_and_fields() {
        let announcement = Announcement {
            author: "ann".to_string(),
            title: "notes".to_string(),
            url: "http://host/ab12".to_string(),
        };
        let value = payload(&announcement);
        assert_eq!(value["text"], "new toopaste snippet by ann: notes http://host/ab12");
        assert_eq!(value["url"], "http://host/ab12");
    }

    #[tokio::test]
    async fn unreachable_webhook_does_not_block_or_panic() {
        let announcer = WebhookAnnouncer::new("http://127.0.0.1:9/hook").expect("client");
        announcer.announce(Announcement {
            author: String::new(),
            title: String::new(),
            url: "http://host/ab12".to_string(),
        });
        assert_eq!(announcer.url(), "http://127.0.0.1:9/hook");
    }
}
