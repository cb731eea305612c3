//! Maps a stored paste and a request mode to the bytes and headers to return.

use crate::models::paste::Paste;
use crate::policy;
use crate::registry::LanguageRegistry;
use crate::render::{RenderError, Renderer};
use std::sync::Arc;

/// Content type for raw and download responses.
pub const PLAIN_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
/// Content type for rendered responses.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// User-agent prefixes of clients that always get raw output.
const NON_INTERACTIVE_AGENTS: &[&str] = &["curl/", "Wget/"];

/// How a paste should be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    Rendered,
    Raw,
    Download,
}

impl DeliveryMode {
    /// Mode named by a route prefix (`raw`, `download`); anything else renders.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("raw") => Self::Raw,
            Some("download") => Self::Download,
            _ => Self::Rendered,
        }
    }

    /// Switch rendered requests from non-interactive clients to raw.
    pub fn for_client(self, user_agent: Option<&str>) -> Self {
        if self == Self::Rendered && is_non_interactive_client(user_agent) {
            Self::Raw
        } else {
            self
        }
    }
}

/// Whether the user agent belongs to a command-line HTTP client.
pub fn is_non_interactive_client(user_agent: Option<&str>) -> bool {
    user_agent.is_some_and(|agent| {
        NON_INTERACTIVE_AGENTS
            .iter()
            .any(|prefix| agent.starts_with(prefix))
    })
}

/// `Content-Disposition` kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Inline,
    Attachment,
}

impl Disposition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Attachment => "attachment",
        }
    }

    /// Full header value, e.g. `attachment; filename="toopaste-x.py"`.
    pub fn header_value(self, filename: &str) -> String {
        format!("{}; filename=\"{}\"", self.as_str(), filename)
    }
}

/// Resolved response for one paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub mode: DeliveryMode,
    pub content_type: &'static str,
    pub content_disposition: Option<String>,
    pub body: String,
    /// Effective paste title, for page titles.
    pub title: String,
    /// Theme used for rendered output.
    pub theme: Option<String>,
}

/// Produces [`Delivery`] values using the registry and an external renderer.
#[derive(Clone)]
pub struct DeliveryResolver {
    registry: Arc<LanguageRegistry>,
    renderer: Arc<dyn Renderer>,
    default_theme: String,
}

impl DeliveryResolver {
    pub fn new(
        registry: Arc<LanguageRegistry>,
        renderer: Arc<dyn Renderer>,
        default_theme: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            renderer,
            default_theme: default_theme.into(),
        }
    }

    pub fn renderer(&self) -> &Arc<dyn Renderer> {
        &self.renderer
    }

    pub fn default_theme(&self) -> &str {
        &self.default_theme
    }

    /// The caller's theme when the renderer knows it, else the default.
    pub fn select_theme<'a>(&'a self, preferred: Option<&'a str>) -> &'a str {
        preferred
            .filter(|theme| self.renderer.has_theme(theme))
            .unwrap_or(self.default_theme.as_str())
    }

    /// Resolve `paste` for `mode`.
    ///
    /// # Errors
    /// Returns the renderer's [`RenderError`] for rendered mode. Raw and
    /// download modes never fail.
    pub fn resolve(
        &self,
        paste: &Paste,
        mode: DeliveryMode,
        preferred_theme: Option<&str>,
    ) -> Result<Delivery, RenderError> {
        match mode {
            DeliveryMode::Raw => Ok(self.plain(paste, Disposition::Inline)),
            DeliveryMode::Download => Ok(self.plain(paste, Disposition::Attachment)),
            DeliveryMode::Rendered => {
                let theme = self.select_theme(preferred_theme);
                let language = policy::effective_language(paste, &self.registry);
                let markup = self.renderer.render(&paste.body, language, theme)?;
                Ok(Delivery {
                    mode,
                    content_type: HTML_CONTENT_TYPE,
                    content_disposition: None,
                    body: markup,
                    title: policy::effective_title(paste),
                    theme: Some(theme.to_string()),
                })
            }
        }
    }

    /// Unmodified body as `text/plain` with the given disposition.
    pub fn plain(&self, paste: &Paste, disposition: Disposition) -> Delivery {
        let filename = policy::effective_filename(paste, &self.registry);
        Delivery {
            mode: match disposition {
                Disposition::Inline => DeliveryMode::Raw,
                Disposition::Attachment => DeliveryMode::Download,
            },
            content_type: PLAIN_CONTENT_TYPE,
            content_disposition: Some(disposition.header_value(&filename)),
            body: paste.body.clone(),
            title: policy::effective_title(paste),
            theme: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::paste::{NewPaste, Visibility};
    use crate::registry::LanguageEntry;
    use chrono::Utc;

    /// Echoes inputs so tests can see what the resolver passed along.
    struct EchoRenderer;

    impl Renderer for EchoRenderer {
        fn render(&self, source: &str, language: &str, theme: &str) -> Result<String, RenderError> {
            Ok(format!("<{}|{}>{}", language, theme, source))
        }

        fn themes(&self) -> Vec<String> {
            vec!["light".to_string(), "dark".to_string()]
        }
    }

    struct BrokenRenderer;

    impl Renderer for BrokenRenderer {
        fn render(&self, _: &str, language: &str, _: &str) -> Result<String, RenderError> {
            Err(RenderError::UnsupportedGrammar(language.to_string()))
        }

        fn themes(&self) -> Vec<String> {
            vec!["light".to_string()]
        }
    }

    fn resolver(renderer: Arc<dyn Renderer>) -> DeliveryResolver {
        let registry = LanguageRegistry::from_entries([LanguageEntry::new(
            "source.python",
            "Python",
            &["py"],
        )]);
        DeliveryResolver::new(Arc::new(registry), renderer, "light")
    }

    fn paste(title: &str, language: &str) -> Paste {
        NewPaste {
            title: title.to_string(),
            language: language.to_string(),
            author: String::new(),
            visibility: Visibility::Public,
            body: "print('hi')\n".to_string(),
            expires_at: None,
        }
        .into_paste("ab12".to_string(), Utc::now())
    }

    #[test]
    fn raw_and_download_return_body_with_disposition() {
        let resolver = resolver(Arc::new(EchoRenderer));
        let record = paste("My Script!", "source.python");

        let raw = resolver
            .resolve(&record, DeliveryMode::Raw, None)
            .expect("raw");
        assert_eq!(raw.body, record.body);
        assert_eq!(raw.content_type, PLAIN_CONTENT_TYPE);
        assert_eq!(
            raw.content_disposition.as_deref(),
            Some("inline; filename=\"toopaste-MyScript.py\"")
        );

        let download = resolver
            .resolve(&record, DeliveryMode::Download, None)
            .expect("download");
        assert_eq!(
            download.content_disposition.as_deref(),
            Some("attachment; filename=\"toopaste-MyScript.py\"")
        );
    }

    #[test]
    fn rendered_passes_effective_language_and_theme() {
        let resolver = resolver(Arc::new(EchoRenderer));
        let record = paste("", "source.cobol");

        let rendered = resolver
            .resolve(&record, DeliveryMode::Rendered, Some("dark"))
            .expect("rendered");
        assert_eq!(rendered.body, "<text.plain|dark>print('hi')\n");
        assert_eq!(rendered.content_type, HTML_CONTENT_TYPE);
        assert_eq!(rendered.title, "#ab12");
        assert!(rendered.content_disposition.is_none());

        let defaulted = resolver
            .resolve(&record, DeliveryMode::Rendered, Some("neon"))
            .expect("rendered");
        assert_eq!(defaulted.theme.as_deref(), Some("light"));
    }

    #[test]
    fn render_failure_is_surfaced_not_swallowed() {
        let resolver = resolver(Arc::new(BrokenRenderer));
        let record = paste("", "source.python");
        let err = resolver
            .resolve(&record, DeliveryMode::Rendered, None)
            .expect_err("renderer fails");
        assert_eq!(err, RenderError::UnsupportedGrammar("source.python".to_string()));

        let fallback = resolver.plain(&record, Disposition::Inline);
        assert_eq!(fallback.mode, DeliveryMode::Raw);
        assert_eq!(fallback.body, record.body);
    }

    #[test]
    fn command_line_clients_get_raw_output() {
        assert_eq!(
            DeliveryMode::Rendered.for_client(Some("curl/8.4.0")),
            DeliveryMode::Raw
        );
        assert_eq!(
            DeliveryMode::Rendered.for_client(Some("Wget/1.21")),
            DeliveryMode::Raw
        );
        assert_eq!(
            DeliveryMode::Rendered.for_client(Some("Mozilla/5.0")),
            DeliveryMode::Rendered
        );
        assert_eq!(
            DeliveryMode::Download.for_client(Some("curl/8.4.0")),
            DeliveryMode::Download
        );
        assert_eq!(DeliveryMode::Rendered.for_client(None), DeliveryMode::Rendered);
    }

    #[test]
    fn mode_parse_defaults_to_rendered() {
        assert_eq!(DeliveryMode::parse(Some("raw")), DeliveryMode::Raw);
        assert_eq!(DeliveryMode::parse(Some("download")), DeliveryMode::Download);
        assert_eq!(DeliveryMode::parse(Some("other")), DeliveryMode::Rendered);
        assert_eq!(DeliveryMode::parse(None), DeliveryMode::Rendered);
    }
}
