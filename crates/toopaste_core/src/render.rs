//! Syntax renderer contract and the syntect-backed implementation.

use crate::constants::DEFAULT_PLAINTEXT_TAG;
use crate::registry::LanguageRegistry;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{Scope, SyntaxReference, SyntaxSet};
use thiserror::Error;

/// Failure reported by a [`Renderer`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Unsupported grammar: {0}")]
    UnsupportedGrammar(String),

    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    #[error("Render failed: {0}")]
    Internal(String),
}

/// Turns source text into styled markup for a language tag and theme.
///
/// Output is opaque to callers and must be passed through unmodified.
pub trait Renderer: Send + Sync {
    /// Render `source` using the grammar for `language` and the named theme.
    ///
    /// # Errors
    /// Returns [`RenderError`] when the grammar or theme is unavailable or the
    /// highlighter fails.
    fn render(&self, source: &str, language: &str, theme: &str) -> Result<String, RenderError>;

    /// Names of the themes this renderer accepts.
    fn themes(&self) -> Vec<String>;

    /// Whether `theme` is accepted by [`Renderer::render`].
    fn has_theme(&self, theme: &str) -> bool {
        self.themes().iter().any(|name| name == theme)
    }
}

/// Renderer backed by syntect's bundled grammars and themes, emitting HTML.
pub struct SyntectRenderer {
    syntaxes: SyntaxSet,
    themes: ThemeSet,
}

impl Default for SyntectRenderer {
    fn default() -> Self {
        Self::load_defaults()
    }
}

impl SyntectRenderer {
    /// Load the default syntect grammar and theme bundles.
    pub fn load_defaults() -> Self {
        Self::new(SyntaxSet::load_defaults_newlines(), ThemeSet::load_defaults())
    }

    pub fn new(syntaxes: SyntaxSet, themes: ThemeSet) -> Self {
        Self { syntaxes, themes }
    }

    /// Grammar set used by this renderer.
    pub fn syntax_set(&self) -> &SyntaxSet {
        &self.syntaxes
    }

    /// Build the language registry matching this renderer's grammars.
    pub fn registry(&self) -> LanguageRegistry {
        LanguageRegistry::from_syntax_set(&self.syntaxes)
    }

    fn resolve_syntax(&self, language: &str) -> Result<&SyntaxReference, RenderError> {
        if language == DEFAULT_PLAINTEXT_TAG {
            return Ok(self.syntaxes.find_syntax_plain_text());
        }
        let scope = Scope::new(language)
            .map_err(|_| RenderError::UnsupportedGrammar(language.to_string()))?;
        self.syntaxes
            .find_syntax_by_scope(scope)
            .ok_or_else(|| RenderError::UnsupportedGrammar(language.to_string()))
    }
}

impl Renderer for SyntectRenderer {
    fn render(&self, source: &str, language: &str, theme: &str) -> Result<String, RenderError> {
        let syntax = self.resolve_syntax(language)?;
        let theme_ref = self
            .themes
            .themes
            .get(theme)
            .ok_or_else(|| RenderError::UnknownTheme(theme.to_string()))?;
        highlighted_html_for_string(source, &self.syntaxes, syntax, theme_ref)
            .map_err(|err| RenderError::Internal(err.to_string()))
    }

    fn themes(&self) -> Vec<String> {
        self.themes.themes.keys().cloned().collect()
    }

    fn has_theme(&self, theme: &str) -> bool {
        self.themes.themes.contains_key(theme)
    }
}
