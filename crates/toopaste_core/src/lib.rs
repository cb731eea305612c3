//! Core domain library for Toopaste (config, storage, lifecycle policy, delivery).

/// Outbound announcement contract for newly created pastes.
pub mod announce;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Database access layer.
pub mod db;
/// Output resolution for rendered/raw/download requests.
pub mod delivery;
/// Application error types (storage/domain).
pub mod error;
/// Short identifier allocation.
pub mod ids;
/// Data models for requests and persistence.
pub mod models;
/// Lifecycle decisions: fallbacks, filenames, expiration.
pub mod policy;
/// Language registry built from renderer grammars.
pub mod registry;
/// Syntax renderer contract and syntect implementation.
pub mod render;
/// Paste record store (allocation + persistence + lazy expiration).
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use constants::{DEFAULT_PLAINTEXT_TAG, DEFAULT_PORT};
pub use db::Database;
pub use error::{AppError, FieldError};
pub use registry::LanguageRegistry;
pub use render::{RenderError, Renderer, SyntectRenderer};
pub use store::PasteStore;
