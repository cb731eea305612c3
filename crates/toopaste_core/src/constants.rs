//! Shared constants used across Toopaste crates.

/// Default HTTP port for Toopaste.
pub const DEFAULT_PORT: u16 = 4567;

/// Default request body limit for the HTTP layer.
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Canonical plaintext language tag used for every language fallback.
pub const DEFAULT_PLAINTEXT_TAG: &str = "text.plain";
/// Display name for [`DEFAULT_PLAINTEXT_TAG`].
pub const DEFAULT_PLAINTEXT_NAME: &str = "Plain Text";
/// Extension used when the effective language has none.
pub const DEFAULT_FILE_EXTENSION: &str = "txt";

/// Prefix applied to every download filename.
pub const FILENAME_PREFIX: &str = "toopaste-";

/// Default syntect theme for rendered output.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Default page title shown by the web surface.
pub const DEFAULT_PAGE_TITLE: &str = "toopaste";

/// Default number of entries in the recent public pastes listing.
pub const DEFAULT_RECENT_PASTES_LIMIT: usize = 25;
/// Hard cap for listing requests.
pub const MAX_RECENT_PASTES_LIMIT: usize = 100;

/// Default admin password for destructive endpoints.
pub const DEFAULT_ADMIN_PASSWORD: &str = "changeme";
/// Username accepted by admin basic auth.
pub const ADMIN_USERNAME: &str = "admin";

/// Alphabet used for paste identifiers.
pub const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
/// Initial identifier length.
pub const ID_LENGTH: usize = 4;
/// Longest identifier the allocator escalates to.
pub const ID_MAX_LENGTH: usize = 8;
/// Collision retries per identifier length before escalating.
pub const ID_ATTEMPTS_PER_LENGTH: usize = 64;
