//! Data models shared by storage, policy, and the HTTP layer.

/// Paste records, request payloads, and response views.
pub mod paste;

#[cfg(test)]
mod tests;
