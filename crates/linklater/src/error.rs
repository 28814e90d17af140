//! Error types for the link harvester.

use thiserror::Error;

/// Errors that abort a harvest.
///
/// Per-link resolution failures are not errors; they are reported through
/// [`crate::harvester::HarvestReport::skipped`].
#[derive(Debug, Error)]
pub enum HarvestError {
    /// The request was rejected before any network call
    #[error("Invalid harvest request: {0}")]
    InvalidRequest(String),

    /// HTTP transport failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The timeline API answered with a non-success status
    #[error("Timeline API error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// The timeline response could not be decoded
    #[error("Failed to decode timeline response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
