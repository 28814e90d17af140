//! Harvester configuration and API credentials.

use std::time::Duration;

use crate::error::HarvestError;

/// Default account whose timeline is harvested.
pub const DEFAULT_HANDLE: &str = "lookatthisstory";

/// Default recency window in days.
pub const DEFAULT_MAX_AGE_DAYS: u32 = 10;

/// Default number of posts requested from the timeline.
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// Default number of metadata fetches in flight.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// How posts older than the window are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgeCutoff {
    /// Test every returned post against the window.
    #[default]
    Filter,
    /// End the scan at the first stale post. Only correct when the timeline
    /// is strictly newest-first.
    StopAtFirstStale,
}

/// Configuration for a [`crate::Harvester`].
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Posts requested per harvest.
    pub page_size: u32,
    /// Metadata fetches in flight at once.
    pub concurrency: usize,
    /// Timeout for each metadata fetch.
    pub timeout: Duration,
    /// Age cutoff policy.
    pub age_cutoff: AgeCutoff,
    /// Display-url prefix of photo shortlinks, which are never resolved.
    pub photo_prefix: String,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(30),
            age_cutoff: AgeCutoff::default(),
            photo_prefix: "pic.twitter.com".to_string(),
        }
    }
}

/// OAuth 1.0a credentials for the Twitter API.
#[derive(Clone)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token: String,
    pub token_secret: String,
}

impl Credentials {
    /// Load credentials from environment variables.
    ///
    /// # Required Environment Variables
    /// - `TWITTER_API_CONSUMER_KEY`
    /// - `TWITTER_API_CONSUMER_SECRET`
    /// - `TWITTER_API_OAUTH_TOKEN`
    /// - `TWITTER_API_OAUTH_SECRET`
    pub fn from_env() -> Result<Self, HarvestError> {
        Ok(Self {
            consumer_key: require_env("TWITTER_API_CONSUMER_KEY")?,
            consumer_secret: require_env("TWITTER_API_CONSUMER_SECRET")?,
            token: require_env("TWITTER_API_OAUTH_TOKEN")?,
            token_secret: require_env("TWITTER_API_OAUTH_SECRET")?,
        })
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("token", &"<redacted>")
            .field("token_secret", &"<redacted>")
            .finish()
    }
}

fn require_env(name: &str) -> Result<String, HarvestError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| HarvestError::Config(format!("{name} not set")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HarvestConfig::default();
        assert_eq!(config.page_size, 30);
        assert_eq!(config.age_cutoff, AgeCutoff::Filter);
        assert_eq!(config.photo_prefix, "pic.twitter.com");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials {
            consumer_key: "key".to_string(),
            consumer_secret: "s3cret".to_string(),
            token: "tok".to_string(),
            token_secret: "tok-s3cret".to_string(),
        };
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("key"));
        assert!(!rendered.contains("s3cret"));
    }
}
