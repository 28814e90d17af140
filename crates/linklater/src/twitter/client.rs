//! Timeline access for the Twitter v1.1 REST API.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::oauth::{self, Nonce};
use super::types::{Post, RawStatus};
use crate::config::Credentials;
use crate::error::HarvestError;

const TWITTER_API_BASE: &str = "https://api.twitter.com";
const USER_TIMELINE_PATH: &str = "/1.1/statuses/user_timeline.json";

/// Source of an account's recent posts.
#[async_trait]
pub trait Timeline: Send + Sync {
    /// Fetch up to `count` recent posts for `handle`, newest first.
    async fn recent_posts(&self, handle: &str, count: u32) -> Result<Vec<Post>, HarvestError>;
}

/// Signed client for `statuses/user_timeline`.
pub struct TwitterTimeline {
    client: Client,
    credentials: Credentials,
    base_url: String,
}

impl TwitterTimeline {
    /// Create a client against the public API.
    pub fn new(credentials: Credentials) -> Result<Self, HarvestError> {
        Self::with_base_url(credentials, TWITTER_API_BASE)
    }

    /// Create a client against a different API base.
    pub fn with_base_url(
        credentials: Credentials,
        base_url: impl Into<String>,
    ) -> Result<Self, HarvestError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            credentials,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from environment credentials.
    pub fn from_env() -> Result<Self, HarvestError> {
        Self::new(Credentials::from_env()?)
    }
}

#[async_trait]
impl Timeline for TwitterTimeline {
    async fn recent_posts(&self, handle: &str, count: u32) -> Result<Vec<Post>, HarvestError> {
        let url = format!("{}{USER_TIMELINE_PATH}", self.base_url);
        let count = count.to_string();
        let params = [
            ("screen_name", handle),
            ("count", count.as_str()),
            ("tweet_mode", "extended"),
        ];

        let auth = oauth::authorization_header(
            &self.credentials,
            "GET",
            &url,
            &params,
            &Nonce::generate(),
        )?;

        tracing::debug!(handle, count = %count, "Fetching user timeline");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .header(reqwest::header::AUTHORIZATION, auth)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            tracing::error!(handle, status = status.as_u16(), "Timeline request rejected");
            return Err(HarvestError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let raw: Vec<RawStatus> = serde_json::from_slice(&bytes)?;

        let mut posts = Vec::with_capacity(raw.len());
        for status in raw {
            let id = status.id_str.clone();
            match status.into_post() {
                Some(post) => posts.push(post),
                None => tracing::warn!(id = %id, "Unparseable created_at, skipping post"),
            }
        }

        tracing::info!(handle, count = posts.len(), "Fetched timeline");
        Ok(posts)
    }
}
