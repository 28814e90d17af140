//! Link records and deduplication.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::metadata::PageMetadata;
use crate::twitter::Post;

/// Base for constructed status permalinks.
pub const PERMALINK_BASE: &str = "https://twitter.com";

/// A resolved link ready for the draft template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Canonical URL after redirects. Unique within a harvest.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Text of the post that shared the link.
    pub tweet_text: String,
    /// Permalink to the crediting post.
    pub tweet_url: String,
    /// Original author, set only for reposts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tweeted_by: Option<String>,
}

impl LinkRecord {
    /// Build a record for a link resolved from `post`.
    ///
    /// Reposts are credited to the original author; everything else to `handle`.
    #[must_use]
    pub fn from_post(metadata: PageMetadata, post: &Post, handle: &str) -> Self {
        let (tweet_url, tweeted_by) = match &post.repost_of {
            Some(origin) => (
                status_url(&origin.handle, &origin.id),
                Some(origin.handle.clone()),
            ),
            None => (status_url(handle, &post.id), None),
        };

        Self {
            url: metadata.final_url,
            title: metadata.title,
            description: metadata.description,
            image: metadata.image,
            tweet_text: post.text.clone(),
            tweet_url,
            tweeted_by,
        }
    }
}

/// Build a status permalink.
#[must_use]
pub fn status_url(handle: &str, id: &str) -> String {
    format!("{PERMALINK_BASE}/{handle}/status/{id}")
}

/// Drop records whose `url` was already seen, keeping the first.
///
/// Returns the surviving records and the number discarded.
pub fn dedupe_links(links: Vec<LinkRecord>) -> (Vec<LinkRecord>, usize) {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(links.len());
    let mut duplicates = 0;

    for link in links {
        if seen.insert(link.url.clone()) {
            out.push(link);
        } else {
            tracing::info!(url = %link.url, "Duplicate link, skipping");
            duplicates += 1;
        }
    }

    (out, duplicates)
}
