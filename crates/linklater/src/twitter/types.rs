//! Twitter data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp format used by the v1.1 API, e.g. `Wed Oct 10 20:19:24 +0000 2018`.
const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// A post from an account's timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Status ID.
    pub id: String,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
    /// Raw post text.
    pub text: String,
    /// Origin of a repost, if this post re-shares another.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repost_of: Option<RepostOrigin>,
    /// Embedded URL entities.
    #[serde(default)]
    pub urls: Vec<UrlEntity>,
}

impl Post {
    /// Create a post without links or repost origin.
    #[must_use]
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at,
            text: text.into(),
            repost_of: None,
            urls: Vec::new(),
        }
    }

    /// Attach a URL entity.
    #[must_use]
    pub fn with_url(mut self, display_url: impl Into<String>, expanded_url: impl Into<String>) -> Self {
        self.urls.push(UrlEntity {
            display_url: display_url.into(),
            expanded_url: expanded_url.into(),
        });
        self
    }

    /// Mark the post as a repost of another author's status.
    #[must_use]
    pub fn reposted_from(mut self, handle: impl Into<String>, id: impl Into<String>) -> Self {
        self.repost_of = Some(RepostOrigin {
            handle: handle.into(),
            id: id.into(),
        });
        self
    }

    /// Whole days elapsed between creation and `now`, rounded down.
    #[must_use]
    pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_days()
    }
}

/// The original status behind a repost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepostOrigin {
    /// Original author handle (without @).
    pub handle: String,
    /// Original status ID.
    pub id: String,
}

/// A link embedded in a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEntity {
    /// Shortened display form, e.g. `example.com/a…` or `pic.twitter.com/x`.
    pub display_url: String,
    /// Expanded destination.
    pub expanded_url: String,
}

/// Status as returned by `statuses/user_timeline`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawStatus {
    pub id_str: String,
    pub created_at: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub full_text: Option<String>,
    #[serde(default)]
    pub entities: RawEntities,
    #[serde(default)]
    pub retweeted_status: Option<Box<RawRetweeted>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawEntities {
    #[serde(default)]
    pub urls: Vec<RawUrl>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawUrl {
    #[serde(default)]
    pub display_url: Option<String>,
    #[serde(default)]
    pub expanded_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRetweeted {
    pub id_str: String,
    pub user: RawUser,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawUser {
    pub screen_name: String,
}

impl RawStatus {
    /// Convert into a [`Post`]. Returns `None` if the timestamp is unparseable.
    pub(crate) fn into_post(self) -> Option<Post> {
        let created_at = parse_created_at(&self.created_at)?;

        let urls = self
            .entities
            .urls
            .into_iter()
            .filter_map(|u| {
                let expanded_url = u.expanded_url?;
                Some(UrlEntity {
                    display_url: u.display_url.unwrap_or_default(),
                    expanded_url,
                })
            })
            .collect();

        Some(Post {
            id: self.id_str,
            created_at,
            text: self.full_text.or(self.text).unwrap_or_default(),
            repost_of: self.retweeted_status.map(|rt| RepostOrigin {
                handle: rt.user.screen_name,
                id: rt.id_str,
            }),
            urls,
        })
    }
}

/// Parse a v1.1 `created_at` timestamp.
pub fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw, CREATED_AT_FORMAT)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_parse_created_at() {
        let parsed = parse_created_at("Wed Oct 10 20:19:24 +0000 2018").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2018, 10, 10, 20, 19, 24).unwrap());
        assert!(parse_created_at("2018-10-10T20:19:24Z").is_none());
    }

    #[test]
    fn test_age_days_floors() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let post = Post::new("1", now - Duration::hours(47), "hi");
        assert_eq!(post.age_days(now), 1);

        let post = Post::new("2", now - Duration::days(7), "hi");
        assert_eq!(post.age_days(now), 7);
    }

    #[test]
    fn test_raw_status_retweet() {
        let raw: RawStatus = serde_json::from_value(serde_json::json!({
            "id_str": "100",
            "created_at": "Sun Mar 10 12:00:00 +0000 2024",
            "full_text": "RT @orig: read this",
            "entities": {
                "urls": [
                    { "url": "https://t.co/x", "display_url": "example.com/a", "expanded_url": "https://example.com/a" },
                    { "url": "https://t.co/y", "display_url": "broken" }
                ]
            },
            "retweeted_status": { "id_str": "42", "user": { "screen_name": "orig" } }
        }))
        .unwrap();

        let post = raw.into_post().unwrap();
        assert_eq!(post.text, "RT @orig: read this");
        assert_eq!(post.urls.len(), 1);
        assert_eq!(
            post.repost_of,
            Some(RepostOrigin {
                handle: "orig".to_string(),
                id: "42".to_string()
            })
        );
    }
}
