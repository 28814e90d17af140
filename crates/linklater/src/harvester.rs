//! Link harvester - fetch posts, window by age, resolve links, dedupe.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;

use crate::config::{AgeCutoff, HarvestConfig};
use crate::enrichment::{dedupe_links, LinkRecord, MetadataFetcher, SkipReason};
use crate::error::HarvestError;
use crate::twitter::{Post, Timeline};

/// Parameters for a single harvest.
#[derive(Debug, Clone)]
pub struct HarvestRequest {
    /// Account handle, with or without a leading @.
    pub handle: String,
    /// Maximum post age in whole days (inclusive).
    pub max_age_days: u32,
    /// Reference time for age comparisons.
    pub now: DateTime<Utc>,
}

impl HarvestRequest {
    /// Request relative to the current time.
    #[must_use]
    pub fn new(handle: impl Into<String>, max_age_days: u32) -> Self {
        Self {
            handle: handle.into(),
            max_age_days,
            now: Utc::now(),
        }
    }

    /// Override the reference time.
    #[must_use]
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    fn normalized_handle(&self) -> Result<String, HarvestError> {
        let handle = self.handle.trim().trim_start_matches('@');
        if handle.is_empty() {
            return Err(HarvestError::InvalidRequest(
                "account handle must not be empty".to_string(),
            ));
        }
        if self.max_age_days == 0 {
            return Err(HarvestError::InvalidRequest(
                "max_age_days must be positive".to_string(),
            ));
        }
        Ok(handle.to_string())
    }
}

/// A link that produced no record.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedLink {
    pub url: String,
    pub reason: SkipReason,
}

/// Outcome of a harvest.
#[derive(Debug, Default, Serialize)]
pub struct HarvestReport {
    /// Handle the harvest ran for, without a leading @.
    pub handle: String,
    /// Deduplicated records in first-seen order.
    pub links: Vec<LinkRecord>,
    /// Links that failed to resolve.
    pub skipped: Vec<SkippedLink>,
    /// Records discarded as duplicates.
    pub duplicates: usize,
    /// Posts returned by the timeline.
    pub posts_fetched: usize,
    /// Posts inside the age window.
    pub posts_in_window: usize,
}

/// Harvests recently shared links from an account timeline.
pub struct Harvester {
    timeline: Arc<dyn Timeline>,
    fetcher: MetadataFetcher,
    config: HarvestConfig,
}

impl Harvester {
    /// Create a harvester over the given timeline source.
    pub fn new(timeline: Arc<dyn Timeline>, config: HarvestConfig) -> Result<Self, HarvestError> {
        let fetcher = MetadataFetcher::new(config.timeout)?;
        Ok(Self {
            timeline,
            fetcher,
            config,
        })
    }

    /// Harvest links shared by `handle` in the last `max_age_days` days.
    pub async fn fetch_links(
        &self,
        handle: &str,
        max_age_days: u32,
    ) -> Result<Vec<LinkRecord>, HarvestError> {
        let report = self
            .harvest(&HarvestRequest::new(handle, max_age_days))
            .await?;
        Ok(report.links)
    }

    /// Run a harvest and report what was kept and skipped.
    pub async fn harvest(&self, request: &HarvestRequest) -> Result<HarvestReport, HarvestError> {
        let handle = request.normalized_handle()?;
        let mut report = HarvestReport {
            handle: handle.clone(),
            ..Default::default()
        };

        tracing::info!(
            handle = %handle,
            max_age_days = request.max_age_days,
            "Starting harvest"
        );

        let posts = self
            .timeline
            .recent_posts(&handle, self.config.page_size)
            .await?;
        report.posts_fetched = posts.len();

        let posts = self.within_window(posts, request);
        report.posts_in_window = posts.len();

        let mut targets: Vec<(&Post, &str)> = Vec::new();
        for post in &posts {
            for entity in &post.urls {
                if entity.display_url.starts_with(&self.config.photo_prefix) {
                    tracing::debug!(id = %post.id, url = %entity.display_url, "Skipping photo link");
                    continue;
                }
                targets.push((post, entity.expanded_url.as_str()));
            }
        }

        let resolved: Vec<_> = stream::iter(targets)
            .map(|(post, url)| async move { (post, url, self.fetcher.resolve(url).await) })
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        let mut records = Vec::with_capacity(resolved.len());
        for (post, url, outcome) in resolved {
            match outcome {
                Ok(metadata) => records.push(LinkRecord::from_post(metadata, post, &handle)),
                Err(reason) => {
                    tracing::warn!(url, reason = %reason, "Skipping link");
                    report.skipped.push(SkippedLink {
                        url: url.to_string(),
                        reason,
                    });
                }
            }
        }

        let (links, duplicates) = dedupe_links(records);
        report.links = links;
        report.duplicates = duplicates;

        tracing::info!(
            handle = %handle,
            fetched = report.posts_fetched,
            in_window = report.posts_in_window,
            links = report.links.len(),
            skipped = report.skipped.len(),
            duplicates = report.duplicates,
            "Harvest complete"
        );

        Ok(report)
    }

    /// Keep posts no older than the request window.
    fn within_window(&self, posts: Vec<Post>, request: &HarvestRequest) -> Vec<Post> {
        let max_age = i64::from(request.max_age_days);
        let mut kept = Vec::with_capacity(posts.len());

        for post in posts {
            let age = post.age_days(request.now);
            if age <= max_age {
                kept.push(post);
                continue;
            }
            match self.config.age_cutoff {
                AgeCutoff::Filter => {
                    tracing::debug!(id = %post.id, age, "Post outside window");
                }
                AgeCutoff::StopAtFirstStale => {
                    tracing::debug!(id = %post.id, age, "Stale post, stopping scan");
                    break;
                }
            }
        }

        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};

    struct StaticTimeline(Vec<Post>);

    #[async_trait]
    impl Timeline for StaticTimeline {
        async fn recent_posts(&self, _handle: &str, count: u32) -> Result<Vec<Post>, HarvestError> {
            Ok(self.0.iter().take(count as usize).cloned().collect())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    fn harvester(posts: Vec<Post>, age_cutoff: AgeCutoff) -> Harvester {
        let config = HarvestConfig {
            age_cutoff,
            ..Default::default()
        };
        Harvester::new(Arc::new(StaticTimeline(posts)), config).unwrap()
    }

    fn aged(id: &str, days: i64) -> Post {
        Post::new(id, now() - Duration::days(days), format!("post {id}"))
    }

    #[test]
    fn test_window_inclusive_boundary() {
        let h = harvester(vec![], AgeCutoff::Filter);
        let request = HarvestRequest::new("acme", 7).at(now());
        let kept = h.within_window(vec![aged("a", 7), aged("b", 8)], &request);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "a");
    }

    #[test]
    fn test_filter_handles_out_of_order_posts() {
        let h = harvester(vec![], AgeCutoff::Filter);
        let request = HarvestRequest::new("acme", 7).at(now());
        let kept = h.within_window(vec![aged("a", 1), aged("b", 9), aged("c", 3)], &request);
        let ids: Vec<_> = kept.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_stop_at_first_stale() {
        let h = harvester(vec![], AgeCutoff::StopAtFirstStale);
        let request = HarvestRequest::new("acme", 7).at(now());
        let kept = h.within_window(vec![aged("a", 1), aged("b", 9), aged("c", 3)], &request);
        let ids: Vec<_> = kept.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[tokio::test]
    async fn test_rejects_empty_handle() {
        let h = harvester(vec![], AgeCutoff::Filter);
        let err = h.harvest(&HarvestRequest::new(" @ ", 7)).await.unwrap_err();
        assert!(matches!(err, HarvestError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_rejects_zero_window() {
        let h = harvester(vec![], AgeCutoff::Filter);
        let err = h.harvest(&HarvestRequest::new("acme", 0)).await.unwrap_err();
        assert!(matches!(err, HarvestError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_report_carries_normalized_handle() {
        let h = harvester(vec![aged("a", 1)], AgeCutoff::Filter);
        let report = h
            .harvest(&HarvestRequest::new("  @acme ", 7).at(now()))
            .await
            .unwrap();
        assert_eq!(report.handle, "acme");
    }

    #[tokio::test]
    async fn test_photo_links_are_not_fetched() {
        // An unroutable expanded URL would be reported as skipped if it were fetched.
        let post = aged("a", 1).with_url("pic.twitter.com/abc", "http://127.0.0.1:9/photo");
        let h = harvester(vec![post], AgeCutoff::Filter);

        let report = h
            .harvest(&HarvestRequest::new("acme", 7).at(now()))
            .await
            .unwrap();
        assert!(report.links.is_empty());
        assert!(report.skipped.is_empty());
        assert_eq!(report.posts_in_window, 1);
    }
}
