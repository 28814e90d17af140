//! Page metadata resolution via Open Graph tags.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::HarvestError;

/// Metadata scraped from a resolved page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    /// URL after following redirects.
    pub final_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Why a URL produced no metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// Response status was not 200.
    Status { status: u16 },
    /// Response was not HTML.
    NotHtml { content_type: Option<String> },
    /// Transport or body read failed.
    Network { message: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { status } => write!(f, "HTTP {status}"),
            Self::NotHtml {
                content_type: Some(ct),
            } => write!(f, "not HTML ({ct})"),
            Self::NotHtml { content_type: None } => write!(f, "not HTML (no content type)"),
            Self::Network { message } => write!(f, "network error: {message}"),
        }
    }
}

/// Fetches pages and extracts their Open Graph metadata.
#[derive(Clone)]
pub struct MetadataFetcher {
    client: Client,
}

impl MetadataFetcher {
    /// Create a fetcher with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, HarvestError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }

    /// Resolve a URL, following redirects.
    ///
    /// Only a 200 response with an HTML content type yields metadata.
    pub async fn resolve(&self, url: &str) -> Result<PageMetadata, SkipReason> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SkipReason::Network {
                message: e.to_string(),
            })?;

        let final_url = response.url().to_string();
        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!(url = %final_url, status = status.as_u16(), "Error accessing link");
            return Err(SkipReason::Status {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        if !content_type.as_deref().is_some_and(is_html) {
            tracing::debug!(url = %final_url, content_type = ?content_type, "Link is not HTML");
            return Err(SkipReason::NotHtml { content_type });
        }

        let body = response.text().await.map_err(|e| SkipReason::Network {
            message: e.to_string(),
        })?;

        let mut metadata = parse_open_graph(&body);
        metadata.final_url = final_url;
        tracing::debug!(url = %metadata.final_url, title = ?metadata.title, "Resolved link");
        Ok(metadata)
    }
}

fn is_html(content_type: &str) -> bool {
    content_type
        .trim_start()
        .to_ascii_lowercase()
        .starts_with("text/html")
}

/// Extract `og:title`, `og:description` and `og:image` from an HTML document.
///
/// Only the first tag for each property is considered; an empty `content`
/// leaves the field unset. `final_url` is left empty.
pub fn parse_open_graph(html: &str) -> PageMetadata {
    let document = Html::parse_document(html);

    let og = |property: &str| -> Option<String> {
        let selector = Selector::parse(&format!("[property='og:{property}']")).ok()?;
        document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .filter(|content| !content.is_empty())
            .map(str::to_string)
    };

    PageMetadata {
        final_url: String::new(),
        title: og("title"),
        description: og("description"),
        image: og("image"),
    }
}
