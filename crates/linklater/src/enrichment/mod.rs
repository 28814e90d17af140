//! Link enrichment module.
//!
//! Resolves shared URLs to their canonical form and Open Graph metadata.

mod links;
mod metadata;

pub use links::{dedupe_links, status_url, LinkRecord, PERMALINK_BASE};
pub use metadata::{parse_open_graph, MetadataFetcher, PageMetadata, SkipReason};
