//! Twitter timeline module.
//!
//! Provides the timeline client, OAuth signing, and post types.

mod client;
pub mod oauth;
mod types;

pub use client::{Timeline, TwitterTimeline};
pub use types::{parse_created_at, Post, RepostOrigin, UrlEntity};
