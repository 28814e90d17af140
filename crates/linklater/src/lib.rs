//! Linklater harvests links recently shared by a Twitter account.
//!
//! This crate provides:
//! - A signed client for the account timeline
//! - Open Graph metadata resolution for shared links
//! - A harvester that windows posts by age and dedupes links
//! - Handlebars rendering of the draft post and notification email
//! - SMTP delivery of the notification

pub mod config;
pub mod enrichment;
pub mod error;
pub mod harvester;
pub mod notify;
pub mod render;
pub mod twitter;

// Re-export main types
pub use config::{AgeCutoff, Credentials, HarvestConfig};
pub use enrichment::LinkRecord;
pub use error::HarvestError;
pub use harvester::{HarvestReport, HarvestRequest, Harvester, SkippedLink};
pub use twitter::{Post, Timeline, TwitterTimeline};
