//! Linklater CLI - harvest shared links into a draft post.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use linklater::config::{DEFAULT_CONCURRENCY, DEFAULT_HANDLE, DEFAULT_MAX_AGE_DAYS, DEFAULT_PAGE_SIZE};
use linklater::notify::EmailSender;
use linklater::render::{DraftContext, DraftRenderer};
use linklater::{AgeCutoff, HarvestConfig, HarvestReport, HarvestRequest, Harvester, TwitterTimeline};

/// Linklater CLI - collect recently shared links and announce the draft.
#[derive(Parser)]
#[command(name = "linklater")]
#[command(about = "Harvest links shared on a Twitter account into a draft post")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Posts requested from the timeline
    #[arg(long, global = true, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// Link metadata fetches in flight
    #[arg(long, global = true, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Per-link fetch timeout in seconds
    #[arg(long, global = true, default_value = "30")]
    timeout_secs: u64,

    /// Stop at the first post outside the window instead of filtering all posts
    #[arg(long, global = true)]
    stop_at_first_stale: bool,

    /// Directory with `draft.hbs` / `email.hbs` template overrides
    #[arg(long, global = true, env = "LINKLATER_TEMPLATES")]
    templates: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
pub struct Target {
    /// Account handle to harvest
    #[arg(long, env = "LINKLATER_HANDLE", default_value = DEFAULT_HANDLE)]
    handle: String,

    /// Recency window in days
    #[arg(long, env = "LINKLATER_DAYS", default_value_t = DEFAULT_MAX_AGE_DAYS)]
    days: u32,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Harvest report as JSON
    Json,
    /// Rendered draft post body
    Html,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Harvest links and print them
    Harvest {
        #[command(flatten)]
        target: Target,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Harvest links, render the draft, and email it to the team
    Notify {
        #[command(flatten)]
        target: Target,

        /// Email subject
        #[arg(long, default_value = "New Linklater draft")]
        subject: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("linklater=debug,info")
    } else {
        EnvFilter::new("linklater=info,warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = HarvestConfig {
        page_size: cli.page_size,
        concurrency: cli.concurrency,
        timeout: Duration::from_secs(cli.timeout_secs),
        age_cutoff: if cli.stop_at_first_stale {
            AgeCutoff::StopAtFirstStale
        } else {
            AgeCutoff::Filter
        },
        ..Default::default()
    };

    let renderer = match &cli.templates {
        Some(dir) => DraftRenderer::from_dir(dir)
            .with_context(|| format!("Failed to load templates from {}", dir.display()))?,
        None => DraftRenderer::new()?,
    };

    match cli.command {
        Commands::Harvest {
            target,
            format,
            output,
        } => run_harvest(config, &renderer, target, format, output).await,
        Commands::Notify { target, subject } => {
            run_notify(config, &renderer, target, &subject).await
        }
    }
}

async fn harvest(config: HarvestConfig, target: &Target) -> Result<HarvestReport> {
    let timeline = TwitterTimeline::from_env().context("Failed to configure Twitter client")?;
    let harvester = Harvester::new(Arc::new(timeline), config)?;

    let report = harvester
        .harvest(&HarvestRequest::new(target.handle.clone(), target.days))
        .await
        .with_context(|| format!("Harvest for {} failed", target.handle))?;

    Ok(report)
}

async fn run_harvest(
    config: HarvestConfig,
    renderer: &DraftRenderer,
    target: Target,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let report = harvest(config, &target).await?;

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Html => {
            let context = DraftContext::new(report.handle, target.days, report.links);
            renderer.render_draft(&context)?
        }
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "Wrote harvest output");
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

async fn run_notify(
    config: HarvestConfig,
    renderer: &DraftRenderer,
    target: Target,
    subject: &str,
) -> Result<()> {
    let sender = EmailSender::from_env()?;
    let report = harvest(config, &target).await?;

    if report.links.is_empty() {
        tracing::warn!(
            handle = %report.handle,
            skipped = report.skipped.len(),
            "No links harvested, not sending notification"
        );
        return Ok(());
    }

    let context = DraftContext::new(report.handle, target.days, report.links);
    let html = renderer.render_draft(&context)?;
    let text = renderer.render_email(&context)?;

    sender.send(subject, &html, &text).await?;
    println!("Sent draft with {} links", context.link_count);

    Ok(())
}
