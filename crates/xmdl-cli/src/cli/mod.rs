//! CLI for the XMDL audio album downloader.

mod commands;
mod links;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use xmdl_core::catalog::{Catalog, HttpCatalog};
use xmdl_core::config;

use links::LinkTarget;

/// Top-level CLI for the XMDL audio album downloader.
#[derive(Debug, Parser)]
#[command(name = "xmdl")]
#[command(about = "XMDL: batch audio downloader for ximalaya.com albums", long_about = None)]
pub struct Cli {
    /// Album, page, or track URL, e.g. https://www.ximalaya.com/ertong/12891461/p2/
    pub url: String,

    /// Directory downloaded albums are placed in (default: config, else current dir).
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Tracks downloaded concurrently within one group (default: config, else 5).
    #[arg(short, long, value_name = "N")]
    pub concurrent: Option<usize>,

    /// Per-track download deadline in seconds; 0 disables it (default: config, else 10).
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

pub async fn run_from_args() -> Result<()> {
    run(Cli::parse()).await
}

async fn run(cli: Cli) -> Result<()> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);

    let group_size = cli.concurrent.unwrap_or(cfg.group_size).max(1);
    let timeout = match cli.timeout {
        Some(0) => None,
        Some(secs) => Some(Duration::from_secs(secs)),
        None => cfg.task_timeout(),
    };

    let base_url = cfg
        .base_url
        .as_deref()
        .unwrap_or(HttpCatalog::DEFAULT_BASE_URL);
    let catalog: Arc<dyn Catalog> = Arc::new(HttpCatalog::with_base_url(base_url)?);

    let output = cli
        .output
        .or(cfg.output_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    tokio::fs::create_dir_all(&output)
        .await
        .with_context(|| format!("could not create output directory {}", output.display()))?;

    match links::classify(&cli.url)? {
        LinkTarget::Track(id) => commands::run_track(catalog, &output, id, timeout).await,
        LinkTarget::Page { album_id, page } => {
            commands::run_page(catalog, &output, album_id, page, group_size, timeout).await
        }
        LinkTarget::Album(album_id) => {
            commands::run_album(catalog, &output, album_id, group_size, timeout).await
        }
    }
}

#[cfg(test)]
mod tests;
