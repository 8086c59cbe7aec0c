//! Collection walker: composes the batch scheduler over one listing page or
//! across every page of an album.
//!
//! Pages run strictly in sequence. A failing page never stops the walk;
//! every page is attempted exactly once and the verdict aggregates across
//! all of them, with the ledger carrying per-track detail.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::catalog::{Catalog, CatalogError};
use crate::ledger::{AlbumId, TaskLedger};
use crate::scheduler::{self, PartialFailure};

#[derive(Debug, Error)]
pub enum PageFailure {
    #[error("could not list page tracks: {0}")]
    Listing(#[source] CatalogError),

    #[error(transparent)]
    Tracks(#[from] PartialFailure),
}

#[derive(Debug, Error)]
pub enum AlbumFailure {
    #[error("could not resolve album summary: {0}")]
    Summary(#[source] CatalogError),

    #[error("page(s) {failed_pages:?} of {total_pages} had failures")]
    Pages {
        /// 1-based page numbers that did not fully succeed.
        failed_pages: Vec<u32>,
        total_pages: u32,
    },
}

/// Downloads every track on one listing page of an album.
///
/// Each task launched from a page run shares the group's pessimistic
/// deadline budget of `group_size * per_task_timeout`, matching the
/// scheduler's group-must-settle discipline.
pub async fn fetch_page(
    catalog: Arc<dyn Catalog>,
    ledger: &TaskLedger,
    dest_dir: &Path,
    album_id: AlbumId,
    page: u32,
    group_size: usize,
    per_task_timeout: Option<Duration>,
) -> Result<(), PageFailure> {
    tracing::info!(album_id, page, "resolving page listing");
    let ids = catalog
        .page_tracks(album_id, page)
        .await
        .map_err(PageFailure::Listing)?;
    tracing::info!(album_id, page, tracks = ids.len(), "page listing resolved");

    let budget = group_timeout(per_task_timeout, group_size);
    scheduler::run_groups(catalog, ledger, dest_dir, &ids, group_size, budget).await?;
    Ok(())
}

/// Downloads a whole album, page by page, strictly in order.
///
/// All pages are attempted exactly once even when an earlier page fails;
/// the verdict is the conjunction of the page verdicts.
pub async fn fetch_album(
    catalog: Arc<dyn Catalog>,
    ledger: &TaskLedger,
    dest_dir: &Path,
    album_id: AlbumId,
    group_size: usize,
    per_task_timeout: Option<Duration>,
) -> Result<(), AlbumFailure> {
    let summary = catalog
        .album_summary(album_id)
        .await
        .map_err(AlbumFailure::Summary)?;
    let total_pages = summary
        .total_track_count
        .div_ceil(summary.page_size.max(1));
    tracing::info!(
        album_id,
        title = %summary.title,
        tracks = summary.total_track_count,
        pages = total_pages,
        "album resolved"
    );

    let mut failed_pages = Vec::new();
    for page in 1..=total_pages {
        if let Err(err) = fetch_page(
            Arc::clone(&catalog),
            ledger,
            dest_dir,
            album_id,
            page,
            group_size,
            per_task_timeout,
        )
        .await
        {
            tracing::warn!(album_id, page, "page not fully downloaded: {err}");
            failed_pages.push(page);
        }
    }

    if failed_pages.is_empty() {
        Ok(())
    } else {
        Err(AlbumFailure::Pages {
            failed_pages,
            total_pages,
        })
    }
}

/// Shared per-group deadline budget: `group_size * per_task_timeout`.
fn group_timeout(per_task: Option<Duration>, group_size: usize) -> Option<Duration> {
    per_task.map(|t| t * group_size.max(1) as u32)
}
