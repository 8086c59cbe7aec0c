//! Single-track download flow.

use anyhow::{bail, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use xmdl_core::catalog::Catalog;
use xmdl_core::fetcher;
use xmdl_core::ledger::{TaskLedger, TrackId};

use super::print_unfinished;

/// Downloads one track. The per-task deadline applies directly here; it is
/// only the grouped flows that widen it to a shared group budget.
pub async fn run_track(
    catalog: Arc<dyn Catalog>,
    dest_dir: &Path,
    id: TrackId,
    timeout: Option<Duration>,
) -> Result<()> {
    let ledger = TaskLedger::new();
    match fetcher::fetch_track(catalog.as_ref(), &ledger, dest_dir, id, timeout).await {
        Ok(()) => {
            println!("1 track downloaded.");
            Ok(())
        }
        Err(err) => {
            tracing::warn!(id, "single track download failed: {err}");
            print_unfinished(&ledger);
            bail!("track {id} did not download: {err}")
        }
    }
}
