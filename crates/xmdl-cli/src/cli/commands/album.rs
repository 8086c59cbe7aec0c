//! Whole-album download flow.

use anyhow::{bail, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use xmdl_core::catalog::Catalog;
use xmdl_core::ledger::{AlbumId, TaskLedger};

use super::print_unfinished;

pub async fn run_album(
    catalog: Arc<dyn Catalog>,
    dest_dir: &Path,
    album_id: AlbumId,
    group_size: usize,
    timeout: Option<Duration>,
) -> Result<()> {
    let ledger = TaskLedger::new();
    match xmdl_core::album::fetch_album(catalog, &ledger, dest_dir, album_id, group_size, timeout)
        .await
    {
        Ok(()) => {
            println!("All {} track(s) downloaded.", ledger.len());
            Ok(())
        }
        Err(err) => {
            tracing::warn!(album_id, "album download incomplete: {err}");
            print_unfinished(&ledger);
            bail!("album {album_id} did not fully download")
        }
    }
}
