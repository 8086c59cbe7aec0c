//! Runs partitioned groups: sequential between groups, concurrent within.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::partition::partition_groups;
use crate::catalog::Catalog;
use crate::fetcher;
use crate::ledger::{TaskLedger, TrackId};

/// Not every task finished; the ledger's `unfinished()` has the details.
#[derive(Debug, Error)]
#[error("group(s) {failed_groups:?} of {group_count} had failures")]
pub struct PartialFailure {
    /// Zero-based indices of groups containing at least one failed task.
    pub failed_groups: Vec<usize>,
    pub group_count: usize,
}

/// Downloads `ids` in groups of at most `group_size`.
///
/// Group *k+1* does not start until every task in group *k* has settled
/// (finished, timed out, or failed). Within a group all tasks run
/// concurrently and a failing task never cancels its siblings; their
/// outcomes land in the ledger either way. `task_timeout` applies to each
/// task individually.
pub async fn run_groups(
    catalog: Arc<dyn Catalog>,
    ledger: &TaskLedger,
    dest_dir: &Path,
    ids: &[TrackId],
    group_size: usize,
    task_timeout: Option<Duration>,
) -> Result<(), PartialFailure> {
    let groups = partition_groups(ids, group_size);
    let group_count = groups.len();
    let mut failed_groups = Vec::new();

    for (index, group) in groups.into_iter().enumerate() {
        tracing::debug!(group = index, tasks = group.len(), "group started");
        let mut join_set = tokio::task::JoinSet::new();
        for id in group {
            let catalog = Arc::clone(&catalog);
            let ledger = ledger.clone();
            let dest_dir = dest_dir.to_path_buf();
            join_set.spawn(async move {
                fetcher::fetch_track(catalog.as_ref(), &ledger, &dest_dir, id, task_timeout).await
            });
        }

        let mut group_ok = true;
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    group_ok = false;
                    tracing::warn!(group = index, "task failed: {err}");
                }
                Err(join_err) => {
                    group_ok = false;
                    tracing::warn!(group = index, "task panicked: {join_err}");
                }
            }
        }
        if !group_ok {
            failed_groups.push(index);
        }
    }

    if failed_groups.is_empty() {
        Ok(())
    } else {
        Err(PartialFailure {
            failed_groups,
            group_count,
        })
    }
}
