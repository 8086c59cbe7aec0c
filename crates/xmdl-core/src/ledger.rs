//! In-memory task ledger shared across concurrently-running downloads.
//!
//! Every admitted track gets exactly one record; records are never removed
//! during a run, so the caller can enumerate failures after a batch. Each
//! running task only writes the entry keyed by its own id; the mutex exists
//! to make concurrent insertion of new keys safe.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub type TrackId = u64;
pub type AlbumId = u64;

/// Lifecycle state of a download task. Transitions are monotonic:
/// `Pending → InFlight → {Finished | TimedOut | Failed}`, never reverting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    InFlight,
    Finished,
    TimedOut,
    Failed,
}

impl TaskStatus {
    /// Terminal states are assigned exactly once and never overwritten.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskStatus::Finished | TaskStatus::TimedOut | TaskStatus::Failed
        )
    }
}

/// One record per admitted track id.
#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub id: TrackId,
    /// Human-readable title; empty until the metadata fetch completes.
    pub title: String,
    /// Resolved stream URL; empty until the metadata fetch completes.
    pub download_link: String,
    pub status: TaskStatus,
}

/// Handle to the shared ledger. Cheap to clone; all clones see one map.
#[derive(Debug, Clone, Default)]
pub struct TaskLedger {
    inner: Arc<Mutex<HashMap<TrackId, TaskRecord>>>,
}

impl TaskLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a task: insert (or reset) its record as Pending with empty
    /// title/link. Called before any network activity for the id.
    pub fn admit(&self, id: TrackId) {
        let mut map = self.inner.lock().expect("ledger poisoned");
        map.insert(
            id,
            TaskRecord {
                id,
                title: String::new(),
                download_link: String::new(),
                status: TaskStatus::Pending,
            },
        );
    }

    /// Record resolved metadata and move the task to InFlight.
    pub fn start(&self, id: TrackId, title: &str, download_link: &str) {
        let mut map = self.inner.lock().expect("ledger poisoned");
        if let Some(rec) = map.get_mut(&id) {
            if !rec.status.is_terminal() {
                rec.title = title.to_string();
                rec.download_link = download_link.to_string();
                rec.status = TaskStatus::InFlight;
            }
        }
    }

    /// Mark the task Finished. Returns false when a terminal state was
    /// already recorded (e.g. the timeout won the race), in which case the
    /// record is left untouched.
    pub fn complete(&self, id: TrackId) -> bool {
        self.terminal(id, TaskStatus::Finished)
    }

    /// Mark the task TimedOut. Returns false when a terminal state was
    /// already recorded.
    pub fn mark_timed_out(&self, id: TrackId) -> bool {
        self.terminal(id, TaskStatus::TimedOut)
    }

    /// Mark the task Failed (metadata, directory, or stream error).
    pub fn mark_failed(&self, id: TrackId) {
        self.terminal(id, TaskStatus::Failed);
    }

    fn terminal(&self, id: TrackId, status: TaskStatus) -> bool {
        let mut map = self.inner.lock().expect("ledger poisoned");
        match map.get_mut(&id) {
            Some(rec) if !rec.status.is_terminal() => {
                rec.status = status;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: TrackId) -> Option<TaskRecord> {
        self.inner.lock().expect("ledger poisoned").get(&id).cloned()
    }

    /// All records whose status is not Finished, in ascending id order.
    /// This is the terminal failure report after a batch settles.
    pub fn unfinished(&self) -> Vec<TaskRecord> {
        let map = self.inner.lock().expect("ledger poisoned");
        let mut tasks: Vec<TaskRecord> = map
            .values()
            .filter(|rec| rec.status != TaskStatus::Finished)
            .cloned()
            .collect();
        tasks.sort_by_key(|rec| rec.id);
        tasks
    }

    /// Number of admitted tasks.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("ledger poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
