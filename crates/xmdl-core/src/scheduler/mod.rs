//! Batch scheduler: fixed-size groups run strictly in sequence, with full
//! concurrency inside each group.
//!
//! This bounds peak network/disk usage to the group size while still
//! overlapping I/O within that bound; a failing task never cancels its
//! siblings, and the next group only starts once every task in the current
//! one has settled.

mod partition;
mod run;

pub use partition::partition_groups;
pub use run::{run_groups, PartialFailure};
