//! One run function per download flow; each prints the user-facing summary
//! and, on failure, the list of tracks to fetch manually.

mod album;
mod page;
mod track;

pub use album::run_album;
pub use page::run_page;
pub use track::run_track;

use xmdl_core::ledger::TaskLedger;

/// Prints the unfinished tasks with their last-known links so the user can
/// download them manually (e.g. in a browser).
pub(crate) fn print_unfinished(ledger: &TaskLedger) {
    let unfinished = ledger.unfinished();
    if unfinished.is_empty() {
        return;
    }
    println!("The following tracks did not finish; open the links to download them manually:");
    for task in unfinished {
        let title = if task.title.is_empty() {
            format!("track {}", task.id)
        } else {
            task.title
        };
        let link = if task.download_link.is_empty() {
            "(no link resolved)".to_string()
        } else {
            task.download_link
        };
        println!("  {title} : {link}");
    }
}
