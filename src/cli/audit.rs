//! Audit log CLI command

use crate::error::TripsplitResult;
use crate::storage::Storage;

/// Print the most recent audit entries
pub fn handle_audit_command(storage: &Storage, limit: usize) -> TripsplitResult<()> {
    let entries = storage.audit().read_recent(limit)?;

    if entries.is_empty() {
        println!("Audit log is empty.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }

    let total = storage.audit().entry_count()?;
    if total > entries.len() {
        println!("\nShowing {} of {} entries", entries.len(), total);
    }

    Ok(())
}
