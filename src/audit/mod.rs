//! Audit logging for tripsplit
//!
//! Records creates and deletes of expenses and directory entries, and
//! transfers reported as paid, in an append-only JSONL log.
//!
//! Reporting a transfer as paid only writes an audit entry. It does not change
//! any balance; balances are always recomputed from the expenses.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
