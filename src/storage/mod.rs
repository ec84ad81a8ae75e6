//! Storage layer for tripsplit
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation, plus the audit log that records every change.

pub mod directory;
pub mod expenses;
pub mod file_io;

pub use directory::{ContactRepository, MemberRepository};
pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::TripsplitPaths;
use crate::error::TripsplitError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: TripsplitPaths,
    audit: AuditLogger,
    pub expenses: ExpenseRepository,
    pub members: MemberRepository,
    pub contacts: ContactRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: TripsplitPaths) -> Result<Self, TripsplitError> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            members: MemberRepository::new(paths.members_file()),
            contacts: ContactRepository::new(paths.contacts_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &TripsplitPaths {
        &self.paths
    }

    /// Get the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), TripsplitError> {
        self.expenses.load()?;
        self.members.load()?;
        self.contacts.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), TripsplitError> {
        self.expenses.save()?;
        self.members.save()?;
        self.contacts.save()?;
        Ok(())
    }

    /// Record a created entity in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), TripsplitError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record a deleted entity in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), TripsplitError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// Record a transfer reported as paid
    pub fn log_settle<T: Serialize>(
        &self,
        entity_id: impl Into<String>,
        transfer: &T,
        note: Option<String>,
    ) -> Result<(), TripsplitError> {
        self.audit.log(&AuditEntry::settle(entity_id, transfer, note))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::SharedExpense;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TripsplitPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert_eq!(storage.expenses.count().unwrap(), 0);
    }

    #[test]
    fn test_save_all_and_audit() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TripsplitPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone()).unwrap();

        let expense = SharedExpense::new(30.0, "alice", vec!["bob".into()]);
        storage.expenses.upsert(expense.clone()).unwrap();
        storage.save_all().unwrap();
        storage
            .log_create(EntityType::Expense, expense.id.to_string(), None, &expense)
            .unwrap();

        assert!(paths.expenses_file().exists());
        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
    }
}
