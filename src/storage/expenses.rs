//! Expense repository for JSON storage
//!
//! Manages loading and saving shared expenses to expenses.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::TripsplitError;
use crate::models::{ExpenseId, SharedExpense};

use super::file_io::{read_json, write_json_atomic};

/// Serializable expense data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<SharedExpense>,
}

/// Repository for shared expense persistence
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, SharedExpense>>,
}

impl ExpenseRepository {
    /// Create a new expense repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load expenses from disk
    pub fn load(&self) -> Result<(), TripsplitError> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            TripsplitError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for expense in file_data.expenses {
            data.insert(expense.id, expense);
        }

        Ok(())
    }

    /// Save expenses to disk in chronological order
    pub fn save(&self) -> Result<(), TripsplitError> {
        let expenses = self.get_all()?;
        write_json_atomic(&self.path, &ExpenseData { expenses })
    }

    /// Get an expense by ID
    pub fn get(&self, id: ExpenseId) -> Result<Option<SharedExpense>, TripsplitError> {
        let data = self.data.read().map_err(|e| {
            TripsplitError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// Get all expenses, oldest first
    ///
    /// The order is stable (date, then creation time, then id) so that
    /// aggregation over the list is reproducible between runs.
    pub fn get_all(&self) -> Result<Vec<SharedExpense>, TripsplitError> {
        let data = self.data.read().map_err(|e| {
            TripsplitError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut expenses: Vec<_> = data.values().cloned().collect();
        expenses.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(expenses)
    }

    /// Get all expenses belonging to a trip
    pub fn get_by_trip(&self, trip: &str) -> Result<Vec<SharedExpense>, TripsplitError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|e| e.in_trip(trip))
            .collect())
    }

    /// Distinct trip labels, sorted
    pub fn trips(&self) -> Result<Vec<String>, TripsplitError> {
        let mut trips: Vec<String> = self
            .get_all()?
            .into_iter()
            .filter_map(|e| e.trip)
            .collect();
        trips.sort_by_key(|t| t.to_lowercase());
        trips.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
        Ok(trips)
    }

    /// Insert or update an expense
    pub fn upsert(&self, expense: SharedExpense) -> Result<(), TripsplitError> {
        let mut data = self.data.write().map_err(|e| {
            TripsplitError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(expense.id, expense);
        Ok(())
    }

    /// Delete an expense, returning it if it existed
    pub fn delete(&self, id: ExpenseId) -> Result<Option<SharedExpense>, TripsplitError> {
        let mut data = self.data.write().map_err(|e| {
            TripsplitError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id))
    }

    /// Count expenses
    pub fn count(&self) -> Result<usize, TripsplitError> {
        let data = self.data.read().map_err(|e| {
            TripsplitError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.len())
    }
}
