//! Expense service
//!
//! Validation and persistence for shared expenses.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{TripsplitError, TripsplitResult};
use crate::models::{ExpenseId, SharedExpense};
use crate::storage::Storage;

/// Input for creating a new shared expense
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    pub total_amount: f64,
    pub payer_id: String,
    pub participant_ids: Vec<String>,
    pub description: Option<String>,
    pub trip: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Options for filtering expenses
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub trip: Option<String>,
    pub payer: Option<String>,
    pub limit: Option<usize>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trip(mut self, trip: impl Into<String>) -> Self {
        self.trip = Some(trip.into());
        self
    }

    pub fn payer(mut self, payer: impl Into<String>) -> Self {
        self.payer = Some(payer.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Service for shared expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Build and validate an expense without saving it
    pub fn build(input: CreateExpenseInput) -> TripsplitResult<SharedExpense> {
        let participant_ids: Vec<String> = input
            .participant_ids
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        let mut expense = SharedExpense::new(
            input.total_amount,
            input.payer_id.trim(),
            participant_ids,
        );
        if let Some(description) = input.description {
            expense = expense.with_description(description.trim());
        }
        if let Some(trip) = input.trip.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
            expense = expense.with_trip(trip);
        }
        if let Some(date) = input.date {
            expense = expense.with_date(date);
        }

        expense
            .validate()
            .map_err(|e| TripsplitError::Validation(e.to_string()))?;

        Ok(expense)
    }

    /// Create and persist a new expense
    pub fn create(&self, input: CreateExpenseInput) -> TripsplitResult<SharedExpense> {
        let expense = Self::build(input)?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.to_string()),
            &expense,
        )?;

        Ok(expense)
    }

    /// Persist several already-built expenses with one save
    pub fn create_many(&self, expenses: Vec<SharedExpense>) -> TripsplitResult<usize> {
        let count = expenses.len();
        for expense in &expenses {
            expense
                .validate()
                .map_err(|e| TripsplitError::Validation(format!("{}: {}", expense.id, e)))?;
        }
        for expense in &expenses {
            self.storage.expenses.upsert(expense.clone())?;
        }
        self.storage.expenses.save()?;

        for expense in &expenses {
            self.storage.log_create(
                EntityType::Expense,
                expense.id.to_string(),
                Some(expense.to_string()),
                expense,
            )?;
        }

        Ok(count)
    }

    /// Find an expense by full ID or short display ID
    pub fn find(&self, identifier: &str) -> TripsplitResult<Option<SharedExpense>> {
        if let Ok(id) = identifier.parse::<ExpenseId>() {
            return self.storage.expenses.get(id);
        }
        Ok(self
            .storage
            .expenses
            .get_all()?
            .into_iter()
            .find(|e| e.id.matches(identifier)))
    }

    /// List expenses matching a filter, oldest first
    pub fn list(&self, filter: &ExpenseFilter) -> TripsplitResult<Vec<SharedExpense>> {
        let mut expenses = match &filter.trip {
            Some(trip) => self.storage.expenses.get_by_trip(trip)?,
            None => self.storage.expenses.get_all()?,
        };

        if let Some(payer) = &filter.payer {
            expenses.retain(|e| e.payer_id.eq_ignore_ascii_case(payer.trim()));
        }

        if let Some(limit) = filter.limit {
            let skip = expenses.len().saturating_sub(limit);
            expenses.drain(..skip);
        }

        Ok(expenses)
    }

    /// Delete an expense
    pub fn delete(&self, id: ExpenseId) -> TripsplitResult<SharedExpense> {
        let expense = self
            .storage
            .expenses
            .delete(id)?
            .ok_or_else(|| TripsplitError::expense_not_found(id.to_string()))?;
        self.storage.expenses.save()?;

        self.storage.log_delete(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.to_string()),
            &expense,
        )?;

        Ok(expense)
    }
}
