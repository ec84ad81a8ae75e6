//! Shared expense model
//!
//! A shared expense is paid by one person and split equally among the payer
//! and the listed participants.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ExpenseId;

/// An expense paid by one participant and shared with others
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedExpense {
    /// Unique identifier
    pub id: ExpenseId,

    /// What the money was spent on
    #[serde(default)]
    pub description: String,

    /// Total amount paid; must be finite and positive
    pub total_amount: f64,

    /// Raw identifier of the person who paid
    pub payer_id: String,

    /// Raw identifiers of the people splitting the cost (payer excluded
    /// unless listed explicitly)
    #[serde(default)]
    pub participant_ids: Vec<String>,

    /// Optional trip or grouping label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip: Option<String>,

    /// Date the expense happened
    pub date: NaiveDate,

    /// When the expense was recorded
    pub created_at: DateTime<Utc>,

    /// When the expense was last modified
    pub updated_at: DateTime<Utc>,
}

impl SharedExpense {
    /// Create a new shared expense dated today
    pub fn new(
        total_amount: f64,
        payer_id: impl Into<String>,
        participant_ids: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenseId::new(),
            description: String::new(),
            total_amount,
            payer_id: payer_id.into(),
            participant_ids,
            trip: None,
            date: now.date_naive(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the trip label
    pub fn with_trip(mut self, trip: impl Into<String>) -> Self {
        self.trip = Some(trip.into());
        self
    }

    /// Set the expense date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Check whether the expense belongs to a trip (case-insensitive)
    pub fn in_trip(&self, trip: &str) -> bool {
        self.trip
            .as_deref()
            .is_some_and(|t| t.trim().eq_ignore_ascii_case(trip.trim()))
    }

    /// Validate the expense
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.total_amount.is_nan() {
            return Err(ExpenseValidationError::NotANumber);
        }
        if !self.total_amount.is_finite() {
            return Err(ExpenseValidationError::NonFinite(self.total_amount));
        }
        if self.total_amount <= 0.0 {
            return Err(ExpenseValidationError::NotPositive(self.total_amount));
        }
        if self.payer_id.trim().is_empty() {
            return Err(ExpenseValidationError::MissingPayer);
        }
        Ok(())
    }
}

impl fmt::Display for SharedExpense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{} ({:.2} by {})", self.id, self.total_amount, self.payer_id)
        } else {
            write!(f, "{} ({:.2} by {})", self.description, self.total_amount, self.payer_id)
        }
    }
}

/// Validation errors for shared expenses
#[derive(Debug, Clone, PartialEq)]
pub enum ExpenseValidationError {
    NotANumber,
    NonFinite(f64),
    NotPositive(f64),
    MissingPayer,
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotANumber => write!(f, "Amount is not a number"),
            Self::NonFinite(amount) => write!(f, "Amount must be finite, got {}", amount),
            Self::NotPositive(amount) => {
                write!(f, "Amount must be greater than zero, got {}", amount)
            }
            Self::MissingPayer => write!(f, "Expense has no payer"),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}
