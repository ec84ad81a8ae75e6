//! Reports module for tripsplit
//!
//! Summary rollups over shared expenses.

pub mod expense_summary;

pub use expense_summary::{ExpenseSummary, SummaryRow};
