//! Display formatting for terminal output
//!
//! Provides utilities for formatting expenses, balances and settlement plans
//! for terminal display.

pub mod balance;
pub mod directory;
pub mod expense;
pub mod format;

pub use balance::{format_balance_table, format_skipped, format_transfer_table};
pub use directory::{format_contact_list, format_member_list};
pub use expense::{format_expense_details, format_expense_register};
pub use format::{format_amount, format_signed};
