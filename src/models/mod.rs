//! Core data models for tripsplit
//!
//! Shared expenses, the people they are split between, and the balances and
//! transfers derived from them.

pub mod balance;
pub mod directory;
pub mod expense;
pub mod ids;

pub use balance::{ParticipantBalance, SettlementTransfer};
pub use directory::{Contact, DirectoryValidationError, FamilyMember};
pub use expense::{ExpenseValidationError, SharedExpense};
pub use ids::{ContactId, ExpenseId, MemberId};
