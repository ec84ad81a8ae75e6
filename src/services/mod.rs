//! Service layer for tripsplit
//!
//! The settlement pipeline (identity resolution, balance aggregation and
//! transfer planning) plus the services that connect it to storage.

pub mod balance;
pub mod directory;
pub mod engine;
pub mod expense;
pub mod identity;
pub mod import;
pub mod settlement;
pub mod split;

pub use balance::{aggregate, Aggregation, BalanceMap, SkippedExpense};
pub use directory::DirectoryService;
pub use engine::{SettlementEngine, SettlementOutcome};
pub use expense::{CreateExpenseInput, ExpenseFilter, ExpenseService};
pub use identity::{DirectoryResolver, IdentityResolver, LiteralResolver};
pub use import::{ColumnMapping, ImportResult, ImportService};
pub use settlement::SettlementPlanner;
pub use split::SplitService;
