//! tripsplit - shared expense splitting and settlement
//!
//! Records expenses paid by one person and shared equally with others,
//! aggregates them into per-participant balances, and plans a short list of
//! transfers that settles every debt.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (expenses, directory entries, balances)
//! - `storage`: JSON file storage layer
//! - `audit`: Audit logging system
//! - `services`: Identity resolution, balance aggregation, settlement planning
//! - `reports`: Expense summary rollups
//! - `display`: Terminal formatting
//! - `export`: CSV, JSON and YAML export
//! - `cli`: Command handlers for the binary
//!
//! # Example
//!
//! ```rust
//! use tripsplit::models::SharedExpense;
//! use tripsplit::services::{LiteralResolver, SettlementEngine};
//!
//! let expenses = vec![SharedExpense::new(90.0, "A", vec!["B".into(), "C".into()])];
//! let outcome = SettlementEngine::default()
//!     .compute(&expenses, &LiteralResolver)
//!     .unwrap();
//!
//! assert_eq!(outcome.transfers.len(), 2);
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{TripsplitError, TripsplitResult};
