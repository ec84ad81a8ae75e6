//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod directory;
pub mod expense;
pub mod export;
pub mod settle;

pub use audit::handle_audit_command;
pub use directory::{handle_contact_command, handle_member_command, ContactCommands, MemberCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportFormat, ExportOptions};
pub use settle::{
    handle_balance_command, handle_report_command, handle_settle_command, SettleCommands,
};
