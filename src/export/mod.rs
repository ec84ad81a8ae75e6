//! Export module for tripsplit
//!
//! Settlement export in multiple formats:
//! - CSV: expenses (importable) or balances and transfers
//! - JSON: machine-readable export with schema versioning
//! - YAML: human-readable export

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_expenses_csv, export_settlement_csv};
pub use json::{export_json, import_from_json, SettlementExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_yaml, import_from_yaml};
