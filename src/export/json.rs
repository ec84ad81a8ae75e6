//! JSON Export functionality
//!
//! Exports expenses, balances and the settlement plan with schema versioning.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TripsplitError, TripsplitResult};
use crate::models::{ParticipantBalance, SettlementTransfer, SharedExpense};
use crate::services::{SettlementOutcome, SkippedExpense};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Settlement export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// Trip the export is limited to, if any
    pub trip: Option<String>,

    /// Currency code, for display only
    pub currency_code: String,

    pub expenses: Vec<SharedExpense>,

    /// Balances by participant, sorted by name
    pub balances: Vec<ParticipantBalance>,

    pub transfers: Vec<SettlementTransfer>,

    /// Expenses excluded from the balances
    #[serde(default)]
    pub skipped: Vec<SkippedExpense>,

    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub expense_count: usize,
    pub participant_count: usize,
    pub transfer_count: usize,
    /// Sum of valid expense amounts
    pub total_amount: f64,
    pub earliest_expense: Option<String>,
    pub latest_expense: Option<String>,
}

impl SettlementExport {
    /// Build an export from an expense snapshot and its computed outcome
    pub fn new(
        expenses: Vec<SharedExpense>,
        outcome: &SettlementOutcome,
        trip: Option<&str>,
        currency_code: &str,
    ) -> Self {
        let total_amount = expenses
            .iter()
            .filter(|e| e.validate().is_ok())
            .map(|e| e.total_amount)
            .sum();

        let metadata = ExportMetadata {
            expense_count: expenses.len(),
            participant_count: outcome.balances.len(),
            transfer_count: outcome.transfers.len(),
            total_amount,
            earliest_expense: expenses.iter().map(|e| e.date).min().map(|d| d.to_string()),
            latest_expense: expenses.iter().map(|e| e.date).max().map(|d| d.to_string()),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            trip: trip.map(str::to_string),
            currency_code: currency_code.to_string(),
            expenses,
            balances: outcome.balances.values().cloned().collect(),
            transfers: outcome.transfers.clone(),
            skipped: outcome.skipped.clone(),
            metadata,
        }
    }

    /// Validate the export structure
    pub fn validate(&self) -> Result<(), String> {
        let major = |v: &str| v.split('.').next().unwrap_or("").to_string();
        if major(&self.schema_version) != major(EXPORT_SCHEMA_VERSION) {
            return Err(format!(
                "Incompatible schema version: {} (expected {})",
                self.schema_version, EXPORT_SCHEMA_VERSION
            ));
        }

        if self.metadata.expense_count != self.expenses.len() {
            return Err("Expense count mismatch".into());
        }

        if self.metadata.transfer_count != self.transfers.len() {
            return Err("Transfer count mismatch".into());
        }

        Ok(())
    }
}

/// Write an export as pretty-printed JSON
pub fn export_json<W: Write>(export: &SettlementExport, writer: &mut W) -> TripsplitResult<()> {
    serde_json::to_writer_pretty(&mut *writer, export)
        .map_err(|e| TripsplitError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| TripsplitError::Export(e.to_string()))?;
    Ok(())
}

/// Read an export back from JSON
pub fn import_from_json(json_str: &str) -> TripsplitResult<SettlementExport> {
    let export: SettlementExport =
        serde_json::from_str(json_str).map_err(|e| TripsplitError::Import(e.to_string()))?;

    export.validate().map_err(TripsplitError::Import)?;

    Ok(export)
}
