//! CLI command for data export

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::ValueEnum;

use crate::config::settings::Settings;
use crate::error::{TripsplitError, TripsplitResult};
use crate::export::{
    export_expenses_csv, export_json, export_settlement_csv, export_yaml, SettlementExport,
};
use crate::services::{SettlementEngine, SplitService};
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// CSV (balances and transfers, or expenses with --expenses)
    Csv,
    /// JSON (expenses, balances and transfers)
    Json,
    /// YAML (same content as JSON, human-readable)
    Yaml,
}

/// Options for the export command
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub trip: Option<String>,
    /// Output path; stdout when None
    pub output: Option<PathBuf>,
    /// Export the raw expense list instead of the settlement (CSV only)
    pub expenses_only: bool,
}

/// Handle the export command
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    engine: &SettlementEngine,
    options: ExportOptions,
) -> TripsplitResult<()> {
    let service = SplitService::new(storage, engine);
    let trip = options.trip.as_deref();
    let expenses = service.expenses(trip)?;

    let mut writer: Box<dyn Write> = match &options.output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| TripsplitError::Export(format!("{}: {}", path.display(), e)))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    match options.format {
        ExportFormat::Csv if options.expenses_only => {
            export_expenses_csv(&expenses, &mut writer)?;
        }
        ExportFormat::Csv => {
            let outcome = service.outcome(trip)?;
            export_settlement_csv(&outcome, &mut writer)?;
        }
        ExportFormat::Json | ExportFormat::Yaml => {
            let outcome = service.outcome(trip)?;
            let export = SettlementExport::new(expenses, &outcome, trip, &settings.currency_code);
            if options.format == ExportFormat::Json {
                export_json(&export, &mut writer)?;
            } else {
                export_yaml(&export, &mut writer)?;
            }
        }
    }

    writer
        .flush()
        .map_err(|e| TripsplitError::Export(e.to_string()))?;

    if let Some(path) = &options.output {
        eprintln!("Exported to {}", path.display());
    }

    Ok(())
}
