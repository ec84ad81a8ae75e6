//! YAML Export functionality
//!
//! Human-readable variant of the settlement export.

use std::io::Write;

use crate::error::{TripsplitError, TripsplitResult};
use crate::export::json::SettlementExport;

/// Write an export as YAML with a short comment header
pub fn export_yaml<W: Write>(export: &SettlementExport, writer: &mut W) -> TripsplitResult<()> {
    let header = format!(
        "# tripsplit settlement export\n# Generated: {}\n# App Version: {}\n# Scope: {}\n\n",
        export.exported_at,
        export.app_version,
        export.trip.as_deref().unwrap_or("all expenses")
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| TripsplitError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, export).map_err(|e| TripsplitError::Export(e.to_string()))?;

    Ok(())
}

/// Read an export back from YAML
pub fn import_from_yaml(yaml_str: &str) -> TripsplitResult<SettlementExport> {
    let export: SettlementExport =
        serde_yaml::from_str(yaml_str).map_err(|e| TripsplitError::Import(e.to_string()))?;

    export.validate().map_err(TripsplitError::Import)?;

    Ok(export)
}
