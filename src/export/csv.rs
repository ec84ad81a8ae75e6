//! CSV Export functionality
//!
//! Exports expenses in the layout the importer reads, and balances plus the
//! settlement plan as flat records.

use std::io::Write;

use crate::error::{TripsplitError, TripsplitResult};
use crate::models::SharedExpense;
use crate::services::SettlementOutcome;

fn export_err(e: impl std::fmt::Display) -> TripsplitError {
    TripsplitError::Export(e.to_string())
}

/// Export expenses as `date,description,amount,payer,participants,trip`
pub fn export_expenses_csv<W: Write>(expenses: &[SharedExpense], writer: W) -> TripsplitResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["date", "description", "amount", "payer", "participants", "trip"])
        .map_err(export_err)?;

    for expense in expenses {
        csv_writer
            .write_record([
                expense.date.format("%Y-%m-%d").to_string(),
                expense.description.clone(),
                expense.total_amount.to_string(),
                expense.payer_id.clone(),
                expense.participant_ids.join(";"),
                expense.trip.clone().unwrap_or_default(),
            ])
            .map_err(export_err)?;
    }

    csv_writer.flush().map_err(export_err)?;
    Ok(())
}

/// Export balances and transfers, one `kind` per row
pub fn export_settlement_csv<W: Write>(
    outcome: &SettlementOutcome,
    writer: W,
) -> TripsplitResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["kind", "participant", "counterparty", "paid", "share", "net", "amount"])
        .map_err(export_err)?;

    for balance in outcome.balances.values() {
        csv_writer
            .write_record([
                "balance".to_string(),
                balance.participant.clone(),
                String::new(),
                format!("{:.2}", balance.total_paid),
                format!("{:.2}", balance.total_owed),
                format!("{:.2}", balance.net_balance),
                String::new(),
            ])
            .map_err(export_err)?;
    }

    for transfer in &outcome.transfers {
        csv_writer
            .write_record([
                "transfer".to_string(),
                transfer.debtor.clone(),
                transfer.creditor.clone(),
                String::new(),
                String::new(),
                String::new(),
                format!("{:.2}", transfer.amount),
            ])
            .map_err(export_err)?;
    }

    csv_writer.flush().map_err(export_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{LiteralResolver, SettlementEngine};

    #[test]
    fn test_export_expenses() {
        let expenses = vec![SharedExpense::new(45.5, "alice", vec!["bob".into(), "carol".into()])
            .with_description("Groceries, market")
            .with_trip("Lisbon")];

        let mut buffer = Vec::new();
        export_expenses_csv(&expenses, &mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();

        assert!(csv.starts_with("date,description,amount,payer,participants,trip\n"));
        assert!(csv.contains("\"Groceries, market\",45.5,alice,bob;carol,Lisbon"));
    }

    #[test]
    fn test_export_settlement() {
        let expenses = vec![SharedExpense::new(90.0, "A", vec!["B".into(), "C".into()])];
        let outcome = SettlementEngine::default()
            .compute(&expenses, &LiteralResolver)
            .unwrap();

        let mut buffer = Vec::new();
        export_settlement_csv(&outcome, &mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();

        assert!(csv.contains("balance,A,,90.00,30.00,60.00,"));
        assert!(csv.contains("transfer,B,A,,,,30.00"));
        assert!(csv.contains("transfer,C,A,,,,30.00"));
        assert_eq!(csv.lines().count(), 6);
    }
}
