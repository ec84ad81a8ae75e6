//! Expense Summary Report
//!
//! Rollups over a list of shared expenses: totals, counts, the mean, and
//! per-payer and per-trip totals.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use crate::error::{TripsplitError, TripsplitResult};
use crate::models::{ExpenseId, SharedExpense};
use crate::services::balance::participant_set;
use crate::services::identity::IdentityResolver;

/// Label used for expenses that carry no trip
pub const NO_TRIP: &str = "(no trip)";

/// Totals for a single payer or trip
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub label: String,
    pub total: f64,
    pub count: usize,
    /// Share of the overall total, in percent
    pub percentage: f64,
}

/// Expense Summary Report
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseSummary {
    pub total_amount: f64,
    pub expense_count: usize,
    pub mean_amount: f64,
    /// Largest valid expense, if any
    pub largest: Option<(ExpenseId, f64)>,
    /// Totals by resolved payer name, largest first
    pub by_payer: Vec<SummaryRow>,
    /// Totals by trip, largest first
    pub by_trip: Vec<SummaryRow>,
    /// Distinct resolved participants, payers included
    pub participant_count: usize,
    /// Expenses excluded for invalid amounts or payers
    pub skipped_count: usize,
}

impl ExpenseSummary {
    /// Generate the summary for a list of expenses
    pub fn generate<R>(expenses: &[SharedExpense], resolver: &R) -> Self
    where
        R: IdentityResolver + ?Sized,
    {
        let mut total_amount = 0.0;
        let mut expense_count = 0;
        let mut skipped_count = 0;
        let mut largest: Option<(ExpenseId, f64)> = None;
        let mut payers: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        let mut trips: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        let mut participants: BTreeSet<String> = BTreeSet::new();

        for expense in expenses {
            if expense.validate().is_err() {
                skipped_count += 1;
                continue;
            }

            let amount = expense.total_amount;
            total_amount += amount;
            expense_count += 1;

            if largest.map_or(true, |(_, max)| amount > max) {
                largest = Some((expense.id, amount));
            }

            let payer = payers
                .entry(resolver.resolve(&expense.payer_id))
                .or_insert((0.0, 0));
            payer.0 += amount;
            payer.1 += 1;

            let trip = trips
                .entry(expense.trip.clone().unwrap_or_else(|| NO_TRIP.to_string()))
                .or_insert((0.0, 0));
            trip.0 += amount;
            trip.1 += 1;

            participants.extend(participant_set(expense, resolver));
        }

        let mean_amount = if expense_count == 0 {
            0.0
        } else {
            total_amount / expense_count as f64
        };

        Self {
            total_amount,
            expense_count,
            mean_amount,
            largest,
            by_payer: rows(payers, total_amount),
            by_trip: rows(trips, total_amount),
            participant_count: participants.len(),
            skipped_count,
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let money = |amount: f64| format!("{}{:.2}", currency_symbol, amount);
        let mut output = String::new();

        output.push_str("Expense Summary\n");
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("Total Spent:   {}\n", money(self.total_amount)));
        output.push_str(&format!("Expenses:      {}\n", self.expense_count));
        output.push_str(&format!("Average:       {}\n", money(self.mean_amount)));
        if let Some((id, amount)) = self.largest {
            output.push_str(&format!("Largest:       {} ({})\n", money(amount), id));
        }
        output.push_str(&format!("Participants:  {}\n", self.participant_count));
        if self.skipped_count > 0 {
            output.push_str(&format!("Skipped:       {} invalid\n", self.skipped_count));
        }

        for (title, rows) in [("By Payer", &self.by_payer), ("By Trip", &self.by_trip)] {
            if rows.is_empty() {
                continue;
            }
            output.push_str(&format!(
                "\n{:<30} {:>12} {:>6} {:>8}\n",
                title, "Amount", "Count", "%"
            ));
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for row in rows {
                output.push_str(&format!(
                    "{:<30} {:>12} {:>6} {:>7.1}%\n",
                    row.label,
                    money(row.total),
                    row.count,
                    row.percentage
                ));
            }
        }

        output
    }

    /// Export the per-payer and per-trip rows as CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> TripsplitResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer
            .write_record(["Group", "Label", "Amount", "Count", "Percentage"])
            .map_err(|e| TripsplitError::Export(e.to_string()))?;

        for (group, rows) in [("payer", &self.by_payer), ("trip", &self.by_trip)] {
            for row in rows {
                csv_writer
                    .write_record([
                        group.to_string(),
                        row.label.clone(),
                        format!("{:.2}", row.total),
                        row.count.to_string(),
                        format!("{:.2}", row.percentage),
                    ])
                    .map_err(|e| TripsplitError::Export(e.to_string()))?;
            }
        }

        csv_writer
            .flush()
            .map_err(|e| TripsplitError::Export(e.to_string()))?;
        Ok(())
    }
}

fn rows(totals: BTreeMap<String, (f64, usize)>, grand_total: f64) -> Vec<SummaryRow> {
    let mut rows: Vec<SummaryRow> = totals
        .into_iter()
        .map(|(label, (total, count))| SummaryRow {
            percentage: if grand_total > 0.0 {
                total / grand_total * 100.0
            } else {
                0.0
            },
            label,
            total,
            count,
        })
        .collect();

    // Largest first, name breaks ties
    rows.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.label.cmp(&b.label)));
    rows
}
