//! Balance and settlement plan display
//!
//! Renders participant balances and transfer lists as terminal tables.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::models::{ParticipantBalance, SettlementTransfer};
use crate::services::{BalanceMap, SettlementPlanner, SkippedExpense};

use super::format::{format_amount, format_signed};

#[derive(Tabled)]
struct BalanceRow {
    #[tabled(rename = "Participant")]
    participant: String,
    #[tabled(rename = "Paid")]
    paid: String,
    #[tabled(rename = "Share")]
    owed: String,
    #[tabled(rename = "Net")]
    net: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

#[derive(Tabled)]
struct TransferRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "From")]
    debtor: String,
    #[tabled(rename = "To")]
    creditor: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

fn status(balance: &ParticipantBalance, planner: &SettlementPlanner) -> &'static str {
    if planner.is_creditor(balance) {
        "is owed"
    } else if planner.is_debtor(balance) {
        "owes"
    } else {
        "settled"
    }
}

/// Format participant balances as a table
///
/// The status column uses the planner's own zero test, so it agrees with the
/// settlement plan about who is settled.
pub fn format_balance_table(
    balances: &BalanceMap,
    symbol: &str,
    planner: &SettlementPlanner,
) -> String {
    if balances.is_empty() {
        return "No shared expenses found.".to_string();
    }

    let rows: Vec<BalanceRow> = balances
        .values()
        .map(|b| BalanceRow {
            participant: b.participant.clone(),
            paid: format_amount(b.total_paid, symbol),
            owed: format_amount(b.total_owed, symbol),
            net: format_signed(b.net_balance, symbol),
            status: status(b, planner),
        })
        .collect();

    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..4)).with(Alignment::right()))
        .to_string()
}

/// Format a settlement plan as a table
pub fn format_transfer_table(transfers: &[SettlementTransfer], symbol: &str) -> String {
    if transfers.is_empty() {
        return "Everyone is settled up.".to_string();
    }

    let rows: Vec<TransferRow> = transfers
        .iter()
        .enumerate()
        .map(|(i, t)| TransferRow {
            index: i + 1,
            debtor: t.debtor.clone(),
            creditor: t.creditor.clone(),
            amount: format_amount(t.amount, symbol),
        })
        .collect();

    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::single(3)).with(Alignment::right()))
        .to_string()
}

/// One line telling the user how many expenses were left out
pub fn format_skipped(skipped: &[SkippedExpense]) -> Option<String> {
    match skipped.len() {
        0 => None,
        1 => Some(format!(
            "1 expense skipped ({}: {})",
            skipped[0].expense_id, skipped[0].reason
        )),
        n => Some(format!(
            "{} expenses skipped because of invalid amounts or payers",
            n
        )),
    }
}
