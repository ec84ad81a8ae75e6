//! Balance, settlement and report CLI commands

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_amount, format_balance_table, format_skipped, format_transfer_table};
use crate::error::{TripsplitError, TripsplitResult};
use crate::reports::ExpenseSummary;
use crate::services::{DirectoryResolver, SettlementEngine, SplitService};
use crate::storage::Storage;

/// Settlement subcommands
#[derive(Subcommand)]
pub enum SettleCommands {
    /// Show who should pay whom to settle all debts
    Plan {
        /// Only expenses of this trip
        #[arg(short, long)]
        trip: Option<String>,
    },
    /// Report a transfer as paid (recorded in the audit log only)
    MarkPaid {
        /// Who paid
        debtor: String,
        /// Who received the money
        creditor: String,
        /// Amount paid
        amount: f64,
        /// Trip the payment settles
        #[arg(short, long)]
        trip: Option<String>,
    },
}

/// Print participant balances
pub fn handle_balance_command(
    storage: &Storage,
    settings: &Settings,
    engine: &SettlementEngine,
    trip: Option<String>,
) -> TripsplitResult<()> {
    let outcome = SplitService::new(storage, engine).outcome(trip.as_deref())?;

    if let Some(trip) = &trip {
        println!("Balances for trip: {}", trip);
        println!();
    }
    println!(
        "{}",
        format_balance_table(
            &outcome.balances,
            &settings.currency_symbol,
            engine.planner()
        )
    );

    if let Some(line) = format_skipped(&outcome.skipped) {
        println!();
        println!("{}", line);
    }

    Ok(())
}

/// Handle a settle command
pub fn handle_settle_command(
    storage: &Storage,
    settings: &Settings,
    engine: &SettlementEngine,
    cmd: SettleCommands,
) -> TripsplitResult<()> {
    let service = SplitService::new(storage, engine);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        SettleCommands::Plan { trip } => {
            let outcome = service.outcome(trip.as_deref())?;

            println!("{}", format_transfer_table(&outcome.transfers, symbol));
            if !outcome.transfers.is_empty() {
                println!();
                for transfer in &outcome.transfers {
                    println!(
                        "  {} pays {} {}",
                        transfer.debtor,
                        transfer.creditor,
                        format_amount(transfer.amount, symbol)
                    );
                }
            }

            if let Some(line) = format_skipped(&outcome.skipped) {
                println!();
                println!("{}", line);
            }
        }

        SettleCommands::MarkPaid {
            debtor,
            creditor,
            amount,
            trip,
        } => {
            let (transfer, planned) =
                service.mark_paid(&debtor, &creditor, amount, trip.as_deref())?;

            println!(
                "Payment of {} from {} to {} marked as paid.",
                format_amount(transfer.amount, symbol),
                transfer.debtor,
                transfer.creditor
            );
            if !planned {
                println!("Note: this payment does not match a transfer in the current plan.");
            }
            println!("Balances are still computed from the recorded expenses.");
        }
    }

    Ok(())
}

/// Print the expense summary report, optionally writing it as CSV
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    trip: Option<String>,
    output: Option<PathBuf>,
) -> TripsplitResult<()> {
    let expenses = match &trip {
        Some(trip) => storage.expenses.get_by_trip(trip)?,
        None => storage.expenses.get_all()?,
    };
    let members = storage.members.get_all()?;
    let contacts = storage.contacts.get_all()?;
    let resolver = DirectoryResolver::new(&members, &contacts);

    let summary = ExpenseSummary::generate(&expenses, &resolver);

    match output {
        Some(path) => {
            let file = File::create(&path)
                .map_err(|e| TripsplitError::Export(format!("{}: {}", path.display(), e)))?;
            summary.export_csv(BufWriter::new(file))?;
            println!("Report written to {}", path.display());
        }
        None => print!("{}", summary.format_terminal(&settings.currency_symbol)),
    }

    Ok(())
}
