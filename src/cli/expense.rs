//! Expense CLI commands
//!
//! Implements CLI commands for recording, listing and importing shared
//! expenses.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_amount, format_expense_details, format_expense_register};
use crate::error::{TripsplitError, TripsplitResult};
use crate::services::{
    ColumnMapping, CreateExpenseInput, DirectoryResolver, ExpenseFilter, ExpenseService,
    IdentityResolver, ImportService,
};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a shared expense
    #[command(allow_negative_numbers = true)]
    Add {
        /// Total amount paid
        amount: f64,
        /// Who paid (member ID, contact email or name); defaults to the configured payer
        #[arg(short, long)]
        payer: Option<String>,
        /// People sharing the cost, excluding the payer unless listed
        #[arg(short, long = "with", num_args = 1..)]
        with: Vec<String>,
        /// Trip or group this expense belongs to
        #[arg(short, long)]
        trip: Option<String>,
        /// Expense date (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// List expenses
    List {
        /// Only expenses of this trip
        #[arg(short, long)]
        trip: Option<String>,
        /// Only expenses paid by this person
        #[arg(short, long)]
        payer: Option<String>,
        /// Number of expenses to show (most recent)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show expense details
    Show {
        /// Expense ID
        id: String,
    },
    /// Delete an expense
    Delete {
        /// Expense ID
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Import expenses from CSV (date, description, amount, payer, participants)
    Import {
        /// Path to CSV file
        file: PathBuf,
        /// Trip to tag imported expenses with
        #[arg(short, long)]
        trip: Option<String>,
        /// Date format used in the file (defaults to the configured format)
        #[arg(long)]
        date_format: Option<String>,
        /// Field delimiter (single ASCII character)
        #[arg(long, default_value_t = ',')]
        delimiter: char,
        /// The file has no header row
        #[arg(long)]
        no_header: bool,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> TripsplitResult<()> {
    let service = ExpenseService::new(storage);
    let members = storage.members.get_all()?;
    let contacts = storage.contacts.get_all()?;
    let resolver = DirectoryResolver::new(&members, &contacts);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            amount,
            payer,
            with,
            trip,
            date,
            description,
        } => {
            let payer_id = payer
                .or_else(|| settings.default_payer.clone())
                .ok_or_else(|| {
                    TripsplitError::Validation(
                        "No payer given. Use --payer or set default_payer in config.json".into(),
                    )
                })?;

            let date = date
                .map(|d| parse_date(&d, &settings.date_format))
                .transpose()?;

            let expense = service.create(CreateExpenseInput {
                total_amount: amount,
                payer_id,
                participant_ids: with,
                description,
                trip,
                date,
            })?;

            println!(
                "Recorded {} paid by {} ({})",
                format_amount(expense.total_amount, symbol),
                resolver.resolve(&expense.payer_id),
                expense.id
            );
        }

        ExpenseCommands::List { trip, payer, limit } => {
            let filter = ExpenseFilter { trip, payer, limit };
            let expenses = service.list(&filter)?;

            print!("{}", format_expense_register(&expenses, &resolver, symbol));
            if !expenses.is_empty() {
                println!("\nTotal: {} expenses", expenses.len());
            }
        }

        ExpenseCommands::Show { id } => {
            let expense = service
                .find(&id)?
                .ok_or_else(|| TripsplitError::expense_not_found(&id))?;

            print!("{}", format_expense_details(&expense, &resolver, symbol));
        }

        ExpenseCommands::Delete { id, force } => {
            let expense = service
                .find(&id)?
                .ok_or_else(|| TripsplitError::expense_not_found(&id))?;

            if !force {
                println!("About to delete expense: {}", expense);
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            let deleted = service.delete(expense.id)?;
            println!("Deleted expense: {}", deleted);
        }

        ExpenseCommands::Import {
            file,
            trip,
            date_format,
            delimiter,
            no_header,
        } => {
            let mapping = ColumnMapping::new()
                .with_date_format(date_format.as_deref().unwrap_or(&settings.date_format))
                .with_header(!no_header)
                .with_delimiter(delimiter)?;

            let result =
                ImportService::new(storage).import_file(&file, Some(mapping), trip.as_deref())?;

            println!("Imported {} expenses from {}", result.imported, file.display());
            if result.duplicates_skipped > 0 {
                println!("Skipped {} duplicates", result.duplicates_skipped);
            }
            if result.errors > 0 {
                println!("{} rows had errors:", result.errors);
                for (row, message) in &result.error_messages {
                    println!("  row {}: {}", row, message);
                }
            }
        }
    }

    Ok(())
}

/// Parse a date using the configured format, falling back to ISO dates
fn parse_date(s: &str, format: &str) -> TripsplitResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), format)
        .or_else(|_| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d"))
        .map_err(|_| TripsplitError::Validation(format!("Invalid date: '{}'", s)))
}
