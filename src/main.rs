use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use tripsplit::cli::{
    handle_audit_command, handle_balance_command, handle_contact_command, handle_expense_command,
    handle_export_command, handle_member_command, handle_report_command, handle_settle_command,
    ExportFormat, ExportOptions,
};
use tripsplit::config::{paths::TripsplitPaths, settings::Settings};
use tripsplit::services::SettlementEngine;
use tripsplit::storage::Storage;

#[derive(Parser)]
#[command(
    name = "tripsplit",
    author = "Kaylee Beyene",
    version,
    about = "Split shared trip and household expenses and settle up",
    long_about = "tripsplit records expenses paid by one person and shared with others, \
                  computes what everyone paid and owes, and turns the result into a short \
                  list of transfers that settles every debt."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Shared expense commands
    #[command(subcommand, alias = "exp")]
    Expense(tripsplit::cli::ExpenseCommands),

    /// Family member commands
    #[command(subcommand)]
    Member(tripsplit::cli::MemberCommands),

    /// Contact commands
    #[command(subcommand)]
    Contact(tripsplit::cli::ContactCommands),

    /// Show what everyone paid, owes and is owed
    Balance {
        /// Only expenses of this trip
        #[arg(short, long)]
        trip: Option<String>,
    },

    /// Settlement plan commands
    #[command(subcommand)]
    Settle(tripsplit::cli::SettleCommands),

    /// Show expense totals by payer and trip
    Report {
        /// Only expenses of this trip
        #[arg(short, long)]
        trip: Option<String>,
        /// Write the report as CSV to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export expenses, balances and the settlement plan
    Export {
        /// Export format
        #[arg(value_enum)]
        format: ExportFormat,
        /// Only expenses of this trip
        #[arg(short, long)]
        trip: Option<String>,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Export the expense list in import layout (CSV only)
        #[arg(long)]
        expenses: bool,
    },

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = TripsplitPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    let engine = SettlementEngine::with_epsilon(settings.settlement_epsilon);

    match cli.command {
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Member(cmd)) => {
            handle_member_command(&storage, cmd)?;
        }
        Some(Commands::Contact(cmd)) => {
            handle_contact_command(&storage, cmd)?;
        }
        Some(Commands::Balance { trip }) => {
            handle_balance_command(&storage, &settings, &engine, trip)?;
        }
        Some(Commands::Settle(cmd)) => {
            handle_settle_command(&storage, &settings, &engine, cmd)?;
        }
        Some(Commands::Report { trip, output }) => {
            handle_report_command(&storage, &settings, trip, output)?;
        }
        Some(Commands::Export {
            format,
            trip,
            output,
            expenses,
        }) => {
            handle_export_command(
                &storage,
                &settings,
                &engine,
                ExportOptions {
                    format,
                    trip,
                    output,
                    expenses_only: expenses,
                },
            )?;
        }
        Some(Commands::Audit { limit }) => {
            handle_audit_command(&storage, limit)?;
        }
        Some(Commands::Init) => {
            println!("Initializing tripsplit at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            storage.save_all()?;
            println!("Initialization complete!");
            println!();
            println!("Next steps:");
            println!("  tripsplit member add <name>");
            println!("  tripsplit expense add <amount> --payer <who> --with <who>...");
            println!("  tripsplit settle plan");
        }
        Some(Commands::Config) => {
            println!("tripsplit Configuration");
            println!("=======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency:           {} ({})", settings.currency_symbol, settings.currency_code);
            println!("  Date format:        {}", settings.date_format);
            println!("  Settlement epsilon: {:e}", settings.settlement_epsilon);
            println!(
                "  Default payer:      {}",
                settings.default_payer.as_deref().unwrap_or("(none)")
            );
        }
        None => {
            println!("tripsplit - shared expense splitting and settlement");
            println!();
            println!("Run 'tripsplit --help' for usage information.");
        }
    }

    Ok(())
}
