pub mod add;
pub mod dashboard;
pub mod delete;
pub mod edit;
pub mod export;
pub mod init;
pub mod list;
pub mod status;
pub mod summary;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::gateway::TransactionGateway;
use crate::models::{TransactionFilter, TransactionType};
use crate::service::TransactionService;
use crate::settings::{load_settings, Settings};

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("'{s}' is not a date in YYYY-MM-DD format"))
}

/// Settings plus the resolved database location, shared by every command.
pub struct Context {
    pub settings: Settings,
    pub db_path: PathBuf,
    db_override: bool,
}

impl Context {
    pub fn load(db_override: Option<PathBuf>) -> Self {
        let settings = load_settings();
        let explicit = db_override.is_some();
        let db_path = db_override.unwrap_or_else(|| settings.db_path());
        Self { settings, db_path, db_override: explicit }
    }

    /// The `--db` path if one was given, else the database inside `settings`.
    pub fn db_path_for(&self, settings: &Settings) -> PathBuf {
        if self.db_override {
            self.db_path.clone()
        } else {
            settings.db_path()
        }
    }

    pub fn service(&self) -> TransactionService {
        TransactionService::new(TransactionGateway::new(self.db_path.clone()))
    }

    pub fn symbol(&self) -> &str {
        &self.settings.currency_symbol
    }
}

#[derive(Parser)]
#[command(name = "tally", version, about = "Personal income and expense tracker.")]
pub struct Cli {
    /// Database file (default: <data_dir>/tally.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log level (default: $TALLY_LOG, else warn)
    #[arg(
        long = "log-level",
        global = true,
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and create the database.
    Init {
        /// Path for tally data (default: ~/Documents/tally)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Currency symbol used when printing amounts
        #[arg(long)]
        currency: Option<String>,
    },
    /// Record a new transaction.
    Add {
        /// Amount, greater than zero
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Category label, e.g. Food
        #[arg(long)]
        category: String,
        /// income or expense
        #[arg(long = "type")]
        kind: TransactionType,
        /// Date: YYYY-MM-DD (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// Free-text notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Change fields of an existing transaction.
    Edit {
        /// Transaction ID (shown in `tally list`)
        #[arg(allow_negative_numbers = true)]
        id: i64,
        #[arg(long, allow_negative_numbers = true)]
        amount: Option<f64>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long = "type")]
        kind: Option<TransactionType>,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a transaction.
    Delete {
        /// Transaction ID (shown in `tally list`)
        #[arg(allow_negative_numbers = true)]
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// List transactions, newest first. Any filter flag narrows the list.
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Total income, total expense and balance.
    Summary {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Expense totals per category.
    Chart,
    /// Write transactions to CSV.
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        /// Output file (default: <data_dir>/exports/transactions-YYYY-MM-DD.csv)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Interactive dashboard: summary, transactions and expense chart.
    Dashboard,
    /// Show settings, database location and record count.
    Status,
    /// Print shell completions.
    Completions {
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Start date, inclusive: YYYY-MM-DD
    #[arg(long = "from", value_parser = parse_date)]
    pub from: Option<NaiveDate>,
    /// End date, inclusive: YYYY-MM-DD
    #[arg(long = "to", value_parser = parse_date)]
    pub to: Option<NaiveDate>,
    /// Exact category label
    #[arg(long)]
    pub category: Option<String>,
    /// income or expense
    #[arg(long = "type")]
    pub kind: Option<TransactionType>,
}

impl From<FilterArgs> for TransactionFilter {
    fn from(args: FilterArgs) -> Self {
        TransactionFilter {
            start: args.from,
            end: args.to,
            category: args.category,
            kind: args.kind,
        }
    }
}
