use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use kakebo_core::VERSION;

/// Kakebo - a household budget book for the command line
#[derive(Parser)]
#[command(name = "kakebo")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the store file
    #[arg(long, global = true, env = "KAKEBO_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a config file and create the store
    Init(InitArgs),

    /// Record and list expenses
    #[command(subcommand)]
    Expenses(ExpensesCommand),

    /// Show or set the income of a period
    #[command(subcommand)]
    Income(IncomeCommand),

    /// Show or set the savings target of a period
    #[command(subcommand)]
    Target(TargetCommand),

    /// Income, target and spending for a period
    Summary(SummaryArgs),

    /// Delete every expense, income and target
    Clear(ClearArgs),

    /// Run an integrity check on the store
    Check,

    /// Write a consistent copy of the store
    Backup(BackupArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Where the store will be created
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Group records by ISO week instead of by month
    #[arg(long)]
    pub weekly: bool,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Period selection shared by every command that reads or writes a period.
///
/// With no flags the current period of the configured kind is used.
#[derive(Args, Debug, Default, Clone)]
pub struct PeriodArgs {
    /// Month name, e.g. "June" (defaults to the current month)
    #[arg(long, conflicts_with = "week")]
    pub month: Option<String>,

    /// Year, e.g. "2017" (defaults to the current year)
    #[arg(long, conflicts_with = "week")]
    pub year: Option<String>,

    /// ISO week number
    #[arg(long)]
    pub week: Option<u32>,
}

#[derive(Subcommand)]
pub enum ExpensesCommand {
    /// Record a new expense
    Add(AddExpenseArgs),
    /// List expenses of a period
    List(ListExpensesArgs),
}

/// Arguments for `expenses add`
#[derive(Args)]
pub struct AddExpenseArgs {
    /// What the money was spent on
    #[arg(short, long)]
    pub description: String,

    /// Amount in whole currency units
    #[arg(short, long, allow_negative_numbers = true)]
    pub amount: i64,

    /// survival, optional, culture or extra
    #[arg(short, long)]
    pub category: String,

    #[command(flatten)]
    pub period: PeriodArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `expenses list`
#[derive(Args)]
pub struct ListExpensesArgs {
    #[command(flatten)]
    pub period: PeriodArgs,

    /// List expenses of every period
    #[arg(long, conflicts_with_all = ["month", "year", "week"])]
    pub all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum IncomeCommand {
    /// Show the income of a period
    Show(ShowArgs),
    /// Set the income of a period
    Set(SetIncomeArgs),
}

#[derive(Subcommand)]
pub enum TargetCommand {
    /// Show the savings target of a period
    Show(ShowArgs),
    /// Set the savings target of a period
    Set(SetTargetArgs),
}

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub period: PeriodArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct SetIncomeArgs {
    /// Income in whole currency units
    #[arg(value_name = "AMOUNT", allow_negative_numbers = true)]
    pub amount: i64,

    #[command(flatten)]
    pub period: PeriodArgs,
}

#[derive(Args)]
pub struct SetTargetArgs {
    /// Savings target, stored as given
    #[arg(value_name = "AMOUNT")]
    pub amount: String,

    #[command(flatten)]
    pub period: PeriodArgs,
}

#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub period: PeriodArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct BackupArgs {
    /// Destination file
    #[arg(value_name = "DEST")]
    pub destination: PathBuf,
}
