//! Kakebo CLI - a household budget book for the command line
//!
//! This is the command-line interface for Kakebo. It provides a user-friendly
//! interface to the core library functionality.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use app::AppContext;
use cli::{Cli, Commands, ExpensesCommand, IncomeCommand, TargetCommand};
use constants::LOG_ENV;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Err(err) = run(&cli) {
        errors::classify(err).exit();
    }
}

/// Log to stderr; `KAKEBO_LOG` wins over `-v`.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(format!("kakebo_core={level},kakebo={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let Some(command) = &cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    if let Commands::Completions { shell } = command {
        return commands::handle_completions(*shell);
    }

    if let Commands::Init(args) = command {
        let ctx = AppContext::for_init(cli)?;
        return commands::handle_init(&ctx, args);
    }

    let ctx = AppContext::new(cli)?;
    match command {
        Commands::Init(_) => Ok(()),
        Commands::Expenses(ExpensesCommand::Add(args)) => commands::handle_add_expense(&ctx, args),
        Commands::Expenses(ExpensesCommand::List(args)) => {
            commands::handle_list_expenses(&ctx, args)
        }
        Commands::Income(IncomeCommand::Show(args)) => commands::handle_income_show(&ctx, args),
        Commands::Income(IncomeCommand::Set(args)) => commands::handle_income_set(&ctx, args),
        Commands::Target(TargetCommand::Show(args)) => commands::handle_target_show(&ctx, args),
        Commands::Target(TargetCommand::Set(args)) => commands::handle_target_set(&ctx, args),
        Commands::Summary(args) => commands::handle_summary(&ctx, args),
        Commands::Clear(args) => commands::handle_clear(&ctx, args),
        Commands::Check => commands::handle_check(&ctx),
        Commands::Backup(args) => commands::handle_backup(&ctx, args),
        Commands::Completions { .. } => Ok(()),
    }
}
