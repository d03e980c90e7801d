use std::io::IsTerminal;

use kakebo_core::period::PeriodKind;
use kakebo_core::{LedgerStorage, Store};

use crate::app::AppContext;
use crate::cli::{BackupArgs, ClearArgs, InitArgs};
use crate::config::{default_store_path, write_config, KakeboConfig};
use crate::errors::CliError;

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = ctx.config_path();
    if config_path.exists() && !args.force {
        return Err(CliError::invalid_input_with_hint(
            format!("Config already exists at {}", config_path.display()),
            "Pass --force to overwrite it.",
        )
        .into());
    }

    let store_path = match (&args.path, &ctx.cli().db) {
        (Some(path), _) | (None, Some(path)) => path.clone(),
        (None, None) => default_store_path()?,
    };
    let kind = if args.weekly {
        PeriodKind::Week
    } else {
        PeriodKind::Month
    };
    let config = KakeboConfig::new(store_path.clone(), kind);

    let mut store = Store::open_with(&store_path, config.store_options())?;
    store.close()?;
    write_config(config_path, &config)?;
    tracing::info!(config = %config_path.display(), store = %store_path.display(), "initialized");

    if !ctx.quiet() {
        println!("Created store at {}", store_path.display());
        println!("Wrote config to {}", config_path.display());
    }
    Ok(())
}

pub fn handle_check(ctx: &AppContext) -> anyhow::Result<()> {
    let store = ctx.open_existing_store()?;
    match store.check_integrity() {
        Ok(()) => {
            if !ctx.quiet() {
                println!("Integrity check: OK");
                println!("- buckets: OK");
                println!("- expense keys: OK");
                println!("- income and target values: OK");
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("Integrity check: FAILED");
            eprintln!("- error: {}", err);
            Err(CliError::integrity_failed("Integrity check failed").into())
        }
    }
}

pub fn handle_clear(ctx: &AppContext, args: &ClearArgs) -> anyhow::Result<()> {
    if !args.yes {
        if !std::io::stdin().is_terminal() {
            return Err(CliError::invalid_input_with_hint(
                "Refusing to clear without confirmation",
                "Pass --yes to clear non-interactively.",
            )
            .into());
        }
        let proceed = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Delete every expense, income and target in {}?",
                ctx.store_path().display()
            ))
            .default(false)
            .interact()?;
        if !proceed {
            return Err(anyhow::anyhow!("Clear cancelled"));
        }
    }

    let mut store = ctx.open_existing_store()?;
    store.clear()?;
    store.close()?;

    if !ctx.quiet() {
        println!("Cleared {}", ctx.store_path().display());
    }
    Ok(())
}

pub fn handle_backup(ctx: &AppContext, args: &BackupArgs) -> anyhow::Result<()> {
    let store = ctx.open_existing_store()?;
    if let Some(parent) = args.destination.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!(
                    "Failed to create backup directory {}: {}",
                    parent.display(),
                    e
                )
            })?;
        }
    }
    store.backup_to(&args.destination)?;

    if !ctx.quiet() {
        println!("Backed up store to {}", args.destination.display());
    }
    Ok(())
}
