use kakebo_core::LedgerStorage;

use crate::app::AppContext;
use crate::cli::{SetTargetArgs, ShowArgs};
use crate::errors::CliError;

pub fn handle_target_show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let key = ctx.period(&args.period)?.key();
    let store = ctx.open_store()?;
    let target = store.get_savings_goal(&key)?;
    let raw = store.savings_goal_raw(&key)?;

    if args.json {
        let value = serde_json::json!({
            "period": key.as_str(),
            "target": target,
            "raw": raw,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if ctx.quiet() {
        println!("{}", target);
    } else {
        match raw {
            Some(raw) if raw.parse::<i64>().is_err() => {
                println!("Savings target for {}: {} (not a number, counted as 0)", key, raw);
            }
            _ => println!("Savings target for {}: {}", key, target),
        }
    }
    Ok(())
}

pub fn handle_target_set(ctx: &AppContext, args: &SetTargetArgs) -> anyhow::Result<()> {
    if args.amount.trim().is_empty() {
        return Err(CliError::invalid_input("Savings target cannot be empty").into());
    }
    let key = ctx.period(&args.period)?.key();
    let mut store = ctx.open_store()?;
    store.set_savings_goal(&key, &args.amount)?;
    store.close()?;

    if !ctx.quiet() {
        println!("Savings target for {} set to {}", key, args.amount);
    }
    Ok(())
}
