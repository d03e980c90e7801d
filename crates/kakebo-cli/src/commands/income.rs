use kakebo_core::LedgerStorage;

use crate::app::AppContext;
use crate::cli::{SetIncomeArgs, ShowArgs};

pub fn handle_income_show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let key = ctx.period(&args.period)?.key();
    let store = ctx.open_store()?;
    let income = store.get_income(&key)?;

    if args.json {
        let value = serde_json::json!({ "period": key.as_str(), "income": income });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if ctx.quiet() {
        println!("{}", income);
    } else {
        println!("Income for {}: {}", key, income);
    }
    Ok(())
}

pub fn handle_income_set(ctx: &AppContext, args: &SetIncomeArgs) -> anyhow::Result<()> {
    let key = ctx.period(&args.period)?.key();
    let mut store = ctx.open_store()?;
    store.set_income(&key, args.amount)?;
    store.close()?;

    if !ctx.quiet() {
        println!("Income for {} set to {}", key, args.amount);
    }
    Ok(())
}
