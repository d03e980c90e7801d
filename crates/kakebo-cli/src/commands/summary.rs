use kakebo_core::LedgerStorage;

use crate::app::AppContext;
use crate::cli::SummaryArgs;
use crate::output::{print_summary, summary_json};

pub fn handle_summary(ctx: &AppContext, args: &SummaryArgs) -> anyhow::Result<()> {
    let key = ctx.period(&args.period)?.key();
    let store = ctx.open_store()?;
    let summary = store.summary(&key)?;
    let totals = store.category_totals(&key)?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary_json(&summary, &totals))?
        );
    } else if ctx.quiet() {
        println!("{}", summary.remaining);
    } else {
        print_summary(&summary, &totals);
    }
    Ok(())
}
