use kakebo_core::storage::NewExpense;
use kakebo_core::LedgerStorage;

use crate::app::AppContext;
use crate::cli::{AddExpenseArgs, ListExpensesArgs};
use crate::output::{expense_json, expenses_json, print_expense_list};

pub fn handle_add_expense(ctx: &AppContext, args: &AddExpenseArgs) -> anyhow::Result<()> {
    let period = ctx.period(&args.period)?;
    let expense = NewExpense::parse(&args.description, &args.category, args.amount, period)?;

    let mut store = ctx.open_store()?;
    let id = store.add_expense(expense.clone())?;
    store.close()?;

    if args.json {
        let saved = expense.into_expense(id);
        println!("{}", serde_json::to_string_pretty(&expense_json(&saved))?);
    } else if ctx.quiet() {
        println!("{}", id);
    } else {
        println!("Added expense {} to {}", id, expense.period);
    }
    Ok(())
}

pub fn handle_list_expenses(ctx: &AppContext, args: &ListExpensesArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let expenses = if args.all {
        store.list_expenses()?
    } else {
        let period = ctx.period(&args.period)?;
        store.list_expenses_for_period(&period.key())?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&expenses_json(&expenses))?);
    } else {
        print_expense_list(&expenses, ctx.quiet());
    }
    Ok(())
}
