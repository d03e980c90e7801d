//! Table output for expenses and summaries.

use std::collections::BTreeMap;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use kakebo_core::storage::{Category, Expense, PeriodSummary};

/// Build the expense table; the last row holds the total.
pub fn expense_table(expenses: &[Expense]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Description", "Category", "Amount", "Period"]);

    for expense in expenses {
        table.add_row(vec![
            Cell::new(expense.id),
            Cell::new(&expense.description),
            Cell::new(expense.category),
            Cell::new(expense.amount).set_alignment(CellAlignment::Right),
            Cell::new(expense.period.to_string()),
        ]);
    }

    // Widened so any number of i64 amounts sums without overflow.
    let total: i128 = expenses.iter().map(|e| i128::from(e.amount)).sum();
    table.add_row(vec![
        Cell::new(""),
        Cell::new("Total"),
        Cell::new(""),
        Cell::new(total).set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);
    table
}

pub fn print_expense_list(expenses: &[Expense], quiet: bool) {
    if quiet {
        for expense in expenses {
            println!("{}", expense);
        }
        return;
    }
    if expenses.is_empty() {
        println!("No expenses found.");
        return;
    }
    println!("{}", expense_table(expenses));
}

pub fn print_summary(summary: &PeriodSummary, totals: &BTreeMap<Category, i64>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![summary.period.as_str(), ""]);

    let rows = [
        ("Income", summary.income),
        ("Savings target", summary.savings_goal),
        ("Spent", summary.spent),
        ("Remaining", summary.remaining),
    ];
    for (label, value) in rows {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }
    for category in Category::ALL {
        let spent = totals.get(&category).copied().unwrap_or(0);
        table.add_row(vec![
            Cell::new(format!("  {}", category)),
            Cell::new(spent).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{}", table);
}
