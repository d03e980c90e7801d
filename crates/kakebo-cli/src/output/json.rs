//! JSON output formatting.

use std::collections::BTreeMap;

use kakebo_core::storage::{Category, Expense, PeriodSummary};

/// Convert an expense to JSON for output.
pub fn expense_json(expense: &Expense) -> serde_json::Value {
    serde_json::json!({
        "id": expense.id,
        "description": expense.description,
        "amount": expense.amount,
        "category": expense.category,
        "period": expense.period.key().as_str(),
    })
}

/// Convert multiple expenses to a JSON array for output.
pub fn expenses_json(expenses: &[Expense]) -> Vec<serde_json::Value> {
    expenses.iter().map(expense_json).collect()
}

pub fn summary_json(
    summary: &PeriodSummary,
    totals: &BTreeMap<Category, i64>,
) -> serde_json::Value {
    let categories: serde_json::Map<String, serde_json::Value> = totals
        .iter()
        .map(|(category, total)| (category.to_string(), serde_json::json!(total)))
        .collect();
    serde_json::json!({
        "period": summary.period,
        "income": summary.income,
        "savings_goal": summary.savings_goal,
        "spent": summary.spent,
        "remaining": summary.remaining,
        "categories": categories,
    })
}
