//! Ledger storage trait definition.
//!
//! The `LedgerStorage` trait is the caller-facing surface of the store: the
//! CLI and tests only talk to this trait. Aggregates are provided methods
//! built on the primitive operations, so every backend gets them for free.

use std::collections::BTreeMap;

use super::types::{Category, Expense, NewExpense, PeriodSummary};
use crate::error::{KakeboError, Result};
use crate::period::PeriodKey;

/// Storage interface for the household ledger.
///
/// All implementations must ensure:
/// - Expense identifiers are strictly increasing and never reused
/// - Expenses are listed in ascending identifier order
/// - Period keys are matched byte-for-byte, without normalization
/// - Absent income and savings values read as zero
pub trait LedgerStorage: Send + Sync {
    /// Release the underlying file.
    ///
    /// # Errors
    ///
    /// Returns `KakeboError::Closed` if the store was already closed.
    fn close(&mut self) -> Result<()>;

    // --- Expense operations ---

    /// Insert a new expense.
    ///
    /// # Returns
    ///
    /// Returns the identifier assigned to the expense.
    ///
    /// # Errors
    ///
    /// Returns `KakeboError::Validation` if:
    /// - The description is blank
    /// - The period kind does not match the store's configuration
    fn add_expense(&mut self, expense: NewExpense) -> Result<u64>;

    /// List every expense in ascending identifier order.
    fn list_expenses(&self) -> Result<Vec<Expense>>;

    /// List the expenses whose period key equals `period` exactly.
    ///
    /// This is a full scan; there is no index by period.
    fn list_expenses_for_period(&self, period: &PeriodKey) -> Result<Vec<Expense>>;

    // --- Income operations ---

    /// Set (or overwrite) the income for a period.
    fn set_income(&mut self, period: &PeriodKey, amount: i64) -> Result<()>;

    /// Income for a period, or zero if none was recorded.
    fn get_income(&self, period: &PeriodKey) -> Result<i64>;

    // --- Savings goal operations ---

    /// Set (or overwrite) the savings goal for a period.
    ///
    /// The amount is stored verbatim, so placeholders such as `"tbd"` are
    /// accepted.
    fn set_savings_goal(&mut self, period: &PeriodKey, amount: &str) -> Result<()>;

    /// Savings goal as a number; absent or non-numeric values read as zero.
    fn get_savings_goal(&self, period: &PeriodKey) -> Result<i64>;

    /// Savings goal exactly as it was stored.
    fn savings_goal_raw(&self, period: &PeriodKey) -> Result<Option<String>>;

    // --- Maintenance operations ---

    /// Discard every expense, income and savings goal.
    ///
    /// Identifiers handed out before the clear are not reused afterwards.
    fn clear(&mut self) -> Result<()>;

    /// Check store integrity.
    ///
    /// Verifies:
    /// - All buckets exist
    /// - Foreign key relationships
    /// - Every expense key is a valid identifier matching its record
    fn check_integrity(&self) -> Result<()>;

    // --- Aggregates ---

    /// Sum of all expense amounts in a period.
    ///
    /// # Errors
    ///
    /// Returns `KakeboError::Validation` if the total does not fit in `i64`.
    fn period_total(&self, period: &PeriodKey) -> Result<i64> {
        self.list_expenses_for_period(period)?
            .iter()
            .try_fold(0i64, |total, expense| {
                total
                    .checked_add(expense.amount)
                    .ok_or_else(|| amount_overflow(period))
            })
    }

    /// Expense totals per category for a period; categories without
    /// expenses are omitted.
    fn category_totals(&self, period: &PeriodKey) -> Result<BTreeMap<Category, i64>> {
        let mut totals = BTreeMap::new();
        for expense in self.list_expenses_for_period(period)? {
            let total: &mut i64 = totals.entry(expense.category).or_insert(0);
            *total = total
                .checked_add(expense.amount)
                .ok_or_else(|| amount_overflow(period))?;
        }
        Ok(totals)
    }

    /// Income, goal and spending for a period.
    fn summary(&self, period: &PeriodKey) -> Result<PeriodSummary> {
        let income = self.get_income(period)?;
        let savings_goal = self.get_savings_goal(period)?;
        let spent = self.period_total(period)?;
        let remaining = income
            .checked_sub(savings_goal)
            .and_then(|left| left.checked_sub(spent))
            .ok_or_else(|| amount_overflow(period))?;
        Ok(PeriodSummary {
            period: period.to_string(),
            income,
            savings_goal,
            spent,
            remaining,
        })
    }
}

fn amount_overflow(period: &PeriodKey) -> KakeboError {
    KakeboError::Validation(format!("amount overflow in {}", period))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_definition_compiles() {
        fn _accepts_ledger_storage<T: LedgerStorage>(_storage: T) {}
        fn _accepts_boxed(_storage: Box<dyn LedgerStorage>) {}
    }
}
