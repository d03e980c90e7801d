//! Core data types for the storage layer.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{KakeboError, Result};
use crate::period::{Period, PeriodKind};

/// Default time to wait for a competing process to release the store file.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(1);

/// Expense category, following the four kakebo pillars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Survival,
    Optional,
    Culture,
    Extra,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Survival,
        Category::Optional,
        Category::Culture,
        Category::Extra,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Survival => "survival",
            Category::Optional => "optional",
            Category::Culture => "culture",
            Category::Extra => "extra",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = KakeboError;

    fn from_str(value: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| KakeboError::InvalidCategory(value.to_string()))
    }
}

/// A stored expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Identifier assigned by the store at insertion time
    pub id: u64,

    pub description: String,

    pub category: Category,

    /// Signed amount in whatever unit the household uses
    pub amount: i64,

    #[serde(flatten)]
    pub period: Period,
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Description: {} | Amount: {} | Category: {} | ",
            self.description, self.amount, self.category
        )?;
        match &self.period {
            Period::Month { month, year } => write!(f, "Date: {} {}", month, year),
            Period::Week { week } => write!(f, "Week: {}", week),
        }
    }
}

/// Builder for creating new expenses.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub description: String,
    pub category: Category,
    pub amount: i64,
    pub period: Period,
}

impl NewExpense {
    pub fn new(
        description: impl Into<String>,
        category: Category,
        amount: i64,
        period: Period,
    ) -> Self {
        Self {
            description: description.into(),
            category,
            amount,
            period,
        }
    }

    /// Build from a raw category name, rejecting anything outside the
    /// fixed enumeration.
    pub fn parse(
        description: impl Into<String>,
        category: &str,
        amount: i64,
        period: Period,
    ) -> Result<Self> {
        Ok(Self::new(description, category.parse()?, amount, period))
    }

    /// Attach the identifier the store assigned.
    pub fn into_expense(self, id: u64) -> Expense {
        Expense {
            id,
            description: self.description,
            category: self.category,
            amount: self.amount,
            period: self.period,
        }
    }
}

/// What a full scan does when a stored record cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPolicy {
    /// Log and omit the record; the rest of the scan continues
    #[default]
    Skip,
    /// Fail the whole scan with a decode error
    Abort,
}

/// Options applied when opening a store.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub lock_timeout: Duration,
    pub period_kind: PeriodKind,
    pub scan_policy: ScanPolicy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            period_kind: PeriodKind::Month,
            scan_policy: ScanPolicy::Skip,
        }
    }
}

impl StoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn period_kind(mut self, kind: PeriodKind) -> Self {
        self.period_kind = kind;
        self
    }

    pub fn scan_policy(mut self, policy: ScanPolicy) -> Self {
        self.scan_policy = policy;
        self
    }
}

/// Aggregate view of a single period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    pub period: String,
    pub income: i64,
    pub savings_goal: i64,
    pub spent: i64,
    /// `income - savings_goal - spent`
    pub remaining: i64,
}
