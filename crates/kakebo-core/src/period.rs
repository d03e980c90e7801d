//! Period keys used to group expenses, income and savings goals.
//!
//! A period is either a month+year pair (`"June 2017"`) or an ISO week
//! number (`"23"`). Keys are compared byte-for-byte: no case folding,
//! trimming or re-formatting happens anywhere, so callers must spell a
//! period the same way on write and on read.

use std::fmt;

use chrono::{Datelike, Month};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::{KakeboError, Result};

/// Which period shape a store uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    #[default]
    Month,
    Week,
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKind::Month => write!(f, "month"),
            PeriodKind::Week => write!(f, "week"),
        }
    }
}

/// The period an expense belongs to.
///
/// Serialized flattened into the expense record, so a month period adds
/// `"month"` and `"year"` fields and a week period adds a `"week"` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Period {
    Month { month: String, year: String },
    Week { week: u32 },
}

impl Period {
    pub fn month(month: impl Into<String>, year: impl Into<String>) -> Self {
        Period::Month {
            month: month.into(),
            year: year.into(),
        }
    }

    pub fn week(week: u32) -> Self {
        Period::Week { week }
    }

    pub fn kind(&self) -> PeriodKind {
        match self {
            Period::Month { .. } => PeriodKind::Month,
            Period::Week { .. } => PeriodKind::Week,
        }
    }

    /// Compose the canonical lookup key for this period.
    pub fn key(&self) -> PeriodKey {
        match self {
            Period::Month { month, year } => PeriodKey::month(month, year),
            Period::Week { week } => PeriodKey::week(*week),
        }
    }

    /// The period containing the clock's current date.
    ///
    /// Month names are English and capitalized (`"January"`), years are
    /// rendered in full, weeks follow ISO-8601 numbering.
    pub fn current(kind: PeriodKind, clock: &dyn Clock) -> Result<Self> {
        let today = clock.today();
        match kind {
            PeriodKind::Month => {
                let month = u8::try_from(today.month())
                    .ok()
                    .and_then(|m| Month::try_from(m).ok())
                    .ok_or_else(|| {
                        KakeboError::Fatal(format!("clock returned invalid month for {}", today))
                    })?;
                Ok(Period::month(month.name(), today.year().to_string()))
            }
            PeriodKind::Week => Ok(Period::week(today.iso_week().week())),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Month { month, year } => write!(f, "{} {}", month, year),
            Period::Week { week } => write!(f, "Week {}", week),
        }
    }
}

/// Canonical, byte-comparable key for a period.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeriodKey(String);

impl PeriodKey {
    /// Use a caller-composed key as-is.
    pub fn new(raw: impl Into<String>) -> Self {
        PeriodKey(raw.into())
    }

    pub fn month(month: &str, year: &str) -> Self {
        PeriodKey(format!("{} {}", month, year))
    }

    pub fn week(week: u32) -> Self {
        PeriodKey(week.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Period> for PeriodKey {
    fn from(period: &Period) -> Self {
        period.key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;

    #[test]
    fn test_month_key_composition() {
        assert_eq!(PeriodKey::month("January", "2018").as_str(), "January 2018");
        assert_eq!(Period::month("June", "2017").key().as_str(), "June 2017");
    }

    #[test]
    fn test_keys_are_not_normalized() {
        assert_ne!(
            PeriodKey::month("june", "2017"),
            PeriodKey::month("June", "2017")
        );
        assert_ne!(PeriodKey::new("June 2017 "), PeriodKey::new("June 2017"));
    }

    #[test]
    fn test_week_key_is_plain_number() {
        assert_eq!(PeriodKey::week(7).as_str(), "7");
        assert_eq!(Period::week(7).kind(), PeriodKind::Week);
    }

    #[test]
    fn test_current_period_from_clock() {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2018, 1, 3).unwrap());
        assert_eq!(
            Period::current(PeriodKind::Month, &clock).unwrap(),
            Period::month("January", "2018")
        );
        assert_eq!(
            Period::current(PeriodKind::Week, &clock).unwrap(),
            Period::week(1)
        );
    }

    #[test]
    fn test_period_serializes_flat_fields() {
        let json = serde_json::to_value(Period::month("June", "2017")).unwrap();
        assert_eq!(json, serde_json::json!({"month": "June", "year": "2017"}));
        let json = serde_json::to_value(Period::week(23)).unwrap();
        assert_eq!(json, serde_json::json!({"week": 23}));
    }
}
