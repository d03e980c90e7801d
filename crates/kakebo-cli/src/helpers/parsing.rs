//! Period resolution from command-line flags.

use kakebo_core::period::{Period, PeriodKind};
use kakebo_core::Clock;

use crate::cli::PeriodArgs;
use crate::errors::CliError;

/// Turn `--month`/`--year`/`--week` into a period.
///
/// A missing month or year is filled from the clock; with no flags at all
/// the current period of `kind` is used. Month names are kept as typed.
pub fn resolve_period(
    args: &PeriodArgs,
    kind: PeriodKind,
    clock: &dyn Clock,
) -> anyhow::Result<Period> {
    if let Some(week) = args.week {
        if !(1..=53).contains(&week) {
            return Err(CliError::invalid_input(format!(
                "Invalid week: {} (expected 1-53)",
                week
            ))
            .into());
        }
        return Ok(Period::week(week));
    }

    if args.month.is_none() && args.year.is_none() {
        return Ok(Period::current(kind, clock)?);
    }

    let current = Period::current(PeriodKind::Month, clock)?;
    let Period::Month { month, year } = current else {
        return Err(anyhow::anyhow!("current month could not be determined"));
    };
    Ok(Period::month(
        args.month.clone().unwrap_or(month),
        args.year.clone().unwrap_or(year),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kakebo_core::FixedClock;

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2018, 1, 3).unwrap())
    }

    #[test]
    fn test_no_flags_uses_current_period() {
        let args = PeriodArgs::default();
        let month = resolve_period(&args, PeriodKind::Month, &clock()).unwrap();
        assert_eq!(month, Period::month("January", "2018"));

        let week = resolve_period(&args, PeriodKind::Week, &clock()).unwrap();
        assert_eq!(week, Period::week(1));
    }

    #[test]
    fn test_partial_month_fills_from_clock() {
        let args = PeriodArgs {
            month: Some("June".to_string()),
            ..PeriodArgs::default()
        };
        let period = resolve_period(&args, PeriodKind::Month, &clock()).unwrap();
        assert_eq!(period, Period::month("June", "2018"));

        let args = PeriodArgs {
            year: Some("2017".to_string()),
            ..PeriodArgs::default()
        };
        let period = resolve_period(&args, PeriodKind::Month, &clock()).unwrap();
        assert_eq!(period, Period::month("January", "2017"));
    }

    #[test]
    fn test_month_name_kept_verbatim() {
        let args = PeriodArgs {
            month: Some("june".to_string()),
            year: Some("2017".to_string()),
            week: None,
        };
        let period = resolve_period(&args, PeriodKind::Month, &clock()).unwrap();
        assert_eq!(period.key().as_str(), "june 2017");
    }

    #[test]
    fn test_week_out_of_range() {
        let args = PeriodArgs {
            week: Some(54),
            ..PeriodArgs::default()
        };
        assert!(resolve_period(&args, PeriodKind::Week, &clock()).is_err());
    }
}
