use chrono::NaiveDate;
use serde::Serialize;
use tankwatch_quantities::{Days, Litres, LitresPerDay, Percent, PercentPerDay};

/// Linear projection of when the tank runs dry.
///
/// This is an estimate: no seasonality and no confidence interval.
#[must_use]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Forecast {
    /// `None` when the consumption is unknown or zero.
    pub days_remaining: Option<Days>,

    pub estimated_refill_date: Option<NaiveDate>,
}

impl Forecast {
    pub const UNKNOWN: Self = Self { days_remaining: None, estimated_refill_date: None };

    pub fn from_litres(level: Litres, rate: Option<LitresPerDay>, today: NaiveDate) -> Self {
        Self::project(rate.filter(|rate| rate.is_positive()).map(|rate| level / rate), today)
    }

    /// Fallback for tanks of unknown capacity.
    pub fn from_percent(level: Percent, rate: Option<PercentPerDay>, today: NaiveDate) -> Self {
        Self::project(rate.filter(|rate| rate.is_positive()).map(|rate| level / rate), today)
    }

    fn project(days_remaining: Option<Days>, today: NaiveDate) -> Self {
        let Some(days_remaining) =
            days_remaining.filter(|days| days.is_finite() && *days >= Days::ZERO)
        else {
            return Self::UNKNOWN;
        };
        Self {
            days_remaining: Some(days_remaining),
            estimated_refill_date: days_remaining
                .to_time_delta()
                .and_then(|time_delta| today.checked_add_signed(time_delta)),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 30).unwrap()
    }

    #[test]
    fn project_litres_ok() {
        let forecast =
            Forecast::from_litres(Litres::from(1250.0), Some(LitresPerDay::from(100.0)), today());
        assert_abs_diff_eq!(forecast.days_remaining.unwrap().get(), 12.5);
        assert_eq!(forecast.estimated_refill_date, NaiveDate::from_ymd_opt(2025, 8, 12));
    }

    #[test]
    fn project_percent_ok() {
        let forecast =
            Forecast::from_percent(Percent::from(30.0), Some(PercentPerDay::from(4.0)), today());
        assert_abs_diff_eq!(forecast.days_remaining.unwrap().get(), 7.5);
        assert_eq!(forecast.estimated_refill_date, NaiveDate::from_ymd_opt(2025, 8, 7));
    }

    #[test]
    fn zero_or_unknown_consumption() {
        let level = Litres::from(500.0);
        assert_eq!(Forecast::from_litres(level, None, today()), Forecast::UNKNOWN);
        assert_eq!(
            Forecast::from_litres(level, Some(LitresPerDay::ZERO), today()),
            Forecast::UNKNOWN,
        );
    }

    #[test]
    fn empty_tank_is_due_today() {
        let forecast =
            Forecast::from_percent(Percent::ZERO, Some(PercentPerDay::from(3.0)), today());
        assert_eq!(forecast.days_remaining, Some(Days::ZERO));
        assert_eq!(forecast.estimated_refill_date, Some(today()));
    }
}
