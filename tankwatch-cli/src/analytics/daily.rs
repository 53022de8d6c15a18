use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use serde::Serialize;
use tankwatch_quantities::{Litres, Percent};

use crate::{
    core::{interval::Interval, reading::Level},
    prelude::*,
};

/// Consumption within a single calendar day, for sparklines.
#[must_use]
#[derive(Copy, Clone, Debug, Serialize)]
pub struct DailyConsumption {
    pub date: NaiveDate,

    /// `None` when the day has fewer than two usable readings.
    pub percent: Option<Percent>,

    pub litres: Option<Litres>,
}

/// Oldest-minus-newest level for each of the `n_days` calendar days ending on the `as_of` date.
///
/// This is a plain delta per day, clamped to zero: a day has too few points for a regression.
/// Days are oldest first.
#[must_use]
pub fn daily_breakdown<Tz: TimeZone>(
    levels: &[Level],
    as_of: &DateTime<Tz>,
    n_days: u32,
    capacity: Option<Litres>,
) -> Vec<DailyConsumption> {
    let timezone = as_of.timezone();
    let today = as_of.date_naive();
    let n_days = u32::try_from(today.signed_duration_since(NaiveDate::MIN).num_days() + 1)
        .map_or(n_days, |n_representable| n_days.min(n_representable));
    (0..n_days)
        .rev()
        .map(|days_ago| today - TimeDelta::days(i64::from(days_ago)))
        .map(|date| {
            let percent = day_interval(&timezone, date).and_then(|day| day_delta(levels, day));
            DailyConsumption {
                date,
                percent,
                litres: percent.zip(capacity.filter(|capacity| capacity.is_positive())).map(
                    |(percent, capacity)| percent * capacity,
                ),
            }
        })
        .collect()
}

fn day_interval<Tz: TimeZone>(timezone: &Tz, date: NaiveDate) -> Option<Interval> {
    let start_of = |date: NaiveDate| {
        timezone
            .from_local_datetime(&date.and_time(NaiveTime::MIN))
            .earliest()
            .map(|start| start.with_timezone(&Utc))
    };
    let interval = Interval::new(start_of(date)?, start_of(date.succ_opt()?)?);
    if interval.start >= interval.end {
        warn!(%date, "degenerate calendar day");
        return None;
    }
    Some(interval)
}

fn day_delta(levels: &[Level], day: Interval) -> Option<Percent> {
    let mut within = levels.iter().filter(|(timestamp, _)| day.contains(*timestamp));
    let (_, oldest) = within.next()?;
    let (_, newest) = within.last()?;
    Some((*oldest - *newest).max(Percent::ZERO))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::FixedOffset;
    use itertools::Itertools;

    use super::*;

    fn level(day: u32, hour: u32, value: f64) -> Level {
        (Utc.with_ymd_and_hms(2025, 5, day, hour, 0, 0).unwrap(), Percent::from(value))
    }

    #[test]
    fn breakdown_ok() {
        let levels = [
            level(8, 6, 70.0),
            level(8, 18, 64.0),
            level(9, 12, 63.0), // single reading
            level(11, 1, 60.0),
            level(11, 9, 80.0), // refill within the day
            level(11, 20, 90.0),
            level(12, 3, 88.0),
            level(12, 7, 85.0),
            level(12, 11, 83.5),
        ];
        let as_of = Utc.with_ymd_and_hms(2025, 5, 12, 12, 0, 0).unwrap();
        let breakdown = daily_breakdown(&levels, &as_of, 7, Some(Litres::from(2000)));

        assert_eq!(breakdown.len(), 7);
        assert_eq!(breakdown[0].date, NaiveDate::from_ymd_opt(2025, 5, 6).unwrap());
        assert_eq!(breakdown[6].date, NaiveDate::from_ymd_opt(2025, 5, 12).unwrap());
        assert_eq!(
            breakdown.iter().map(|day| day.percent).collect_vec(),
            [
                None,
                None,
                Some(Percent::from(6.0)),
                None,
                None,
                Some(Percent::ZERO),
                Some(Percent::from(4.5)),
            ]
        );
        assert_abs_diff_eq!(breakdown[2].litres.unwrap().get(), 120.0, epsilon = 1e-9);
        assert_eq!(breakdown[5].litres, Some(Litres::ZERO));
    }

    #[test]
    fn breakdown_without_capacity() {
        let levels = [level(12, 1, 50.0), level(12, 2, 49.0)];
        let as_of = Utc.with_ymd_and_hms(2025, 5, 12, 23, 0, 0).unwrap();
        let breakdown = daily_breakdown(&levels, &as_of, 1, None);
        assert_eq!(breakdown[0].percent, Some(Percent::from(1.0)));
        assert_eq!(breakdown[0].litres, None);
    }

    #[test]
    fn breakdown_stops_at_earliest_date() {
        let breakdown = daily_breakdown(&[], &DateTime::<Utc>::MIN_UTC, 3, None);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].date, NaiveDate::MIN);
        assert_eq!(breakdown[0].percent, None);
    }

    #[test]
    fn breakdown_follows_timezone() {
        // 23:00 UTC on the 11th is already the 12th in UTC+2:
        let levels = [level(11, 23, 50.0), level(12, 8, 47.0)];
        let timezone = FixedOffset::east_opt(2 * 3600).unwrap();
        let as_of = timezone.with_ymd_and_hms(2025, 5, 12, 18, 0, 0).unwrap();
        let breakdown = daily_breakdown(&levels, &as_of, 2, None);
        assert_eq!(breakdown[0].percent, None);
        assert_eq!(breakdown[1].percent, Some(Percent::from(3.0)));
    }
}
