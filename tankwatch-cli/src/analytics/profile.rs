use chrono::{DateTime, TimeZone, Utc};
use itertools::Itertools;
use serde::Serialize;
use tankwatch_quantities::{Days, Litres, Percent};

use crate::{
    analytics::{
        AnalysisConfig,
        ConsumptionRate,
        DailyConsumption,
        Forecast,
        Trend,
        daily_breakdown,
    },
    core::{
        asset::{Asset, AssetId},
        interval::Interval,
        reading::{Level, Reading, usable_levels},
    },
    prelude::*,
};

/// Everything the dashboards and reports need to know about a tank's consumption.
#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct ConsumptionProfile {
    pub asset_id: AssetId,

    /// Exclusive end of the analysed history.
    pub as_of: DateTime<Utc>,

    pub capacity: Option<Litres>,

    /// One estimate per configured window, shortest first.
    pub rates: Vec<ConsumptionRate>,

    /// Per-day deltas, oldest first. These are not refill-aware and may disagree
    /// with the windowed estimates.
    pub daily: Vec<DailyConsumption>,

    pub trend: Trend,
    pub current_level: Option<Percent>,
    pub current_litres: Option<Litres>,
    pub forecast: Forecast,
}

impl ConsumptionProfile {
    /// Analyse the asset's readings preceding `as_of`.
    ///
    /// Calendar days of the breakdown are taken in the time zone of `as_of`.
    #[instrument(skip_all, fields(asset_id = %asset.id, n_readings = readings.len()))]
    pub fn compute<Tz: TimeZone>(
        asset: &Asset,
        readings: &[Reading],
        as_of: &DateTime<Tz>,
        config: &AnalysisConfig,
    ) -> Self {
        let capacity = asset.known_capacity();
        let refill_threshold = config.refill_threshold_for(asset);
        let end = as_of.with_timezone(&Utc);

        let history = Interval::trailing_days(end, config.horizon_days());
        let levels = usable_levels(
            readings.iter().filter(|reading| history.contains(reading.timestamp)),
            capacity,
        );

        let rates = config
            .windows()
            .map(|window_days| {
                let window = Interval::trailing_days(end, window_days);
                ConsumptionRate::from_levels(
                    trailing(&levels, window),
                    window_days,
                    capacity,
                    refill_threshold,
                )
            })
            .collect_vec();

        let daily = daily_breakdown(&levels, as_of, config.breakdown_days, capacity);
        let trend = config.trend_classifier().classify(
            &daily.iter().filter_map(|day| day.percent).map(Percent::get).collect_vec(),
        );

        let current_level = levels.last().map(|(_, level)| *level);
        let current_litres = current_level.zip(capacity).map(|(level, capacity)| level * capacity);

        let today = as_of.date_naive();
        let headline_rate = rates.iter().find(|rate| rate.percent_per_day.is_some());
        let forecast = match (headline_rate, current_level, current_litres) {
            (Some(rate), _, Some(current_litres)) => {
                Forecast::from_litres(current_litres, rate.litres_per_day, today)
            }
            (Some(rate), Some(current_level), None) => {
                Forecast::from_percent(current_level, rate.percent_per_day, today)
            }
            _ => Forecast::UNKNOWN,
        };

        info!(
            ?current_level,
            ?trend,
            days_remaining = ?forecast.days_remaining,
            "profile computed",
        );
        Self {
            asset_id: asset.id.clone(),
            as_of: end,
            capacity,
            rates,
            daily,
            trend,
            current_level,
            current_litres,
            forecast,
        }
    }

    #[must_use]
    pub fn rate(&self, window_days: u32) -> Option<&ConsumptionRate> {
        self.rates.iter().find(|rate| rate.window_days == window_days)
    }

    /// The most responsive available estimate: the shortest window with enough data.
    #[must_use]
    pub fn headline_rate(&self) -> Option<&ConsumptionRate> {
        self.rates.iter().find(|rate| rate.percent_per_day.is_some())
    }

    /// Weekly figure extrapolated from the 7-day estimate.
    pub fn weekly_total_litres(&self) -> Option<Litres> {
        self.rate(7)?.total_litres(Days::from(7))
    }
}

/// Sorted levels falling into the window.
fn trailing(levels: &[Level], window: Interval) -> &[Level] {
    let start = levels.partition_point(|(timestamp, _)| *timestamp < window.start);
    let end = levels.partition_point(|(timestamp, _)| *timestamp < window.end);
    &levels[start..end]
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{NaiveDate, TimeDelta};
    use tankwatch_quantities::PercentPerDay;

    use super::*;

    /// Drains 2 %/d from 80 %, refilled by 40 % on the tenth day, 4 readings a day for 20 days.
    fn readings() -> Vec<Reading> {
        let origin = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
        (0..=80)
            .map(|quarter| {
                let days = f64::from(quarter) * 0.25;
                let level = if days < 10.0 { 80.0 - 2.0 * days } else { 120.0 - 2.0 * days };
                Reading::builder()
                    .asset_id("tank-1")
                    .timestamp(origin + TimeDelta::hours(6 * i64::from(quarter)))
                    .level_percent(Percent::from(level))
                    .build()
            })
            .collect()
    }

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 21, 1, 0, 0).unwrap()
    }

    #[test]
    fn profile_ok() {
        let asset = Asset::builder().id("tank-1").capacity(Litres::from(10_000)).build();
        let profile =
            ConsumptionProfile::compute(&asset, &readings(), &as_of(), &AnalysisConfig::default());

        assert_eq!(profile.rates.iter().map(|rate| rate.window_days).collect_vec(), [1, 7, 30]);
        for rate in &profile.rates {
            assert_abs_diff_eq!(rate.percent_per_day.unwrap().get(), 2.0, epsilon = 1e-6);
            assert_abs_diff_eq!(rate.litres_per_day.unwrap().get(), 200.0, epsilon = 1e-4);
        }
        assert_eq!(profile.rate(1).unwrap().refill_events_excluded, 0);
        assert_eq!(profile.rate(30).unwrap().refill_events_excluded, 1);
        assert_abs_diff_eq!(profile.weekly_total_litres().unwrap().get(), 1400.0, epsilon = 1e-3);

        assert_eq!(profile.daily.len(), 7);
        assert_eq!(profile.daily[0].date, NaiveDate::from_ymd_opt(2025, 4, 15).unwrap());
        assert!(profile.daily[..6].iter().all(|day| day.percent == Some(Percent::from(1.5))));
        assert_eq!(profile.daily[6].percent, None);
        assert_eq!(profile.trend, Trend::Stable);

        assert_eq!(profile.current_level, Some(Percent::from(80.0)));
        assert_abs_diff_eq!(profile.current_litres.unwrap().get(), 8000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(profile.forecast.days_remaining.unwrap().get(), 40.0, epsilon = 1e-3);
        assert_eq!(profile.forecast.estimated_refill_date, NaiveDate::from_ymd_opt(2025, 5, 31));
    }

    #[test]
    fn unknown_capacity_forecasts_in_percent() {
        let asset = Asset::builder().id("tank-1").build();
        let profile =
            ConsumptionProfile::compute(&asset, &readings(), &as_of(), &AnalysisConfig::default());
        assert!(profile.rates.iter().all(|rate| rate.litres_per_day.is_none()));
        assert!(profile.weekly_total_litres().is_none());
        assert!(profile.current_litres.is_none());
        assert_abs_diff_eq!(profile.forecast.days_remaining.unwrap().get(), 40.0, epsilon = 1e-3);
    }

    #[test]
    fn new_installation_has_no_estimates() {
        let asset = Asset::builder().id("tank-1").capacity(Litres::from(5000)).build();
        let readings = &readings()[80..];
        let profile =
            ConsumptionProfile::compute(&asset, readings, &as_of(), &AnalysisConfig::default());
        assert!(profile.rates.iter().all(|rate| rate.percent_per_day.is_none()));
        assert!(profile.headline_rate().is_none());
        assert_eq!(profile.forecast, Forecast::UNKNOWN);
        assert_eq!(profile.current_level, Some(Percent::from(80.0)));
        assert_eq!(profile.trend, Trend::Stable);
    }

    #[test]
    fn unbounded_window_covers_the_whole_history() {
        let asset = Asset::builder().id("tank-1").build();
        let config = AnalysisConfig::builder().windows(vec![u32::MAX]).build();
        let profile = ConsumptionProfile::compute(&asset, &readings(), &as_of(), &config);
        let rate = profile.rate(u32::MAX).unwrap();
        assert_eq!(rate.n_readings, 81);
        assert_eq!(rate.refill_events_excluded, 1);
        assert_abs_diff_eq!(rate.percent_per_day.unwrap().get(), 2.0, epsilon = 1e-6);

        let empty = ConsumptionProfile::compute(&asset, &[], &as_of(), &config);
        assert!(empty.headline_rate().is_none());
    }

    #[test]
    fn asset_refill_threshold_overrides_the_default() {
        // Drains 1 %/d with a 12 % top-up between the fifth and sixth days:
        let origin = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        let readings = (0..10)
            .map(|day| {
                let level = if day < 5 { 80.0 - f64::from(day) } else { 92.0 - f64::from(day) };
                Reading::builder()
                    .asset_id("tank-2")
                    .timestamp(origin + TimeDelta::days(i64::from(day)))
                    .level_percent(Percent::from(level))
                    .build()
            })
            .collect_vec();
        let as_of = origin + TimeDelta::days(10);
        let config = AnalysisConfig::default();

        let default = Asset::builder().id("tank-2").build();
        let profile = ConsumptionProfile::compute(&default, &readings, &as_of, &config);
        let rate = profile.rate(30).unwrap();
        assert_eq!(rate.refill_events_excluded, 1);
        assert_abs_diff_eq!(rate.percent_per_day.unwrap().get(), 1.0, epsilon = 1e-6);

        // At 15 % the top-up is an ordinary transition, and the rising level clamps the rate:
        let lenient = Asset::builder().id("tank-2").refill_threshold(Percent::from(15.0)).build();
        let profile = ConsumptionProfile::compute(&lenient, &readings, &as_of, &config);
        let rate = profile.rate(30).unwrap();
        assert_eq!(rate.refill_events_excluded, 0);
        assert_eq!(rate.percent_per_day, Some(PercentPerDay::ZERO));
    }

    #[test]
    fn readings_after_as_of_are_ignored() {
        let asset = Asset::builder().id("tank-1").build();
        let as_of = Utc.with_ymd_and_hms(2025, 4, 5, 0, 0, 0).unwrap();
        let profile =
            ConsumptionProfile::compute(&asset, &readings(), &as_of, &AnalysisConfig::default());
        assert_eq!(profile.current_level, Some(Percent::from(72.5)));
        assert_eq!(profile.rate(30).unwrap().refill_events_excluded, 0);
    }
}
