use clap::Parser;
use tankwatch_quantities::Percent;

use crate::analytics::AnalysisConfig;

/// A century of history is more than any telemetry retention.
const MAX_DAYS: i64 = 36_525;

#[derive(Parser)]
pub struct AnalysisArgs {
    /// Single-step level increase, in percent, at or above which a transition is a refill.
    #[clap(long, env = "REFILL_THRESHOLD", default_value = "10")]
    refill_threshold: Percent,

    /// Analysis windows in days.
    #[clap(
        long = "window",
        env = "WINDOWS",
        value_delimiter = ',',
        default_value = "1,7,30",
        value_parser = clap::value_parser!(u32).range(1..=MAX_DAYS),
    )]
    windows: Vec<u32>,

    /// Number of trailing calendar days in the daily breakdown.
    #[clap(
        long,
        env = "BREAKDOWN_DAYS",
        default_value = "7",
        value_parser = clap::value_parser!(u32).range(1..=MAX_DAYS),
    )]
    breakdown_days: u32,

    /// Minimal number of daily values to claim a trend.
    #[clap(long, env = "TREND_MIN_POINTS", default_value = "4")]
    trend_min_points: usize,

    /// Relative change of the daily consumption, in percent, below which the trend is stable.
    #[clap(long, env = "TREND_DEADBAND", default_value = "10")]
    trend_deadband: Percent,
}

impl AnalysisArgs {
    pub fn config(&self) -> AnalysisConfig {
        AnalysisConfig::builder()
            .refill_threshold(self.refill_threshold)
            .windows(self.windows.clone())
            .breakdown_days(self.breakdown_days)
            .trend_min_points(self.trend_min_points)
            .trend_deadband(self.trend_deadband)
            .build()
    }
}
