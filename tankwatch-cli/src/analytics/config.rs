use itertools::Itertools;
use tankwatch_quantities::Percent;

use crate::{analytics::TrendClassifier, core::asset::Asset};

/// Tuning knobs of the consumption analytics.
#[must_use]
#[derive(Clone, Debug, bon::Builder)]
pub struct AnalysisConfig {
    /// Single-step level increase at or above which a transition is a refill.
    #[builder(default = AnalysisConfig::DEFAULT_REFILL_THRESHOLD)]
    pub refill_threshold: Percent,

    /// Analysis windows in days.
    #[builder(default = vec![1, 7, 30])]
    windows: Vec<u32>,

    /// Number of trailing calendar days in the daily breakdown.
    #[builder(default = 7)]
    pub breakdown_days: u32,

    /// Minimal number of daily values to claim a trend.
    #[builder(default = 4)]
    pub trend_min_points: usize,

    /// Relative change of the daily consumption below which the trend is stable.
    #[builder(default = Percent::new(10.0))]
    pub trend_deadband: Percent,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl AnalysisConfig {
    pub const DEFAULT_REFILL_THRESHOLD: Percent = Percent::new(10.0);

    /// Non-empty windows, shortest first.
    pub fn windows(&self) -> impl Iterator<Item = u32> {
        self.windows.iter().copied().filter(|days| *days != 0).sorted_unstable().dedup()
    }

    /// Longest span of history any part of the analysis looks at, in days.
    #[must_use]
    pub fn horizon_days(&self) -> u32 {
        self.windows().chain([self.breakdown_days]).max().unwrap_or(1)
    }

    /// Asset override if it is sane, otherwise the global threshold.
    pub fn refill_threshold_for(&self, asset: &Asset) -> Percent {
        asset
            .refill_threshold
            .filter(|threshold| threshold.is_positive())
            .unwrap_or(self.refill_threshold)
    }

    pub const fn trend_classifier(&self) -> TrendClassifier {
        TrendClassifier { min_points: self.trend_min_points, deadband: self.trend_deadband }
    }
}
