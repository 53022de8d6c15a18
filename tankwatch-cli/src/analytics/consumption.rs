use serde::Serialize;
use tankwatch_quantities::{Days, Litres, LitresPerDay, Percent, PercentPerDay};

use crate::{
    analytics::{RefillSplit, regression::pooled_slope},
    core::reading::{Level, Reading, usable_levels},
    prelude::*,
};

/// Daily consumption estimate over a window.
///
/// `None` rates mean «not enough data», which is different from a zero consumption.
#[must_use]
#[derive(Copy, Clone, Debug, Serialize)]
pub struct ConsumptionRate {
    pub window_days: u32,
    pub percent_per_day: Option<PercentPerDay>,

    /// Only known when the tank capacity is.
    pub litres_per_day: Option<LitresPerDay>,

    pub refill_events_excluded: usize,

    /// Usable readings that entered the estimate.
    pub n_readings: usize,
}

impl ConsumptionRate {
    /// Estimate the consumption rate from raw readings of a single asset.
    ///
    /// The readings do not have to be sorted, and malformed readings are skipped.
    pub fn calculate(
        readings: &[Reading],
        window_days: u32,
        capacity: Option<Litres>,
        refill_threshold: Percent,
    ) -> Self {
        Self::from_levels(
            &usable_levels(readings, capacity),
            window_days,
            capacity,
            refill_threshold,
        )
    }

    /// Estimate the consumption rate from time-ordered usable levels.
    #[instrument(
        level = "debug",
        skip_all,
        fields(window_days = window_days, n_levels = levels.len()),
    )]
    pub fn from_levels(
        levels: &[Level],
        window_days: u32,
        capacity: Option<Litres>,
        refill_threshold: Percent,
    ) -> Self {
        let split = RefillSplit::new(levels, refill_threshold);

        // Level rising without crossing the refill threshold is jitter, not negative consumption:
        let percent_per_day =
            pooled_slope(&split.segments).map(|slope| (-slope).max(PercentPerDay::ZERO));
        let litres_per_day = percent_per_day
            .zip(capacity.filter(|capacity| capacity.is_positive()))
            .map(|(rate, capacity)| rate.of_capacity(capacity));

        if percent_per_day.is_none() {
            debug!(
                n_refills = split.n_refills,
                n_transitions = split.n_transitions(),
                "insufficient data",
            );
        }
        Self {
            window_days,
            percent_per_day,
            litres_per_day,
            refill_events_excluded: split.n_refills,
            n_readings: levels.len(),
        }
    }

    /// Consumption over the given number of days at this rate.
    pub fn total_litres(&self, days: Days) -> Option<Litres> {
        self.litres_per_day.map(|rate| rate * days)
    }
}
