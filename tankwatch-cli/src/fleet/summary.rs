use itertools::Itertools;
use serde::Serialize;
use tankwatch_quantities::{Days, LitresPerDay};

use crate::{core::asset::Asset, fleet::FleetReport};

/// An asset expected to run dry soon.
#[derive(Clone, Debug, Serialize)]
pub struct Alert {
    pub asset: Asset,
    pub days_remaining: Days,
}

/// Aggregated figures over a fleet report.
#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct FleetSummary {
    pub n_assets: usize,
    pub n_failed: usize,

    /// Analysed assets lacking data for any consumption estimate.
    pub n_insufficient: usize,

    /// Sum over the assets with a known capacity.
    pub total_litres_per_day: LitresPerDay,

    /// Most urgent first.
    pub alerts: Vec<Alert>,
}

impl FleetReport {
    /// Summarise the report, raising an alert on every asset with at most `alert_days` left.
    pub fn summary(&self, alert_days: Days) -> FleetSummary {
        let n_failed = self.entries.iter().filter(|entry| entry.outcome.is_err()).count();
        let n_insufficient =
            self.profiles().filter(|(_, profile)| profile.headline_rate().is_none()).count();
        let total_litres_per_day = self
            .profiles()
            .filter_map(|(_, profile)| profile.headline_rate()?.litres_per_day)
            .fold(LitresPerDay::ZERO, |total, rate| total + rate);
        let alerts = self
            .profiles()
            .filter_map(|(asset, profile)| {
                let days_remaining = profile.forecast.days_remaining?;
                (days_remaining <= alert_days)
                    .then(|| Alert { asset: asset.clone(), days_remaining })
            })
            .sorted_by_key(|alert| alert.days_remaining)
            .collect();
        FleetSummary {
            n_assets: self.entries.len(),
            n_failed,
            n_insufficient,
            total_litres_per_day,
            alerts,
        }
    }
}
