use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use tankwatch_quantities::{Litres, Percent};

use crate::{core::asset::AssetId, prelude::*};

/// Immutable telemetry sample as reported by a tank monitor.
///
/// Some monitors report the levels as strings, both forms are accepted.
#[must_use]
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize, bon::Builder)]
pub struct Reading {
    #[builder(into)]
    pub asset_id: AssetId,

    #[serde(alias = "created_at", alias = "reading_at")]
    pub timestamp: DateTime<Utc>,

    /// May be absent, non-finite or out of range when the sensor misbehaves.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default, alias = "level_percentage")]
    pub level_percent: Option<Percent>,

    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default, alias = "level_liters")]
    pub level_litres: Option<Litres>,
}

impl Reading {
    /// Fill level this reading can be trusted for.
    ///
    /// Falls back to the absolute volume when the percentage is missing or malformed
    /// and the capacity is known.
    pub fn level(&self, capacity: Option<Litres>) -> Option<Percent> {
        self.level_percent.filter(|level| level.is_valid_level()).or_else(|| {
            let capacity = capacity.filter(|capacity| capacity.is_positive())?;
            let level = self.level_litres.filter(|litres| litres.is_finite())?.fill_of(capacity);
            level.is_valid_level().then_some(level)
        })
    }
}

/// Usable fill level at an instant.
pub type Level = (DateTime<Utc>, Percent);

/// Extract the usable levels ordered by timestamp, skipping malformed readings.
#[must_use]
pub fn usable_levels<'a>(
    readings: impl IntoIterator<Item = &'a Reading>,
    capacity: Option<Litres>,
) -> Vec<Level> {
    let mut n_skipped = 0_usize;
    let levels = readings
        .into_iter()
        .filter_map(|reading| {
            let level = reading.level(capacity);
            if level.is_none() {
                n_skipped += 1;
            }
            level.map(|level| (reading.timestamp, level))
        })
        .sorted_by_key(|(timestamp, _)| *timestamp)
        .collect_vec();
    if n_skipped != 0 {
        debug!(n_skipped, n_usable = levels.len(), "skipped malformed readings");
    }
    levels
}
