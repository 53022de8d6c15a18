use std::{fs, path::Path};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    core::{
        asset::{Asset, AssetId},
        interval::Interval,
        reading::Reading,
    },
    prelude::*,
    store::ReadingStore,
};

/// Offline dump of the assets and their readings.
#[derive(Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub assets: Vec<Asset>,

    #[serde(default)]
    pub readings: Vec<Reading>,
}

impl Snapshot {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read_from(path: &Path) -> Result<Self> {
        let snapshot: Self = serde_json::from_slice(
            &fs::read(path).with_context(|| format!("failed to read `{}`", path.display()))?,
        )
        .with_context(|| format!("failed to parse `{}`", path.display()))?;
        info!(n_assets = snapshot.assets.len(), n_readings = snapshot.readings.len(), "loaded");
        Ok(snapshot)
    }
}

impl ReadingStore for Snapshot {
    async fn fetch_assets(&self) -> Result<Vec<Asset>> {
        Ok(self.assets.clone())
    }

    async fn fetch_readings(&self, asset_id: &AssetId, interval: Interval) -> Result<Vec<Reading>> {
        Ok(self
            .readings
            .iter()
            .filter(|reading| &reading.asset_id == asset_id && interval.contains(reading.timestamp))
            .cloned()
            .collect_vec())
    }
}
