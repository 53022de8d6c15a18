//! Fleet-wide fan-out of the consumption analytics.

mod cache;
mod summary;

use chrono::{DateTime, TimeZone, Utc};
use futures_util::{StreamExt, stream};
use serde::Serialize;

pub use self::{
    cache::{CacheKey, ProfileCache},
    summary::FleetSummary,
};
use crate::{
    analytics::{AnalysisConfig, ConsumptionProfile},
    core::{asset::Asset, interval::Interval},
    prelude::*,
    store::ReadingStore,
};

#[must_use]
#[derive(bon::Builder)]
pub struct Fleet<'a, S> {
    store: &'a S,
    config: &'a AnalysisConfig,

    /// Maximal number of in-flight store queries.
    #[builder(default = 8)]
    concurrency: usize,

    cache: Option<&'a ProfileCache>,
}

impl<S: ReadingStore> Fleet<'_, S> {
    /// Analyse every asset of the store.
    ///
    /// Only the asset list is required to succeed: a failure on a single asset is recorded
    /// in its entry and the batch goes on.
    #[instrument(skip_all, fields(concurrency = self.concurrency))]
    pub async fn analyse<Tz: TimeZone>(&self, as_of: &DateTime<Tz>) -> Result<FleetReport> {
        let assets = self.store.fetch_assets().await.context("failed to fetch the assets")?;
        info!(n_assets = assets.len(), "analysing the fleet…");

        let mut entries: Vec<FleetEntry> = stream::iter(assets)
            .map(|asset| async move {
                let outcome = self.analyse_asset(&asset, as_of).await.map_err(|error| {
                    warn!(asset_id = %asset.id, "failed to analyse: {error:#}");
                    format!("{error:#}")
                });
                FleetEntry { asset, outcome }
            })
            .buffer_unordered(self.concurrency.max(1))
            .collect()
            .await;
        entries.sort_by(|lhs, rhs| lhs.asset.id.cmp(&rhs.asset.id));

        Ok(FleetReport { as_of: as_of.with_timezone(&Utc), entries })
    }

    async fn analyse_asset<Tz: TimeZone>(
        &self,
        asset: &Asset,
        as_of: &DateTime<Tz>,
    ) -> Result<ConsumptionProfile> {
        let horizon_days = self.config.horizon_days();
        let key = CacheKey::new(asset.id.clone(), horizon_days, as_of.date_naive());
        if let Some(profile) = self.cache.and_then(|cache| cache.get(&key)) {
            debug!(asset_id = %asset.id, "cache hit");
            return Ok(profile);
        }

        let interval = Interval::trailing_days(as_of.with_timezone(&Utc), horizon_days);
        let readings = self
            .store
            .fetch_readings(&asset.id, interval)
            .await
            .with_context(|| format!("failed to fetch the readings of `{}`", asset.id))?;
        let profile = ConsumptionProfile::compute(asset, &readings, as_of, self.config);

        if let Some(cache) = self.cache {
            cache.insert(key, profile.clone());
        }
        Ok(profile)
    }
}

#[must_use]
#[derive(Serialize)]
pub struct FleetEntry {
    pub asset: Asset,
    pub outcome: Result<ConsumptionProfile, String>,
}

#[must_use]
#[derive(Serialize)]
pub struct FleetReport {
    pub as_of: DateTime<Utc>,

    /// Sorted by asset ID.
    pub entries: Vec<FleetEntry>,
}

impl FleetReport {
    pub fn profiles(&self) -> impl Iterator<Item = (&Asset, &ConsumptionProfile)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.outcome.as_ref().ok().map(|profile| (&entry.asset, profile)))
    }
}
