pub mod snapshot;

use crate::{
    api::supabase,
    core::{
        asset::{Asset, AssetId},
        interval::Interval,
        reading::Reading,
    },
    prelude::*,
    store::snapshot::Snapshot,
};

/// Time-series source of tank readings and their metadata.
pub trait ReadingStore {
    async fn fetch_assets(&self) -> Result<Vec<Asset>>;

    /// Readings of the asset within the interval, in any order and possibly with gaps.
    async fn fetch_readings(&self, asset_id: &AssetId, interval: Interval) -> Result<Vec<Reading>>;

    async fn fetch_asset(&self, asset_id: &AssetId) -> Result<Asset> {
        self.fetch_assets()
            .await?
            .into_iter()
            .find(|asset| &asset.id == asset_id)
            .with_context(|| format!("asset `{asset_id}` is not found"))
    }
}

/// Store selected on the command line.
pub enum Store {
    Snapshot(Snapshot),
    Supabase(supabase::Api),
}

impl ReadingStore for Store {
    async fn fetch_assets(&self) -> Result<Vec<Asset>> {
        match self {
            Self::Snapshot(snapshot) => snapshot.fetch_assets().await,
            Self::Supabase(api) => api.fetch_assets().await,
        }
    }

    async fn fetch_readings(&self, asset_id: &AssetId, interval: Interval) -> Result<Vec<Reading>> {
        match self {
            Self::Snapshot(snapshot) => snapshot.fetch_readings(asset_id, interval).await,
            Self::Supabase(api) => api.fetch_readings(asset_id, interval).await,
        }
    }

    async fn fetch_asset(&self, asset_id: &AssetId) -> Result<Asset> {
        match self {
            Self::Snapshot(snapshot) => snapshot.fetch_asset(asset_id).await,
            Self::Supabase(api) => api.fetch_asset(asset_id).await,
        }
    }
}
