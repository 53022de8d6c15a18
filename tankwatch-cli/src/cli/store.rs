use std::path::PathBuf;

use clap::Parser;
use reqwest::Url;

use crate::{
    api::supabase,
    prelude::*,
    store::{Store, snapshot::Snapshot},
};

#[derive(Parser)]
pub struct StoreArgs {
    /// Offline JSON snapshot with `assets` and `readings`.
    #[clap(long, env = "TANKWATCH_SNAPSHOT", conflicts_with = "supabase_url")]
    snapshot: Option<PathBuf>,

    /// Supabase project URL.
    #[clap(long, env = "SUPABASE_URL", requires = "supabase_key")]
    supabase_url: Option<Url>,

    /// Service role or anonymous key.
    #[clap(long, env = "SUPABASE_KEY", hide_env_values = true)]
    supabase_key: Option<String>,

    #[clap(long, env = "READINGS_TABLE", default_value = "tank_readings")]
    readings_table: String,

    #[clap(long, env = "ASSETS_TABLE", default_value = "tanks")]
    assets_table: String,

    #[clap(long, env = "ASSET_ID_COLUMN", default_value = "id")]
    asset_id_column: String,

    #[clap(long, env = "TIMESTAMP_COLUMN", default_value = "created_at")]
    timestamp_column: String,
}

impl StoreArgs {
    pub fn connect(&self) -> Result<Store> {
        if let Some(path) = &self.snapshot {
            return Ok(Store::Snapshot(Snapshot::read_from(path)?));
        }
        let (Some(url), Some(api_key)) = (&self.supabase_url, &self.supabase_key) else {
            bail!("either `--snapshot` or `--supabase-url` with `--supabase-key` is required");
        };
        let schema = supabase::Schema {
            readings_table: self.readings_table.clone(),
            assets_table: self.assets_table.clone(),
            asset_id_column: self.asset_id_column.clone(),
            timestamp_column: self.timestamp_column.clone(),
        };
        Ok(Store::Supabase(supabase::Api::try_new(url.clone(), api_key, schema)?))
    }
}
