use chrono::{DateTime, Local, Utc};
use clap::Parser;
use tankwatch_quantities::Days;

use crate::{
    analytics::ConsumptionProfile,
    cli::{analysis::AnalysisArgs, heartbeat::HeartbeatArgs, store::StoreArgs},
    core::{asset::AssetId, interval::Interval},
    prelude::*,
    store::ReadingStore,
    tables::{build_daily_table, build_profile_table, build_rates_table},
};

#[derive(Parser)]
pub struct AnalyseArgs {
    #[clap(long, env = "ASSET_ID")]
    asset_id: AssetId,

    /// End of the analysed history, defaults to now.
    #[clap(long)]
    as_of: Option<DateTime<Utc>>,

    /// Print the profile as JSON instead of the tables.
    #[clap(long)]
    json: bool,

    /// Days remaining at or below which the forecast is highlighted.
    #[clap(long, env = "ALERT_DAYS", default_value = "7")]
    alert_days: Days,

    #[clap(flatten)]
    store: StoreArgs,

    #[clap(flatten)]
    analysis: AnalysisArgs,

    #[clap(flatten)]
    heartbeat: HeartbeatArgs,
}

impl AnalyseArgs {
    #[instrument(skip_all, fields(asset_id = %self.asset_id))]
    pub async fn run(self) -> Result {
        let store = self.store.connect()?;
        let config = self.analysis.config();
        let as_of = self.as_of.map_or_else(Local::now, |as_of| as_of.with_timezone(&Local));

        let asset = store.fetch_asset(&self.asset_id).await?;
        let interval = Interval::trailing_days(as_of.with_timezone(&Utc), config.horizon_days());
        let readings = store.fetch_readings(&asset.id, interval).await?;
        info!(n_readings = readings.len(), "fetched the readings");

        let profile = ConsumptionProfile::compute(&asset, &readings, &as_of, &config);
        if self.json {
            println!("{}", serde_json::to_string_pretty(&profile)?);
        } else {
            println!("{}", asset.display_name());
            println!("{}", build_rates_table(&profile));
            println!("{}", build_daily_table(&profile));
            println!("{}", build_profile_table(&profile, self.alert_days));
        }

        self.heartbeat.send().await;
        Ok(())
    }
}
