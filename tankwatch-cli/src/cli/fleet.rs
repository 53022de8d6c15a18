use chrono::Local;
use clap::Parser;
use tankwatch_quantities::Days;
use tokio::time::{MissedTickBehavior, interval};

use crate::{
    cli::{analysis::AnalysisArgs, heartbeat::HeartbeatArgs, store::StoreArgs},
    fleet::{Fleet, ProfileCache},
    prelude::*,
    store::Store,
    tables::{build_fleet_table, build_summary_table},
};

#[derive(Parser)]
pub struct FleetArgs {
    /// Maximal number of concurrent store queries.
    #[clap(long, env = "CONCURRENCY", default_value = "8")]
    concurrency: usize,

    /// Days remaining at or below which a tank is reported.
    #[clap(long, env = "ALERT_DAYS", default_value = "7")]
    alert_days: Days,

    /// Re-run on this interval instead of exiting.
    #[clap(long, env = "WATCH_INTERVAL")]
    watch: Option<humantime::Duration>,

    /// Time to live of the cached profiles in the watch mode, capped at one day.
    #[clap(long, env = "CACHE_TTL", default_value = "15min")]
    cache_ttl: humantime::Duration,

    /// Print the report and summary as JSON instead of the tables.
    #[clap(long)]
    json: bool,

    #[clap(flatten)]
    store: StoreArgs,

    #[clap(flatten)]
    analysis: AnalysisArgs,

    #[clap(flatten)]
    heartbeat: HeartbeatArgs,
}

impl FleetArgs {
    pub async fn run(self) -> Result {
        let store = self.store.connect()?;
        let config = self.analysis.config();
        let cache = ProfileCache::new(*self.cache_ttl);
        let fleet = Fleet::builder()
            .store(&store)
            .config(&config)
            .concurrency(self.concurrency)
            .maybe_cache(self.watch.is_some().then_some(&cache))
            .build();

        let Some(period) = self.watch.as_deref().copied() else {
            return self.report(&fleet).await;
        };
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if let Err(error) = self.report(&fleet).await {
                error!("failed to analyse the fleet: {error:#}");
            }
        }
    }

    async fn report(&self, fleet: &Fleet<'_, Store>) -> Result {
        let report = fleet.analyse(&Local::now()).await?;
        let summary = report.summary(self.alert_days);
        if self.json {
            println!("{}", serde_json::to_string_pretty(&(&report, &summary))?);
        } else {
            println!("{}", build_fleet_table(&report, self.alert_days));
            println!("{}", build_summary_table(&summary));
        }
        info!(
            n_assets = summary.n_assets,
            n_failed = summary.n_failed,
            n_alerts = summary.alerts.len(),
            "reported",
        );
        self.heartbeat.send().await;
        Ok(())
    }
}
