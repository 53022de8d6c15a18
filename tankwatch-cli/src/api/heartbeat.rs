use std::time::Duration;

use reqwest::{Client, Url};

use crate::prelude::*;

/// Ping the uptime monitor after a successful run.
#[instrument(skip_all, fields(url = %url))]
pub async fn send(url: Url) -> Result {
    info!("sending a heartbeat…");
    Client::builder()
        .timeout(Duration::from_secs(3))
        .build()?
        .post(url)
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}
