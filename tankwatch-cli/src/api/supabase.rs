use std::time::Duration;

use reqwest::{
    Client,
    ClientBuilder,
    Url,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    core::{
        asset::{Asset, AssetId},
        interval::Interval,
        reading::Reading,
    },
    prelude::*,
    store::ReadingStore,
};

/// PostgREST caps responses at 1000 rows by default.
const PAGE_SIZE: usize = 1000;

/// Table and column names of the Supabase project.
#[derive(Clone)]
pub struct Schema {
    pub readings_table: String,
    pub assets_table: String,

    /// Primary key of the assets table.
    pub asset_id_column: String,

    pub timestamp_column: String,
}

/// Supabase REST API client.
pub struct Api {
    client: Client,
    base_url: Url,
    schema: Schema,
}

impl Api {
    pub fn try_new(base_url: Url, api_key: &str, schema: Schema) -> Result<Self> {
        let headers = HeaderMap::from_iter([
            (HeaderName::from_static("apikey"), HeaderValue::from_str(api_key)?),
            (
                HeaderName::from_static("authorization"),
                HeaderValue::from_str(&format!("Bearer {api_key}"))?,
            ),
        ]);
        let client = ClientBuilder::new()
            .default_headers(headers)
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, base_url, schema })
    }

    fn table_url(&self, table: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("invalid base URL: `{}`", self.base_url))?
            .pop_if_empty()
            .extend(["rest", "v1", table]);
        Ok(url)
    }

    /// Assets ordered by their IDs, or the single asset when an ID is given.
    fn assets_url(&self, asset_id: Option<&AssetId>) -> Result<Url> {
        let column = &self.schema.asset_id_column;
        let mut url = self.table_url(&self.schema.assets_table)?;
        let mut query = url.query_pairs_mut();
        query.append_pair("select", "*");
        match asset_id {
            Some(asset_id) => query.append_pair(column, &format!("eq.{asset_id}")),
            None => query.append_pair("order", &format!("{column}.asc")),
        };
        drop(query);
        Ok(url)
    }

    /// Fetch all the rows, page by page, skipping the ones that fail to deserialize.
    async fn get_all<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>> {
        let mut rows = Vec::new();
        let mut n_skipped = 0_usize;
        for offset in (0..).step_by(PAGE_SIZE) {
            let mut page_url = url.clone();
            page_url
                .query_pairs_mut()
                .append_pair("limit", &PAGE_SIZE.to_string())
                .append_pair("offset", &offset.to_string());
            let page: Vec<Value> = self
                .client
                .get(page_url)
                .send()
                .await
                .with_context(|| format!("failed to request `{url}`"))?
                .error_for_status()?
                .json()
                .await
                .with_context(|| format!("failed to deserialize the response from `{url}`"))?;
            let n_rows = page.len();
            n_skipped += deserialize_rows(page, &mut rows);
            if n_rows < PAGE_SIZE {
                break;
            }
        }
        if n_skipped != 0 {
            warn!(n_skipped, "skipped malformed rows");
        }
        Ok(rows)
    }
}

/// Push the well-formed rows and return the number of skipped ones.
fn deserialize_rows<T: DeserializeOwned>(page: Vec<Value>, rows: &mut Vec<T>) -> usize {
    let mut n_skipped = 0;
    for row in page {
        match serde_json::from_value(row) {
            Ok(row) => rows.push(row),
            Err(error) => {
                debug!(%error, "skipping a malformed row");
                n_skipped += 1;
            }
        }
    }
    n_skipped
}

impl ReadingStore for Api {
    #[instrument(skip_all)]
    async fn fetch_assets(&self) -> Result<Vec<Asset>> {
        let assets: Vec<Asset> = self.get_all(self.assets_url(None)?).await?;
        info!(n_assets = assets.len(), "fetched");
        Ok(assets)
    }

    #[instrument(skip_all, fields(asset_id = %asset_id, interval = ?interval))]
    async fn fetch_readings(&self, asset_id: &AssetId, interval: Interval) -> Result<Vec<Reading>> {
        let column = &self.schema.timestamp_column;
        let mut url = self.table_url(&self.schema.readings_table)?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("asset_id", &format!("eq.{asset_id}"))
            .append_pair(column, &format!("gte.{}", interval.start.to_rfc3339()))
            .append_pair(column, &format!("lt.{}", interval.end.to_rfc3339()))
            .append_pair("order", &format!("{column}.asc"));
        let readings: Vec<Reading> = self.get_all(url).await?;
        info!(n_readings = readings.len(), "fetched");
        Ok(readings)
    }

    #[instrument(skip_all, fields(asset_id = %asset_id))]
    async fn fetch_asset(&self, asset_id: &AssetId) -> Result<Asset> {
        self.get_all::<Asset>(self.assets_url(Some(asset_id))?)
            .await?
            .into_iter()
            .next()
            .with_context(|| format!("asset `{asset_id}` is not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> Result<Api> {
        Api::try_new(
            Url::parse("https://project.supabase.co")?,
            "anon-key",
            Schema {
                readings_table: "tank_readings".to_owned(),
                assets_table: "tanks".to_owned(),
                asset_id_column: "asset_id".to_owned(),
                timestamp_column: "created_at".to_owned(),
            },
        )
    }

    #[test]
    fn table_url_ok() -> Result {
        assert_eq!(
            api()?.table_url("tank_readings")?.as_str(),
            "https://project.supabase.co/rest/v1/tank_readings",
        );
        Ok(())
    }

    #[test]
    fn assets_url_uses_key_column() -> Result {
        let api = api()?;
        assert_eq!(
            api.assets_url(None)?.query(),
            Some("select=*&order=asset_id.asc"),
        );
        assert_eq!(
            api.assets_url(Some(&AssetId::from("gasbot-4411")))?.query(),
            Some("select=*&asset_id=eq.gasbot-4411"),
        );
        Ok(())
    }

    #[test]
    fn deserialize_rows_ok() -> Result {
        // language=json
        let body = r#"[
            {
                "id": 1,
                "asset_id": "gasbot-4411",
                "created_at": "2025-06-01T06:30:00.123+00:00",
                "level_percentage": 61.5,
                "level_liters": 12300.0,
                "battery_voltage": 3.61
            },
            {
                "id": 2,
                "asset_id": "gasbot-4411",
                "created_at": "not a timestamp",
                "level_percentage": 60.0
            }
        ]"#;
        let mut readings = Vec::<Reading>::new();
        let n_skipped = deserialize_rows(serde_json::from_str(body)?, &mut readings);
        assert_eq!(n_skipped, 1);
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].asset_id, AssetId::from("gasbot-4411"));
        assert_eq!(readings[0].level_percent, Some(tankwatch_quantities::Percent::from(61.5)));
        Ok(())
    }
}
