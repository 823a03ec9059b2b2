use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    model::{DateRange, Parameter, PowerResponse},
    provider::truncate_body,
};

use super::ClimateDataSource;

pub const DEFAULT_BASE_URL: &str = "https://power.larc.nasa.gov";
const DAILY_POINT_PATH: &str = "/api/temporal/daily/point";
const COMMUNITY: &str = "AG";

/// NASA POWER daily point endpoint.
#[derive(Debug, Clone)]
pub struct NasaPowerSource {
    base_url: String,
    http: Client,
}

impl NasaPowerSource {
    pub fn new(user_agent: &str) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, user_agent)
    }

    pub fn with_base_url(base_url: &str, user_agent: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client for NASA POWER")?;

        Ok(Self { base_url: base_url.trim_end_matches('/').to_string(), http })
    }
}

#[async_trait]
impl ClimateDataSource for NasaPowerSource {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_daily(
        &self,
        latitude: f64,
        longitude: f64,
        range: &DateRange,
    ) -> Result<PowerResponse> {
        let url = format!("{}{}", self.base_url, DAILY_POINT_PATH);
        let (start, end) = range.to_compact();

        debug!(%start, %end, "Requesting daily point data");
        let res = self
            .http
            .get(&url)
            .query(&[
                ("parameters", Parameter::query_list()),
                ("community", COMMUNITY.to_string()),
                ("longitude", longitude.to_string()),
                ("latitude", latitude.to_string()),
                ("start", start),
                ("end", end),
                ("format", "JSON".to_string()),
            ])
            .send()
            .await
            .context("Failed to send request to NASA POWER")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read NASA POWER response body")?;
        debug!(%status, bytes = body.len(), "Received NASA POWER response");

        if !status.is_success() {
            return Err(anyhow!(
                "NASA POWER API error: status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: Value =
            serde_json::from_str(&body).context("Failed to parse NASA POWER JSON")?;

        Ok(PowerResponse::new(parsed))
    }
}
