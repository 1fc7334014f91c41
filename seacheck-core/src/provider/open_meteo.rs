use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{ConditionSnapshot, Coordinate, FetchError, config::ProviderConfig};

use super::ConditionProvider;

/// Open-Meteo backed provider: wind from the forecast API, waves and sea
/// surface temperature from the marine API. Neither needs an API key.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    forecast_url: String,
    marine_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn from_config(config: &ProviderConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client for Open-Meteo")?;

        Ok(Self {
            forecast_url: config.forecast_url.clone(),
            marine_url: config.marine_url.clone(),
            http,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        coordinate: Coordinate,
        current: &str,
        extra: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let latitude = coordinate.latitude().to_string();
        let longitude = coordinate.longitude().to_string();

        let res = self
            .http
            .get(url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", current),
            ])
            .query(extra)
            .send()
            .await
            .map_err(|e| FetchError::unreachable(format!("request to {url} failed: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| FetchError::unreachable(format!("reading body from {url}: {e}")))?;

        if !status.is_success() {
            return Err(FetchError::unreachable(format!(
                "{url} answered {status}: {}",
                truncate_body(&body)
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| FetchError::malformed(format!("unexpected JSON from {url}: {e}")))
    }

    async fn fetch_wind(&self, coordinate: Coordinate) -> Result<f64, FetchError> {
        let parsed: ForecastResponse = self
            .get_json(
                &self.forecast_url,
                coordinate,
                "wind_speed_10m",
                &[("wind_speed_unit", "kmh")],
            )
            .await?;

        parsed
            .current
            .wind_speed_10m
            .ok_or_else(|| FetchError::malformed("forecast response has no wind_speed_10m"))
    }

    /// Marine data is best effort: points without sea coverage yield unknowns.
    async fn fetch_marine(&self, coordinate: Coordinate) -> MarineCurrent {
        match self
            .get_json::<MarineResponse>(
                &self.marine_url,
                coordinate,
                "wave_height,sea_surface_temperature",
                &[],
            )
            .await
        {
            Ok(parsed) => parsed.current,
            Err(err) => {
                warn!(lat = coordinate.latitude(), lon = coordinate.longitude(), %err, "marine data unavailable");
                MarineCurrent::default()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastCurrent {
    wind_speed_10m: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: ForecastCurrent,
}

#[derive(Debug, Default, Deserialize)]
struct MarineCurrent {
    wave_height: Option<f64>,
    sea_surface_temperature: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MarineResponse {
    current: MarineCurrent,
}

fn into_snapshot(wind_speed_kmh: f64, marine: MarineCurrent) -> Result<ConditionSnapshot, FetchError> {
    ConditionSnapshot::new(wind_speed_kmh, marine.wave_height, marine.sea_surface_temperature)
}

#[async_trait]
impl ConditionProvider for OpenMeteoProvider {
    async fn fetch(&self, coordinate: Coordinate) -> Result<ConditionSnapshot, FetchError> {
        debug!(lat = coordinate.latitude(), lon = coordinate.longitude(), "fetching Open-Meteo conditions");

        let wind = self.fetch_wind(coordinate).await?;
        let marine = self.fetch_marine(coordinate).await;

        into_snapshot(wind, marine)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
