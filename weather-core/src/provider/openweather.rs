use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use crate::{Coordinate, WeatherReport, provider::FetchError};

use super::WeatherClient;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Current-weather client for the OpenWeather `/weather` endpoint.
#[derive(Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    api_key: String,
    units: String,
    http: Client,
}

impl std::fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("base_url", &self.base_url)
            .field("units", &self.units)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherClient {
    pub fn new(base_url: String, api_key: String, units: String) -> Self {
        Self::with_http(Client::new(), base_url, api_key, units)
    }

    pub fn with_http(http: Client, base_url: String, api_key: String, units: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            units,
            http,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/weather", self.base_url)
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    #[instrument(skip(self), fields(lat = coord.latitude(), lon = coord.longitude()))]
    async fn fetch(&self, coord: Coordinate) -> Result<WeatherReport, FetchError> {
        let lat = coord.latitude().to_string();
        let lon = coord.longitude().to_string();

        debug!(url = %self.endpoint(), units = %self.units, "requesting current weather");

        let res = self
            .http
            .get(self.endpoint())
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("units", self.units.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenWeather request failed");
                FetchError::network(e)
            })?;

        let status = res.status();
        if !status.is_success() {
            let err = FetchError::from_status(status);
            warn!(%status, "OpenWeather returned an error status");
            return Err(err);
        }

        let body = res.text().await.map_err(|e| {
            warn!(error = %e, "failed to read OpenWeather response body");
            FetchError::network(e)
        })?;

        let report: WeatherReport = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, body = %truncate_body(&body), "failed to parse OpenWeather JSON");
            FetchError::network(e)
        })?;

        info!(location = %report.location_name, "fetched current weather");
        Ok(report)
    }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
