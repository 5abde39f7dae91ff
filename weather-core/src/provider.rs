use crate::{Config, Coordinate, WeatherReport, provider::openweather::OpenWeatherClient};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

/// Why a fetch produced no report. Every outcome of a fetch surfaces as either
/// a report or one of these.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("bad request (HTTP 400)")]
    BadRequest,

    #[error("not found (HTTP 404)")]
    NotFound,

    #[error("server error (HTTP {0})")]
    ServerError(u16),

    #[error("network failure: {0}")]
    NetworkFailure(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl FetchError {
    pub(crate) fn network(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        FetchError::NetworkFailure(cause.into())
    }

    /// Maps a non-success HTTP status to the error taxonomy.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST => FetchError::BadRequest,
            StatusCode::NOT_FOUND => FetchError::NotFound,
            other => FetchError::ServerError(other.as_u16()),
        }
    }

    /// Short message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::BadRequest => "The weather request was rejected.".to_string(),
            FetchError::NotFound => "No weather found for this location.".to_string(),
            FetchError::ServerError(code) => {
                format!("The weather service failed (HTTP {code}). Try again later.")
            }
            FetchError::NetworkFailure(_) => {
                "Could not reach the weather service. Check your connection.".to_string()
            }
        }
    }
}

#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    /// Issues one request for `coord`. Never retries.
    async fn fetch(&self, coord: Coordinate) -> Result<WeatherReport, FetchError>;
}

/// Construct the OpenWeather client from config.
pub fn client_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherClient>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
             Hint: run `weather configure` and enter your OpenWeather API key."
        )
    })?;

    Ok(Box::new(OpenWeatherClient::new(
        config.base_url.clone(),
        api_key.to_owned(),
        config.units.clone(),
    )))
}
