use crate::model::{Forecast, WeatherSnapshot};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Why a fetch produced no data.
///
/// Every variant means the same thing to the display layer: nothing to show.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("provider answered with status {0}")]
    Status(StatusCode),

    /// Carries no URL: the query string holds the API key.
    #[error("request to provider failed: {0}")]
    Transport(reqwest::Error),

    #[error("provider response could not be used: {0}")]
    Malformed(String),
}

impl FetchError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status(status) => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Transport(e.without_url())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Malformed(e.to_string())
    }
}

/// A source of current conditions and forecasts keyed by city name.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn try_current(&self, city: &str) -> Result<WeatherSnapshot, FetchError>;

    async fn try_forecast(&self, city: &str) -> Result<Forecast, FetchError>;

    /// Current conditions, or `None` when nothing usable came back.
    async fn fetch_current(&self, city: &str) -> Option<WeatherSnapshot> {
        self.try_current(city).await.ok()
    }

    /// Forecast series, or `None` when nothing usable came back.
    async fn fetch_forecast(&self, city: &str) -> Option<Forecast> {
        self.try_forecast(city).await.ok()
    }
}
