use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Current conditions for one city, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub condition: String,
    pub wind_speed_ms: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// One 3-hour step of the 5-day forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Local>,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub rain_mm: f64,
    pub precip_probability_pct: f64,
}

/// Forecast series for a single city, in provider (chronological) order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub city: String,
    pub points: Vec<ForecastPoint>,
}

impl Forecast {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
