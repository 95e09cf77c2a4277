//! Core library for the `wxdash` weather dashboard.
//!
//! This crate defines:
//! - Configuration & credential handling
//! - The OpenWeather client (current conditions and 5-day forecast)
//! - Shared records consumed by the display layer
//! - Multi-city fan-out and range filtering
//!
//! It is used by `wxdash-cli`, but can also be reused by other front ends.

pub mod config;
pub mod dashboard;
pub mod model;
pub mod provider;
pub mod registry;

pub use config::{Config, ProviderSettings};
pub use dashboard::{CityConditions, CurrentConditions, RangeFilter, current_conditions};
pub use model::{Forecast, ForecastPoint, WeatherSnapshot};
pub use provider::{FetchError, OpenWeatherClient, WeatherSource};
pub use registry::{CityRegistry, Coordinates};
