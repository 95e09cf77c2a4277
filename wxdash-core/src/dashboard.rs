//! Multi-city current conditions and the temperature/humidity explorer filter.

use futures::future::join_all;
use log::debug;
use serde::Serialize;
use std::ops::RangeInclusive;

use crate::{model::WeatherSnapshot, provider::WeatherSource};

/// One row of the multi-city table; `snapshot` is `None` when the city had no data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityConditions {
    pub city: String,
    pub snapshot: Option<WeatherSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub rows: Vec<CityConditions>,
}

impl CurrentConditions {
    /// Populated rows, in request order.
    pub fn snapshots(&self) -> impl Iterator<Item = &WeatherSnapshot> {
        self.rows.iter().filter_map(|row| row.snapshot.as_ref())
    }

    /// Cities that came back without data.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().filter(|row| row.snapshot.is_none()).map(|row| row.city.as_str())
    }
}

/// Fetch current conditions for every city concurrently, one request per city.
///
/// Rows come back in the order of `cities`, whatever order the requests finish in.
pub async fn current_conditions<S, I>(source: &S, cities: I) -> CurrentConditions
where
    S: WeatherSource + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let cities: Vec<String> = cities.into_iter().map(|c| c.as_ref().to_string()).collect();

    let results = join_all(cities.iter().map(|city| source.try_current(city))).await;

    let rows = cities
        .into_iter()
        .zip(results)
        .map(|(city, result)| {
            let snapshot = match result {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    debug!("no current conditions for {city}: {e}");
                    None
                }
            };
            CityConditions { city, snapshot }
        })
        .collect();

    CurrentConditions { rows }
}

/// Inclusive temperature and humidity bounds for narrowing a snapshot table.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFilter {
    pub temperature_c: RangeInclusive<f64>,
    pub humidity_pct: RangeInclusive<u8>,
}

impl Default for RangeFilter {
    fn default() -> Self {
        Self { temperature_c: -10.0..=40.0, humidity_pct: 0..=100 }
    }
}

impl RangeFilter {
    /// Lets every snapshot through; narrow it with `with_*`.
    pub fn unbounded() -> Self {
        Self { temperature_c: f64::NEG_INFINITY..=f64::INFINITY, humidity_pct: 0..=u8::MAX }
    }

    pub fn with_temperature(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        let (lo, hi) = self.temperature_c.into_inner();
        self.temperature_c = min.unwrap_or(lo)..=max.unwrap_or(hi);
        self
    }

    pub fn with_humidity(mut self, min: Option<u8>, max: Option<u8>) -> Self {
        let (lo, hi) = self.humidity_pct.into_inner();
        self.humidity_pct = min.unwrap_or(lo)..=max.unwrap_or(hi);
        self
    }

    pub fn matches(&self, snapshot: &WeatherSnapshot) -> bool {
        self.temperature_c.contains(&snapshot.temperature_c)
            && self.humidity_pct.contains(&snapshot.humidity_pct)
    }

    pub fn apply<'a, I>(&self, snapshots: I) -> Vec<&'a WeatherSnapshot>
    where
        I: IntoIterator<Item = &'a WeatherSnapshot>,
    {
        snapshots.into_iter().filter(|s| self.matches(s)).collect()
    }

    /// The complement of `apply`: snapshots outside the bounds, in order.
    pub fn rejected<'a, I>(&self, snapshots: I) -> Vec<&'a WeatherSnapshot>
    where
        I: IntoIterator<Item = &'a WeatherSnapshot>,
    {
        snapshots.into_iter().filter(|s| !self.matches(s)).collect()
    }
}
