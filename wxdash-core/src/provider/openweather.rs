use async_trait::async_trait;
use chrono::{DateTime, Local};
use log::debug;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    config::ProviderSettings,
    model::{Forecast, ForecastPoint, WeatherSnapshot},
};

use super::{FetchError, WeatherSource};

const CURRENT_PATH: &str = "weather";
const FORECAST_PATH: &str = "forecast";

/// Client for the OpenWeather 2.5 `weather` and `forecast` resources.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    settings: ProviderSettings,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(settings: ProviderSettings) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self { settings, http: builder.build()? })
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// One GET against `path`, then hand the decoded payload to `map`.
    ///
    /// Only status 200 counts as success.
    async fn fetch_and_map<R, T, F>(&self, path: &str, city: &str, map: F) -> Result<T, FetchError>
    where
        R: DeserializeOwned,
        F: FnOnce(R) -> Result<T, FetchError> + Send,
    {
        let url = format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path);
        debug!("GET {url} q={city}");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.settings.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = res.status();
        if status != StatusCode::OK {
            debug!("{path} for {city} answered {status}");
            return Err(FetchError::Status(status));
        }

        let body = res.text().await?;
        let parsed: R = serde_json::from_str(&body)?;

        map(parsed)
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn try_current(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
        self.fetch_and_map(CURRENT_PATH, city, |parsed| map_current(city, parsed)).await
    }

    async fn try_forecast(&self, city: &str) -> Result<Forecast, FetchError> {
        self.fetch_and_map(FORECAST_PATH, city, |parsed| map_forecast(city, parsed)).await
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    coord: OwCoord,
}

#[derive(Debug, Deserialize)]
struct OwRain {
    #[serde(rename = "3h", default)]
    three_hours: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    #[serde(default)]
    rain: Option<OwRain>,
    #[serde(default)]
    pop: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn map_current(city: &str, parsed: OwCurrentResponse) -> Result<WeatherSnapshot, FetchError> {
    let description = parsed
        .weather
        .first()
        .map(|w| w.description.as_str())
        .ok_or_else(|| FetchError::Malformed("no weather description".to_string()))?;

    Ok(WeatherSnapshot {
        city: city.to_string(),
        temperature_c: parsed.main.temp,
        humidity_pct: parsed.main.humidity,
        condition: title_case(description),
        wind_speed_ms: parsed.wind.speed,
        latitude: parsed.coord.lat,
        longitude: parsed.coord.lon,
    })
}

fn map_forecast(city: &str, parsed: OwForecastResponse) -> Result<Forecast, FetchError> {
    let points = parsed
        .list
        .into_iter()
        .map(|entry| {
            Ok(ForecastPoint {
                timestamp: unix_to_local(entry.dt)?,
                temperature_c: entry.main.temp,
                humidity_pct: entry.main.humidity,
                rain_mm: entry.rain.and_then(|r| r.three_hours).unwrap_or(0.0),
                precip_probability_pct: entry.pop.map(|p| p * 100.0).unwrap_or(0.0),
            })
        })
        .collect::<Result<Vec<_>, FetchError>>()?;

    Ok(Forecast { city: city.to_string(), points })
}

fn unix_to_local(ts: i64) -> Result<DateTime<Local>, FetchError> {
    DateTime::from_timestamp(ts, 0)
        .map(|utc| utc.with_timezone(&Local))
        .ok_or_else(|| FetchError::Malformed(format!("timestamp {ts} out of range")))
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_cases_descriptions() {
        assert_eq!(title_case("clear sky"), "Clear Sky");
        assert_eq!(title_case("light INTENSITY drizzle"), "Light Intensity Drizzle");
        assert_eq!(title_case("thunderstorm with heavy-rain"), "Thunderstorm With Heavy-Rain");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn maps_current_payload() {
        let body = r#"{"main":{"temp":22.5,"humidity":40},"weather":[{"description":"clear sky"}],"wind":{"speed":3.1},"coord":{"lat":-25.7479,"lon":28.2293}}"#;
        let parsed: OwCurrentResponse = serde_json::from_str(body).unwrap();

        let snapshot = map_current("Pretoria", parsed).unwrap();

        assert_eq!(
            snapshot,
            WeatherSnapshot {
                city: "Pretoria".into(),
                temperature_c: 22.5,
                humidity_pct: 40,
                condition: "Clear Sky".into(),
                wind_speed_ms: 3.1,
                latitude: -25.7479,
                longitude: 28.2293,
            }
        );
    }

    #[test]
    fn empty_weather_list_is_malformed() {
        let body = r#"{"main":{"temp":1.0,"humidity":1},"weather":[],"wind":{"speed":0.0},"coord":{"lat":0.0,"lon":0.0}}"#;
        let parsed: OwCurrentResponse = serde_json::from_str(body).unwrap();

        let err = map_current("Nowhere", parsed).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn forecast_defaults_missing_rain_and_pop() {
        let body = r#"{"list":[
            {"dt":1700000000,"main":{"temp":18.0,"humidity":70}},
            {"dt":1700010800,"main":{"temp":16.5,"humidity":75},"rain":{"3h":1.25},"pop":0.42},
            {"dt":1700021600,"main":{"temp":15.0,"humidity":80},"rain":{}}
        ]}"#;
        let parsed: OwForecastResponse = serde_json::from_str(body).unwrap();

        let forecast = map_forecast("London", parsed).unwrap();

        assert_eq!(forecast.city, "London");
        assert_eq!(forecast.len(), 3);

        assert_eq!(forecast.points[0].rain_mm, 0.0);
        assert_eq!(forecast.points[0].precip_probability_pct, 0.0);

        assert_eq!(forecast.points[1].rain_mm, 1.25);
        assert!((forecast.points[1].precip_probability_pct - 42.0).abs() < 1e-9);

        assert_eq!(forecast.points[2].rain_mm, 0.0);
        assert_eq!(forecast.points[2].timestamp.timestamp(), 1_700_021_600);
    }

    #[test]
    fn forecast_keeps_provider_order() {
        let body = r#"{"list":[
            {"dt":1700000000,"main":{"temp":1.0,"humidity":1}},
            {"dt":1700010800,"main":{"temp":2.0,"humidity":2}},
            {"dt":1700010800,"main":{"temp":3.0,"humidity":3}}
        ]}"#;
        let parsed: OwForecastResponse = serde_json::from_str(body).unwrap();

        let forecast = map_forecast("Tokyo", parsed).unwrap();
        let temps: Vec<f64> = forecast.points.iter().map(|p| p.temperature_c).collect();

        assert_eq!(temps, vec![1.0, 2.0, 3.0]);
        assert!(forecast.points.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn empty_forecast_list_is_empty_series() {
        let parsed: OwForecastResponse = serde_json::from_str(r#"{"list":[]}"#).unwrap();

        let forecast = map_forecast("Durban", parsed).unwrap();
        assert!(forecast.is_empty());
    }
}
