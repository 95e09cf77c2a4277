use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use log::info;
use wxdash_core::{
    CityRegistry, Config, OpenWeatherClient, RangeFilter, WeatherSource, current_conditions,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wxdash", version, about = "Researcher dashboard weather data")]
pub struct Cli {
    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure {
        /// Override the provider base URL.
        #[arg(long)]
        base_url: Option<String>,

        /// Request timeout in seconds; unset waits indefinitely.
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// List the known cities and their coordinates.
    Cities,

    /// Show current conditions for one or more cities.
    Current {
        /// City names; defaults to the configured cities or the whole registry.
        cities: Vec<String>,

        #[arg(long, allow_negative_numbers = true)]
        min_temp: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        max_temp: Option<f64>,

        #[arg(long)]
        min_humidity: Option<u8>,

        #[arg(long)]
        max_humidity: Option<u8>,
    },

    /// Show the 5-day / 3-hour forecast for a city.
    Forecast {
        city: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let json = self.json;

        match self.command {
            Command::Configure { base_url, timeout_secs } => {
                configure(base_url, timeout_secs)?;
            }
            Command::Cities => {
                let registry = CityRegistry::default();
                if json {
                    let cities: Vec<_> = registry
                        .iter()
                        .map(|(name, coords)| serde_json::json!({ "city": name, "coordinates": coords }))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&cities)?);
                } else {
                    print!("{}", output::CitiesTable(&registry));
                }
            }
            Command::Current { cities, min_temp, max_temp, min_humidity, max_humidity } => {
                let config = Config::load()?;
                let client = client_from(&config)?;

                let cities = if cities.is_empty() { default_cities(&config) } else { cities };
                info!("fetching current conditions for {} cities", cities.len());

                let table = current_conditions(&client, &cities).await;
                let filter = range_filter(min_temp, max_temp, min_humidity, max_humidity);
                let view = output::CurrentView::new(&table, filter.as_ref());

                if json {
                    println!("{}", serde_json::to_string_pretty(&view.to_json())?);
                } else {
                    print!("{view}");
                }
            }
            Command::Forecast { city } => {
                let config = Config::load()?;
                let client = client_from(&config)?;

                match client.fetch_forecast(&city).await {
                    Some(forecast) if json => {
                        println!("{}", serde_json::to_string_pretty(&forecast)?);
                    }
                    Some(forecast) => print!("{}", output::ForecastTable(&forecast)),
                    None => println!("No forecast data available for {city}."),
                }
            }
        }

        Ok(())
    }
}

fn configure(base_url: Option<String>, timeout_secs: Option<u64>) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }

    config.set_api_key(api_key.to_string());
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }
    if timeout_secs.is_some() {
        config.timeout_secs = timeout_secs;
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

fn client_from(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    let settings = config.provider_settings()?;
    OpenWeatherClient::new(settings).context("Failed to build HTTP client")
}

/// A filter only when the user asked for one; unset bounds stay open.
fn range_filter(
    min_temp: Option<f64>,
    max_temp: Option<f64>,
    min_humidity: Option<u8>,
    max_humidity: Option<u8>,
) -> Option<RangeFilter> {
    if min_temp.is_none() && max_temp.is_none() && min_humidity.is_none() && max_humidity.is_none()
    {
        return None;
    }

    Some(
        RangeFilter::unbounded()
            .with_temperature(min_temp, max_temp)
            .with_humidity(min_humidity, max_humidity),
    )
}

fn default_cities(config: &Config) -> Vec<String> {
    if config.default_cities.is_empty() {
        CityRegistry::default().names().map(str::to_string).collect()
    } else {
        config.default_cities.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_current_with_negative_bounds() {
        let cli = Cli::try_parse_from([
            "wxdash", "current", "Pretoria", "London", "--min-temp", "-5", "--max-humidity", "80",
        ])
        .expect("valid arguments");

        match cli.command {
            Command::Current { cities, min_temp, max_humidity, .. } => {
                assert_eq!(cities, vec!["Pretoria", "London"]);
                assert_eq!(min_temp, Some(-5.0));
                assert_eq!(max_humidity, Some(80));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["wxdash", "forecast", "Tokyo", "--json", "-vv"])
            .expect("valid arguments");

        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn no_bounds_means_no_filter() {
        assert!(range_filter(None, None, None, None).is_none());
    }

    #[test]
    fn one_bound_leaves_the_others_open() {
        let filter = range_filter(Some(0.0), None, None, None).expect("filter requested");

        assert_eq!(*filter.temperature_c.start(), 0.0);
        assert_eq!(*filter.temperature_c.end(), f64::INFINITY);
        assert_eq!(filter.humidity_pct, 0..=u8::MAX);
    }

    #[test]
    fn default_cities_fall_back_to_registry() {
        let mut config = Config::default();
        assert_eq!(default_cities(&config).len(), CityRegistry::default().len());

        config.default_cities = vec!["Durban".into()];
        assert_eq!(default_cities(&config), vec!["Durban"]);
    }
}
