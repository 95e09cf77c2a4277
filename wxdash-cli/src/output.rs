use std::fmt;

use chrono::{DateTime, Local};
use serde_json::{Value, json};
use wxdash_core::{CityRegistry, CurrentConditions, Forecast, RangeFilter, WeatherSnapshot};

pub struct CitiesTable<'a>(pub &'a CityRegistry);

impl fmt::Display for CitiesTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<14} {:>10} {:>10}", "City", "Lat", "Lon")?;

        for (name, coords) in self.0.iter() {
            writeln!(f, "{:<14} {:>10.4} {:>10.4}", name, coords.latitude, coords.longitude)?;
        }

        Ok(())
    }
}

/// Current conditions as shown to the user: rows inside the optional filter,
/// plus the cities the filter hid and the cities that had no data.
pub struct CurrentView<'a> {
    table: &'a CurrentConditions,
    filter: Option<&'a RangeFilter>,
}

impl<'a> CurrentView<'a> {
    pub fn new(table: &'a CurrentConditions, filter: Option<&'a RangeFilter>) -> Self {
        Self { table, filter }
    }

    fn shown(&self) -> Vec<&'a WeatherSnapshot> {
        match self.filter {
            Some(filter) => filter.apply(self.table.snapshots()),
            None => self.table.snapshots().collect(),
        }
    }

    fn filtered_out(&self) -> Vec<&'a str> {
        match self.filter {
            Some(filter) => {
                filter.rejected(self.table.snapshots()).into_iter().map(|s| s.city.as_str()).collect()
            }
            None => Vec::new(),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "snapshots": self.shown(),
            "filtered_out": self.filtered_out(),
            "missing": self.table.missing().collect::<Vec<_>>(),
        })
    }
}

impl fmt::Display for CurrentView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<14} {:>8} {:>9} {:>8}  {}",
            "City", "Temp °C", "Humidity", "Wind m/s", "Conditions"
        )?;

        for s in self.shown() {
            writeln!(
                f,
                "{:<14} {:>8.1} {:>8}% {:>8.1}  {}",
                s.city, s.temperature_c, s.humidity_pct, s.wind_speed_ms, s.condition
            )?;
        }

        let filtered_out = self.filtered_out();
        if !filtered_out.is_empty() {
            writeln!(f, "\nOutside filter: {}", filtered_out.join(", "))?;
        }

        let missing: Vec<&str> = self.table.missing().collect();
        if !missing.is_empty() {
            writeln!(f, "\nNo data: {}", missing.join(", "))?;
        }

        Ok(())
    }
}

pub struct ForecastTable<'a>(pub &'a Forecast);

impl fmt::Display for ForecastTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Forecast for {}", self.0.city)?;
        writeln!(
            f,
            "{:<17} {:>8} {:>9} {:>8} {:>7}",
            "Time", "Temp °C", "Humidity", "Rain mm", "Precip"
        )?;

        for p in &self.0.points {
            writeln!(
                f,
                "{:<17} {:>8.1} {:>8}% {:>8.1} {:>6.0}%",
                format_time(&p.timestamp),
                p.temperature_c,
                p.humidity_pct,
                p.rain_mm,
                p.precip_probability_pct
            )?;
        }

        Ok(())
    }
}

fn format_time(ts: &DateTime<Local>) -> String {
    ts.format("%a %d %b %H:%M").to_string()
}
