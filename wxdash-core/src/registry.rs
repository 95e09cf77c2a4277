//! Fixed table of the cities the dashboard knows how to place on a map.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

const CITIES: &[(&str, Coordinates)] = &[
    ("Pretoria", Coordinates { latitude: -25.7479, longitude: 28.2293 }),
    ("Johannesburg", Coordinates { latitude: -26.2041, longitude: 28.0473 }),
    ("Cape Town", Coordinates { latitude: -33.9249, longitude: 18.4241 }),
    ("Durban", Coordinates { latitude: -29.8587, longitude: 31.0218 }),
    ("London", Coordinates { latitude: 51.5074, longitude: -0.1278 }),
    ("New York", Coordinates { latitude: 40.7128, longitude: -74.0060 }),
    ("Tokyo", Coordinates { latitude: 35.6762, longitude: 139.6503 }),
    ("Sydney", Coordinates { latitude: -33.8688, longitude: 151.2093 }),
];

/// Read-only city name → coordinates mapping.
#[derive(Debug, Clone, Copy)]
pub struct CityRegistry {
    entries: &'static [(&'static str, Coordinates)],
}

impl Default for CityRegistry {
    fn default() -> Self {
        Self { entries: CITIES }
    }
}

impl CityRegistry {
    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<Coordinates> {
        let name = name.trim();
        self.entries
            .iter()
            .find(|(city, _)| city.eq_ignore_ascii_case(name))
            .map(|(_, coords)| *coords)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// City names in registry order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(city, _)| *city)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Coordinates)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = CityRegistry::default();
        let coords = registry.get("pretoria").expect("Pretoria is registered");

        assert_eq!(coords.latitude, -25.7479);
        assert_eq!(coords.longitude, 28.2293);
        assert!(registry.contains("  CAPE TOWN "));
    }

    #[test]
    fn unknown_city_is_none() {
        assert!(CityRegistry::default().get("Atlantis").is_none());
    }

    #[test]
    fn names_keep_registry_order() {
        let registry = CityRegistry::default();
        let names: Vec<_> = registry.names().collect();

        assert_eq!(names.len(), registry.len());
        assert_eq!(names.first(), Some(&"Pretoria"));
        assert_eq!(names.last(), Some(&"Sydney"));
    }
}
