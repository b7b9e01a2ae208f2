use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// An axis-aligned box of open water, in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterArea {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityConfig {
    pub name: String,
    pub state: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub water: Vec<WaterArea>,
}

impl CityConfig {
    /// Generate a URL-safe slug from the city name.
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    /// Whether `query` names this city, by display name or slug, ignoring case.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        self.name.eq_ignore_ascii_case(query) || self.slug() == slugify(query)
    }
}

/// Lowercase, keep ASCII alphanumerics, collapse everything else into single dashes.
#[must_use]
pub fn slugify(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CitiesFile {
    pub cities: Vec<CityConfig>,
}

impl CitiesFile {
    #[must_use]
    pub fn find(&self, query: &str) -> Option<&CityConfig> {
        self.cities.iter().find(|c| c.matches(query))
    }
}

/// Load and validate the city catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_cities(path: &Path) -> Result<CitiesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_cities(&content)
}

/// Parse and validate a city catalog already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_cities(content: &str) -> Result<CitiesFile, ConfigError> {
    let cities_file: CitiesFile = serde_yaml::from_str(content)?;
    validate_cities(&cities_file)?;
    Ok(cities_file)
}

fn validate_cities(cities_file: &CitiesFile) -> Result<(), ConfigError> {
    let mut seen_slugs = HashSet::new();

    for city in &cities_file.cities {
        if city.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "city name must be non-empty".to_string(),
            ));
        }

        if !(-90.0..=90.0).contains(&city.latitude) {
            return Err(ConfigError::Validation(format!(
                "city '{}' has latitude {} outside [-90, 90]",
                city.name, city.latitude
            )));
        }

        if !(-180.0..=180.0).contains(&city.longitude) {
            return Err(ConfigError::Validation(format!(
                "city '{}' has longitude {} outside [-180, 180]",
                city.name, city.longitude
            )));
        }

        for area in &city.water {
            if area.south > area.north {
                return Err(ConfigError::Validation(format!(
                    "city '{}' has a water area whose south edge {} is north of {}",
                    city.name, area.south, area.north
                )));
            }
        }

        let slug = city.slug();
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate city slug: '{}' (from city '{}')",
                slug, city.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "cities_test.rs"]
mod tests;
