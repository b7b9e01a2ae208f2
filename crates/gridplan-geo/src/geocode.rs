//! City-name → center-coordinate resolution.
//!
//! The planner never talks to a mapping provider directly; it asks a
//! [`Geocoder`]. [`CatalogGeocoder`] answers from the configured city catalog.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use gridplan_core::{slugify, CitiesFile};

use crate::coord::Coordinate;
use crate::error::GridError;

/// Resolves a city name to the center coordinate a grid is built around.
pub trait Geocoder {
    /// # Errors
    ///
    /// Returns [`GridError::CityNotFound`] when the name cannot be resolved.
    fn resolve_city_center(
        &self,
        city: &str,
    ) -> impl Future<Output = Result<Coordinate, GridError>> + Send;
}

/// Geocoder backed by the in-process city catalog.
#[derive(Debug, Clone)]
pub struct CatalogGeocoder {
    cities: Arc<CitiesFile>,
}

impl CatalogGeocoder {
    #[must_use]
    pub fn new(cities: Arc<CitiesFile>) -> Self {
        Self { cities }
    }
}

impl Geocoder for CatalogGeocoder {
    async fn resolve_city_center(&self, city: &str) -> Result<Coordinate, GridError> {
        self.cities
            .find(city)
            .map(|c| Coordinate::new(c.latitude, c.longitude))
            .ok_or_else(|| GridError::CityNotFound(city.trim().to_string()))
    }
}

/// Geocode results remembered for the lifetime of one planning session.
///
/// Keys are city slugs, so `"Salt Lake City"` and `"salt-lake-city"` share an entry.
#[derive(Debug, Default)]
pub struct GeocodeCache {
    entries: HashMap<String, Coordinate>,
}

impl GeocodeCache {
    #[must_use]
    pub fn get(&self, city: &str) -> Option<Coordinate> {
        self.entries.get(&slugify(city)).copied()
    }

    pub fn insert(&mut self, city: &str, center: Coordinate) {
        self.entries.insert(slugify(city), center);
    }

    /// Drop one city so the next lookup goes back to the geocoder.
    pub fn invalidate(&mut self, city: &str) -> Option<Coordinate> {
        self.entries.remove(&slugify(city))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
