//! One caller's planning context: a geocoder, its cache, and planner bounds.
//!
//! The geocode cache belongs to the session rather than the process, so
//! separate sessions never observe each other's entries and a caller can
//! invalidate a city when the catalog behind its geocoder changes.

use std::future::Future;

use gridplan_core::CostConfig;
use tokio::sync::Mutex;

use crate::coord::{miles_to_meters, Coordinate};
use crate::error::GridError;
use crate::geocode::{GeocodeCache, Geocoder};
use crate::planner::{
    find_max_grid_search_results_within_budget_with_bounds, GridSearchResults, PlannerBounds,
};
use crate::water::filter_water;

const DEFAULT_WATER_CHECK_CONCURRENCY: usize = 8;

pub struct PlanningSession<G> {
    geocoder: G,
    bounds: PlannerBounds,
    water_check_concurrency: usize,
    cache: Mutex<GeocodeCache>,
}

impl<G: Geocoder> PlanningSession<G> {
    #[must_use]
    pub fn new(geocoder: G, bounds: PlannerBounds) -> Self {
        Self {
            geocoder,
            bounds,
            water_check_concurrency: DEFAULT_WATER_CHECK_CONCURRENCY,
            cache: Mutex::new(GeocodeCache::default()),
        }
    }

    #[must_use]
    pub fn with_water_check_concurrency(mut self, concurrency: usize) -> Self {
        self.water_check_concurrency = concurrency.max(1);
        self
    }

    /// Resolve a city center, consulting the session cache first.
    ///
    /// # Errors
    ///
    /// Propagates the geocoder's error, typically [`GridError::CityNotFound`].
    pub async fn resolve_city_center(&self, city: &str) -> Result<Coordinate, GridError> {
        let cached = self.cache.lock().await.get(city);
        if let Some(center) = cached {
            tracing::debug!(city, "geocode cache hit");
            return Ok(center);
        }

        tracing::debug!(city, "geocode cache miss");
        let center = self.geocoder.resolve_city_center(city).await?;
        self.cache.lock().await.insert(city, center);
        Ok(center)
    }

    pub async fn invalidate_city(&self, city: &str) {
        self.cache.lock().await.invalidate(city);
    }

    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }

    pub async fn cached_cities(&self) -> usize {
        self.cache.lock().await.len()
    }

    /// Geocode `city` and plan the finest grid that fits `cost`.
    ///
    /// # Errors
    ///
    /// - [`GridError::InvalidConfiguration`] if `cost` fails validation.
    /// - [`GridError::CityNotFound`] if the city cannot be geocoded.
    /// - [`GridError::BudgetExceeded`] if no grid fits the budget.
    /// - [`GridError::PlanningAborted`] if the planner task dies.
    pub async fn plan_for_city(
        &self,
        city: &str,
        cost: &CostConfig,
    ) -> Result<GridSearchResults, GridError> {
        cost.validate()?;
        let center = self.resolve_city_center(city).await?;
        tracing::info!(
            city,
            latitude = center.latitude,
            longitude = center.longitude,
            radius_miles = cost.desired_radius_miles,
            budget = cost.budget,
            "planning search grid"
        );
        let bounds = self.bounds.clone();
        let (cost_per_cell, budget) = (cost.cost_per_cell, cost.budget);
        let radius_meters = miles_to_meters(cost.desired_radius_miles);
        // Grid search is CPU-bound; keep it off the async workers.
        tokio::task::spawn_blocking(move || {
            find_max_grid_search_results_within_budget_with_bounds(
                center.latitude,
                center.longitude,
                radius_meters,
                cost_per_cell,
                budget,
                &bounds,
            )
        })
        .await
        .map_err(|e| GridError::PlanningAborted(e.to_string()))?
    }

    /// Like [`plan_for_city`](Self::plan_for_city), then drops cells the
    /// predicate reports as over water.
    ///
    /// Only `grid` shrinks; `number_of_squares` and `total_cost` stay the
    /// continuous projection of the chosen configuration.
    ///
    /// # Errors
    ///
    /// Same as [`plan_for_city`](Self::plan_for_city).
    pub async fn plan_for_city_excluding_water<P, Fut>(
        &self,
        city: &str,
        cost: &CostConfig,
        is_over_water: P,
    ) -> Result<GridSearchResults, GridError>
    where
        P: Fn(Coordinate) -> Fut,
        Fut: Future<Output = bool>,
    {
        let mut results = self.plan_for_city(city, cost).await?;
        let grid = std::mem::take(&mut results.grid);
        results.grid = filter_water(grid, self.water_check_concurrency, is_over_water).await;
        Ok(results)
    }
}
