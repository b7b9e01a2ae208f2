//! Dropping grid cells whose center sits over open water.
//!
//! The predicate is async and awaited for every cell before the filtered grid
//! is returned, with at most `concurrency` lookups in flight. Output keeps the
//! generator's row-major order.

use std::future::Future;

use futures::stream::{self, StreamExt};
use gridplan_core::{CityConfig, WaterArea};

use crate::coord::{Coordinate, Viewport};
use crate::grid::{get_grid_coordinates, Grid};

/// Static water lookup built from the city catalog's water boxes.
#[derive(Debug, Clone, Default)]
pub struct WaterBodies {
    areas: Vec<Viewport>,
}

impl WaterBodies {
    #[must_use]
    pub fn new(areas: Vec<Viewport>) -> Self {
        Self { areas }
    }

    #[must_use]
    pub fn from_city(city: &CityConfig) -> Self {
        Self::new(city.water.iter().map(viewport_from_area).collect())
    }

    #[must_use]
    pub fn is_over_water(&self, point: Coordinate) -> bool {
        self.areas.iter().any(|area| area.contains(point))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

fn viewport_from_area(area: &WaterArea) -> Viewport {
    Viewport {
        low: Coordinate::new(area.south, area.west),
        high: Coordinate::new(area.north, area.east),
    }
}

/// Keep only cells whose center the predicate reports as dry land.
pub async fn filter_water<P, Fut>(grid: Grid, concurrency: usize, is_over_water: P) -> Grid
where
    P: Fn(Coordinate) -> Fut,
    Fut: Future<Output = bool>,
{
    let total = grid.len();
    let kept: Grid = stream::iter(grid)
        .map(|cell| {
            let lookup = is_over_water(cell.center);
            async move { (cell, lookup.await) }
        })
        .buffered(concurrency.max(1))
        .filter_map(|(cell, wet)| async move { (!wet).then_some(cell) })
        .collect()
        .await;

    tracing::debug!(
        total,
        kept = kept.len(),
        dropped = total - kept.len(),
        "filtered water cells from grid"
    );
    kept
}

/// [`get_grid_coordinates`] followed by [`filter_water`].
pub async fn get_grid_coordinates_excluding_water<P, Fut>(
    center_lat: f64,
    center_lng: f64,
    radius_meters: f64,
    grid_side_meters: f64,
    concurrency: usize,
    is_over_water: P,
) -> Grid
where
    P: Fn(Coordinate) -> Fut,
    Fut: Future<Output = bool>,
{
    let grid = get_grid_coordinates(center_lat, center_lng, radius_meters, grid_side_meters);
    filter_water(grid, concurrency, is_over_water).await
}
