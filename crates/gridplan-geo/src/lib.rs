//! Search-grid planning for location-based data collection.
//!
//! Tiles a square region around a city center with square search cells and
//! picks the finest cell size whose projected upstream cost fits a budget.
//! Every cell maps to one billable places query.

pub mod coord;
pub mod cost;
pub mod error;
pub mod geocode;
pub mod grid;
pub mod planner;
pub mod session;
pub mod summary;
pub mod water;

pub use coord::{
    get_viewport, meters_to_degrees, meters_to_degrees_latitude, meters_to_degrees_longitude,
    meters_to_miles, miles_to_meters, Coordinate, Viewport, METERS_PER_MILE,
};
pub use cost::{calculate_cost_from_results, CostResults};
pub use error::GridError;
pub use geocode::{CatalogGeocoder, GeocodeCache, Geocoder};
pub use grid::{get_grid_coordinates, grid_shape, Grid, GridCell, GridShape};
pub use planner::{
    find_max_grid_search_results_within_budget,
    find_max_grid_search_results_within_budget_with_bounds, GridSearchResults, PlannerBounds,
};
pub use session::PlanningSession;
pub use summary::CostSummary;
pub use water::{filter_water, get_grid_coordinates_excluding_water, WaterBodies};
