//! Continuous cost projection for a search grid.
//!
//! The projection budgets for the bounding square (side = 2 × radius), not a
//! disc, and treats the cell count as a real-valued area ratio. The grid
//! generator's floor-based tiling never exceeds this estimate, so a projection
//! within budget guarantees the materialized grid is too.

use serde::{Deserialize, Serialize};

use crate::coord::{meters_to_miles, miles_to_meters};
use crate::error::GridError;
use crate::planner::GridSearchResults;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostResults {
    /// Area ratio of the bounding square to one block; not necessarily integral.
    pub number_of_squares: f64,
    pub total_cost: f64,
    /// Square meters.
    pub search_block_area: f64,
    /// Square meters covered by the bounding square.
    pub total_area_meters: f64,
    pub search_radius_miles: f64,
}

impl CostResults {
    /// Recompute the projection for the configuration a planner actually chose.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidGeometry`] if the results carry a
    /// non-positive width or radius.
    pub fn from_search_results(
        results: &GridSearchResults,
        cost_per_cell: f64,
    ) -> Result<Self, GridError> {
        calculate_cost_from_results(
            results.grid_width_meters,
            cost_per_cell,
            miles_to_meters(results.radius_miles),
        )
    }
}

/// Project the cost of tiling the square around `radius_meters` with blocks of
/// `search_block_width_meters`.
///
/// # Errors
///
/// - [`GridError::InvalidGeometry`] when the width or radius is non-positive or non-finite.
/// - [`GridError::InvalidConfiguration`] when `cost_per_cell` is negative or non-finite.
pub fn calculate_cost_from_results(
    search_block_width_meters: f64,
    cost_per_cell: f64,
    radius_meters: f64,
) -> Result<CostResults, GridError> {
    let geometry_ok = search_block_width_meters.is_finite()
        && radius_meters.is_finite()
        && search_block_width_meters > 0.0
        && radius_meters > 0.0;
    if !geometry_ok {
        return Err(GridError::InvalidGeometry {
            width_meters: search_block_width_meters,
            radius_meters,
        });
    }
    if !cost_per_cell.is_finite() || cost_per_cell < 0.0 {
        return Err(GridError::InvalidConfiguration(format!(
            "cost_per_cell must be a non-negative number, got {cost_per_cell}"
        )));
    }

    let search_block_area = search_block_width_meters.powi(2);
    let total_area_meters = (radius_meters * 2.0).powi(2);
    let number_of_squares = total_area_meters / search_block_area;

    Ok(CostResults {
        number_of_squares,
        total_cost: number_of_squares * cost_per_cell,
        search_block_area,
        total_area_meters,
        search_radius_miles: meters_to_miles(radius_meters),
    })
}
