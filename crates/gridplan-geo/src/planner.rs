//! Budget-constrained grid planning.
//!
//! Projected cost falls strictly as the cell width grows, so for a fixed radius
//! the candidate widths split into an infeasible prefix and a feasible suffix.
//! The planner binary-searches that boundary and takes the first feasible
//! width: the finest grid the budget allows. If no width fits, the radius is
//! stepped down (when allowed) until one does. Widths whose grid would hold
//! more than `max_cells` cells count as infeasible, so the planner never
//! materializes an unbounded grid.

use serde::{Deserialize, Serialize};

use crate::coord::{meters_to_miles, miles_to_meters, Coordinate};
use crate::cost::{calculate_cost_from_results, CostResults};
use crate::error::GridError;
use crate::grid::{get_grid_coordinates, grid_shape, Grid};

/// The finite search space explored by the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerBounds {
    pub min_grid_width_meters: f64,
    pub max_grid_width_meters: f64,
    pub grid_width_step_meters: f64,
    /// Smallest radius the planner may shrink to when reducing coverage.
    pub min_radius_meters: f64,
    pub radius_step_meters: f64,
    pub allow_radius_reduction: bool,
    /// Widths whose grid would exceed this many cells are never chosen.
    pub max_cells: usize,
}

impl Default for PlannerBounds {
    fn default() -> Self {
        Self {
            min_grid_width_meters: 100.0,
            max_grid_width_meters: 5_000.0,
            grid_width_step_meters: 50.0,
            min_radius_meters: miles_to_meters(1.0),
            radius_step_meters: miles_to_meters(0.5),
            allow_radius_reduction: true,
            max_cells: 250_000,
        }
    }
}

impl PlannerBounds {
    /// Width bounds and cell cap from app config; radius reduction keeps its defaults.
    #[must_use]
    pub fn from_app_config(config: &gridplan_core::AppConfig) -> Self {
        Self {
            min_grid_width_meters: config.min_grid_width_meters,
            max_grid_width_meters: config.max_grid_width_meters,
            grid_width_step_meters: config.grid_width_step_meters,
            max_cells: config.max_cells,
            ..Self::default()
        }
    }

    /// # Errors
    ///
    /// Returns [`GridError::InvalidConfiguration`] for non-positive sizes, a
    /// zero cell cap, or an inverted width range.
    pub fn validate(&self) -> Result<(), GridError> {
        for (field, value) in [
            ("min_grid_width_meters", self.min_grid_width_meters),
            ("max_grid_width_meters", self.max_grid_width_meters),
            ("grid_width_step_meters", self.grid_width_step_meters),
            ("min_radius_meters", self.min_radius_meters),
            ("radius_step_meters", self.radius_step_meters),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GridError::InvalidConfiguration(format!(
                    "planner bound {field} must be a positive number, got {value}"
                )));
            }
        }
        if self.max_cells == 0 {
            return Err(GridError::InvalidConfiguration(
                "planner bound max_cells must be at least 1".to_string(),
            ));
        }
        if self.min_grid_width_meters > self.max_grid_width_meters {
            return Err(GridError::InvalidConfiguration(format!(
                "min_grid_width_meters ({}) exceeds max_grid_width_meters ({})",
                self.min_grid_width_meters, self.max_grid_width_meters
            )));
        }
        Ok(())
    }

    /// Candidate widths in ascending order, limited to widths that fit inside
    /// the radius so the materialized grid is never empty.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn candidate_widths(&self, radius_meters: f64) -> Vec<f64> {
        let span = self.max_grid_width_meters - self.min_grid_width_meters;
        let steps = (span / self.grid_width_step_meters + 1e-9).floor() as usize;
        (0..=steps)
            .map(|i| self.min_grid_width_meters + i as f64 * self.grid_width_step_meters)
            .take_while(|&w| w <= radius_meters)
            .collect()
    }

    /// Largest radius at which the coarsest width could still pass both the
    /// budget and the cell cap. Anything above it is infeasible at every width.
    #[allow(clippy::cast_precision_loss)]
    fn feasible_radius_ceiling(&self, cost_per_cell: f64, budget: f64) -> f64 {
        let widest = self.max_grid_width_meters;
        // (2r / w)^2 * cost <= budget
        let by_budget = widest / 2.0 * (budget / cost_per_cell).sqrt();
        // Each axis holds at least 2r / w - 2 cells.
        let by_cells = widest * ((self.max_cells as f64).sqrt() + 2.0) / 2.0;
        by_budget.min(by_cells)
    }

    /// Radii to try, largest first. Always starts with the desired radius,
    /// then skips straight to the first stepped radius at or below
    /// [`feasible_radius_ceiling`](Self::feasible_radius_ceiling).
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn candidate_radii(
        &self,
        desired_radius_meters: f64,
        cost_per_cell: f64,
        budget: f64,
    ) -> impl Iterator<Item = f64> {
        let step = self.radius_step_meters;
        let (first, last) = if self.allow_radius_reduction
            && desired_radius_meters - step >= self.min_radius_meters
        {
            let ceiling = self.feasible_radius_ceiling(cost_per_cell, budget);
            let last = ((desired_radius_meters - self.min_radius_meters) / step + 1e-9).floor() as u64;
            let first = ((desired_radius_meters - ceiling) / step - 1e-9).ceil().max(1.0) as u64;
            (first.min(last), last)
        } else {
            (1, 0)
        };
        std::iter::once(desired_radius_meters)
            .chain((first..=last).map(move |k| desired_radius_meters - k as f64 * step))
    }
}

/// The chosen plan: the authoritative output that every cost display projects from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSearchResults {
    /// Realized radius; smaller than requested when the budget forced a reduction.
    pub radius_miles: f64,
    pub grid: Grid,
    /// Continuous projection for the winning configuration (see [`CostResults`]).
    pub number_of_squares: f64,
    pub total_cost: f64,
    pub grid_width_meters: f64,
    pub city_center: Coordinate,
}

/// Find the finest grid around a center whose projected cost fits `budget`,
/// using [`PlannerBounds::default`].
///
/// # Errors
///
/// See [`find_max_grid_search_results_within_budget_with_bounds`].
pub fn find_max_grid_search_results_within_budget(
    center_lat: f64,
    center_lng: f64,
    desired_radius_meters: f64,
    cost_per_cell: f64,
    budget: f64,
) -> Result<GridSearchResults, GridError> {
    find_max_grid_search_results_within_budget_with_bounds(
        center_lat,
        center_lng,
        desired_radius_meters,
        cost_per_cell,
        budget,
        &PlannerBounds::default(),
    )
}

/// Find the finest grid around a center whose projected cost fits `budget`.
///
/// Prefers resolution over coverage: among feasible widths the smallest wins,
/// and the radius is only reduced when no width fits at the desired radius.
///
/// # Errors
///
/// - [`GridError::InvalidConfiguration`] for non-positive cost, budget or
///   radius, an out-of-range center, or invalid bounds.
/// - [`GridError::BudgetExceeded`] when nothing in the search space fits;
///   carries the cheapest projected cost found.
pub fn find_max_grid_search_results_within_budget_with_bounds(
    center_lat: f64,
    center_lng: f64,
    desired_radius_meters: f64,
    cost_per_cell: f64,
    budget: f64,
    bounds: &PlannerBounds,
) -> Result<GridSearchResults, GridError> {
    validate_request(center_lat, center_lng, desired_radius_meters, cost_per_cell, budget)?;
    bounds.validate()?;

    let mut minimum_cost = f64::INFINITY;
    let mut any_width = false;

    for radius_meters in bounds.candidate_radii(desired_radius_meters, cost_per_cell, budget) {
        let widths = bounds.candidate_widths(radius_meters);
        if widths.is_empty() {
            tracing::debug!(radius_meters, "no candidate width fits inside radius");
            continue;
        }
        any_width = true;

        let projections = widths
            .iter()
            .map(|&w| calculate_cost_from_results(w, cost_per_cell, radius_meters))
            .collect::<Result<Vec<CostResults>, GridError>>()?;
        let cells: Vec<usize> = widths
            .iter()
            .map(|&w| grid_shape(center_lat, radius_meters, w).map_or(0, |s| s.cell_count()))
            .collect();

        // Both cost and cell count fall as the width grows.
        let within_cap = cells.partition_point(|&n| n > bounds.max_cells);
        if let Some(cheapest) = projections[within_cap..].last() {
            minimum_cost = minimum_cost.min(cheapest.total_cost);
        }

        let first_feasible = within_cap
            + projections[within_cap..].partition_point(|p| p.total_cost > budget);
        let Some(winner) = projections.get(first_feasible) else {
            tracing::debug!(
                radius_meters,
                budget,
                minimum_cost,
                "no grid width fits budget at this radius"
            );
            continue;
        };
        let grid_width_meters = widths[first_feasible];

        if radius_meters < desired_radius_meters {
            tracing::warn!(
                desired_radius_miles = meters_to_miles(desired_radius_meters),
                realized_radius_miles = meters_to_miles(radius_meters),
                budget,
                "budget forced a reduced search radius"
            );
        }

        let grid = get_grid_coordinates(center_lat, center_lng, radius_meters, grid_width_meters);
        tracing::info!(
            grid_width_meters,
            radius_miles = meters_to_miles(radius_meters),
            cells = grid.len(),
            number_of_squares = winner.number_of_squares,
            total_cost = winner.total_cost,
            budget,
            "selected search grid"
        );

        return Ok(GridSearchResults {
            radius_miles: meters_to_miles(radius_meters),
            grid,
            number_of_squares: winner.number_of_squares,
            total_cost: winner.total_cost,
            grid_width_meters,
            city_center: Coordinate::new(center_lat, center_lng),
        });
    }

    if minimum_cost.is_infinite() && any_width {
        return Err(GridError::InvalidConfiguration(format!(
            "every candidate grid exceeds max_cells ({}); request a smaller radius",
            bounds.max_cells
        )));
    }
    if minimum_cost.is_infinite() {
        return Err(GridError::InvalidConfiguration(format!(
            "radius {desired_radius_meters} m is smaller than the minimum grid width {} m",
            bounds.min_grid_width_meters
        )));
    }

    Err(GridError::BudgetExceeded {
        budget,
        minimum_cost,
    })
}

fn validate_request(
    center_lat: f64,
    center_lng: f64,
    desired_radius_meters: f64,
    cost_per_cell: f64,
    budget: f64,
) -> Result<(), GridError> {
    for (field, value) in [
        ("desired_radius_meters", desired_radius_meters),
        ("cost_per_cell", cost_per_cell),
        ("budget", budget),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(GridError::InvalidConfiguration(format!(
                "{field} must be a positive number, got {value}"
            )));
        }
    }
    if !(-90.0..=90.0).contains(&center_lat) || !(-180.0..=180.0).contains(&center_lng) {
        return Err(GridError::InvalidConfiguration(format!(
            "center ({center_lat}, {center_lng}) is not a valid coordinate"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "planner_test.rs"]
mod tests;
