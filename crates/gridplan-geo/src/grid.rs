//! Geographic search-grid generation.
//!
//! Tiles the square of side `2 × radius` around a center with square cells of
//! a fixed side length. Longitude extents are latitude-adjusted so every cell
//! covers roughly the same ground distance on both axes.

use serde::{Deserialize, Serialize};

use crate::coord::{meters_to_degrees, wrap_longitude, Coordinate, Viewport};

/// One search unit: a single billable upstream query.
///
/// `center` is the midpoint of `viewport`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub center: Coordinate,
    pub viewport: Viewport,
}

/// Cells in row-major order: latitude outer (south → north), longitude inner (west → east).
pub type Grid = Vec<GridCell>;

/// Angular layout of a grid before any cells are materialized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridShape {
    pub lat_steps: usize,
    pub lng_steps: usize,
    /// Half the side of the tiled square, in degrees.
    pub lat_delta: f64,
    pub lng_delta: f64,
    /// Full cell side, in degrees.
    pub cell_lat: f64,
    pub cell_lng: f64,
}

impl GridShape {
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.lat_steps.saturating_mul(self.lng_steps)
    }
}

/// Compute the step counts for a grid without building it.
///
/// Returns `None` for non-finite or non-positive sizes. A radius smaller than
/// one cell yields a shape with zero steps, which is a valid empty grid.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn grid_shape(center_lat: f64, radius_meters: f64, grid_side_meters: f64) -> Option<GridShape> {
    let sizes_ok = radius_meters.is_finite()
        && grid_side_meters.is_finite()
        && radius_meters > 0.0
        && grid_side_meters > 0.0;
    if !sizes_ok || !center_lat.is_finite() {
        return None;
    }

    let (lat_delta, lng_delta) = meters_to_degrees(radius_meters, center_lat);
    let (cell_lat, cell_lng) = meters_to_degrees(grid_side_meters, center_lat);

    // Whole cells per radius, doubled to span the diameter.
    let lat_steps = (lat_delta / cell_lat).floor() as usize * 2;
    let lng_steps = (lng_delta / cell_lng).floor() as usize * 2;

    Some(GridShape {
        lat_steps,
        lng_steps,
        lat_delta,
        lng_delta,
        cell_lat,
        cell_lng,
    })
}

/// Generate the search grid for a center, radius, and cell side (all in meters).
///
/// Never fails: degenerate inputs produce an empty grid. Longitudes are
/// wrapped into `[-180, 180]`, so a cell straddling the antimeridian has a
/// viewport with `low.longitude > high.longitude`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn get_grid_coordinates(
    center_lat: f64,
    center_lng: f64,
    radius_meters: f64,
    grid_side_meters: f64,
) -> Grid {
    let Some(shape) = grid_shape(center_lat, radius_meters, grid_side_meters) else {
        tracing::debug!(
            radius_meters,
            grid_side_meters,
            "degenerate grid request, returning empty grid"
        );
        return Vec::new();
    };

    let half_lat = shape.cell_lat / 2.0;
    let half_lng = shape.cell_lng / 2.0;
    let origin_lat = center_lat - shape.lat_delta + half_lat;
    let origin_lng = center_lng - shape.lng_delta + half_lng;

    let mut cells = Vec::with_capacity(shape.cell_count());
    for i in 0..shape.lat_steps {
        let lat = origin_lat + i as f64 * shape.cell_lat;
        for j in 0..shape.lng_steps {
            let lng = origin_lng + j as f64 * shape.cell_lng;
            cells.push(GridCell {
                center: Coordinate::new(lat, wrap_longitude(lng)),
                viewport: Viewport {
                    low: Coordinate::new(lat - half_lat, wrap_longitude(lng - half_lng)),
                    high: Coordinate::new(lat + half_lat, wrap_longitude(lng + half_lng)),
                },
            });
        }
    }

    tracing::trace!(
        lat_steps = shape.lat_steps,
        lng_steps = shape.lng_steps,
        cells = cells.len(),
        "generated search grid"
    );
    cells
}
