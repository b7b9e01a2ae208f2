//! POST /api/v1/estimate: cost projection for one block width.

use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use gridplan_core::ensure_positive;
use gridplan_geo::{calculate_cost_from_results, miles_to_meters, CostResults};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{json_body, map_config_error, map_grid_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct EstimateRequest {
    pub width_meters: f64,
    pub cost_per_cell: Option<f64>,
    pub radius_miles: Option<f64>,
}

pub(super) async fn estimate_cost(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<EstimateRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<CostResults>>, ApiError> {
    let rid = &req_id.0;
    let body = json_body(rid, payload)?;

    let cost_per_cell = body
        .cost_per_cell
        .unwrap_or(state.config.default_cost_per_cell);
    let radius_miles = body
        .radius_miles
        .unwrap_or(state.config.default_radius_miles);
    ensure_positive("cost_per_cell", cost_per_cell).map_err(|e| map_config_error(rid, &e))?;
    ensure_positive("radius_miles", radius_miles).map_err(|e| map_config_error(rid, &e))?;

    let results =
        calculate_cost_from_results(body.width_meters, cost_per_cell, miles_to_meters(radius_miles))
            .map_err(|e| map_grid_error(rid, &e))?;

    Ok(Json(ApiResponse::new(results, req_id.0)))
}
