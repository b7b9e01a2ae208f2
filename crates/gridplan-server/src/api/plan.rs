//! POST /api/v1/plan: finest grid around a catalog city within budget.

use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use gridplan_core::CostConfig;
use gridplan_geo::{CostResults, GridError, GridSearchResults, WaterBodies};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{json_body, map_config_error, map_grid_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct PlanRequest {
    pub city: String,
    pub cost_per_cell: Option<f64>,
    pub budget: Option<f64>,
    pub radius_miles: Option<f64>,
    #[serde(default)]
    pub exclude_water: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct PlanResponse {
    pub results: GridSearchResults,
    /// Continuous projection; `materialized_cells` is the real cell count.
    pub summary: CostResults,
    pub materialized_cells: usize,
}

pub(super) async fn plan_grid(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<PlanResponse>>, ApiError> {
    let rid = &req_id.0;
    let body = json_body(rid, payload)?;

    if body.city.trim().is_empty() {
        return Err(ApiError::new(rid, "validation_error", "city must not be empty"));
    }

    let cost = CostConfig::from_defaults(
        &state.config,
        body.cost_per_cell,
        body.budget,
        body.radius_miles,
    )
    .map_err(|e| map_config_error(rid, &e))?;

    let planned = if body.exclude_water {
        let city = state.cities.find(&body.city).ok_or_else(|| {
            map_grid_error(rid, &GridError::CityNotFound(body.city.trim().to_string()))
        })?;
        let water = WaterBodies::from_city(city);
        state
            .session
            .plan_for_city_excluding_water(&body.city, &cost, |c| {
                std::future::ready(water.is_over_water(c))
            })
            .await
    } else {
        state.session.plan_for_city(&body.city, &cost).await
    };
    let results = planned.map_err(|e| map_grid_error(rid, &e))?;

    let summary = CostResults::from_search_results(&results, cost.cost_per_cell)
        .map_err(|e| map_grid_error(rid, &e))?;

    Ok(Json(ApiResponse::new(
        PlanResponse {
            materialized_cells: results.grid.len(),
            summary,
            results,
        },
        req_id.0,
    )))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::super::test_support::post_json;

    #[tokio::test]
    async fn plans_portland_within_budget() {
        let (status, json) = post_json(
            "/api/v1/plan",
            r#"{"city": "Portland", "cost_per_cell": 0.005, "budget": 100, "radius_miles": 20}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let data = &json["data"];
        assert_eq!(data["results"]["grid_width_meters"].as_f64(), Some(500.0));
        assert_eq!(data["materialized_cells"], 16_384);
        assert_eq!(data["results"]["grid"].as_array().map(Vec::len), Some(16_384));
        let cost = data["summary"]["total_cost"].as_f64().unwrap();
        assert!(cost <= 100.0);
    }

    #[tokio::test]
    async fn water_exclusion_reduces_materialized_cells() {
        let (_, plain) = post_json(
            "/api/v1/plan",
            r#"{"city": "portland", "radius_miles": 5}"#,
        )
        .await;
        let (status, dry) = post_json(
            "/api/v1/plan",
            r#"{"city": "portland", "radius_miles": 5, "exclude_water": true}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let plain_cells = plain["data"]["materialized_cells"].as_u64().unwrap();
        let dry_cells = dry["data"]["materialized_cells"].as_u64().unwrap();
        assert!(dry_cells < plain_cells, "{dry_cells} !< {plain_cells}");
        assert_eq!(
            dry["data"]["summary"]["total_cost"],
            plain["data"]["summary"]["total_cost"]
        );
    }

    #[tokio::test]
    async fn unknown_city_is_404() {
        let (status, json) = post_json("/api/v1/plan", r#"{"city": "Atlantis"}"#).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "not_found");

        let (status, _) = post_json(
            "/api/v1/plan",
            r#"{"city": "Atlantis", "exclude_water": true}"#,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn impossible_budget_is_422() {
        let (status, json) = post_json(
            "/api/v1/plan",
            r#"{"city": "Portland", "cost_per_cell": 1.0, "budget": 0.5}"#,
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["code"], "budget_exceeded");
    }

    #[tokio::test]
    async fn non_positive_budget_is_400() {
        let (status, json) =
            post_json("/api/v1/plan", r#"{"city": "Portland", "budget": -5}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn oversized_radius_is_400() {
        let (status, json) = post_json(
            "/api/v1/plan",
            r#"{"city": "Portland", "radius_miles": 1000, "cost_per_cell": 1e-12}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "validation_error");
        assert!(json["error"]["message"]
            .as_str()
            .is_some_and(|m| m.contains("at most 500")));
    }

    #[tokio::test]
    async fn tiny_cost_at_max_radius_stays_under_cell_cap() {
        let (status, json) = post_json(
            "/api/v1/plan",
            r#"{"city": "Portland", "radius_miles": 500, "cost_per_cell": 1e-12}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let cells = json["data"]["materialized_cells"].as_u64().unwrap();
        assert!(cells > 0 && cells <= 40_000, "{cells}");
        let radius = json["data"]["results"]["radius_miles"].as_f64().unwrap();
        assert!(radius < 500.0, "{radius}");
    }

    #[tokio::test]
    async fn blank_city_is_400() {
        let (status, _) = post_json("/api/v1/plan", r#"{"city": "  "}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
