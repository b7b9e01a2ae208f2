//! GET /api/v1/cities: the configured catalog.

use axum::{extract::State, Extension, Json};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct CityItem {
    pub name: String,
    pub slug: String,
    pub state: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub water_areas: usize,
}

pub(super) async fn list_cities(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<CityItem>>> {
    let items = state
        .cities
        .cities
        .iter()
        .map(|city| CityItem {
            name: city.name.clone(),
            slug: city.slug(),
            state: city.state.clone(),
            latitude: city.latitude,
            longitude: city.longitude,
            water_areas: city.water.len(),
        })
        .collect();

    Json(ApiResponse::new(items, req_id.0))
}
