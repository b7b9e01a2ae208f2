mod cities;
mod estimate;
mod plan;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use gridplan_core::{AppConfig, CitiesFile, ConfigError};
use gridplan_geo::{CatalogGeocoder, GridError, PlannerBounds, PlanningSession};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub cities: Arc<CitiesFile>,
    pub session: Arc<PlanningSession<CatalogGeocoder>>,
}

impl AppState {
    /// One planning session shared by every request; its geocode cache lives
    /// as long as the server.
    #[must_use]
    pub fn new(config: Arc<AppConfig>, cities: Arc<CitiesFile>) -> Self {
        let session = PlanningSession::new(
            CatalogGeocoder::new(Arc::clone(&cities)),
            PlannerBounds::from_app_config(&config),
        )
        .with_water_check_concurrency(config.water_check_concurrency);
        Self {
            config,
            cities,
            session: Arc::new(session),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    cities: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "budget_exceeded" => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_grid_error(request_id: &str, error: &GridError) -> ApiError {
    match error {
        GridError::InvalidGeometry { .. } | GridError::InvalidConfiguration(_) => {
            ApiError::new(request_id, "validation_error", error.to_string())
        }
        GridError::CityNotFound(_) => ApiError::new(request_id, "not_found", error.to_string()),
        GridError::BudgetExceeded { .. } => {
            tracing::info!(error = %error, "plan request exceeds budget");
            ApiError::new(request_id, "budget_exceeded", error.to_string())
        }
        GridError::PlanningAborted(_) => {
            tracing::error!(error = %error, "planner task failed");
            ApiError::new(request_id, "internal_error", "planning failed")
        }
    }
}

pub(super) fn map_config_error(request_id: &str, error: &ConfigError) -> ApiError {
    match error {
        ConfigError::Validation(message) => {
            ApiError::new(request_id, "validation_error", message.clone())
        }
        other => {
            tracing::error!(error = %other, "unexpected configuration error");
            ApiError::new(request_id, "internal_error", "configuration error")
        }
    }
}

/// Unwrap a JSON body, turning axum's plain-text rejection into the error envelope.
pub(super) fn json_body<T>(
    request_id: &str,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::new(request_id, "validation_error", rejection.body_text()))
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

pub fn build_app(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/cities", get(cities::list_cities))
        .route("/api/v1/estimate", post(estimate::estimate_cost))
        .route("/api/v1/plan", post(plan::plan_grid))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(TimeoutLayer::new(timeout)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse::new(
        HealthData {
            status: "ok",
            cities: state.cities.cities.len(),
        },
        req_id.0,
    ))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use gridplan_core::{AppConfig, Environment};
    use tower::ServiceExt;

    use super::{build_app, AppState};

    const CATALOG: &str = r"
cities:
  - name: Portland
    state: OR
    latitude: 45.5152
    longitude: -122.676483
    water:
      - { south: 45.40, west: -122.80, north: 45.70, east: -122.70 }
  - name: Salt Lake City
    state: UT
    latitude: 40.7608
    longitude: -111.891
";

    pub(crate) fn test_config() -> AppConfig {
        AppConfig {
            env: Environment::Test,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            cities_path: "config/cities.yaml".into(),
            default_cost_per_cell: 0.005,
            default_budget: 100.0,
            default_radius_miles: 20.0,
            min_grid_width_meters: 100.0,
            max_grid_width_meters: 5_000.0,
            grid_width_step_meters: 50.0,
            water_check_concurrency: 4,
            max_cells: 40_000,
            request_timeout_secs: 30,
        }
    }

    pub(crate) fn app() -> Router {
        let cities = Arc::new(gridplan_core::parse_cities(CATALOG).expect("catalog parses"));
        build_app(AppState::new(Arc::new(test_config()), cities))
    }

    pub(crate) async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        read_json(response).await
    }

    pub(crate) async fn post_json(uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_owned()))
                    .unwrap(),
            )
            .await
            .unwrap();
        read_json(response).await
    }

    async fn read_json(response: axum::response::Response) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json = serde_json::from_slice(&body).expect("valid json body");
        (status, json)
    }
}
