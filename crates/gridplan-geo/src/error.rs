use thiserror::Error;

/// Errors produced while projecting costs or planning a search grid.
///
/// None of these are transient: the same inputs always fail the same way.
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    /// Cost projection was asked about a non-positive block width or radius.
    #[error("invalid geometry: block width {width_meters} m, radius {radius_meters} m")]
    InvalidGeometry {
        width_meters: f64,
        radius_meters: f64,
    },

    /// No searched cell size (or reduced radius) fits the budget.
    #[error("budget ${budget:.2} exceeded: cheapest plan found costs ${minimum_cost:.2}")]
    BudgetExceeded { budget: f64, minimum_cost: f64 },

    #[error("city not found: {0}")]
    CityNotFound(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The blocking planner task panicked or was cancelled.
    #[error("planning task failed: {0}")]
    PlanningAborted(String),
}

impl From<gridplan_core::ConfigError> for GridError {
    fn from(err: gridplan_core::ConfigError) -> Self {
        match err {
            gridplan_core::ConfigError::Validation(message) => Self::InvalidConfiguration(message),
            other => Self::InvalidConfiguration(other.to_string()),
        }
    }
}
