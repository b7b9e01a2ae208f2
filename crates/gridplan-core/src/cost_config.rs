use serde::{Deserialize, Serialize};

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Largest search radius a single plan may request.
pub const MAX_RADIUS_MILES: f64 = 500.0;

/// Reject non-finite, zero, and negative values for a named field.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] naming `field`.
pub fn ensure_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "{field} must be a positive number, got {value}"
        )));
    }
    Ok(())
}

/// Caller-supplied cost configuration for one planning request.
///
/// Construct through [`CostConfig::new`] so every field is known to be finite
/// and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostConfig {
    pub cost_per_cell: f64,
    pub budget: f64,
    pub desired_radius_miles: f64,
}

impl CostConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first non-positive or
    /// non-finite field.
    pub fn new(
        cost_per_cell: f64,
        budget: f64,
        desired_radius_miles: f64,
    ) -> Result<Self, ConfigError> {
        let cfg = Self {
            cost_per_cell,
            budget,
            desired_radius_miles,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build from the app-wide defaults, overriding any field the caller supplied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if an override is invalid.
    pub fn from_defaults(
        config: &AppConfig,
        cost_per_cell: Option<f64>,
        budget: Option<f64>,
        desired_radius_miles: Option<f64>,
    ) -> Result<Self, ConfigError> {
        Self::new(
            cost_per_cell.unwrap_or(config.default_cost_per_cell),
            budget.unwrap_or(config.default_budget),
            desired_radius_miles.unwrap_or(config.default_radius_miles),
        )
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first invalid field,
    /// including a radius above [`MAX_RADIUS_MILES`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("cost_per_cell", self.cost_per_cell)?;
        ensure_positive("budget", self.budget)?;
        ensure_positive("desired_radius_miles", self.desired_radius_miles)?;
        if self.desired_radius_miles > MAX_RADIUS_MILES {
            return Err(ConfigError::Validation(format!(
                "desired_radius_miles must be at most {MAX_RADIUS_MILES}, got {}",
                self.desired_radius_miles
            )));
        }
        Ok(())
    }
}
