use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value cannot be parsed or fails validation.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value cannot be parsed or fails validation.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    // Money and distances must be finite and strictly positive.
    let parse_positive = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = or_default(var, default)
            .trim()
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid(var, format!("must be a positive number, got {value}")));
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("GRIDPLAN_ENV", "development"))?;

    let bind_addr = parse_addr("GRIDPLAN_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("GRIDPLAN_LOG_LEVEL", "info");
    let cities_path = PathBuf::from(or_default("GRIDPLAN_CITIES_PATH", "./config/cities.yaml"));

    let default_cost_per_cell = parse_positive("GRIDPLAN_COST_PER_CELL", "0.005")?;
    let default_budget = parse_positive("GRIDPLAN_BUDGET", "100")?;
    let default_radius_miles = parse_positive("GRIDPLAN_RADIUS_MILES", "20")?;

    let min_grid_width_meters = parse_positive("GRIDPLAN_MIN_GRID_WIDTH_METERS", "100")?;
    let max_grid_width_meters = parse_positive("GRIDPLAN_MAX_GRID_WIDTH_METERS", "5000")?;
    let grid_width_step_meters = parse_positive("GRIDPLAN_GRID_WIDTH_STEP_METERS", "50")?;
    if min_grid_width_meters > max_grid_width_meters {
        return Err(invalid(
            "GRIDPLAN_MIN_GRID_WIDTH_METERS",
            format!(
                "{min_grid_width_meters} exceeds GRIDPLAN_MAX_GRID_WIDTH_METERS ({max_grid_width_meters})"
            ),
        ));
    }

    let water_check_concurrency = parse_usize("GRIDPLAN_WATER_CHECK_CONCURRENCY", "8")?;
    if water_check_concurrency == 0 {
        return Err(invalid(
            "GRIDPLAN_WATER_CHECK_CONCURRENCY",
            "must be at least 1".to_string(),
        ));
    }
    let max_cells = parse_usize("GRIDPLAN_MAX_CELLS", "250000")?;
    if max_cells == 0 {
        return Err(invalid("GRIDPLAN_MAX_CELLS", "must be at least 1".to_string()));
    }
    let request_timeout_secs = parse_u64("GRIDPLAN_REQUEST_TIMEOUT_SECS", "30")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        cities_path,
        default_cost_per_cell,
        default_budget,
        default_radius_miles,
        min_grid_width_meters,
        max_grid_width_meters,
        grid_width_step_meters,
        water_check_concurrency,
        max_cells,
        request_timeout_secs,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "GRIDPLAN_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
