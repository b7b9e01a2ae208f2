pub mod app_config;
pub mod cities;
pub mod config;
pub mod cost_config;

pub use app_config::{AppConfig, Environment};
pub use cities::{load_cities, parse_cities, slugify, CitiesFile, CityConfig, WaterArea};
pub use config::{load_app_config, load_app_config_from_env};
pub use cost_config::{ensure_positive, CostConfig, MAX_RADIUS_MILES};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read city catalog at {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse city catalog: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}
