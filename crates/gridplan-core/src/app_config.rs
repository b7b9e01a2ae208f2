use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub cities_path: PathBuf,
    /// Price charged by the upstream places provider for one search cell, in USD.
    pub default_cost_per_cell: f64,
    pub default_budget: f64,
    pub default_radius_miles: f64,
    pub min_grid_width_meters: f64,
    pub max_grid_width_meters: f64,
    pub grid_width_step_meters: f64,
    /// Maximum number of water lookups in flight while filtering a grid.
    pub water_check_concurrency: usize,
    /// Largest grid the planner will materialize for one request.
    pub max_cells: usize,
    pub request_timeout_secs: u64,
}
