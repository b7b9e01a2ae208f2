mod cities;
mod plan;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gridplan")]
#[command(about = "Plan budget-constrained search grids around cities")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Project the cost of one block width over a radius
    Estimate {
        /// Side length of one search block, in meters
        #[arg(long)]
        width_meters: f64,
        /// Upstream cost of one query (defaults to `GRIDPLAN_COST_PER_CELL`)
        #[arg(long)]
        cost_per_cell: Option<f64>,
        /// Radius of the search area in miles (defaults to `GRIDPLAN_RADIUS_MILES`)
        #[arg(long)]
        radius_miles: Option<f64>,
        /// Print the projection as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Find the finest grid around a catalog city that fits a budget
    Plan {
        /// City name or slug from the catalog
        #[arg(long)]
        city: String,
        /// Upstream cost of one query (defaults to `GRIDPLAN_COST_PER_CELL`)
        #[arg(long)]
        cost_per_cell: Option<f64>,
        /// Spending cap for the whole grid (defaults to `GRIDPLAN_BUDGET`)
        #[arg(long)]
        budget: Option<f64>,
        /// Radius of the search area in miles, at most 500 (defaults to `GRIDPLAN_RADIUS_MILES`)
        #[arg(long)]
        radius_miles: Option<f64>,
        /// Drop cells whose center falls inside the city's water areas
        #[arg(long)]
        exclude_water: bool,
        /// Print the full plan, cells included, as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the cities in the configured catalog
    Cities,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = gridplan_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Estimate {
            width_meters,
            cost_per_cell,
            radius_miles,
            json,
        }) => plan::run_estimate(&config, width_meters, cost_per_cell, radius_miles, json)?,
        Some(Commands::Plan {
            city,
            cost_per_cell,
            budget,
            radius_miles,
            exclude_water,
            json,
        }) => {
            let request = plan::PlanRequest {
                city,
                cost_per_cell,
                budget,
                radius_miles,
                exclude_water,
                json,
            };
            plan::run_plan(&config, &request).await?;
        }
        Some(Commands::Cities) => cities::run_cities(&config)?,
        None => Cli::command().print_help()?,
    }

    Ok(())
}
