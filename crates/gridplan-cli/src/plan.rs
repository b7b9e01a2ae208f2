//! `estimate` and `plan` command handlers.
//!
//! Both print a [`CostSummary`] by default. `--json` switches to machine
//! output on stdout; logs always go to stderr.

use std::sync::Arc;

use gridplan_core::{ensure_positive, load_cities, AppConfig, CostConfig};
use gridplan_geo::{
    calculate_cost_from_results, miles_to_meters, CatalogGeocoder, CostSummary,
    GridSearchResults, PlannerBounds, PlanningSession, WaterBodies,
};

/// Arguments for one `plan` run; unset numbers fall back to app config.
#[derive(Debug, Clone)]
pub(crate) struct PlanRequest {
    pub city: String,
    pub cost_per_cell: Option<f64>,
    pub budget: Option<f64>,
    pub radius_miles: Option<f64>,
    pub exclude_water: bool,
    pub json: bool,
}

/// Print the continuous cost projection for a single block width.
///
/// # Errors
///
/// Returns an error if any value is non-positive or the JSON cannot be rendered.
pub(crate) fn run_estimate(
    config: &AppConfig,
    width_meters: f64,
    cost_per_cell: Option<f64>,
    radius_miles: Option<f64>,
    json: bool,
) -> anyhow::Result<()> {
    let cost_per_cell = cost_per_cell.unwrap_or(config.default_cost_per_cell);
    let radius_miles = radius_miles.unwrap_or(config.default_radius_miles);
    ensure_positive("cost_per_cell", cost_per_cell)?;
    ensure_positive("radius_miles", radius_miles)?;
    let results =
        calculate_cost_from_results(width_meters, cost_per_cell, miles_to_meters(radius_miles))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", CostSummary::new(results));
    }
    Ok(())
}

/// Geocode a catalog city and print the finest grid the budget allows.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, the city is unknown,
/// the cost values are invalid, or no grid fits the budget.
pub(crate) async fn run_plan(config: &AppConfig, request: &PlanRequest) -> anyhow::Result<()> {
    let cities = Arc::new(load_cities(&config.cities_path)?);
    let cost = CostConfig::from_defaults(
        config,
        request.cost_per_cell,
        request.budget,
        request.radius_miles,
    )?;

    let water = if request.exclude_water {
        let city = cities
            .find(&request.city)
            .ok_or_else(|| anyhow::anyhow!("city '{}' not found in catalog", request.city))?;
        if city.water.is_empty() {
            tracing::warn!(city = %city.name, "--exclude-water set but city has no water areas");
        }
        Some(WaterBodies::from_city(city))
    } else {
        None
    };

    let session = PlanningSession::new(
        CatalogGeocoder::new(Arc::clone(&cities)),
        PlannerBounds::from_app_config(config),
    )
    .with_water_check_concurrency(config.water_check_concurrency);

    let results = match &water {
        Some(water) => {
            session
                .plan_for_city_excluding_water(&request.city, &cost, |c| {
                    std::future::ready(water.is_over_water(c))
                })
                .await?
        }
        None => session.plan_for_city(&request.city, &cost).await?,
    };

    if request.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_plan(&request.city, &results, cost.cost_per_cell)?;
    }
    Ok(())
}

fn print_plan(city: &str, results: &GridSearchResults, cost_per_cell: f64) -> anyhow::Result<()> {
    let summary = CostSummary::from_search_results(results, cost_per_cell)?;
    println!(
        "{city}: {:.0} m blocks centered at ({:.5}, {:.5})",
        results.grid_width_meters, results.city_center.latitude, results.city_center.longitude
    );
    print!("{summary}");
    Ok(())
}
