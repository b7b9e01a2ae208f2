use gridplan_core::{load_cities, AppConfig};

/// Print every catalog city with its slug and center.
///
/// # Errors
///
/// Returns an error if the catalog file cannot be read or fails validation.
pub(crate) fn run_cities(config: &AppConfig) -> anyhow::Result<()> {
    let catalog = load_cities(&config.cities_path)?;
    if catalog.cities.is_empty() {
        println!("no cities configured in {}", config.cities_path.display());
        return Ok(());
    }

    println!(
        "{:<24} {:<6} {:>10} {:>11} {:>6}",
        "SLUG", "STATE", "LATITUDE", "LONGITUDE", "WATER"
    );
    for city in &catalog.cities {
        println!(
            "{:<24} {:<6} {:>10.4} {:>11.4} {:>6}",
            city.slug(),
            city.state.as_deref().unwrap_or("-"),
            city.latitude,
            city.longitude,
            city.water.len()
        );
    }
    Ok(())
}
