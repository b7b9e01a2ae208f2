use super::*;

const PORTLAND_LAT: f64 = 45.5152;
const PORTLAND_LNG: f64 = -122.676_483;
const TWENTY_MILES: f64 = 20.0 * 1609.34;

fn no_reduction(max_width: f64) -> PlannerBounds {
    PlannerBounds {
        max_grid_width_meters: max_width,
        allow_radius_reduction: false,
        ..PlannerBounds::default()
    }
}

#[allow(clippy::cast_precision_loss)]
fn assert_feasible(results: &GridSearchResults, budget: f64) {
    assert!(
        results.total_cost <= budget,
        "cost {} over budget {budget}",
        results.total_cost
    );
    assert!(!results.grid.is_empty());
    assert!(results.grid.len() as f64 <= results.number_of_squares + 1e-6);
}

#[test]
fn portland_default_budget_picks_five_hundred_meter_grid() {
    let results =
        find_max_grid_search_results_within_budget(PORTLAND_LAT, PORTLAND_LNG, TWENTY_MILES, 0.005, 100.0)
            .expect("plan should fit");

    assert!((results.grid_width_meters - 500.0).abs() < 1e-9);
    assert!((results.radius_miles - 20.0).abs() < 1e-9);
    assert!((results.total_cost - 82.88).abs() < 0.1, "got {}", results.total_cost);
    assert_eq!(results.grid.len(), 128 * 128);
    assert_eq!(results.city_center, Coordinate::new(PORTLAND_LAT, PORTLAND_LNG));
    assert_feasible(&results, 100.0);
}

#[test]
fn expensive_cells_widen_the_grid_to_fit() {
    let results =
        find_max_grid_search_results_within_budget(PORTLAND_LAT, PORTLAND_LNG, TWENTY_MILES, 0.04, 10.0)
            .expect("a coarse grid fits");

    // (2r / w)² · 0.04 ≤ 10 first holds at w = 4100 on a 50 m step.
    assert!((results.grid_width_meters - 4_100.0).abs() < 1e-9);
    assert!((results.radius_miles - 20.0).abs() < 1e-9);
    assert_feasible(&results, 10.0);
}

#[test]
fn budget_exceeded_when_coarsest_width_is_too_expensive() {
    let err = find_max_grid_search_results_within_budget_with_bounds(
        PORTLAND_LAT,
        PORTLAND_LNG,
        TWENTY_MILES,
        0.04,
        10.0,
        &no_reduction(4_000.0),
    )
    .unwrap_err();

    match err {
        GridError::BudgetExceeded {
            budget,
            minimum_cost,
        } => {
            assert!((budget - 10.0).abs() < f64::EPSILON);
            assert!((minimum_cost - 10.36).abs() < 0.01, "got {minimum_cost}");
        }
        other => panic!("expected BudgetExceeded, got {other:?}"),
    }
}

#[test]
fn radius_shrinks_when_no_width_fits_full_radius() {
    let bounds = PlannerBounds {
        max_grid_width_meters: 4_000.0,
        ..PlannerBounds::default()
    };
    let results = find_max_grid_search_results_within_budget_with_bounds(
        PORTLAND_LAT,
        PORTLAND_LNG,
        TWENTY_MILES,
        0.04,
        10.0,
        &bounds,
    )
    .expect("reduced radius fits");

    assert!((results.radius_miles - 19.5).abs() < 1e-9);
    assert!((results.grid_width_meters - 4_000.0).abs() < 1e-9);
    assert_feasible(&results, 10.0);
}

#[test]
fn hopeless_budget_reports_cheapest_plan() {
    let err = find_max_grid_search_results_within_budget(
        PORTLAND_LAT,
        PORTLAND_LNG,
        TWENTY_MILES,
        0.04,
        0.10,
    )
    .unwrap_err();

    let GridError::BudgetExceeded {
        budget,
        minimum_cost,
    } = err
    else {
        panic!("expected BudgetExceeded, got {err:?}");
    };
    assert!(minimum_cost.is_finite());
    assert!(minimum_cost > budget);
}

#[test]
fn larger_budget_never_coarsens_the_grid() {
    let mut previous_width = f64::INFINITY;
    for budget in [10.0, 25.0, 50.0, 100.0, 400.0] {
        let results = find_max_grid_search_results_within_budget(
            PORTLAND_LAT,
            PORTLAND_LNG,
            TWENTY_MILES,
            0.005,
            budget,
        )
        .expect("fits");
        assert!(results.grid_width_meters <= previous_width);
        assert_feasible(&results, budget);
        previous_width = results.grid_width_meters;
    }
}

#[test]
fn winner_is_the_finest_feasible_width() {
    let budget = 60.0;
    let results =
        find_max_grid_search_results_within_budget(PORTLAND_LAT, PORTLAND_LNG, TWENTY_MILES, 0.005, budget)
            .expect("fits");
    let finer = results.grid_width_meters - PlannerBounds::default().grid_width_step_meters;
    let finer_cost = calculate_cost_from_results(finer, 0.005, TWENTY_MILES)
        .expect("valid geometry")
        .total_cost;
    assert!(finer_cost > budget);
}

#[test]
fn min_width_wins_when_budget_is_generous() {
    let results = find_max_grid_search_results_within_budget(
        PORTLAND_LAT,
        PORTLAND_LNG,
        5_000.0,
        0.005,
        1_000_000.0,
    )
    .expect("fits");
    assert!((results.grid_width_meters - 100.0).abs() < 1e-9);
}

#[test]
fn rejects_non_positive_inputs() {
    for (radius, cost, budget) in [
        (0.0, 0.005, 100.0),
        (TWENTY_MILES, 0.0, 100.0),
        (TWENTY_MILES, 0.005, 0.0),
        (TWENTY_MILES, 0.005, -5.0),
        (f64::NAN, 0.005, 100.0),
    ] {
        let err = find_max_grid_search_results_within_budget(
            PORTLAND_LAT,
            PORTLAND_LNG,
            radius,
            cost,
            budget,
        )
        .unwrap_err();
        assert!(matches!(err, GridError::InvalidConfiguration(_)), "{err:?}");
    }
}

#[test]
fn rejects_invalid_center() {
    let err = find_max_grid_search_results_within_budget(95.0, 0.0, TWENTY_MILES, 0.005, 100.0)
        .unwrap_err();
    assert!(matches!(err, GridError::InvalidConfiguration(_)));
}

#[test]
fn rejects_radius_below_min_width() {
    let err =
        find_max_grid_search_results_within_budget(PORTLAND_LAT, PORTLAND_LNG, 50.0, 0.005, 100.0)
            .unwrap_err();
    assert!(matches!(err, GridError::InvalidConfiguration(ref m) if m.contains("minimum grid width")));
}

#[test]
fn rejects_inverted_bounds() {
    let bounds = PlannerBounds {
        min_grid_width_meters: 600.0,
        max_grid_width_meters: 500.0,
        ..PlannerBounds::default()
    };
    assert!(matches!(
        bounds.validate(),
        Err(GridError::InvalidConfiguration(_))
    ));
}

#[test]
fn candidate_widths_respect_step_and_radius() {
    let bounds = PlannerBounds::default();
    let widths = bounds.candidate_widths(320.0);
    assert_eq!(widths, vec![100.0, 150.0, 200.0, 250.0, 300.0]);

    let all = bounds.candidate_widths(1.0e9);
    assert_eq!(all.len(), 99);
    assert!((all[98] - 5_000.0).abs() < 1e-9);
}

#[test]
fn candidate_radii_step_down_to_minimum() {
    let bounds = PlannerBounds {
        min_radius_meters: 1_000.0,
        radius_step_meters: 500.0,
        ..PlannerBounds::default()
    };
    let radii: Vec<f64> = bounds.candidate_radii(2_600.0, 0.005, 1.0e6).collect();
    assert_eq!(radii, vec![2_600.0, 2_100.0, 1_600.0, 1_100.0]);
    let fixed: Vec<f64> = no_reduction(5_000.0)
        .candidate_radii(2_600.0, 0.005, 1.0e6)
        .collect();
    assert_eq!(fixed, vec![2_600.0]);
}

#[test]
fn candidate_radii_skip_radii_the_budget_cannot_cover() {
    let bounds = PlannerBounds::default();
    // Even a 5 km block at 1.0 per cell blows a 0.5 budget beyond ~1.77 km.
    let radii: Vec<f64> = bounds.candidate_radii(1.0e7, 1.0, 0.5).collect();
    assert!(radii.len() <= 3, "{} radii", radii.len());
    assert!((radii[0] - 1.0e7).abs() < f64::EPSILON);
    let last = radii[radii.len() - 1];
    assert!(last >= bounds.min_radius_meters);
    assert!(last < bounds.min_radius_meters + bounds.radius_step_meters);
}

#[test]
fn huge_radius_with_hopeless_budget_fails_fast() {
    let err = find_max_grid_search_results_within_budget(
        PORTLAND_LAT,
        PORTLAND_LNG,
        miles_to_meters(200_000.0),
        1.0,
        0.5,
    )
    .unwrap_err();
    assert!(matches!(err, GridError::BudgetExceeded { .. }), "{err:?}");
}

#[test]
fn huge_radius_lands_on_largest_affordable_step() {
    let results = find_max_grid_search_results_within_budget(
        PORTLAND_LAT,
        PORTLAND_LNG,
        miles_to_meters(200.0),
        0.04,
        10.0,
    )
    .expect("a reduced radius fits");

    // 5000 m blocks cost 9.95 at 24.5 mi and 10.36 at 25 mi.
    assert!((results.radius_miles - 24.5).abs() < 1e-6, "{}", results.radius_miles);
    assert!((results.grid_width_meters - 5_000.0).abs() < 1e-9);
    assert_feasible(&results, 10.0);
}

#[test]
fn cell_cap_forces_a_coarser_width() {
    let bounds = PlannerBounds {
        max_cells: 10_000,
        ..PlannerBounds::default()
    };
    let results = find_max_grid_search_results_within_budget_with_bounds(
        PORTLAND_LAT,
        PORTLAND_LNG,
        TWENTY_MILES,
        0.005,
        100.0,
        &bounds,
    )
    .expect("a capped grid fits");

    // Uncapped, 500 m wins with 16384 cells.
    assert!(results.grid_width_meters > 500.0);
    assert!(results.grid.len() <= 10_000);
    assert!((results.radius_miles - 20.0).abs() < 1e-9);
    assert_feasible(&results, 100.0);
}

#[test]
fn cell_cap_shrinks_the_radius_when_widths_run_out() {
    let bounds = PlannerBounds {
        max_cells: 100,
        ..PlannerBounds::default()
    };
    let results = find_max_grid_search_results_within_budget_with_bounds(
        PORTLAND_LAT,
        PORTLAND_LNG,
        TWENTY_MILES,
        0.005,
        100.0,
        &bounds,
    )
    .expect("a smaller radius fits the cap");

    assert!(results.radius_miles < 20.0);
    assert!(!results.grid.is_empty());
    assert!(results.grid.len() <= 100);
}

#[test]
fn cell_cap_without_reduction_is_invalid_configuration() {
    let bounds = PlannerBounds {
        max_cells: 100,
        ..no_reduction(5_000.0)
    };
    let err = find_max_grid_search_results_within_budget_with_bounds(
        PORTLAND_LAT,
        PORTLAND_LNG,
        TWENTY_MILES,
        0.005,
        100.0,
        &bounds,
    )
    .unwrap_err();
    assert!(
        matches!(err, GridError::InvalidConfiguration(ref m) if m.contains("max_cells")),
        "{err:?}"
    );
}

#[test]
fn rejects_zero_cell_cap() {
    let bounds = PlannerBounds {
        max_cells: 0,
        ..PlannerBounds::default()
    };
    assert!(matches!(
        bounds.validate(),
        Err(GridError::InvalidConfiguration(ref m)) if m.contains("max_cells")
    ));
}

#[test]
fn from_app_config_copies_width_bounds() {
    let config = gridplan_core::AppConfig {
        env: gridplan_core::Environment::Test,
        bind_addr: "127.0.0.1:0".parse().expect("addr"),
        log_level: "debug".to_string(),
        cities_path: "./config/cities.yaml".into(),
        default_cost_per_cell: 0.005,
        default_budget: 100.0,
        default_radius_miles: 20.0,
        min_grid_width_meters: 200.0,
        max_grid_width_meters: 2_000.0,
        grid_width_step_meters: 100.0,
        water_check_concurrency: 4,
        max_cells: 40_000,
        request_timeout_secs: 30,
    };
    let bounds = PlannerBounds::from_app_config(&config);
    assert!((bounds.min_grid_width_meters - 200.0).abs() < f64::EPSILON);
    assert!((bounds.max_grid_width_meters - 2_000.0).abs() < f64::EPSILON);
    assert!((bounds.grid_width_step_meters - 100.0).abs() < f64::EPSILON);
    assert_eq!(bounds.max_cells, 40_000);
    assert!(bounds.allow_radius_reduction);
}
