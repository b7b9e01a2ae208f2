//! Human-readable rendering of cost projections.

use std::fmt;

use crate::cost::CostResults;
use crate::error::GridError;
use crate::planner::GridSearchResults;

/// Labelled view over a [`CostResults`], optionally alongside the number of
/// cells actually materialized (which may be lower than the continuous estimate).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostSummary {
    pub results: CostResults,
    pub materialized_cells: Option<usize>,
}

impl CostSummary {
    #[must_use]
    pub fn new(results: CostResults) -> Self {
        Self {
            results,
            materialized_cells: None,
        }
    }

    /// Summary of the configuration a planner chose, including its real cell count.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidGeometry`] if the results carry a
    /// non-positive width or radius.
    pub fn from_search_results(
        results: &GridSearchResults,
        cost_per_cell: f64,
    ) -> Result<Self, GridError> {
        Ok(Self {
            results: CostResults::from_search_results(results, cost_per_cell)?,
            materialized_cells: Some(results.grid.len()),
        })
    }

    #[must_use]
    pub fn lines(&self) -> Vec<(&'static str, String)> {
        let r = &self.results;
        let mut lines = vec![("Search blocks", format_count(r.number_of_squares))];
        if let Some(cells) = self.materialized_cells {
            lines.push(("Grid cells", format_thousands(cells as u64)));
        }
        lines.push(("Block area", format!("{} m²", format_count(r.search_block_area))));
        lines.push((
            "Total area",
            format!("{:.2} km²", r.total_area_meters / 1_000_000.0),
        ));
        lines.push(("Search radius", format!("{:.2} mi", r.search_radius_miles)));
        lines.push(("Total cost", format_currency(r.total_cost)));
        lines
    }
}

impl fmt::Display for CostSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in self.lines() {
            writeln!(f, "{:<16}{value}", format!("{label}:"))?;
        }
        Ok(())
    }
}

#[must_use]
pub fn format_currency(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Round to the nearest whole number and group thousands.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_count(value: f64) -> String {
    if !value.is_finite() || value < 0.0 {
        return value.to_string();
    }
    format_thousands(value.round() as u64)
}

#[must_use]
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
