//! Headline indicators over the filtered rows.

use serde::Deserialize;

use crate::error::{DashboardError, Result};
use crate::models::Kpis;
use crate::view::{FilteredView, FILTERED};

#[derive(Deserialize)]
struct Totals {
    total_revenue: f64,
    total_weight_kg: f64,
    total_bonus_kg: f64,
    distinct_clients: i64,
    row_count: i64,
}

/// Query interface for the KPI cards.
pub struct KpiQuery<'a> {
    view: &'a FilteredView<'a>,
}

impl<'a> KpiQuery<'a> {
    pub fn new(view: &'a FilteredView<'a>) -> Self {
        Self { view }
    }

    /// Sums, average price, bonus rate, and distinct clients.
    ///
    /// Sums skip missing values; an empty selection yields all zeros.
    pub fn compute(&self) -> Result<Kpis> {
        let (sql, params) = self
            .view
            .query(FILTERED)
            .select(&[
                "COALESCE(SUM(revenue), 0)::DOUBLE AS total_revenue",
                "COALESCE(SUM(weight_kg), 0)::DOUBLE AS total_weight_kg",
                "COALESCE(SUM(bonus_kg), 0)::DOUBLE AS total_bonus_kg",
                "COUNT(DISTINCT client_code) AS distinct_clients",
                "COUNT(*) AS row_count",
            ])
            .build();

        let totals: Totals = self
            .view
            .connection()
            .execute_into(&sql, &params)?
            .into_iter()
            .next()
            .ok_or_else(|| DashboardError::NotFound("KPI totals".into()))?;

        Ok(Kpis::from_totals(
            totals.total_revenue,
            totals.total_weight_kg,
            totals.total_bonus_kg,
            totals.distinct_clients,
            totals.row_count,
        ))
    }
}
