//! Revenue composition by family and by state/year (charts 5 and 6).

use serde::Deserialize;

use crate::error::Result;
use crate::models::{FamilyShare, StateYearTotal};
use crate::view::{FilteredView, FILTERED};

#[derive(Deserialize)]
struct FamilyRow {
    family: String,
    revenue: f64,
}

pub struct BreakdownQuery<'a> {
    view: &'a FilteredView<'a>,
}

impl<'a> BreakdownQuery<'a> {
    pub fn new(view: &'a FilteredView<'a>) -> Self {
        Self { view }
    }

    /// Revenue per family with its percentage of the total, largest first.
    pub fn families(&self) -> Result<Vec<FamilyShare>> {
        let (sql, params) = self
            .view
            .query(FILTERED)
            .select(&["family", "SUM(revenue) AS revenue"])
            .group_by(&["family"])
            .order_by(&["SUM(revenue) DESC", "family ASC"])
            .build();
        let rows: Vec<FamilyRow> = self.view.connection().execute_into(&sql, &params)?;

        let total: f64 = rows.iter().map(|r| r.revenue).sum();
        Ok(rows
            .into_iter()
            .map(|r| FamilyShare {
                share_pct: if total == 0.0 { 0.0 } else { r.revenue / total * 100.0 },
                family: r.family,
                revenue: r.revenue,
            })
            .collect())
    }

    /// Revenue per (state, year), largest first; ties by state then year.
    pub fn states_by_year(&self) -> Result<Vec<StateYearTotal>> {
        let (sql, params) = self
            .view
            .query(FILTERED)
            .select(&["state", "year", "SUM(revenue) AS revenue"])
            .group_by(&["state", "year"])
            .order_by(&["SUM(revenue) DESC", "state ASC", "year ASC"])
            .build();
        self.view.connection().execute_into(&sql, &params)
    }
}
