//! Two-period decline comparison.

use crate::error::Result;
use crate::filter::Dimension;
use crate::models::{DeclineOutcome, DeclineRecord, DeclineReport, Metric};
use crate::period::{ordered_periods, period_conditions, PeriodPair, PeriodSplit};
use crate::view::{FilteredView, FILTERED};
use crate::SqlBuilder;

pub struct DeclineQuery<'a> {
    view: &'a FilteredView<'a>,
}

impl<'a> DeclineQuery<'a> {
    pub fn new(view: &'a FilteredView<'a>) -> Self {
        Self { view }
    }

    /// Ordered (year, month) combinations of the current selection.
    pub fn periods(&self) -> Vec<PeriodPair> {
        let selection = self.view.selection();
        ordered_periods(
            &selection.values(Dimension::Year),
            &selection.values(Dimension::Month),
        )
    }

    /// Compare `metric` per client between the two halves of the selected
    /// periods.
    ///
    /// Only clients whose metric fell are returned, largest drop first, ties
    /// by client name. A client absent from one half counts as 0 there.
    pub fn compute(&self, metric: Metric) -> Result<DeclineOutcome> {
        let periods = self.periods();
        let count = periods.len();
        let split = match PeriodSplit::new(periods) {
            Some(split) => split,
            None => return Ok(DeclineOutcome::InvalidPeriods { count }),
        };

        let (p1_sql, p1_params) = period_sum(metric, &split.first);
        let (p2_sql, p2_params) = period_sum(metric, &split.second);
        let (states_sql, states_params) = SqlBuilder::new(FILTERED)
            .select(&["client_name", "arg_min(state, row_index) AS state"])
            .group_by(&["client_name"])
            .build();

        let (sql, params) = self
            .view
            .query("p1")
            .with("p1", &p1_sql, &p1_params)
            .with("p2", &p2_sql, &p2_params)
            .with("states", &states_sql, &states_params)
            .join("FULL OUTER JOIN p2 ON p1.client_name = p2.client_name")
            .join("LEFT JOIN states s ON s.client_name = COALESCE(p1.client_name, p2.client_name)")
            .select(&[
                "COALESCE(p1.client_name, p2.client_name) AS client",
                "s.state AS state",
                "COALESCE(p1.value, 0)::DOUBLE AS period_1",
                "COALESCE(p2.value, 0)::DOUBLE AS period_2",
                "(COALESCE(p1.value, 0) - COALESCE(p2.value, 0))::DOUBLE AS decline",
            ])
            .where_clause("COALESCE(p1.value, 0) - COALESCE(p2.value, 0) > 0", &[])
            .order_by(&["decline DESC", "client ASC"])
            .build();

        let records: Vec<DeclineRecord> = self.view.connection().execute_into(&sql, &params)?;
        Ok(DeclineOutcome::Computed(DeclineReport {
            metric,
            period_1: split.first,
            period_2: split.second,
            records,
        }))
    }
}

/// Per-client sum of `metric` over `periods`.
fn period_sum(metric: Metric, periods: &[PeriodPair]) -> (String, Vec<String>) {
    let value = format!("SUM({}) AS value", metric.column());
    SqlBuilder::new(FILTERED)
        .select(&["client_name", value.as_str()])
        .where_or(&period_conditions(periods))
        .group_by(&["client_name"])
        .build()
}
