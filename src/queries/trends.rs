//! Revenue over time (charts 1 and 2).

use crate::error::Result;
use crate::models::{DateTotal, MonthYearTotal};
use crate::view::{FilteredView, FILTERED};

pub struct TrendQuery<'a> {
    view: &'a FilteredView<'a>,
}

impl<'a> TrendQuery<'a> {
    pub fn new(view: &'a FilteredView<'a>) -> Self {
        Self { view }
    }

    /// Revenue per reference date, oldest first.
    pub fn by_date(&self) -> Result<Vec<DateTotal>> {
        let (sql, params) = self
            .view
            .query(FILTERED)
            .select(&[
                "strftime(reference_date, '%Y-%m-%d') AS date",
                "SUM(revenue) AS revenue",
            ])
            .group_by(&["reference_date"])
            .order_by(&["reference_date ASC"])
            .build();
        self.view.connection().execute_into(&sql, &params)
    }

    /// Revenue per (month, year), ordered by calendar month then year.
    ///
    /// Ordering happens here rather than in SQL because month names only
    /// sort correctly through the month table.
    pub fn by_month_year(&self) -> Result<Vec<MonthYearTotal>> {
        let (sql, params) = self
            .view
            .query(FILTERED)
            .select(&["month_name", "year", "SUM(revenue) AS revenue"])
            .group_by(&["month_name", "year"])
            .build();
        let mut totals: Vec<MonthYearTotal> = self.view.connection().execute_into(&sql, &params)?;
        totals.sort_by(|a, b| {
            a.month_index()
                .cmp(&b.month_index())
                .then_with(|| a.year.cmp(&b.year))
        });
        Ok(totals)
    }
}
