//! Clients without purchases since the start of the reference month.

use chrono::NaiveDate;

use crate::error::Result;
use crate::locale;
use crate::models::{InactiveClient, InactiveReport};
use crate::view::{FilteredView, FILTERED};
use crate::SqlBuilder;

pub struct InactivityQuery<'a> {
    view: &'a FilteredView<'a>,
}

impl<'a> InactivityQuery<'a> {
    pub fn new(view: &'a FilteredView<'a>) -> Self {
        Self { view }
    }

    /// Inactive clients relative to `today`: those whose latest purchase is
    /// before the first day of `today`'s month.
    pub fn as_of(&self, today: NaiveDate) -> Result<InactiveReport> {
        self.before(locale::first_day_of_month(today))
    }

    /// Clients whose most recent reference date is strictly before `cutoff`.
    ///
    /// Representative and state come from the client's first row in input
    /// order. Sorted by last purchase (newest first), then representative,
    /// then client.
    pub fn before(&self, cutoff: NaiveDate) -> Result<InactiveReport> {
        let (last_sql, last_params) = SqlBuilder::new(FILTERED)
            .select(&[
                "client_name",
                "MAX(reference_date) AS last_purchase_date",
                "arg_min(representative, row_index) AS representative",
                "arg_min(state, row_index) AS state",
            ])
            .group_by(&["client_name"])
            .build();

        let cutoff_str = cutoff.format("%Y-%m-%d").to_string();
        let (sql, params) = self
            .view
            .query("last_purchases")
            .with("last_purchases", &last_sql, &last_params)
            .select(&[
                "client_name",
                "representative",
                "state",
                "strftime(last_purchase_date, '%Y-%m-%d') AS last_purchase",
            ])
            .where_clause("last_purchase_date < CAST(? AS DATE)", &[&cutoff_str])
            .order_by(&[
                "last_purchase_date DESC",
                "representative ASC",
                "client_name ASC",
            ])
            .build();

        let clients: Vec<InactiveClient> = self.view.connection().execute_into(&sql, &params)?;
        tracing::debug!("{} inactive clients before {}", clients.len(), cutoff);
        Ok(InactiveReport { cutoff, clients })
    }
}
