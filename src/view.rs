//! The filtered subset of the `sales` table.
//!
//! A [`FilteredView`] renders a [`Selection`] once as a parameterized query and
//! hands it to every aggregation as the `filtered` CTE, so each query sees
//! exactly the same rows.

use crate::config;
use crate::connection::Connection;
use crate::error::Result;
use crate::filter::Selection;
use crate::models::Transaction;
use crate::queries::{
    BreakdownQuery, DeclineQuery, InactivityQuery, KpiQuery, RankingQuery, TrendQuery,
};
use crate::sql_builder::SqlBuilder;

/// Name under which the filtered rows are visible to aggregation queries.
pub const FILTERED: &str = "filtered";

pub struct FilteredView<'a> {
    conn: &'a Connection,
    selection: Selection,
    filter_sql: String,
    filter_params: Vec<String>,
}

impl<'a> FilteredView<'a> {
    pub fn new(conn: &'a Connection, selection: Selection) -> Self {
        let mut builder = SqlBuilder::new(config::SALES_TABLE);
        selection.apply(&mut builder);
        let (filter_sql, filter_params) = builder.build();
        Self {
            conn,
            selection,
            filter_sql,
            filter_params,
        }
    }

    pub fn connection(&self) -> &'a Connection {
        self.conn
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Start a query over `from` with the `filtered` CTE already attached.
    pub fn query(&self, from: &str) -> SqlBuilder {
        let mut builder = SqlBuilder::new(from);
        builder.with(FILTERED, &self.filter_sql, &self.filter_params);
        builder
    }

    /// Number of rows passing the selection.
    pub fn row_count(&self) -> Result<usize> {
        let (sql, params) = self.query(FILTERED).select(&["COUNT(*)"]).build();
        let count = self
            .conn
            .execute_scalar(&sql, &params)?
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.row_count()? == 0)
    }

    /// Filtered transactions in input order.
    pub fn rows(&self, limit: Option<usize>, offset: Option<usize>) -> Result<Vec<Transaction>> {
        let mut builder = self.query(FILTERED);
        builder
            .select(&Transaction::select_columns())
            .order_by(&["row_index ASC"]);
        if let Some(n) = limit {
            builder.limit(n);
        }
        if let Some(n) = offset {
            builder.offset(n);
        }
        let (sql, params) = builder.build();
        self.conn.execute_into(&sql, &params)
    }

    // -- Aggregations ---------------------------------------------------------

    pub fn kpis(&self) -> KpiQuery<'_> {
        KpiQuery::new(self)
    }

    pub fn trends(&self) -> TrendQuery<'_> {
        TrendQuery::new(self)
    }

    pub fn rankings(&self) -> RankingQuery<'_> {
        RankingQuery::new(self)
    }

    pub fn breakdowns(&self) -> BreakdownQuery<'_> {
        BreakdownQuery::new(self)
    }

    pub fn inactivity(&self) -> InactivityQuery<'_> {
        InactivityQuery::new(self)
    }

    pub fn decline(&self) -> DeclineQuery<'_> {
        DeclineQuery::new(self)
    }
}
