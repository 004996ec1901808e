//! Top-N rankings (charts 3, 4, 7 and 8).
//!
//! Every ranking orders by descending revenue and breaks ties by the first
//! row (in input order) that contributed to the group.

use serde::Deserialize;

use crate::error::Result;
use crate::models::{kpi, ProductTotal, RankedTotal, YearTotal};
use crate::view::{FilteredView, FILTERED};
use crate::SqlBuilder;

#[derive(Deserialize)]
struct RankedYearRow {
    name: String,
    year: String,
    total: f64,
    revenue: f64,
}

pub struct RankingQuery<'a> {
    view: &'a FilteredView<'a>,
}

impl<'a> RankingQuery<'a> {
    pub fn new(view: &'a FilteredView<'a>) -> Self {
        Self { view }
    }

    /// Top `n` representatives by revenue, each split by year.
    pub fn representatives(&self, n: usize) -> Result<Vec<RankedTotal>> {
        self.top_by_year("representative", n)
    }

    /// Top `n` clients by revenue, each split by year.
    pub fn clients(&self, n: usize) -> Result<Vec<RankedTotal>> {
        self.top_by_year("client_name", n)
    }

    fn top_by_year(&self, column: &str, n: usize) -> Result<Vec<RankedTotal>> {
        let name_col = format!("{} AS name", column);
        let (ranked_sql, ranked_params) = SqlBuilder::new(FILTERED)
            .select(&[
                name_col.as_str(),
                "SUM(revenue) AS total",
                "MIN(row_index) AS first_seen",
            ])
            .group_by(&[column])
            .order_by(&["total DESC", "first_seen ASC"])
            .limit(n)
            .build();

        let join = format!("JOIN {} f ON f.{} = r.name", FILTERED, column);
        let (sql, params) = self
            .view
            .query("ranked r")
            .with("ranked", &ranked_sql, &ranked_params)
            .join(&join)
            .select(&[
                "r.name AS name",
                "f.year AS year",
                "r.total AS total",
                "SUM(f.revenue) AS revenue",
            ])
            .group_by(&["r.name", "f.year", "r.total", "r.first_seen"])
            .order_by(&["r.total DESC", "r.first_seen ASC", "f.year ASC"])
            .build();

        let rows: Vec<RankedYearRow> = self.view.connection().execute_into(&sql, &params)?;

        let mut ranked: Vec<RankedTotal> = Vec::new();
        for row in rows {
            let year = YearTotal {
                year: row.year,
                revenue: row.revenue,
            };
            match ranked.last_mut() {
                Some(last) if last.name == row.name => last.by_year.push(year),
                _ => ranked.push(RankedTotal {
                    name: row.name,
                    total: row.total,
                    by_year: vec![year],
                }),
            }
        }
        Ok(ranked)
    }

    /// Top `n` (product, description) pairs by revenue with their weight
    /// sum and average price.
    pub fn products(&self, n: usize) -> Result<Vec<ProductTotal>> {
        let (sql, params) = self
            .view
            .query(FILTERED)
            .select(&[
                "product_code",
                "product_description",
                "SUM(revenue) AS revenue",
                "SUM(weight_kg) AS weight_kg",
            ])
            .group_by(&["product_code", "product_description"])
            .order_by(&["SUM(revenue) DESC", "MIN(row_index) ASC"])
            .limit(n)
            .build();

        let mut products: Vec<ProductTotal> = self.view.connection().execute_into(&sql, &params)?;
        for product in &mut products {
            product.average_price = kpi::average_price(product.revenue, product.weight_kg);
        }
        Ok(products)
    }
}
