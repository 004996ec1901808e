use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::locale;

// ---------------------------------------------------------------------------
// DateTotal: Revenue per reference date (chart 1)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateTotal {
    pub date: NaiveDate,
    pub revenue: f64,
}

// ---------------------------------------------------------------------------
// MonthYearTotal: Revenue per (month, year) (chart 2)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthYearTotal {
    pub month_name: String,
    pub year: String,
    pub revenue: f64,
}

impl MonthYearTotal {
    pub fn month_index(&self) -> u32 {
        locale::month_index(&self.month_name)
    }
}

// ---------------------------------------------------------------------------
// RankedTotal: Top-N entry with its per-year split (charts 3 and 4)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearTotal {
    pub year: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTotal {
    pub name: String,
    pub total: f64,
    pub by_year: Vec<YearTotal>,
}

// ---------------------------------------------------------------------------
// FamilyShare: Revenue composition by family (chart 5)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyShare {
    pub family: String,
    pub revenue: f64,
    pub share_pct: f64,
}

// ---------------------------------------------------------------------------
// StateYearTotal: Revenue by (state, year) (chart 6)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateYearTotal {
    pub state: String,
    pub year: String,
    pub revenue: f64,
}

// ---------------------------------------------------------------------------
// ProductTotal: Top products (charts 7 and 8)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductTotal {
    pub product_code: String,
    pub product_description: String,
    pub revenue: f64,
    pub weight_kg: f64,
    #[serde(default)]
    pub average_price: f64,
}

impl ProductTotal {
    /// `code - description`, as shown on the product charts.
    pub fn label(&self) -> String {
        format!("{} - {}", self.product_code, self.product_description)
    }
}

/// Reorder products by computed average price, cheapest first.
///
/// The sort is stable, so equal prices keep their revenue ranking.
pub fn by_average_price(products: &[ProductTotal]) -> Vec<ProductTotal> {
    let mut sorted = products.to_vec();
    sorted.sort_by(|a, b| a.average_price.total_cmp(&b.average_price));
    sorted
}
