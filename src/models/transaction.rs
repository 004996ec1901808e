use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Transaction: One normalized sale record
// ---------------------------------------------------------------------------

/// A sale record after normalization.
///
/// `reference_date`, `revenue`, and `weight_kg` are always present; rows
/// missing any of them never make it into the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// 0-based position of the record among the source's data rows.
    pub row_index: u64,
    pub reference_date: NaiveDate,
    pub year: String,
    pub month_name: String,
    pub month_year: String,
    pub weight_kg: f64,
    pub revenue: f64,
    pub avg_price: Option<f64>,
    pub bonus_kg: Option<f64>,
    pub family: String,
    pub state: String,
    pub coordinator: String,
    pub representative: String,
    pub client_code: String,
    pub client_name: String,
    pub product_code: String,
    pub product_description: String,
}

impl Transaction {
    /// Column names and DuckDB types of the `sales` table, in field order.
    pub const SCHEMA: [(&'static str, &'static str); 17] = [
        ("row_index", "BIGINT"),
        ("reference_date", "DATE"),
        ("year", "VARCHAR"),
        ("month_name", "VARCHAR"),
        ("month_year", "VARCHAR"),
        ("weight_kg", "DOUBLE"),
        ("revenue", "DOUBLE"),
        ("avg_price", "DOUBLE"),
        ("bonus_kg", "DOUBLE"),
        ("family", "VARCHAR"),
        ("state", "VARCHAR"),
        ("coordinator", "VARCHAR"),
        ("representative", "VARCHAR"),
        ("client_code", "VARCHAR"),
        ("client_name", "VARCHAR"),
        ("product_code", "VARCHAR"),
        ("product_description", "VARCHAR"),
    ];

    /// SELECT list that reads rows back in a shape this struct deserializes
    /// from (dates rendered as ISO strings).
    pub fn select_columns() -> Vec<String> {
        Self::SCHEMA
            .iter()
            .map(|(name, ty)| {
                if *ty == "DATE" {
                    format!("strftime({}, '%Y-%m-%d') AS {}", name, name)
                } else {
                    name.to_string()
                }
            })
            .collect()
    }
}
