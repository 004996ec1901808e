use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Kpis: Headline indicators for a filtered table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_revenue: f64,
    pub total_weight_kg: f64,
    pub average_price: f64,
    pub total_bonus_kg: f64,
    /// Bonus weight as a percentage of total weight.
    pub bonus_rate: f64,
    pub distinct_clients: i64,
    pub row_count: i64,
}

impl Kpis {
    pub fn from_totals(
        total_revenue: f64,
        total_weight_kg: f64,
        total_bonus_kg: f64,
        distinct_clients: i64,
        row_count: i64,
    ) -> Self {
        Self {
            total_revenue,
            total_weight_kg,
            average_price: average_price(total_revenue, total_weight_kg),
            total_bonus_kg,
            bonus_rate: bonus_rate(total_bonus_kg, total_weight_kg),
            distinct_clients,
            row_count,
        }
    }
}

/// Revenue per kilogram; 0 unless the weight sum is positive (net returns
/// included).
pub fn average_price(revenue: f64, weight_kg: f64) -> f64 {
    if weight_kg > 0.0 {
        revenue / weight_kg
    } else {
        0.0
    }
}

/// Bonus weight as a percentage of sold weight; 0 unless the weight sum is
/// positive.
pub fn bonus_rate(bonus_kg: f64, weight_kg: f64) -> f64 {
    if weight_kg > 0.0 {
        bonus_kg / weight_kg * 100.0
    } else {
        0.0
    }
}
