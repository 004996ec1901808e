//! Year/month combinations and the "split in half" rule for the decline
//! comparison.

use serde::{Deserialize, Serialize};

use crate::locale;

/// One selected (year, month) combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodPair {
    pub year: String,
    pub month_name: String,
}

impl PeriodPair {
    pub fn new(year: &str, month_name: &str) -> Self {
        Self {
            year: year.to_string(),
            month_name: month_name.to_string(),
        }
    }

    /// `janeiro/2024`
    pub fn label(&self) -> String {
        format!("{}/{}", self.month_name, self.year)
    }
}

/// Build the ordered cross product of selected years and months.
///
/// Years ascend; within each year months follow the calendar, with names
/// that are not month names sorting first. Duplicates are ignored.
pub fn ordered_periods(years: &[&str], months: &[&str]) -> Vec<PeriodPair> {
    let mut years: Vec<&str> = years.to_vec();
    years.sort_unstable();
    years.dedup();

    let mut months: Vec<&str> = months.to_vec();
    months.sort_by(|a, b| {
        locale::month_index(a)
            .cmp(&locale::month_index(b))
            .then_with(|| a.cmp(b))
    });
    months.dedup();

    let mut out = Vec::with_capacity(years.len() * months.len());
    for year in &years {
        for month in &months {
            out.push(PeriodPair::new(year, month));
        }
    }
    out
}

/// The ordered period list cut at its midpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodSplit {
    pub first: Vec<PeriodPair>,
    pub second: Vec<PeriodPair>,
}

impl PeriodSplit {
    /// Split `periods` into two equal halves, preserving order.
    ///
    /// Returns `None` for an empty or odd-length list.
    pub fn new(periods: Vec<PeriodPair>) -> Option<Self> {
        if periods.is_empty() || periods.len() % 2 != 0 {
            return None;
        }
        let mid = periods.len() / 2;
        let mut first = periods;
        let second = first.split_off(mid);
        Some(Self { first, second })
    }
}

/// `(year = ? AND month_name = ?)` conditions matching any of `periods`.
pub fn period_conditions(periods: &[PeriodPair]) -> Vec<(&'static str, Vec<String>)> {
    periods
        .iter()
        .map(|p| {
            (
                "(year = ? AND month_name = ?)",
                vec![p.year.clone(), p.month_name.clone()],
            )
        })
        .collect()
}
