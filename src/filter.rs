//! Multi-value filters over the eight dashboard dimensions.
//!
//! A [`Selection`] maps every dimension to the set of chosen values. Rows pass
//! when each of their dimension values is in the matching set; a dimension with
//! an empty set (or no entry at all) matches nothing.

use crate::config;
use crate::connection::Connection;
use crate::error::{DashboardError, Result};
use crate::locale;
use crate::sql_builder::SqlBuilder;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// A filterable column of the `sales` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Year,
    Month,
    Representative,
    Family,
    State,
    Coordinator,
    Client,
    Product,
}

impl Dimension {
    pub const ALL: [Dimension; 8] = [
        Dimension::Year,
        Dimension::Month,
        Dimension::Representative,
        Dimension::Family,
        Dimension::State,
        Dimension::Coordinator,
        Dimension::Client,
        Dimension::Product,
    ];

    /// Column of the `sales` table holding this dimension.
    pub fn column(self) -> &'static str {
        match self {
            Dimension::Year => "year",
            Dimension::Month => "month_name",
            Dimension::Representative => "representative",
            Dimension::Family => "family",
            Dimension::State => "state",
            Dimension::Coordinator => "coordinator",
            Dimension::Client => "client_name",
            Dimension::Product => "product_code",
        }
    }

    /// Control label shown next to the selector.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Year => "Ano",
            Dimension::Month => "Mês",
            Dimension::Representative => "Representante",
            Dimension::Family => "Família",
            Dimension::State => "UF",
            Dimension::Coordinator => "Coordenador",
            Dimension::Client => "Cliente",
            Dimension::Product => "Produto",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Year => "year",
            Dimension::Month => "month",
            Dimension::Representative => "representative",
            Dimension::Family => "family",
            Dimension::State => "state",
            Dimension::Coordinator => "coordinator",
            Dimension::Client => "client",
            Dimension::Product => "product",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dimension {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase();
        Dimension::ALL
            .into_iter()
            .find(|d| d.name() == key || d.column() == key)
            .ok_or_else(|| DashboardError::InvalidArgument(format!("unknown dimension: {}", s)))
    }
}

// ---------------------------------------------------------------------------
// FilterOptions
// ---------------------------------------------------------------------------

/// Distinct values available per dimension in the loaded table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    values: BTreeMap<Dimension, Vec<String>>,
}

impl FilterOptions {
    /// Read the distinct values of every dimension from the `sales` table.
    ///
    /// Months come back in calendar order; everything else ascends by code point.
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut values = BTreeMap::new();
        for dim in Dimension::ALL {
            let column = dim.column();
            let (sql, params) = SqlBuilder::new(config::SALES_TABLE)
                .select(&[format!("{} AS value", column)])
                .distinct()
                .build();
            let rows = conn.execute(&sql, &params)?;
            let mut found: Vec<String> = rows
                .into_iter()
                .filter_map(|mut row| match row.remove("value") {
                    Some(serde_json::Value::String(s)) => Some(s),
                    _ => None,
                })
                .collect();
            if dim == Dimension::Month {
                found.sort_by(|a, b| {
                    locale::month_index(a)
                        .cmp(&locale::month_index(b))
                        .then_with(|| a.cmp(b))
                });
            } else {
                found.sort();
            }
            values.insert(dim, found);
        }
        Ok(Self { values })
    }

    /// Build options directly from per-dimension value lists.
    pub fn from_values(values: BTreeMap<Dimension, Vec<String>>) -> Self {
        Self { values }
    }

    pub fn get(&self, dim: Dimension) -> &[String] {
        self.values.get(&dim).map(Vec::as_slice).unwrap_or(&[])
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Chosen values per dimension. Immutable: every change returns a new value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    chosen: BTreeMap<Dimension, BTreeSet<String>>,
}

impl Selection {
    /// Every available value selected on every dimension.
    pub fn all(options: &FilterOptions) -> Self {
        let chosen = Dimension::ALL
            .into_iter()
            .map(|dim| (dim, options.get(dim).iter().cloned().collect()))
            .collect();
        Self { chosen }
    }

    /// Nothing selected anywhere; matches no rows.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn values(&self, dim: Dimension) -> Vec<&str> {
        self.chosen
            .get(&dim)
            .map(|set| set.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, dim: Dimension, value: &str) -> bool {
        self.chosen
            .get(&dim)
            .is_some_and(|set| set.contains(value))
    }

    /// Replace one dimension's chosen values.
    pub fn with_values<I, S>(&self, dim: Dimension, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next = self.clone();
        next.chosen
            .insert(dim, values.into_iter().map(Into::into).collect());
        next
    }

    /// Select every option of `dim`, or clear it when `selected` is false.
    pub fn toggle_all(&self, dim: Dimension, selected: bool, options: &FilterOptions) -> Self {
        if selected {
            self.with_values(dim, options.get(dim).iter().cloned())
        } else {
            self.with_values(dim, Vec::<String>::new())
        }
    }

    /// Whether every available option of `dim` is chosen.
    pub fn all_selected(&self, dim: Dimension, options: &FilterOptions) -> bool {
        options.get(dim).iter().all(|v| self.contains(dim, v))
    }

    /// Whether some dimension has nothing chosen.
    pub fn is_empty_on_any(&self) -> bool {
        Dimension::ALL
            .into_iter()
            .any(|dim| self.chosen.get(&dim).map_or(true, BTreeSet::is_empty))
    }

    /// Add one `IN (...)` condition per dimension.
    pub fn apply(&self, builder: &mut SqlBuilder) {
        for dim in Dimension::ALL {
            builder.where_in(dim.column(), &self.values(dim));
        }
    }
}
