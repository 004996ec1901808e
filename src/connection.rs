//! DuckDB connection wrapper with table registration and query execution.
//!
//! Tables are created from an explicit column schema and filled row by row
//! through DuckDB's appender, so query results never depend on type inference
//! and loading never needs a DuckDB extension.

use crate::cache::CacheManager;
use crate::error::{DashboardError, Result};
use chrono::{Duration, NaiveDate};
use duckdb::{types::ValueRef, Appender, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Wraps a DuckDB connection and tracks which tables have been loaded.
pub struct Connection {
    conn: DuckDbConnection,
    /// The cache manager used to locate or download the source file.
    pub cache: RefCell<CacheManager>,
    registered_tables: RefCell<HashSet<String>>,
}

impl Connection {
    /// Create a connection backed by the given cache.
    ///
    /// Opens an in-memory DuckDB database. Extensions are never installed or
    /// loaded on demand, so no query can reach the network.
    pub fn new(cache: CacheManager) -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        conn.execute_batch(
            "SET autoinstall_known_extensions = false; SET autoload_known_extensions = false;",
        )?;
        Ok(Self {
            conn,
            cache: RefCell::new(cache),
            registered_tables: RefCell::new(HashSet::new()),
        })
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    /// Automatically converts DuckDB types to `serde_json::Value`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows_result = stmt.query(param_values.as_slice())?;

        // Column metadata is only available after the statement has run
        let (column_names, column_count) = {
            let executed = rows_result.as_ref().ok_or_else(|| {
                DashboardError::InvalidArgument(format!("statement did not execute: {}", sql))
            })?;
            let names: Vec<String> = executed
                .column_names()
                .into_iter()
                .map(|s| s.to_string())
                .collect();
            (names, executed.column_count())
        };

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::with_capacity(column_count);
            for (i, col_name) in column_names.iter().enumerate() {
                let value = convert_value_ref(row.get_ref(i)?);
                map.insert(col_name.clone(), value);
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(
                row.into_iter().collect::<serde_json::Map<String, serde_json::Value>>(),
            );
            let item: T = serde_json::from_value(value)?;
            results.push(item);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            let value = convert_value_ref(row.get_ref(0)?);
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    /// Create `table_name` with the given `(name, type)` columns and fill it
    /// through `fill`.
    ///
    /// Replaces any existing table of the same name. When `fill` fails the
    /// table is dropped again, so a failed load never leaves partial rows.
    pub fn register_table<F>(&self, table_name: &str, columns: &[(&str, &str)], fill: F) -> Result<()>
    where
        F: FnOnce(&mut Appender<'_>) -> Result<()>,
    {
        if columns.is_empty() {
            return Err(DashboardError::InvalidArgument(format!(
                "table {} needs at least one column",
                table_name
            )));
        }
        let schema: Vec<String> = columns
            .iter()
            .map(|(name, ty)| format!("{} {}", name, ty))
            .collect();
        self.conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS {}; CREATE TABLE {} ({})",
            table_name,
            table_name,
            schema.join(", ")
        ))?;
        self.registered_tables.borrow_mut().remove(table_name);

        let filled = self.conn.appender(table_name).map_err(DashboardError::from).and_then(
            |mut appender| {
                fill(&mut appender)?;
                appender.flush()?;
                Ok(())
            },
        );
        if let Err(err) = filled {
            self.conn
                .execute_batch(&format!("DROP TABLE IF EXISTS {}", table_name))?;
            return Err(err);
        }

        self.registered_tables
            .borrow_mut()
            .insert(table_name.to_string());
        tracing::debug!("Registered table {}", table_name);
        Ok(())
    }

    /// Check whether a table has been registered.
    pub fn has_table(&self, name: &str) -> bool {
        self.registered_tables.borrow().contains(name)
    }

    /// Return a sorted list of all registered table names.
    pub fn tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registered_tables.borrow().iter().cloned().collect();
        names.sort();
        names
    }

    /// Drop a registered table so it is rebuilt on next access.
    pub fn drop_table(&self, name: &str) -> Result<()> {
        self.conn
            .execute_batch(&format!("DROP TABLE IF EXISTS {}", name))?;
        self.registered_tables.borrow_mut().remove(name);
        Ok(())
    }

    /// Drop every registered table.
    pub fn reset_tables(&self) -> Result<()> {
        for name in self.tables() {
            self.drop_table(&name)?;
        }
        Ok(())
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UTinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::USmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UBigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            // HugeInt may not fit in i64; try i64, fallback to string
            if let Ok(i) = i64::try_from(n) {
                serde_json::Value::Number(i.into())
            } else {
                serde_json::Value::String(n.to_string())
            }
        }
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => {
            serde_json::Value::String(String::from_utf8_lossy(bytes).to_string())
        }
        ValueRef::Date32(days) => NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|epoch| epoch.checked_add_signed(Duration::days(days as i64)))
            .map(|d| serde_json::Value::String(d.format("%Y-%m-%d").to_string()))
            .unwrap_or(serde_json::Value::Null),
        _ => {
            // Remaining types (timestamps, intervals, nested values) are not
            // produced by any dashboard query
            serde_json::Value::Null
        }
    }
}
