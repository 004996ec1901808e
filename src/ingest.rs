//! CSV ingestion and normalization into the `sales` table.
//!
//! Rows are read with the `csv` crate, normalized into [`Transaction`]s, then
//! appended to a DuckDB table created from the fixed [`Transaction::SCHEMA`].

use crate::config;
use crate::connection::Connection;
use crate::error::{DashboardError, Result};
use crate::locale;
use crate::models::Transaction;
use chrono::{Datelike, NaiveDate};
use duckdb::{params, Appender};
use csv::StringRecord;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// How the source encodes each row's period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PeriodLayout {
    /// A single `MESANO` column holding `MM/YYYY`.
    MonthYear,
    /// Separate `MÊS` and `ANO` columns.
    LegacyMonthAndYear,
}

/// Counts reported after a successful ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_dropped: usize,
    pub period_layout: PeriodLayout,
}

impl fmt::Display for IngestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows read, {} kept, {} dropped ({:?})",
            self.rows_read, self.rows_kept, self.rows_dropped, self.period_layout
        )
    }
}

/// Normalized rows plus their summary.
#[derive(Debug, Clone)]
pub struct Ingestion {
    pub transactions: Vec<Transaction>,
    pub summary: IngestSummary,
}

// ---------------------------------------------------------------------------
// Header resolution
// ---------------------------------------------------------------------------

enum PeriodColumns {
    MonthYear(usize),
    Legacy { month: usize, year: usize },
}

/// Positions of every required column in the header row.
struct ColumnIndex {
    weight: usize,
    revenue: usize,
    avg_price: usize,
    bonus: usize,
    period: PeriodColumns,
    family: usize,
    state: usize,
    coordinator: usize,
    representative: usize,
    client_name: usize,
    client_code: usize,
    product: usize,
    description: usize,
}

impl ColumnIndex {
    /// Resolve header positions, reporting every missing column at once.
    fn resolve(headers: &[String]) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h == name);
        let mut missing: Vec<String> = Vec::new();
        let mut require = |name: &str| -> usize {
            position(name).unwrap_or_else(|| {
                missing.push(name.to_string());
                0
            })
        };

        let weight = require(config::COL_WEIGHT);
        let revenue = require(config::COL_REVENUE);
        let avg_price = require(config::COL_AVG_PRICE);
        let bonus = require(config::COL_BONUS);
        let family = require(config::COL_FAMILY);
        let state = require(config::COL_STATE);
        let coordinator = require(config::COL_COORDINATOR);
        let representative = require(config::COL_REPRESENTATIVE);
        let client_name = require(config::COL_CLIENT_NAME);
        let client_code = require(config::COL_CLIENT_CODE);
        let product = require(config::COL_PRODUCT);
        let description = require(config::COL_DESCRIPTION);

        let period = match (
            position(config::COL_MONTH_YEAR),
            position(config::COL_LEGACY_MONTH),
            position(config::COL_LEGACY_YEAR),
        ) {
            (Some(i), _, _) => PeriodColumns::MonthYear(i),
            (None, Some(month), Some(year)) => PeriodColumns::Legacy { month, year },
            _ => {
                missing.push(config::COL_MONTH_YEAR.to_string());
                PeriodColumns::MonthYear(0)
            }
        };

        if !missing.is_empty() {
            return Err(DashboardError::MissingColumns(missing));
        }

        Ok(Self {
            weight,
            revenue,
            avg_price,
            bonus,
            period,
            family,
            state,
            coordinator,
            representative,
            client_name,
            client_code,
            product,
            description,
        })
    }

    fn layout(&self) -> PeriodLayout {
        match self.period {
            PeriodColumns::MonthYear(_) => PeriodLayout::MonthYear,
            PeriodColumns::Legacy { .. } => PeriodLayout::LegacyMonthAndYear,
        }
    }

    fn reference_date(&self, record: &StringRecord) -> Option<NaiveDate> {
        match self.period {
            PeriodColumns::MonthYear(i) => locale::parse_month_year(field(record, i)),
            PeriodColumns::Legacy { month, year } => {
                locale::period_from_parts(field(record, month), field(record, year))
            }
        }
    }

    /// Normalize one data row; `None` when a required value is missing.
    fn transaction(&self, row_index: u64, record: &StringRecord) -> Option<Transaction> {
        let reference_date = self.reference_date(record)?;
        let revenue = locale::parse_number(field(record, self.revenue))?;
        let weight_kg = locale::parse_number(field(record, self.weight))?;

        Some(Transaction {
            row_index,
            reference_date,
            year: format!("{:04}", reference_date.year()),
            month_name: locale::month_name_of(reference_date),
            month_year: format!("{:02}/{:04}", reference_date.month(), reference_date.year()),
            weight_kg,
            revenue,
            avg_price: locale::parse_number(field(record, self.avg_price)),
            bonus_kg: locale::parse_number(field(record, self.bonus)),
            family: text(record, self.family),
            state: text(record, self.state),
            coordinator: text(record, self.coordinator),
            representative: text(record, self.representative),
            client_code: text(record, self.client_code),
            client_name: text(record, self.client_name),
            product_code: text(record, self.product),
            product_description: text(record, self.description),
        })
    }
}

fn field(record: &StringRecord, i: usize) -> &str {
    record.get(i).unwrap_or("")
}

fn text(record: &StringRecord, i: usize) -> String {
    field(record, i).trim().to_string()
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Read and normalize a comma-separated sales feed.
///
/// `source_name` only appears in error messages.
pub fn read_transactions<R: Read>(reader: R, source_name: &str) -> Result<Ingestion> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(DashboardError::EmptySource(source_name.to_string()));
    }

    let columns = ColumnIndex::resolve(&headers)?;
    let period_layout = columns.layout();
    if period_layout == PeriodLayout::LegacyMonthAndYear {
        tracing::warn!(
            "{} has no {} column; building periods from {} and {}",
            source_name,
            config::COL_MONTH_YEAR,
            config::COL_LEGACY_MONTH,
            config::COL_LEGACY_YEAR
        );
    }

    let mut transactions = Vec::new();
    let mut rows_read = 0usize;
    for result in csv_reader.records() {
        let record = result?;
        if let Some(tx) = columns.transaction(rows_read as u64, &record) {
            transactions.push(tx);
        }
        rows_read += 1;
    }

    if rows_read == 0 {
        return Err(DashboardError::EmptySource(source_name.to_string()));
    }
    if transactions.is_empty() {
        return Err(DashboardError::NoValidRows { rows_read });
    }

    let summary = IngestSummary {
        rows_read,
        rows_kept: transactions.len(),
        rows_dropped: rows_read - transactions.len(),
        period_layout,
    };
    Ok(Ingestion {
        transactions,
        summary,
    })
}

/// Read and normalize a sales feed from a file.
pub fn read_transactions_file(path: &Path) -> Result<Ingestion> {
    let file = File::open(path).map_err(|e| {
        DashboardError::SourceUnavailable(format!("cannot open {}: {}", path.display(), e))
    })?;
    read_transactions(file, &path.display().to_string())
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Append transactions in [`Transaction::SCHEMA`] column order.
pub fn append_transactions(appender: &mut Appender<'_>, transactions: &[Transaction]) -> Result<()> {
    for tx in transactions {
        appender.append_row(params![
            tx.row_index as i64,
            tx.reference_date,
            tx.year,
            tx.month_name,
            tx.month_year,
            tx.weight_kg,
            tx.revenue,
            tx.avg_price,
            tx.bonus_kg,
            tx.family,
            tx.state,
            tx.coordinator,
            tx.representative,
            tx.client_code,
            tx.client_name,
            tx.product_code,
            tx.product_description,
        ])?;
    }
    Ok(())
}

/// Ingest `path` and (re)create the `sales` table from it.
pub fn load_table(conn: &Connection, path: &Path) -> Result<IngestSummary> {
    let ingestion = read_transactions_file(path)?;
    conn.register_table(config::SALES_TABLE, &Transaction::SCHEMA, |appender| {
        append_transactions(appender, &ingestion.transactions)
    })?;

    tracing::info!("Loaded {}: {}", path.display(), ingestion.summary);
    Ok(ingestion.summary)
}
