//! Sales analytics over a periodic CSV export.
//!
//! Transactions are read from a local file or a cached download, normalized
//! (pt-BR numbers, `MM/YYYY` periods, Portuguese month names), loaded into an
//! in-process DuckDB table, and queried per filter selection for KPIs, chart
//! datasets, an inactive-client report, and a two-period decline analysis.
//!
//! # Quick start
//!
//! ```no_run
//! use sales_dashboard::{SalesDashboard, Session};
//!
//! let dashboard = SalesDashboard::builder().source("Dados.csv").build().unwrap();
//! let options = dashboard.options().unwrap();
//! let session = Session::new(&options);
//!
//! let outcome = dashboard.report(&session).unwrap();
//! let notes = dashboard.annotations();
//! print!("{}", sales_dashboard::report::render_text(&outcome, &notes));
//! ```

pub mod annotations;
pub mod cache;
pub mod config;
pub mod connection;
pub mod error;
pub mod export;
pub mod filter;
pub mod ingest;
pub mod locale;
pub mod models;
pub mod period;
pub mod queries;
pub mod report;
pub mod session;
pub mod sql_builder;
pub mod view;

pub use annotations::AnnotationStore;
pub use cache::{CacheManager, Source};
pub use config::DashboardConfig;
pub use connection::Connection;
pub use error::{DashboardError, Result};
pub use filter::{Dimension, FilterOptions, Selection};
pub use ingest::IngestSummary;
pub use report::{DashboardReport, ReportOutcome};
pub use session::Session;
pub use sql_builder::SqlBuilder;
pub use view::FilteredView;

use chrono::{Local, NaiveDate};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// SalesDashboardBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`SalesDashboard`].
pub struct SalesDashboardBuilder {
    source: String,
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    annotations_path: PathBuf,
}

impl Default for SalesDashboardBuilder {
    fn default() -> Self {
        Self::from_config(&DashboardConfig::default())
    }
}

impl SalesDashboardBuilder {
    /// Start from a loaded configuration file.
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            source: config.source.clone(),
            cache_dir: config.cache_dir.clone(),
            offline: config.offline,
            timeout: Duration::from_secs(config.timeout_secs),
            annotations_path: config.annotations.clone(),
        }
    }

    /// Path or `http(s)` URL of the CSV export.
    ///
    /// Defaults to `Dados.csv` in the working directory.
    pub fn source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = source.into();
        self
    }

    /// Set a custom cache directory for downloaded sources.
    ///
    /// If not set, the platform-appropriate default cache directory is used
    /// (e.g. `~/.cache/sales-dashboard` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// When offline, a URL source is only read from the cache.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// HTTP timeout for downloading a URL source. Defaults to 120 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// JSON file holding client notes.
    pub fn annotations_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.annotations_path = path.as_ref().to_path_buf();
        self
    }

    /// Build the dashboard, initializing the cache and DuckDB connection.
    ///
    /// The source is not read until the first query.
    pub fn build(self) -> Result<SalesDashboard> {
        let source = Source::parse(&self.source);
        let cache = CacheManager::new(source, self.cache_dir, self.offline, self.timeout)?;
        let conn = Connection::new(cache)?;
        Ok(SalesDashboard {
            conn,
            annotations_path: self.annotations_path,
            summary: RefCell::new(None),
        })
    }
}

// ---------------------------------------------------------------------------
// SalesDashboard
// ---------------------------------------------------------------------------

/// The main entry point.
///
/// Owns the [`Connection`] (and through it the [`CacheManager`]). The clean
/// table is built lazily on first use and kept until [`reload`](Self::reload).
pub struct SalesDashboard {
    conn: Connection,
    annotations_path: PathBuf,
    summary: RefCell<Option<IngestSummary>>,
}

impl SalesDashboard {
    pub fn builder() -> SalesDashboardBuilder {
        SalesDashboardBuilder::default()
    }

    /// Make sure the `sales` table exists, ingesting the source if needed.
    pub fn load(&self) -> Result<IngestSummary> {
        if let Some(summary) = self.summary.borrow().as_ref() {
            if self.conn.has_table(config::SALES_TABLE) {
                return Ok(summary.clone());
            }
        }
        let path = self.conn.cache.borrow_mut().ensure_source()?;
        let summary = ingest::load_table(&self.conn, &path)?;
        *self.summary.borrow_mut() = Some(summary.clone());
        Ok(summary)
    }

    /// Discard the cached download (URL sources only) and the table, then
    /// ingest again.
    pub fn reload(&self) -> Result<IngestSummary> {
        {
            let cache = self.conn.cache.borrow();
            if cache.source().is_remote() {
                cache.clear()?;
            }
        }
        self.conn.reset_tables()?;
        *self.summary.borrow_mut() = None;
        tracing::info!("Cache cleared; reloading source");
        self.load()
    }

    /// Summary of the last successful ingestion, if any.
    pub fn summary(&self) -> Option<IngestSummary> {
        self.summary.borrow().clone()
    }

    /// Values available per filter dimension.
    pub fn options(&self) -> Result<FilterOptions> {
        self.load()?;
        FilterOptions::load(&self.conn)
    }

    /// The rows passing `selection`, ready for aggregation.
    pub fn filter(&self, selection: &Selection) -> Result<FilteredView<'_>> {
        self.load()?;
        Ok(FilteredView::new(&self.conn, selection.clone()))
    }

    /// Run a full render pass for `session`, judging inactivity against today.
    pub fn report(&self, session: &Session) -> Result<ReportOutcome> {
        self.report_as_of(session, Local::now().date_naive())
    }

    /// Run a full render pass with an explicit reference date.
    pub fn report_as_of(&self, session: &Session, today: NaiveDate) -> Result<ReportOutcome> {
        let view = self.filter(session.selection())?;
        DashboardReport::compute(&view, session.metric(), today)
    }

    /// Load the annotation store (empty when absent or unreadable).
    pub fn annotations(&self) -> AnnotationStore {
        AnnotationStore::load(&self.annotations_path)
    }

    pub fn annotations_path(&self) -> &Path {
        &self.annotations_path
    }

    /// Execute a raw SQL query against the DuckDB database.
    ///
    /// The `sales` table is loaded first.
    pub fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        self.load()?;
        self.conn.execute(query, params)
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for SalesDashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.conn.cache.borrow();
        write!(
            f,
            "SalesDashboard(source={}, cache_dir={}, tables=[{}], offline={})",
            cache.source(),
            cache.cache_dir.display(),
            self.conn.tables().join(", "),
            cache.offline
        )
    }
}
