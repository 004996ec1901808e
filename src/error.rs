#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Source is empty: {0}")]
    EmptySource(String),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("No valid rows after normalization ({rows_read} rows read)")]
    NoValidRows { rows_read: usize },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl DashboardError {
    /// Whether this error came from loading the source table.
    ///
    /// Ingestion failures are terminal for a render pass: nothing downstream
    /// can be computed without the clean table.
    pub fn is_ingestion_failure(&self) -> bool {
        matches!(
            self,
            DashboardError::Http(_)
                | DashboardError::Csv(_)
                | DashboardError::SourceUnavailable(_)
                | DashboardError::EmptySource(_)
                | DashboardError::MissingColumns(_)
                | DashboardError::NoValidRows { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
