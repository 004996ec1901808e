use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DashboardError, Result};

/// Source used when neither the builder nor a config file names one.
pub const DEFAULT_SOURCE: &str = "Dados.csv";
pub const DEFAULT_ANNOTATIONS_FILE: &str = "observacoes_clientes.json";
pub const CONFIG_FILE: &str = "sales-dashboard.toml";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// File name of a downloaded source inside the cache directory.
pub const CACHED_SOURCE_FILE: &str = "source.csv";
/// Records which URL the cached source was downloaded from.
pub const CACHED_ORIGIN_FILE: &str = "source.txt";

/// DuckDB table holding the normalized transactions.
pub const SALES_TABLE: &str = "sales";

/// Size of every "top N" ranking.
pub const TOP_N: usize = 15;

// -- Input feed columns ------------------------------------------------------

pub const COL_WEIGHT: &str = "FATURA_KG";
pub const COL_REVENUE: &str = "FATURA_RS";
pub const COL_AVG_PRICE: &str = "PRECO_MEDIO";
pub const COL_BONUS: &str = "BONIF_KG";
pub const COL_MONTH_YEAR: &str = "MESANO";
pub const COL_LEGACY_MONTH: &str = "MÊS";
pub const COL_LEGACY_YEAR: &str = "ANO";
pub const COL_FAMILY: &str = "FAMILIA";
pub const COL_STATE: &str = "UF";
pub const COL_COORDINATOR: &str = "COORDENADOR";
pub const COL_REPRESENTATIVE: &str = "REPRESENTANTE";
pub const COL_CLIENT_NAME: &str = "NOME";
pub const COL_CLIENT_CODE: &str = "CLIENTE";
pub const COL_PRODUCT: &str = "PRODUTO";
pub const COL_DESCRIPTION: &str = "DESCRICAO";

pub fn numeric_columns() -> [&'static str; 4] {
    [COL_WEIGHT, COL_REVENUE, COL_AVG_PRICE, COL_BONUS]
}

pub fn text_columns() -> [&'static str; 8] {
    [
        COL_FAMILY,
        COL_STATE,
        COL_COORDINATOR,
        COL_REPRESENTATIVE,
        COL_CLIENT_NAME,
        COL_PRODUCT,
        COL_DESCRIPTION,
        COL_CLIENT_CODE,
    ]
}

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("sales-dashboard")
    } else {
        PathBuf::from(".sales-dashboard-cache")
    }
}

// ---------------------------------------------------------------------------
// DashboardConfig
// ---------------------------------------------------------------------------

/// Settings read from `sales-dashboard.toml`.
///
/// Every key is optional:
///
/// ```toml
/// source = "https://example.com/export.csv"
/// cache_dir = "/var/cache/sales"
/// annotations = "observacoes_clientes.json"
/// offline = false
/// timeout_secs = 120
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source: String,
    pub cache_dir: Option<PathBuf>,
    pub annotations: PathBuf,
    pub offline: bool,
    pub timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            cache_dir: None,
            annotations: PathBuf::from(DEFAULT_ANNOTATIONS_FILE),
            offline: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl DashboardConfig {
    /// Parse a config document.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `sales-dashboard.toml` in the
    /// working directory is used when present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(DashboardError::NotFound(format!(
                        "config file {}",
                        p.display()
                    )));
                }
                tracing::info!("Loading config from {}", p.display());
                Self::from_toml(&fs::read_to_string(p)?)
            }
            None => {
                let local = Path::new(CONFIG_FILE);
                if local.exists() {
                    tracing::info!("Loading config from {}", local.display());
                    Self::from_toml(&fs::read_to_string(local)?)
                } else {
                    tracing::debug!("No {} found, using defaults", CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }
}
