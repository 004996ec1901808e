//! Source location and download cache.
//!
//! A source is either a local CSV file, read in place, or an HTTP(S) URL whose
//! body is downloaded once into the cache directory. The URL a cached copy came
//! from is recorded next to it, so pointing the dashboard at a different URL
//! invalidates the cache.

use crate::config;
use crate::error::{DashboardError, Result};
use reqwest::blocking::Client;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where the sales feed comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    File(PathBuf),
}

impl Source {
    /// Interpret a configured source string.
    ///
    /// Anything starting with `http://` or `https://` is a URL; everything else
    /// is a filesystem path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(trimmed.to_string())
        } else {
            Source::File(PathBuf::from(trimmed))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Source::Url(_))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{}", url),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Locates the sales feed and caches remote copies on disk.
pub struct CacheManager {
    /// Directory holding downloaded sources.
    pub cache_dir: PathBuf,
    /// If true, never download (use an already cached copy only).
    pub offline: bool,
    source: Source,
    timeout: Duration,
    client: Option<Client>,
}

impl CacheManager {
    /// Create a new cache manager.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache directory.
    /// The directory is only created when a download is written into it.
    pub fn new(
        source: Source,
        cache_dir: Option<PathBuf>,
        offline: bool,
        timeout: Duration,
    ) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        Ok(Self {
            cache_dir: dir,
            offline,
            source,
            timeout,
            client: None,
        })
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Lazy HTTP client, created on first use.
    pub fn client(&mut self) -> Result<&Client> {
        if self.client.is_none() {
            self.client = Some(
                Client::builder()
                    .timeout(self.timeout)
                    .redirect(reqwest::redirect::Policy::limited(10))
                    .build()?,
            );
        }
        self.client
            .as_ref()
            .ok_or_else(|| DashboardError::SourceUnavailable("HTTP client unavailable".into()))
    }

    fn cached_path(&self) -> PathBuf {
        self.cache_dir.join(config::CACHED_SOURCE_FILE)
    }

    fn origin_path(&self) -> PathBuf {
        self.cache_dir.join(config::CACHED_ORIGIN_FILE)
    }

    /// URL the cached copy was downloaded from, if any.
    pub fn cached_origin(&self) -> Option<String> {
        fs::read_to_string(self.origin_path())
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Whether a remote source needs to be (re)downloaded.
    ///
    /// Local files are never stale. A URL is stale when nothing is cached or
    /// the cached copy came from a different URL.
    pub fn is_stale(&self) -> bool {
        match &self.source {
            Source::File(_) => false,
            Source::Url(url) => {
                !self.cached_path().exists() || self.cached_origin().as_deref() != Some(url)
            }
        }
    }

    /// Download `url` into `dest`.
    ///
    /// Downloads to a temp file first and renames on success, so an
    /// interrupted download never leaves a corrupt partial file behind.
    fn download_file(&mut self, url: &str, dest: &Path) -> Result<()> {
        tracing::info!("Downloading {}", url);

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_dest = dest.with_extension("csv.tmp");

        let client = self.client()?.clone();
        let result = (|| -> Result<()> {
            let resp = client.get(url).send()?.error_for_status()?;
            let bytes = resp.bytes()?;
            fs::write(&tmp_dest, &bytes)?;
            fs::rename(&tmp_dest, dest)?;
            Ok(())
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp_dest);
        }

        result
    }

    /// Ensure the source is readable locally and return its path.
    ///
    /// Any network or I/O failure surfaces as an error; nothing is retried.
    pub fn ensure_source(&mut self) -> Result<PathBuf> {
        match self.source.clone() {
            Source::File(path) => {
                if path.is_file() {
                    Ok(path)
                } else {
                    Err(DashboardError::SourceUnavailable(format!(
                        "file {} does not exist",
                        path.display()
                    )))
                }
            }
            Source::Url(url) => {
                let local_path = self.cached_path();
                if !self.is_stale() {
                    tracing::debug!("Using cached copy of {}", url);
                    return Ok(local_path);
                }
                if self.offline {
                    return Err(DashboardError::SourceUnavailable(format!(
                        "{} is not cached and offline mode is enabled",
                        url
                    )));
                }
                self.download_file(&url, &local_path).map_err(|e| match e {
                    DashboardError::Http(err) => {
                        DashboardError::SourceUnavailable(format!("{}: {}", url, err))
                    }
                    other => other,
                })?;
                fs::write(self.origin_path(), &url)?;
                Ok(local_path)
            }
        }
    }

    /// Forget the cached copy so the next [`ensure_source`](Self::ensure_source)
    /// downloads again.
    ///
    /// Only files written by this cache are removed.
    pub fn clear(&self) -> Result<()> {
        for path in [self.cached_path(), self.origin_path()] {
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}
