//! Age-aware download and local file cache for card-API responses.
//!
//! The public card database has no version manifest, so freshness is purely
//! age-based: a cached response older than the configured max age is
//! re-downloaded on next access. Individual responses are fetched lazily.

use crate::config;
use crate::error::{Result, RingshelfError};
use reqwest::blocking::Client;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Downloads and caches card-API JSON responses on disk.
///
/// Responses are fetched lazily on first access and re-fetched once their
/// on-disk copy exceeds the max age.
pub struct ApiCache {
    /// Directory where cached files are stored.
    pub cache_dir: PathBuf,
    /// If true, never hit the network (use cached files only).
    pub offline: bool,
    max_age: Duration,
    timeout: Duration,
    client: Option<Client>,
}

impl ApiCache {
    /// Create a new cache.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache
    /// directory. Creates the cache directory if it does not exist.
    pub fn new(
        cache_dir: Option<PathBuf>,
        offline: bool,
        max_age: Duration,
        timeout: Duration,
    ) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            cache_dir: dir,
            offline,
            max_age,
            timeout,
            client: None,
        })
    }

    /// Lazy HTTP client, created on first use.
    pub fn client(&mut self) -> &Client {
        if self.client.is_none() {
            self.client = Some(
                Client::builder()
                    .timeout(self.timeout)
                    .redirect(reqwest::redirect::Policy::limited(10))
                    .build()
                    .expect("failed to build HTTP client"),
            );
        }
        self.client.as_ref().unwrap()
    }

    /// Whether a cached file is past the max age (or missing).
    fn is_stale(&self, path: &Path) -> bool {
        let age = fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|t| SystemTime::now().duration_since(t).ok());
        match age {
            Some(age) => age > self.max_age,
            None => true,
        }
    }

    /// Download one URL to a cache file.
    ///
    /// Downloads to a temp file first and renames on success, so an
    /// interrupted download never leaves a corrupt partial file behind.
    fn download(&mut self, url: &str, dest: &Path) -> Result<()> {
        eprintln!("Downloading {}", url);

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_dest = dest.with_extension("json.tmp");

        let client = self.client().clone();
        let result = (|| -> Result<()> {
            let resp = client.get(url).send()?.error_for_status()?;
            let bytes = resp.bytes()?;
            fs::write(&tmp_dest, &bytes)?;
            fs::rename(&tmp_dest, dest)?;
            Ok(())
        })();

        if result.is_err() {
            // Clean up partial temp file on any error
            let _ = fs::remove_file(&tmp_dest);
        }

        result
    }

    /// Ensure a response is cached locally and fresh, downloading if needed.
    ///
    /// # Arguments
    ///
    /// * `url` - The remote endpoint.
    /// * `file_name` - Cache file name for this response.
    ///
    /// # Returns
    ///
    /// Local filesystem path to the cached file.
    pub fn ensure(&mut self, url: &str, file_name: &str) -> Result<PathBuf> {
        let local_path = self.cache_dir.join(file_name);

        if !local_path.exists() || self.is_stale(&local_path) {
            if self.offline {
                if local_path.exists() {
                    return Ok(local_path);
                }
                return Err(RingshelfError::NotFound(format!(
                    "Response {} not cached and offline mode is enabled",
                    file_name
                )));
            }
            self.download(url, &local_path)?;
        }

        Ok(local_path)
    }

    /// Fetch a URL through the cache and parse it as JSON.
    ///
    /// If the cached file is corrupt (truncated download, disk error), it is
    /// deleted automatically so the next call re-downloads a fresh copy.
    pub fn load_json(&mut self, url: &str, file_name: &str) -> Result<serde_json::Value> {
        let path = self.ensure(url, file_name)?;

        let contents = fs::read_to_string(&path)?;
        match serde_json::from_str(&contents) {
            Ok(value) => Ok(value),
            Err(e) => {
                eprintln!("Corrupt cache file {}: {} -- removing", path.display(), e);
                let _ = fs::remove_file(&path);
                Err(RingshelfError::NotFound(format!(
                    "Cache file '{}' was corrupt and has been removed. \
                     Retry to re-download. Original error: {}",
                    path.file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or("unknown"),
                    e
                )))
            }
        }
    }

    /// Remove all cached files and recreate the cache directory.
    pub fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }

    /// Close the HTTP client, if open.
    pub fn close(&mut self) {
        self.client = None;
    }
}
