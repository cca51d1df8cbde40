// ABOUTME: Daily on-disk cache of provider results.
// ABOUTME: Stores one JSON file per provider per fetch day so reruns on the same day skip the network.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{KinopyError, Result};
use crate::models::ShowingsByDate;

/// Directory of per-provider daily cache files.
#[derive(Debug, Clone)]
pub struct DailyCache {
    root: PathBuf,
}

impl DailyCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Location of the cache file for `key` written on `day`.
    pub fn path_for(&self, key: &str, day: NaiveDate) -> PathBuf {
        self.root
            .join(key)
            .join(format!("{}_{}.json", key, day.format("%Y-%m-%d")))
    }

    /// Reads cached showings for `key` written on `day`, if any.
    pub fn load(&self, key: &str, day: NaiveDate) -> Result<Option<ShowingsByDate>> {
        let path = self.path_for(key, day);
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path).map_err(|source| KinopyError::CacheIo {
            path: path.clone(),
            source,
        })?;
        let shows = serde_json::from_str(&text)
            .map_err(|source| KinopyError::CacheDecode { path, source })?;
        Ok(Some(shows))
    }

    pub fn store(&self, key: &str, day: NaiveDate, shows: &ShowingsByDate) -> Result<()> {
        let path = self.path_for(key, day);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| KinopyError::CacheIo {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let text = serde_json::to_string(shows)
            .map_err(|source| KinopyError::CacheDecode {
                path: path.clone(),
                source,
            })?;
        fs::write(&path, text).map_err(|source| KinopyError::CacheIo { path, source })
    }

    /// Returns the cached value for today, or runs `fetch` and caches its result.
    /// Failed fetches are not cached.
    pub fn load_or_fetch<F>(&self, key: &str, today: NaiveDate, fetch: F) -> Result<ShowingsByDate>
    where
        F: FnOnce() -> Result<ShowingsByDate>,
    {
        if let Some(shows) = self.load(key, today)? {
            debug!(key, "using cached showings");
            return Ok(shows);
        }
        let shows = fetch()?;
        self.store(key, today, &shows)?;
        info!(key, days = shows.len(), "cached fresh showings");
        Ok(shows)
    }

    /// Removes the cache file for `key` written on `day`. A missing file is fine.
    pub fn clear(&self, key: &str, day: NaiveDate) -> Result<()> {
        let path = self.path_for(key, day);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(KinopyError::CacheIo { path, source }),
        }
    }
}
