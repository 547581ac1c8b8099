//! Answer cache persisted to a single JSON file
//!
//! Provides a `CacheStore` that maps site-qualified question ids to the answers fetched for
//! them, stamped with the time of the fetch so stale entries can be refreshed.

use chrono::{Duration, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

use crate::data::Answer;

/// Time-to-live for cached answers in hours
pub const CACHE_TTL_HOURS: i64 = 24;

/// File name used inside the cache directory
const CACHE_FILE_NAME: &str = "answers.json";

/// Fallback location when no cache directory can be determined
const FALLBACK_CACHE_FILE: &str = "stackfetch-cache.json";

/// Persisted mapping of `site:question_id` key to cache entry
pub type CacheMap = BTreeMap<String, CacheEntry>;

/// Errors that can occur when reading or writing the cache file
#[derive(Debug, Error)]
pub enum CacheError {
    /// Reading or writing the file failed
    #[error("cache I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The file exists but does not contain a valid cache
    #[error("cache file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// All answers fetched for one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// When the answers were fetched, in seconds since the Unix epoch
    pub timestamp: i64,
    /// Answers in ranked order
    pub answers: Vec<Answer>,
}

impl CacheEntry {
    /// Whether the entry is still within `ttl` of `now` (seconds since epoch)
    pub fn is_fresh(&self, now: i64, ttl: Duration) -> bool {
        now - self.timestamp < ttl.num_seconds()
    }
}

/// File-backed answer cache
///
/// The whole mapping is loaded when the store is opened and written back
/// after every `put`. Entries older than the TTL are treated as missing.
#[derive(Debug)]
pub struct CacheStore {
    /// Path of the JSON file
    path: PathBuf,
    /// How long an entry stays valid
    ttl: Duration,
    /// In-memory copy of the persisted mapping
    entries: CacheMap,
}

impl CacheStore {
    /// Opens the cache at `path`, loading whatever valid state it holds
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = Self {
            path: path.into(),
            ttl: Duration::hours(CACHE_TTL_HOURS),
            entries: CacheMap::new(),
        };
        store.entries = store.load();
        store
    }

    /// Returns the XDG-compliant cache file location
    ///
    /// Uses `~/.cache/stackfetch/answers.json` on Linux, or the platform
    /// equivalent. Falls back to a file in the working directory when no home
    /// directory is available.
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "stackfetch")
            .map(|dirs| dirs.cache_dir().join(CACHE_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_CACHE_FILE))
    }

    /// Overrides the time-to-live of entries
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// The in-memory mapping, including expired entries
    pub fn entries(&self) -> &CacheMap {
        &self.entries
    }

    /// Reads the persisted mapping
    ///
    /// A missing file yields an empty mapping. So does an unreadable or
    /// corrupt one, after logging a warning.
    pub fn load(&self) -> CacheMap {
        match self.try_load() {
            Ok(map) => map,
            Err(CacheError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no cache file yet");
                CacheMap::new()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "discarding unusable cache");
                CacheMap::new()
            }
        }
    }

    fn try_load(&self) -> Result<CacheMap, CacheError> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Writes `map` to the cache file, replacing its previous contents
    ///
    /// The data goes to a sibling temporary file first and is then renamed
    /// over the target.
    pub fn save(&self, map: &CacheMap) -> Result<(), CacheError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let json = serde_json::to_string_pretty(map)?;
        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Returns the entry for `key` if it exists and has not expired
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        let now = Utc::now().timestamp();
        self.entries
            .get(key)
            .filter(|entry| entry.is_fresh(now, self.ttl))
    }

    /// Stores `answers` under `key` stamped with the current time and
    /// persists the cache
    ///
    /// Expired entries for other questions are dropped on the way.
    pub fn put(&mut self, key: &str, answers: Vec<Answer>) -> Result<(), CacheError> {
        let now = Utc::now().timestamp();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.is_fresh(now, ttl));
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                timestamp: now,
                answers,
            },
        );
        self.save(&self.entries)
    }
}
