//! Breach range cache.
//!
//! Entries hold fetched range tables keyed by digest prefix. The digest of a
//! checked password is never stored.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::is_valid_prefix;
use crate::error::CacheError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub prefix: String,
    pub suffixes: HashMap<String, u64>,
    pub fetched_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl CacheEntry {
    pub fn new(prefix: impl Into<String>, suffixes: HashMap<String, u64>, ttl: Duration) -> Self {
        Self {
            prefix: prefix.into(),
            suffixes,
            fetched_at: Utc::now(),
            ttl,
        }
    }

    /// A TTL too large for chrono never expires.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match chrono::Duration::from_std(self.ttl) {
            Ok(ttl) => now.signed_duration_since(self.fetched_at) < ttl,
            Err(_) => true,
        }
    }

    pub fn count_for(&self, suffix: &str) -> Option<u64> {
        self.suffixes.get(suffix).copied()
    }
}

/// Key-value store for range tables. `put` replaces the entry for its prefix
/// atomically.
pub trait BreachCache: Send + Sync {
    fn get(&self, prefix: &str) -> Result<Option<CacheEntry>, CacheError>;
    fn put(&self, entry: CacheEntry) -> Result<(), CacheError>;
}

/// Process-local cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops expired entries, returning how many were removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now));
        before - entries.len()
    }
}

impl BreachCache for MemoryCache {
    fn get(&self, prefix: &str) -> Result<Option<CacheEntry>, CacheError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(prefix).cloned())
    }

    fn put(&self, entry: CacheEntry) -> Result<(), CacheError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(entry.prefix.clone(), entry);
        Ok(())
    }
}

/// One JSON file per prefix. Writes go to a temp file in the same directory
/// and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, prefix: &str) -> Option<PathBuf> {
        is_valid_prefix(prefix).then(|| self.dir.join(format!("{}.json", prefix)))
    }

    /// Removes expired entry files, returning how many were removed.
    /// Unreadable files are removed too.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, CacheError> {
        let mut removed = 0;
        for dir_entry in std::fs::read_dir(&self.dir)? {
            let path = dir_entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let keep = std::fs::read_to_string(&path)
                .ok()
                .and_then(|raw| serde_json::from_str::<CacheEntry>(&raw).ok())
                .is_some_and(|entry| entry.is_fresh(now));
            if !keep {
                std::fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl BreachCache for FileCache {
    fn get(&self, prefix: &str) -> Result<Option<CacheEntry>, CacheError> {
        let Some(path) = self.entry_path(prefix) else {
            return Ok(None);
        };
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let entry: CacheEntry = serde_json::from_str(&raw)?;
        Ok(Some(entry))
    }

    fn put(&self, entry: CacheEntry) -> Result<(), CacheError> {
        let Some(path) = self.entry_path(&entry.prefix) else {
            return Ok(());
        };
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer(&mut tmp, &entry)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| CacheError::Io(e.error))?;
        Ok(())
    }
}
