//! Content-addressed text cache
//!
//! Entries are keyed by the SHA-256 digest of the lookup key. The memory layer
//! lives for one process run; the optional disk layer keeps one file per entry
//! (`<hash>.<name>`) plus an index (`<name>.index`, `hash<TAB>timestamp` lines).
//! Expired entries are pruned only when a cache is opened.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, OpenOptions};
use std::future::Future;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::domain::errors::DomainError;

/// Construction parameters for one named cache
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    pub name: String,
    pub directory: Option<PathBuf>,
    pub expiry: Option<Duration>,
}

impl CacheSettings {
    /// Memory-only cache without expiry
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            directory: None,
            expiry: None,
        }
    }

    /// Persist entries below `directory`; `None` keeps the cache in memory
    pub fn in_directory(mut self, directory: Option<PathBuf>) -> Self {
        self.directory = directory;
        self
    }

    pub fn expiring_after(mut self, expiry: Duration) -> Self {
        self.expiry = Some(expiry);
        self
    }
}

/// Storage identifier of a lookup key
pub fn key_digest(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Two-layer memoizing cache for textual content
#[derive(Debug)]
pub struct ContentCache {
    name: String,
    directory: Option<PathBuf>,
    expiry: Option<Duration>,
    memory: Mutex<HashMap<String, String>>,
    index: Mutex<BTreeMap<String, DateTime<Utc>>>,
}

impl ContentCache {
    /// Open a cache, pruning expired disk entries
    pub fn open(settings: CacheSettings) -> Result<Self, DomainError> {
        Self::open_at(settings, Utc::now())
    }

    /// Open a cache as if the current time were `now`
    pub fn open_at(settings: CacheSettings, now: DateTime<Utc>) -> Result<Self, DomainError> {
        if let Some(dir) = &settings.directory {
            fs::create_dir_all(dir).map_err(|e| {
                DomainError::FsFail(format!(
                    "Failed to create cache directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        let cache = Self {
            name: settings.name,
            directory: settings.directory,
            expiry: settings.expiry,
            memory: Mutex::new(HashMap::new()),
            index: Mutex::new(BTreeMap::new()),
        };
        cache.load_index(now);
        Ok(cache)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_persistent(&self) -> bool {
        self.directory.is_some()
    }

    pub fn index_path(&self) -> Option<PathBuf> {
        self.directory
            .as_ref()
            .map(|dir| dir.join(format!("{}.index", self.name)))
    }

    pub fn entry_path(&self, hash: &str) -> Option<PathBuf> {
        self.directory
            .as_ref()
            .map(|dir| dir.join(format!("{}.{}", hash, self.name)))
    }

    /// Return the content for `key`, calling `fetch` only on a total miss
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<String, DomainError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, DomainError>>,
    {
        let hash = key_digest(key);

        if let Some(content) = self.memory_get(&hash) {
            debug!(cache = %self.name, key, "memory cache hit");
            return Ok(content);
        }

        if let Some(content) = self.disk_get(&hash) {
            debug!(cache = %self.name, key, "file cache hit");
            lock(&self.memory).insert(hash, content.clone());
            return Ok(content);
        }

        debug!(cache = %self.name, key, "total cache miss");
        let content = fetch().await?;
        self.store(&hash, &content, Utc::now());
        lock(&self.memory).insert(hash, content.clone());
        Ok(content)
    }

    /// Overwrite the content for `key` in both layers
    pub fn update(&self, key: &str, content: &str) -> Result<(), DomainError> {
        let hash = key_digest(key);
        lock(&self.memory).insert(hash.clone(), content.to_string());

        let known = lock(&self.index).contains_key(&hash);
        if !known {
            return self.store_checked(&hash, content, Utc::now());
        }
        if let Some(path) = self.entry_path(&hash) {
            fs::write(&path, content).map_err(|e| {
                DomainError::FsFail(format!("Failed to write {}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }

    /// Whether either layer holds `key`
    pub fn contains(&self, key: &str) -> bool {
        let hash = key_digest(key);
        lock(&self.memory).contains_key(&hash) || lock(&self.index).contains_key(&hash)
    }

    /// Rewrite the index file from the entries known to this instance
    pub fn flush(&self) -> Result<(), DomainError> {
        let Some(path) = self.index_path() else {
            return Ok(());
        };
        let text: String = lock(&self.index)
            .iter()
            .map(|(hash, stored)| format!("{}\t{}\n", hash, stored.to_rfc3339()))
            .collect();
        fs::write(&path, text).map_err(|e| {
            DomainError::FsFail(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    fn memory_get(&self, hash: &str) -> Option<String> {
        lock(&self.memory).get(hash).cloned()
    }

    fn disk_get(&self, hash: &str) -> Option<String> {
        if !lock(&self.index).contains_key(hash) {
            return None;
        }
        let path = self.entry_path(hash)?;
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                warn!(
                    cache = %self.name,
                    "file associated with {} not readable ({}), ignoring",
                    hash,
                    e
                );
                None
            }
        }
    }

    fn store(&self, hash: &str, content: &str, now: DateTime<Utc>) {
        if let Err(e) = self.store_checked(hash, content, now) {
            warn!(cache = %self.name, "could not persist entry: {}", e);
        }
    }

    fn store_checked(&self, hash: &str, content: &str, now: DateTime<Utc>) -> Result<(), DomainError> {
        let (Some(entry), Some(index_path)) = (self.entry_path(hash), self.index_path()) else {
            return Ok(());
        };

        fs::write(&entry, content).map_err(|e| {
            DomainError::FsFail(format!("Failed to write {}: {}", entry.display(), e))
        })?;

        let mut index_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&index_path)?;
        writeln!(index_file, "{}\t{}", hash, now.to_rfc3339())?;

        lock(&self.index).insert(hash.to_string(), now);
        Ok(())
    }

    fn load_index(&self, now: DateTime<Utc>) {
        let Some(index_path) = self.index_path() else {
            return;
        };

        let raw = match fs::read_to_string(&index_path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return,
            Err(e) => {
                warn!(cache = %self.name, "could not read cache index: {}", e);
                return;
            }
        };

        let mut kept = BTreeMap::new();
        for line in raw.lines().filter(|l| !l.trim().is_empty()) {
            let Some((hash, stamp)) = line.split_once('\t') else {
                debug!(cache = %self.name, "malformed index line dropped: {}", line);
                continue;
            };
            let Ok(stored) = DateTime::parse_from_rfc3339(stamp.trim()) else {
                debug!(cache = %self.name, "index line with bad timestamp dropped: {}", line);
                continue;
            };
            let stored = stored.with_timezone(&Utc);
            let Some(entry) = self.entry_path(hash) else {
                continue;
            };

            if self.expiry.is_some_and(|period| stored + period < now) {
                debug!(
                    cache = %self.name,
                    "removed expired file {} (stored {}, now {})",
                    entry.display(),
                    stored,
                    now
                );
                let _ = fs::remove_file(&entry);
            } else if entry.is_file() {
                kept.insert(hash.to_string(), stored);
            } else {
                debug!(cache = %self.name, "index entry without file dropped: {}", hash);
            }
        }

        *lock(&self.index) = kept;
        if let Err(e) = self.flush() {
            warn!(cache = %self.name, "could not rewrite cache index: {}", e);
        }
    }
}
