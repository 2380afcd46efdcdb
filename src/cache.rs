//! TTL key/value storage for raw API responses.
//!
//! Values are the upstream JSON bodies, stored verbatim. An expired entry and
//! a missing entry look the same to callers.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::error::WidgetError;

const MAX_MEMORY_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    Tweet,
    User,
}

impl CacheKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tweet => "tweet",
            Self::User => "user",
        }
    }
}

/// Namespaced by widget instance so several widgets can share one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub module_id: u64,
    pub kind: CacheKind,
}

impl CacheKey {
    pub fn new(module_id: u64, kind: CacheKind) -> Self {
        Self { module_id, kind }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tweet_display_{}-{}", self.kind.as_str(), self.module_id)
    }
}

pub trait Cache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Result<Option<String>, WidgetError>;
    fn put(&self, key: &CacheKey, raw: &str, ttl: Duration) -> Result<(), WidgetError>;
}

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<CacheKey, (Instant, String)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Result<Option<String>, WidgetError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some((expires, raw)) if Instant::now() < *expires => Ok(Some(raw.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn put(&self, key: &CacheKey, raw: &str, ttl: Duration) -> Result<(), WidgetError> {
        let now = Instant::now();
        // Lifetimes past what `Instant` can represent are kept for ~a century
        let expires = now
            .checked_add(ttl)
            .or_else(|| now.checked_add(MAX_MEMORY_TTL))
            .unwrap_or(now);
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(*key, (expires, raw.to_owned()));
        Ok(())
    }
}

/// One file per key. The first line holds the expiry as unix seconds, the
/// rest is the cached body.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, WidgetError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

impl Cache for FileCache {
    fn get(&self, key: &CacheKey) -> Result<Option<String>, WidgetError> {
        let path = self.path(key);
        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let Some((expires, body)) = contents.split_once('\n') else {
            tracing::warn!(path = %path.display(), "discarding unreadable cache entry");
            fs::remove_file(&path)?;
            return Ok(None);
        };
        match expires.trim().parse::<u64>() {
            Ok(expires) if unix_now() < expires => Ok(Some(body.to_owned())),
            _ => {
                fs::remove_file(&path)?;
                Ok(None)
            }
        }
    }

    fn put(&self, key: &CacheKey, raw: &str, ttl: Duration) -> Result<(), WidgetError> {
        let expires = unix_now().saturating_add(ttl.as_secs());
        let tmp = self.path(key).with_extension("tmp");
        fs::write(&tmp, format!("{}\n{}", expires, raw))?;
        fs::rename(tmp, self.path(key))?;
        Ok(())
    }
}
