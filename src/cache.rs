use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::{fs, io, path::PathBuf};
use time::{Duration, OffsetDateTime};

use crate::news::{Article, Headlines};

pub const CACHE_KEY: &str = "news-cache";
pub const CACHE_TTL: Duration = Duration::hours(1);

/// Synchronous string store addressed by key.
pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(txt) => Ok(Some(txt)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let path = self.path_for(key);
        // Replace via rename so readers never see a partial value.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("failed to replace {}", path.display()))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub data: Headlines,
    pub timestamp: OffsetDateTime,
}

impl CacheEntry {
    pub fn articles(&self) -> &[Article] {
        &self.data.articles
    }

    pub fn is_fresh_at(&self, now: OffsetDateTime) -> bool {
        now - self.timestamp < CACHE_TTL
    }
}

// On-disk envelope: `{"data": <raw response>, "timestamp": <epoch millis>}`.
#[derive(Serialize, Deserialize)]
struct Envelope {
    data: Headlines,
    timestamp: i64,
}

/// The single cached headlines snapshot.
#[derive(Clone)]
pub struct CacheStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl CacheStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: CACHE_KEY.to_string(),
        }
    }

    /// Snapshot younger than the TTL, if any.
    pub fn get(&self) -> Option<CacheEntry> {
        self.get_at(OffsetDateTime::now_utc())
    }

    pub fn get_at(&self, now: OffsetDateTime) -> Option<CacheEntry> {
        let entry = self.load()?;
        if entry.is_fresh_at(now) {
            tracing::debug!(cached_at = %entry.timestamp, "cache hit");
            Some(entry)
        } else {
            tracing::debug!(cached_at = %entry.timestamp, "cache entry expired");
            None
        }
    }

    /// Last snapshot regardless of age.
    pub fn get_stale(&self) -> Option<CacheEntry> {
        self.load()
    }

    pub fn put(&self, data: &Headlines) -> Result<()> {
        self.put_at(data, OffsetDateTime::now_utc())
    }

    pub fn put_at(&self, data: &Headlines, now: OffsetDateTime) -> Result<()> {
        let envelope = Envelope {
            data: data.clone(),
            timestamp: to_millis(now),
        };
        let json = serde_json::to_string(&envelope)?;
        self.store.write(&self.key, &json)?;
        tracing::debug!(articles = data.articles.len(), "cache updated");
        Ok(())
    }

    // Unreadable or corrupt snapshots count as absent.
    fn load(&self) -> Option<CacheEntry> {
        let raw = match self.store.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "ignoring unreadable cache");
                return None;
            }
        };
        let envelope: Envelope = match serde_json::from_str(&raw) {
            Ok(env) => env,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring corrupt cache");
                return None;
            }
        };
        let Some(timestamp) = from_millis(envelope.timestamp) else {
            tracing::warn!(timestamp = envelope.timestamp, "ignoring cache with invalid timestamp");
            return None;
        };
        Some(CacheEntry {
            data: envelope.data,
            timestamp,
        })
    }
}

fn to_millis(t: OffsetDateTime) -> i64 {
    (t.unix_timestamp_nanos() / 1_000_000) as i64
}

fn from_millis(ms: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000).ok()
}
