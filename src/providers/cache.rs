use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A cached value and when it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cached<T> {
    pub value: T,
    pub stored_at: DateTime<Utc>,
}

impl<T> Cached<T> {
    /// Entries stamped in the future (clock changes) count as fresh.
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        match now.signed_duration_since(self.stored_at).to_std() {
            Ok(age) => age < ttl,
            Err(_) => true,
        }
    }
}

/// JSON files keyed by name, one per provider category.
///
/// The directory is created on first write, so a cache that is only read
/// never touches the filesystem beyond the lookup.
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<cache_dir>/folio` under the platform's per-user cache directory.
    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "folio")
            .ok_or_else(|| anyhow::anyhow!("Could not determine cache directory"))?;
        Ok(Self::new(dirs.cache_dir()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Read an entry. A missing file is `Ok(None)`; a corrupt one is an error.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<Cached<T>>> {
        let path = self.path(key);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };
        let cached = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(cached))
    }

    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.put_at(key, value, Utc::now())
    }

    /// Write an entry with an explicit timestamp.
    pub fn put_at<T: Serialize>(&self, key: &str, value: &T, stored_at: DateTime<Utc>) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.path(key);
        let json = serde_json::to_string(&Cached { value, stored_at })?;
        std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_entry_is_none() {
        let tmp = TempDir::new().unwrap();
        let cache = DiskCache::new(tmp.path().join("nested"));
        let entry: Option<Cached<Vec<String>>> = cache.get("projects").unwrap();
        assert!(entry.is_none());
        assert!(!cache.dir().exists());
    }

    #[test]
    fn stores_value_with_timestamp() {
        let tmp = TempDir::new().unwrap();
        let cache = DiskCache::new(tmp.path());
        let stored_at = Utc::now() - chrono::Duration::hours(2);
        cache.put_at("skills", &vec!["Rust".to_string()], stored_at).unwrap();

        let entry: Cached<Vec<String>> = cache.get("skills").unwrap().unwrap();
        assert_eq!(entry.value, vec!["Rust".to_string()]);
        assert!(entry.is_fresh(Duration::from_secs(24 * 3600), Utc::now()));
        assert!(!entry.is_fresh(Duration::from_secs(3600), Utc::now()));
    }

    #[test]
    fn corrupt_entry_is_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("projects.json"), "not json").unwrap();
        let cache = DiskCache::new(tmp.path());
        assert!(cache.get::<Vec<String>>("projects").is_err());
    }
}
