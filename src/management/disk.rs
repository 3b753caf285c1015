use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    io::{Error, ErrorKind},
    path::{Path, PathBuf},
    time::Duration,
};

use serde_json::Value;

use crate::{config, types::CacheEntry};

use super::{MemoryCache, SearchCache};

#[derive(Debug)]
pub enum CacheError {
    IoError(Error),
    SerdeError(serde_json::Error),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::IoError(e) => write!(f, "cache file error: {}", e),
            CacheError::SerdeError(e) => write!(f, "cache file is corrupt: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

impl From<Error> for CacheError {
    fn from(err: Error) -> Self {
        CacheError::IoError(err)
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::SerdeError(err)
    }
}

/// [`SearchCache`] whose entries survive the process in a JSON file.
///
/// Lookups and writes go to memory; [`DiskCache::persist`] writes the
/// fresh entries back to disk.
#[derive(Debug)]
pub struct DiskCache {
    path: PathBuf,
    entries: MemoryCache,
}

impl DiskCache {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            entries: MemoryCache::new(),
        }
    }

    /// Loads the cache stored at `path`. A missing file yields an empty cache.
    pub async fn load(path: PathBuf) -> Result<Self, CacheError> {
        let content = match async_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::new(path)),
            Err(e) => return Err(CacheError::IoError(e)),
        };

        let entries: HashMap<String, CacheEntry> = serde_json::from_str(&content)?;
        Ok(Self {
            path,
            entries: MemoryCache::from_entries(entries),
        })
    }

    /// Writes all entries that are still fresh to disk.
    pub async fn persist(&self) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        self.entries.purge_expired();
        let json = serde_json::to_string_pretty(&self.entries.snapshot())?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Removes every entry and the backing file.
    pub async fn clear(&self) -> Result<(), CacheError> {
        self.entries.clear();
        match async_fs::remove_file(&self.path).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(CacheError::IoError(e)),
            _ => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn default_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/search-cache.json");
        path
    }
}

impl SearchCache for DiskCache {
    fn cached_array_for_key(&self, key: &str) -> Option<Vec<Value>> {
        self.entries.cached_array_for_key(key)
    }

    fn cache_array(
        &self,
        array: &[Value],
        key: &str,
        params: &BTreeMap<String, String>,
        max_age: Duration,
    ) {
        self.entries.cache_array(array, key, params, max_age);
    }
}
