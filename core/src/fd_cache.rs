//! A read-heavy, write-locked cache of open posting-list file handles.
//!
//! `compute_if_absent` returns the cached handle if present, else invokes the factory exactly
//! once under the writer lock. Eviction is coarse: once the cache holds more than `ceiling`
//! entries, every cached handle is dropped.

use {
    crate::error::QueryError,
    std::{collections::HashMap, path::PathBuf, sync::Arc},
    tokio::{fs::File, sync::RwLock},
};

pub struct FdCache {
    entries: RwLock<HashMap<PathBuf, Arc<File>>>,
    ceiling: usize,
}

impl FdCache {
    pub fn new(ceiling: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ceiling,
        }
    }

    /// Returns the cached handle for `path` if present, else opens it with `factory` and caches
    /// the result. `factory` is invoked at most once per miss, while holding the writer lock, so
    /// two concurrent misses for the same path cannot both open the file — the second caller's
    /// factory result is dropped once it observes the slot already populated.
    pub async fn compute_if_absent<F, Fut>(&self, path: PathBuf, factory: F) -> Result<Arc<File>, QueryError>
    where
        F: FnOnce(PathBuf) -> Fut,
        Fut: std::future::Future<Output = std::io::Result<File>>,
    {
        {
            let entries = self.entries.read().await;
            if let Some(file) = entries.get(&path) {
                return Ok(Arc::clone(file));
            }
        }

        let mut entries = self.entries.write().await;
        if let Some(file) = entries.get(&path) {
            return Ok(Arc::clone(file));
        }

        let file = factory(path.clone()).await.map_err(|source| QueryError::FdCacheOpenFailed {
            path: path.clone(),
            source,
        })?;
        let file = Arc::new(file);

        if entries.len() >= self.ceiling {
            entries.clear();
        }
        entries.insert(path, Arc::clone(&file));
        Ok(file)
    }

    /// The number of handles currently cached.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
