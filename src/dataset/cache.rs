//! Flat-file cache of acquired tables.
//!
//! One CSV file per [`CacheKey`]. A file at the canonical path is a hit, with no
//! expiry and no checksum; stale entries are removed by deleting the file. Files
//! are written to a temporary sibling and renamed into place, so readers never
//! observe a partially written table.

use crate::dataset::error::DatasetError;
use crate::dataset::normalize::coerce_cached;
use crate::types::coordinate::LatLon;
use crate::types::date_range::DateRange;
use crate::types::variable_set::VariableSet;
use log::debug;
use polars::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as SyncMutex, MutexGuard, PoisonError};
use tempfile::NamedTempFile;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::{fs, task};

/// Deterministic identity of a cache entry.
///
/// The coordinate is rounded to four decimals and dates use `YYYYMMDD`, so
/// equivalent requests always produce the same file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    dataset: String,
    lat: String,
    lon: String,
    start: String,
    end: String,
    variables: String,
}

impl CacheKey {
    pub fn new(
        dataset: &str,
        coordinate: LatLon,
        range: &DateRange,
        variables: &VariableSet,
    ) -> Self {
        let (lat, lon) = coordinate.cache_key_parts();
        Self {
            dataset: slug(dataset),
            lat,
            lon,
            start: range.start_key(),
            end: range.end_key(),
            variables: variables.joined("-"),
        }
    }

    /// e.g. `nasa_power_28.5383_-81.3792_20250101_20250105_PRECTOTCORR-T2M-RH2M.csv`
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}_{}.csv",
            self.dataset, self.lat, self.lon, self.start, self.end, self.variables
        )
    }
}

fn slug(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

type LockTable = HashMap<PathBuf, Arc<Mutex<()>>>;

pub struct DatasetCache {
    root: PathBuf,
    // Only held for map lookups, never across an await.
    locks: SyncMutex<LockTable>,
}

/// Exclusive hold on one cache path, from [`DatasetCache::lock`].
///
/// Dropping it (including when the owning future is cancelled) releases the path and
/// forgets its lock entry once nobody else holds or waits on it.
pub struct PathLock<'a> {
    cache: &'a DatasetCache,
    path: PathBuf,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for PathLock<'_> {
    fn drop(&mut self) {
        self.guard.take();
        self.cache.release(&self.path);
    }
}

impl DatasetCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: SyncMutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    /// Loads the table at `path`, or `None` when no file exists there.
    pub async fn load(&self, path: &Path) -> Result<Option<DataFrame>, DatasetError> {
        match fs::try_exists(path).await {
            Ok(true) => {}
            Ok(false) => return Ok(None),
            Err(e) => return Err(DatasetError::CacheProbe(path.to_path_buf(), e)),
        }

        let path_buf = path.to_path_buf();
        let table = task::spawn_blocking(move || {
            let table = CsvReadOptions::default()
                .with_has_header(true)
                .try_into_reader_with_file_path(Some(path_buf.clone()))
                .and_then(|reader| reader.finish())
                .map_err(|e| DatasetError::CacheRead(path_buf.clone(), e))?;
            coerce_cached(table).map_err(|e| DatasetError::CacheRead(path_buf, e))
        })
        .await??;
        Ok(Some(table))
    }

    /// Writes `table` to `path` via a temporary file in the same directory and an atomic rename.
    pub async fn store(&self, path: &Path, mut table: DataFrame) -> Result<(), DatasetError> {
        let path_buf = path.to_path_buf();
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());

        task::spawn_blocking(move || {
            std::fs::create_dir_all(&dir)
                .map_err(|e| DatasetError::CacheDirCreation(dir.clone(), e))?;
            let mut temp = NamedTempFile::new_in(&dir)
                .map_err(|e| DatasetError::CacheWrite(path_buf.clone(), e))?;
            CsvWriter::new(temp.as_file_mut())
                .include_header(true)
                .finish(&mut table)
                .map_err(|e| DatasetError::CacheEncode(path_buf.clone(), e))?;
            temp.persist(&path_buf)
                .map_err(|e| DatasetError::CacheWrite(path_buf.clone(), e.error))?;
            Ok::<(), DatasetError>(())
        })
        .await??;
        Ok(())
    }

    /// Waits for exclusive use of `path`. Held across fetch-and-write so concurrent misses
    /// on one key download once.
    pub async fn lock(&self, path: &Path) -> PathLock<'_> {
        let lock = self
            .lock_table()
            .entry(path.to_path_buf())
            .or_default()
            .clone();
        // A cancelled wait only drops its Arc; the current holder's release cleans up.
        let guard = lock.lock_owned().await;
        PathLock {
            cache: self,
            path: path.to_path_buf(),
            guard: Some(guard),
        }
    }

    fn release(&self, path: &Path) {
        let mut locks = self.lock_table();
        if locks
            .get(path)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            debug!("Dropping idle cache lock for {:?}", path);
            locks.remove(path);
        }
    }

    fn lock_table(&self) -> MutexGuard<'_, LockTable> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    pub(crate) fn tracked_locks(&self) -> usize {
        self.lock_table().len()
    }
}
