//! The dataset acquisition engine: coordinate + date range in, normalised table out.
//!
//! A request is answered from the disk cache when a file for its key exists.
//! Otherwise the range is split into calendar years, each year is fetched from the
//! provider in order, failed years are skipped, and the surviving tables are
//! concatenated, normalised and written to the cache.

use crate::dataset::cache::{CacheKey, DatasetCache};
use crate::dataset::error::{ChunkError, DatasetError};
use crate::dataset::fetcher::ClimateProvider;
use crate::dataset::normalize::{assemble, parse_chunk, Preamble};
use crate::types::coordinate::LatLon;
use crate::types::date_range::DateRange;
use crate::types::metadata::{AcquisitionMetadata, AcquisitionStatus};
use crate::types::variable_set::VariableSet;
use bon::bon;
use chrono::NaiveDate;
use log::{info, warn};
use polars::frame::DataFrame;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task;

/// Result of [`DatasetEngine::acquire`].
#[derive(Debug, Clone)]
pub struct Acquisition {
    pub metadata: AcquisitionMetadata,
    pub table: DataFrame,
}

/// Per-year tables that made it through, plus the years that did not.
struct ChunkOutcome {
    tables: Vec<DataFrame>,
    skipped_years: Vec<i32>,
    last_error: Option<ChunkError>,
}

pub struct DatasetEngine {
    provider: Arc<dyn ClimateProvider>,
    cache: DatasetCache,
    default_variables: VariableSet,
    preamble: Preamble,
}

#[bon]
impl DatasetEngine {
    /// Creates an engine that caches under `cache_dir`.
    ///
    /// `default_variables` falls back to [`VariableSet::baseline`], `preamble` to the
    /// NASA POWER header marker.
    #[builder]
    pub fn new(
        provider: Arc<dyn ClimateProvider>,
        #[builder(into)] cache_dir: PathBuf,
        default_variables: Option<VariableSet>,
        preamble: Option<Preamble>,
    ) -> Self {
        Self {
            provider,
            cache: DatasetCache::new(cache_dir),
            default_variables: default_variables.unwrap_or_default(),
            preamble: preamble.unwrap_or_default(),
        }
    }

    /// Canonical cache file for a request. Exposed so callers can inspect or evict entries.
    pub fn cache_path(
        &self,
        coordinate: LatLon,
        range: &DateRange,
        variables: &VariableSet,
    ) -> PathBuf {
        self.cache.path_for(&CacheKey::new(
            self.provider.dataset_name(),
            coordinate,
            range,
            variables,
        ))
    }

    /// Produces the daily table for `coordinate` between `start` and `end` (inclusive).
    ///
    /// Missing bounds default to January 1st of the previous year and today (UTC).
    /// `variables` defaults to the engine's default set.
    ///
    /// # Errors
    ///
    /// * [`DatasetError::InvalidCoordinate`] if `coordinate` is out of range or not finite.
    /// * [`DatasetError::InvalidDateRange`] if `start > end`.
    /// * [`DatasetError::AcquisitionExhausted`] if every yearly chunk failed; nothing is cached.
    /// * Cache read/write errors, which are fatal.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use will_it_rain::{DatasetEngine, NasaPowerClient, LatLon, DatasetError};
    /// # use chrono::NaiveDate;
    /// # use std::sync::Arc;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), DatasetError> {
    /// let engine = DatasetEngine::builder()
    ///     .provider(Arc::new(NasaPowerClient::new(reqwest::Client::new())))
    ///     .cache_dir("data/raw")
    ///     .build();
    ///
    /// let acquisition = engine
    ///     .acquire()
    ///     .coordinate(LatLon(28.5383, -81.3792))
    ///     .start(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
    ///     .end(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap())
    ///     .call()
    ///     .await?;
    /// println!("{} rows, status {}", acquisition.metadata.rows, acquisition.metadata.status);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn acquire(
        &self,
        coordinate: LatLon,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        variables: Option<VariableSet>,
    ) -> Result<Acquisition, DatasetError> {
        let Some(coordinate) = LatLon::try_new(coordinate.0, coordinate.1) else {
            return Err(DatasetError::InvalidCoordinate {
                lat: coordinate.0,
                lon: coordinate.1,
            });
        };
        let range = DateRange::resolve_today(start, end)?;
        let variables = variables.unwrap_or_else(|| self.default_variables.clone());
        let path = self.cache_path(coordinate, &range, &variables);

        if let Some(acquisition) = self.from_cache(coordinate, &range, &path).await? {
            return Ok(acquisition);
        }

        let _lock = self.cache.lock(&path).await;
        self.download_locked(coordinate, &range, &variables, &path).await
    }

    async fn download_locked(
        &self,
        coordinate: LatLon,
        range: &DateRange,
        variables: &VariableSet,
        path: &Path,
    ) -> Result<Acquisition, DatasetError> {
        // Another task may have filled the entry while we waited on the lock.
        if let Some(acquisition) = self.from_cache(coordinate, range, path).await? {
            return Ok(acquisition);
        }

        warn!(
            "Cache miss for {} over {}. Downloading {} year(s).",
            coordinate,
            range,
            range.years().count()
        );

        let outcome = self.fetch_chunks(coordinate, range, variables).await;
        if outcome.tables.is_empty() {
            return Err(DatasetError::AcquisitionExhausted {
                years: range.years().collect(),
                last_error: outcome.last_error.map(Box::new),
            });
        }

        let tables = outcome.tables;
        let variables_owned = variables.clone();
        let table = task::spawn_blocking(move || assemble(tables, &variables_owned)).await??;

        self.cache.store(path, table.clone()).await?;
        info!(
            "Cached {} rows for {} over {} to {:?}",
            table.height(),
            coordinate,
            range,
            path
        );

        let status = if outcome.skipped_years.is_empty() {
            AcquisitionStatus::Downloaded
        } else {
            AcquisitionStatus::PartiallyDownloaded
        };
        Ok(Acquisition {
            metadata: AcquisitionMetadata::describe(
                self.provider.dataset_name(),
                coordinate,
                range,
                &table,
                path.to_path_buf(),
                status,
                outcome.skipped_years,
            ),
            table,
        })
    }

    async fn from_cache(
        &self,
        coordinate: LatLon,
        range: &DateRange,
        path: &Path,
    ) -> Result<Option<Acquisition>, DatasetError> {
        let Some(table) = self.cache.load(path).await? else {
            return Ok(None);
        };
        info!("Cache hit for {} over {} at {:?}", coordinate, range, path);
        Ok(Some(Acquisition {
            metadata: AcquisitionMetadata::describe(
                self.provider.dataset_name(),
                coordinate,
                range,
                &table,
                path.to_path_buf(),
                AcquisitionStatus::Cached,
                Vec::new(),
            ),
            table,
        }))
    }

    /// Fetches each year sequentially; a failed year is logged and skipped.
    async fn fetch_chunks(
        &self,
        coordinate: LatLon,
        range: &DateRange,
        variables: &VariableSet,
    ) -> ChunkOutcome {
        let mut outcome = ChunkOutcome {
            tables: Vec::new(),
            skipped_years: Vec::new(),
            last_error: None,
        };

        for (year, span) in range.year_spans() {
            match self.fetch_year(coordinate, year, &span, variables).await {
                Ok(table) => {
                    info!("Fetched {} rows for {} in {}", table.height(), coordinate, year);
                    outcome.tables.push(table);
                }
                Err(e) => {
                    warn!("Skipping {} for {}: {}", year, coordinate, e);
                    outcome.skipped_years.push(year);
                    outcome.last_error = Some(e);
                }
            }
        }
        outcome
    }

    async fn fetch_year(
        &self,
        coordinate: LatLon,
        year: i32,
        span: &DateRange,
        variables: &VariableSet,
    ) -> Result<DataFrame, ChunkError> {
        let payload = self
            .provider
            .fetch_daily(coordinate, span, variables)
            .await?;
        let preamble = self.preamble.clone();
        let variables = variables.clone();
        task::spawn_blocking(move || parse_chunk(&payload, &preamble, year, &variables)).await?
    }
}
