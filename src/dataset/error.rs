use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure talking to an upstream climate provider.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response body from {0}")]
    BodyRead(String, #[source] reqwest::Error),
}

/// Failure of a single yearly chunk. These are logged and the year is skipped.
#[derive(Debug, Error)]
pub enum ChunkError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Malformed payload for {year}: {message}")]
    Schema { year: i32, message: String },

    #[error("Failed to parse payload for {year}")]
    Parse {
        year: i32,
        #[source]
        source: PolarsError,
    },

    #[error("Payload for {year} contained no observations")]
    Empty { year: i32 },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl ChunkError {
    /// True for transport-level failures, false for payloads that arrived but could not be used.
    pub fn is_transport(&self) -> bool {
        matches!(self, ChunkError::Fetch(_))
    }
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Invalid date '{0}', expected YYYYMMDD")]
    InvalidDate(String),

    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Coordinate ({lat}, {lon}) is outside [-90, 90] x [-180, 180]")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("At least one variable code is required")]
    EmptyVariableSet,

    #[error("Invalid variable code '{0}', expected letters, digits and underscores")]
    InvalidVariableCode(String),

    #[error("No data could be downloaded for any year in {years:?}")]
    AcquisitionExhausted {
        years: Vec<i32>,
        #[source]
        last_error: Option<Box<ChunkError>>,
    },

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to read cache file '{0}'")]
    CacheRead(PathBuf, #[source] PolarsError),

    #[error("Failed to check cache file '{0}'")]
    CacheProbe(PathBuf, #[source] std::io::Error),

    #[error("I/O error writing cache file '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("Encoding error writing cache file '{0}'")]
    CacheEncode(PathBuf, #[source] PolarsError),

    #[error("Failed processing DataFrame: {0}")]
    Normalize(#[from] PolarsError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl DatasetError {
    /// True when the error stems from caller input rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DatasetError::InvalidDate(_)
                | DatasetError::InvalidDateRange { .. }
                | DatasetError::InvalidCoordinate { .. }
                | DatasetError::EmptyVariableSet
                | DatasetError::InvalidVariableCode(_)
        )
    }
}
