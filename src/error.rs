use crate::dataset::error::DatasetError;
use crate::geocoding::error::GeocodeError;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WillItRainError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error("Unknown activity '{0}'")]
    UnknownActivity(String),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution,

    #[error("Failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("Failed to bind {0}")]
    Bind(SocketAddr, #[source] std::io::Error),

    #[error("Server terminated unexpectedly")]
    Serve(#[source] std::io::Error),
}

impl WillItRainError {
    /// True when the lookup found no place for the requested city.
    pub fn is_not_found(&self) -> bool {
        matches!(self, WillItRainError::Geocode(e) if e.is_not_found())
    }

    /// True when the request itself was invalid (bad dates, unknown activity, ...).
    pub fn is_client_error(&self) -> bool {
        match self {
            WillItRainError::UnknownActivity(_) => true,
            WillItRainError::Dataset(e) => e.is_client_error(),
            _ => false,
        }
    }
}
