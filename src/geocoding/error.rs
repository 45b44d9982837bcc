use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Location not found: {query}")]
    NotFound { query: String },

    #[error("No geocoding API key configured (set OPENWEATHER_API_KEY)")]
    MissingApiKey,

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode geocoding response from {0}")]
    JsonParse(String, #[source] reqwest::Error),

    #[error("Geocoder returned an out-of-range coordinate ({lat}, {lon}) for '{query}'")]
    InvalidCoordinate { query: String, lat: f64, lon: f64 },
}

impl GeocodeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GeocodeError::NotFound { .. })
    }
}
