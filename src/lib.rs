mod catalog;
mod config;
mod dataset;
mod error;
mod geocoding;
pub mod server;
mod types;
mod utils;
mod will_it_rain;

#[cfg(test)]
mod test_support;

pub use config::{Settings, APP_VERSION};
pub use error::WillItRainError;
pub use will_it_rain::*;

pub use catalog::{
    activities, canonical_activity, describe_parameter, parameters_for, Activity,
    ACTIVITY_ALIASES, BASELINE_VARIABLES, UNKNOWN_PARAMETER,
};

pub use dataset::cache::{CacheKey, DatasetCache};
pub use dataset::engine::{Acquisition, DatasetEngine};
pub use dataset::error::{ChunkError, DatasetError, FetchError};
pub use dataset::fetcher::{
    ClimateProvider, NasaPowerClient, DEFAULT_COMMUNITY, NASA_POWER_DATASET, NASA_POWER_DAILY_URL,
};
pub use dataset::normalize::{assemble, parse_chunk, Preamble, KEY_COLUMNS, POWER_HEADER_END};

pub use geocoding::error::GeocodeError;
pub use geocoding::provider::{
    GeoMatch, GeocodeProvider, OpenWeatherGeocoder, OPENWEATHER_GEOCODE_URL,
};
pub use geocoding::resolver::{CoordinateResolver, ResolvedLocation, DEFAULT_COUNTRY};

pub use types::coordinate::LatLon;
pub use types::date_range::{format_compact, parse_compact_date, DateRange};
pub use types::metadata::{AcquisitionMetadata, AcquisitionStatus};
pub use types::variable_set::VariableSet;
