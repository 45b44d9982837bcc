//! Entry point tying the coordinate resolver to the dataset engine.
//!
//! [`WillItRain`] answers "give me the daily history for this city": it resolves the
//! city to a coordinate, picks a variable set (explicit, per activity, or the
//! baseline) and hands the request to the [`DatasetEngine`].

use crate::config::Settings;
use crate::dataset::engine::{Acquisition, DatasetEngine};
use crate::dataset::fetcher::{ClimateProvider, NasaPowerClient};
use crate::error::WillItRainError;
use crate::geocoding::provider::{GeocodeProvider, OpenWeatherGeocoder};
use crate::geocoding::resolver::{CoordinateResolver, ResolvedLocation};
use crate::types::coordinate::LatLon;
use crate::types::variable_set::VariableSet;
use crate::utils::ensure_cache_dir_exists;
use bon::bon;
use chrono::NaiveDate;
use log::info;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;

/// A resolved city together with its acquired dataset.
#[derive(Debug, Clone)]
pub struct CityDataset {
    pub location: ResolvedLocation,
    pub acquisition: Acquisition,
}

pub struct WillItRain {
    resolver: CoordinateResolver,
    engine: DatasetEngine,
}

#[bon]
impl WillItRain {
    /// Creates a client from explicit providers, caching datasets under `cache_folder`.
    ///
    /// # Errors
    ///
    /// Returns [`WillItRainError::CacheDirCreation`] if `cache_folder` cannot be created.
    pub async fn with_providers(
        geocoder: Arc<dyn GeocodeProvider>,
        climate: Arc<dyn ClimateProvider>,
        cache_folder: PathBuf,
    ) -> Result<Self, WillItRainError> {
        Self::assemble(geocoder, climate, cache_folder, None).await
    }

    /// Creates a client talking to OpenWeather and NASA POWER as configured by `settings`.
    ///
    /// # Errors
    ///
    /// * [`WillItRainError::CacheDirResolution`] when no data directory is configured and
    ///   the platform has no cache directory.
    /// * [`WillItRainError::CacheDirCreation`] when the data directory cannot be created.
    /// * [`WillItRainError::HttpClient`] when the HTTP client cannot be built.
    pub async fn from_settings(settings: &Settings) -> Result<Self, WillItRainError> {
        let cache_folder = settings
            .resolve_data_dir()
            .ok_or(WillItRainError::CacheDirResolution)?;
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(WillItRainError::HttpClient)?;

        let geocoder = OpenWeatherGeocoder::with_base_url(
            client.clone(),
            settings.openweather_api_key.clone(),
            settings.geocode_base_url.clone(),
        );
        let climate = NasaPowerClient::with_base_url(client, settings.power_base_url.clone())
            .with_community(settings.power_community.clone());

        Self::assemble(
            Arc::new(geocoder),
            Arc::new(climate),
            cache_folder,
            Some(settings),
        )
        .await
    }

    async fn assemble(
        geocoder: Arc<dyn GeocodeProvider>,
        climate: Arc<dyn ClimateProvider>,
        cache_folder: PathBuf,
        settings: Option<&Settings>,
    ) -> Result<Self, WillItRainError> {
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| WillItRainError::CacheDirCreation(cache_folder.clone(), e))?;
        info!("Caching datasets in {}", cache_folder.display());

        let engine = DatasetEngine::builder()
            .provider(climate)
            .cache_dir(cache_folder)
            .maybe_preamble(settings.map(Settings::preamble))
            .build();
        Ok(Self {
            resolver: CoordinateResolver::new(geocoder),
            engine,
        })
    }

    /// Resolves a city to a coordinate. `country` defaults to `US`.
    #[builder]
    pub async fn locate(
        &self,
        city: &str,
        state: Option<&str>,
        country: Option<&str>,
    ) -> Result<ResolvedLocation, WillItRainError> {
        Ok(self.resolver.resolve(city, state, country).await?)
    }

    /// Acquires the daily dataset for a coordinate.
    #[builder]
    pub async fn dataset_at(
        &self,
        coordinate: LatLon,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        variables: Option<VariableSet>,
    ) -> Result<Acquisition, WillItRainError> {
        Ok(self
            .engine
            .acquire()
            .coordinate(coordinate)
            .maybe_start(start)
            .maybe_end(end)
            .maybe_variables(variables)
            .call()
            .await?)
    }

    /// Resolves `city` and acquires its daily dataset.
    ///
    /// `activity` (aliases allowed) selects that activity's variable set; without it the
    /// engine's baseline set is used.
    ///
    /// # Errors
    ///
    /// * [`WillItRainError::UnknownActivity`] for an activity missing from the catalog.
    ///   Checked before any network call.
    /// * [`WillItRainError::Geocode`] when the city cannot be resolved.
    /// * [`WillItRainError::Dataset`] when acquisition fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use will_it_rain::{Settings, WillItRain, WillItRainError};
    /// # use clap::Parser;
    /// # async fn run() -> Result<(), WillItRainError> {
    /// let settings = Settings::parse();
    /// let client = WillItRain::from_settings(&settings).await?;
    /// let result = client
    ///     .dataset()
    ///     .city("Denver")
    ///     .state("CO")
    ///     .activity("hiking")
    ///     .call()
    ///     .await?;
    /// let metadata = &result.acquisition.metadata;
    /// println!("{} rows in {:?}", metadata.rows, metadata.file_path);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn dataset(
        &self,
        city: &str,
        state: Option<&str>,
        country: Option<&str>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        activity: Option<&str>,
    ) -> Result<CityDataset, WillItRainError> {
        let variables = match activity {
            Some(activity) => Some(
                VariableSet::for_activity(activity)
                    .ok_or_else(|| WillItRainError::UnknownActivity(activity.to_string()))?,
            ),
            None => None,
        };

        let location = self.resolver.resolve(city, state, country).await?;
        let acquisition = self
            .dataset_at()
            .coordinate(location.coordinate)
            .maybe_start(start)
            .maybe_end(end)
            .maybe_variables(variables)
            .call()
            .await?;

        Ok(CityDataset {
            location,
            acquisition,
        })
    }
}
