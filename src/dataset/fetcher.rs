//! Upstream climate-data providers.
//!
//! The engine only needs one capability from a provider: return the raw tabular
//! payload for a coordinate, a date span and a list of variables. [`NasaPowerClient`]
//! implements it against the NASA POWER daily point API.

use crate::dataset::error::FetchError;
use crate::types::coordinate::LatLon;
use crate::types::date_range::DateRange;
use crate::types::variable_set::VariableSet;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;

pub const NASA_POWER_DAILY_URL: &str = "https://power.larc.nasa.gov/api/temporal/daily/point";
pub const NASA_POWER_DATASET: &str = "NASA POWER";
pub const DEFAULT_COMMUNITY: &str = "AG";

#[async_trait]
pub trait ClimateProvider: Send + Sync {
    /// Dataset name reported in acquisition metadata.
    fn dataset_name(&self) -> &str;

    /// Fetches the raw CSV payload (preamble included) for one span.
    async fn fetch_daily(
        &self,
        coordinate: LatLon,
        span: &DateRange,
        variables: &VariableSet,
    ) -> Result<String, FetchError>;
}

/// Client for `https://power.larc.nasa.gov/api/temporal/daily/point`.
pub struct NasaPowerClient {
    client: Client,
    base_url: String,
    community: String,
}

impl NasaPowerClient {
    /// Uses `client` for all requests; request timeouts are whatever `client` was built with.
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, NASA_POWER_DAILY_URL)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            community: DEFAULT_COMMUNITY.to_string(),
        }
    }

    /// Overrides the POWER user community (`AG`, `RE` or `SB`).
    pub fn with_community(mut self, community: impl Into<String>) -> Self {
        self.community = community.into();
        self
    }

    fn query(
        &self,
        coordinate: LatLon,
        span: &DateRange,
        variables: &VariableSet,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("parameters", variables.joined(",")),
            ("community", self.community.clone()),
            ("longitude", coordinate.1.to_string()),
            ("latitude", coordinate.0.to_string()),
            ("start", span.start_key()),
            ("end", span.end_key()),
            ("format", "CSV".to_string()),
        ]
    }
}

#[async_trait]
impl ClimateProvider for NasaPowerClient {
    fn dataset_name(&self) -> &str {
        NASA_POWER_DATASET
    }

    async fn fetch_daily(
        &self,
        coordinate: LatLon,
        span: &DateRange,
        variables: &VariableSet,
    ) -> Result<String, FetchError> {
        let url = self.base_url.clone();
        debug!("Requesting {} for {} over {}", url, coordinate, span);

        let response = self
            .client
            .get(&url)
            .query(&self.query(coordinate, span, variables))
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    FetchError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    FetchError::NetworkRequest(url, e)
                });
            }
        };

        response
            .text()
            .await
            .map_err(|e| FetchError::BodyRead(url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_query_parameters() {
        let client = NasaPowerClient::new(Client::new()).with_community("RE");
        let span = DateRange::full_year(2024).unwrap();
        let variables: VariableSet = "PRECTOTCORR,T2M".parse().unwrap();
        let query = client.query(LatLon(39.7392, -104.9903), &span, &variables);

        assert_eq!(
            query,
            vec![
                ("parameters", "PRECTOTCORR,T2M".to_string()),
                ("community", "RE".to_string()),
                ("longitude", "-104.9903".to_string()),
                ("latitude", "39.7392".to_string()),
                ("start", "20240101".to_string()),
                ("end", "20241231".to_string()),
                ("format", "CSV".to_string()),
            ]
        );
        assert_eq!(
            span.start(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }
}
