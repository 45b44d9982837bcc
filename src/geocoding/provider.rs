use crate::geocoding::error::GeocodeError;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const OPENWEATHER_GEOCODE_URL: &str = "http://api.openweathermap.org/geo/1.0/direct";

/// One candidate returned by a geocoding provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoMatch {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
}

#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// Looks up `query` (`city[,state],country`), returning at most `limit` candidates.
    /// An empty vector means no match.
    async fn direct(&self, query: &str, limit: u32) -> Result<Vec<GeoMatch>, GeocodeError>;
}

/// OpenWeather direct geocoding (`/geo/1.0/direct`).
pub struct OpenWeatherGeocoder {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherGeocoder {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self::with_base_url(client, api_key, OPENWEATHER_GEOCODE_URL)
    }

    pub fn with_base_url(
        client: Client,
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }
}

#[async_trait]
impl GeocodeProvider for OpenWeatherGeocoder {
    async fn direct(&self, query: &str, limit: u32) -> Result<Vec<GeoMatch>, GeocodeError> {
        let api_key = self.api_key.as_deref().ok_or(GeocodeError::MissingApiKey)?;
        let url = self.base_url.clone();
        debug!("Geocoding '{}' via {}", query, url);

        let limit = limit.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("limit", limit.as_str()), ("appid", api_key)])
            .send()
            .await
            .map_err(|e| GeocodeError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Geocoding HTTP error for {}: {:?}", url, e.status());
                return Err(if let Some(status) = e.status() {
                    GeocodeError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    GeocodeError::NetworkRequest(url, e)
                });
            }
        };

        response
            .json::<Vec<GeoMatch>>()
            .await
            .map_err(|e| GeocodeError::JsonParse(url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        // Unroutable base URL: reaching the network would surface as NetworkRequest instead.
        let geocoder =
            OpenWeatherGeocoder::with_base_url(Client::new(), None, "http://127.0.0.1:9");
        let err = geocoder.direct("Denver,CO,US", 1).await.unwrap_err();
        assert!(matches!(err, GeocodeError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_blank_key_counts_as_missing() {
        let geocoder = OpenWeatherGeocoder::new(Client::new(), Some("  ".to_string()));
        let err = geocoder.direct("Denver,US", 1).await.unwrap_err();
        assert!(matches!(err, GeocodeError::MissingApiKey));
    }

    #[test]
    fn test_match_deserializes_openweather_shape() {
        let body = r#"[{"name":"Denver","local_names":{"en":"Denver"},"lat":39.7392364,"lon":-104.984862,"country":"US","state":"Colorado"}]"#;
        let matches: Vec<GeoMatch> = serde_json::from_str(body).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Denver");
        assert_eq!(matches[0].state.as_deref(), Some("Colorado"));
    }

    #[test]
    fn test_state_is_optional() {
        let body = r#"[{"name":"Paris","lat":48.8589,"lon":2.32,"country":"FR"}]"#;
        let matches: Vec<GeoMatch> = serde_json::from_str(body).unwrap();
        assert_eq!(matches[0].state, None);
    }
}
