//! In-process stand-ins for the upstream providers, counting every call they receive.

use crate::dataset::error::FetchError;
use crate::dataset::fetcher::ClimateProvider;
use crate::geocoding::error::GeocodeError;
use crate::geocoding::provider::{GeoMatch, GeocodeProvider};
use crate::types::coordinate::LatLon;
use crate::types::date_range::DateRange;
use crate::types::variable_set::VariableSet;
use async_trait::async_trait;
use chrono::Datelike;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

const STUB_URL: &str = "http://stub.invalid/";

/// A real `reqwest::Error` carrying `status`, as produced by `error_for_status`.
pub(crate) fn status_error(status: u16) -> reqwest::Error {
    let response = axum::http::Response::builder()
        .status(status)
        .body("")
        .unwrap();
    reqwest::Response::from(response)
        .error_for_status()
        .unwrap_err()
}

/// A `reqwest::Error` that never got a response, standing in for timeouts and
/// connection failures.
pub(crate) fn transport_error() -> reqwest::Error {
    reqwest::Client::new()
        .get("not a url")
        .build()
        .unwrap_err()
}

#[derive(Debug, Clone)]
pub(crate) enum StubResponse {
    Body(String),
    Status(u16),
    /// The request fails before any response arrives.
    Transport,
    /// The request never completes.
    Hang,
}

impl StubResponse {
    pub(crate) fn csv(body: &str) -> Self {
        StubResponse::Body(body.to_string())
    }
}

/// Climate provider answering per year. Years without a configured answer get a 404.
#[derive(Default)]
pub(crate) struct StubClimateProvider {
    responses: HashMap<i32, StubResponse>,
    calls: AtomicUsize,
    requested_years: Mutex<Vec<i32>>,
    last_variables: Mutex<Option<String>>,
}

impl StubClimateProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn year(mut self, year: i32, response: StubResponse) -> Self {
        self.responses.insert(year, response);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requested_years(&self) -> Vec<i32> {
        self.requested_years.lock().unwrap().clone()
    }

    pub(crate) fn last_variables(&self) -> Option<String> {
        self.last_variables.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClimateProvider for StubClimateProvider {
    fn dataset_name(&self) -> &str {
        "NASA POWER"
    }

    async fn fetch_daily(
        &self,
        _coordinate: LatLon,
        span: &DateRange,
        variables: &VariableSet,
    ) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let year = span.start().year();
        self.requested_years.lock().unwrap().push(year);
        *self.last_variables.lock().unwrap() = Some(variables.joined(","));

        match self.responses.get(&year).cloned().unwrap_or(StubResponse::Status(404)) {
            StubResponse::Body(body) => Ok(body),
            StubResponse::Transport => Err(FetchError::NetworkRequest(
                STUB_URL.to_string(),
                transport_error(),
            )),
            StubResponse::Hang => std::future::pending().await,
            StubResponse::Status(status) => {
                let source = status_error(status);
                Err(FetchError::HttpStatus {
                    url: STUB_URL.to_string(),
                    status: source.status().unwrap(),
                    source,
                })
            }
        }
    }
}

pub(crate) fn geo_match(name: &str, lat: f64, lon: f64) -> GeoMatch {
    GeoMatch {
        name: name.to_string(),
        lat,
        lon,
        country: "US".to_string(),
        state: None,
    }
}

/// Geocoder answering from a fixed table keyed by query. Unknown queries yield no match.
#[derive(Default)]
pub(crate) struct StubGeocoder {
    matches: HashMap<String, GeoMatch>,
    fail: bool,
    calls: AtomicUsize,
}

impl StubGeocoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, query: &str, found: GeoMatch) -> Self {
        self.matches.insert(query.to_string(), found);
        self
    }

    /// Every lookup fails with an upstream 503.
    pub(crate) fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeocodeProvider for StubGeocoder {
    async fn direct(&self, query: &str, _limit: u32) -> Result<Vec<GeoMatch>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            let source = status_error(503);
            return Err(GeocodeError::HttpStatus {
                url: STUB_URL.to_string(),
                status: source.status().unwrap(),
                source,
            });
        }
        Ok(self.matches.get(query).cloned().into_iter().collect())
    }
}
