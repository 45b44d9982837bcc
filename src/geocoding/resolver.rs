//! Memoizing city resolver.
//!
//! Lookups are memoized per `(query, limit)` for the lifetime of the resolver. The memo
//! is bounded; once full, the oldest entry is evicted. Empty provider answers are
//! memoized like any other answer, provider errors are not.

use crate::geocoding::error::GeocodeError;
use crate::geocoding::provider::{GeoMatch, GeocodeProvider};
use crate::types::coordinate::LatLon;
use log::{debug, info};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const DEFAULT_COUNTRY: &str = "US";
pub const DEFAULT_MEMO_CAPACITY: usize = 128;
const RESULT_LIMIT: u32 = 1;

type MemoKey = (String, u32);

/// A city resolved to a coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLocation {
    /// Place name as reported by the provider.
    pub name: String,
    pub state: Option<String>,
    pub country: String,
    pub coordinate: LatLon,
    /// Whether the answer came from the memo rather than the provider.
    pub cached: bool,
}

struct Memo {
    entries: HashMap<MemoKey, Vec<GeoMatch>>,
    order: VecDeque<MemoKey>,
    capacity: usize,
}

impl Memo {
    fn insert(&mut self, key: MemoKey, matches: Vec<GeoMatch>) -> Vec<GeoMatch> {
        match self.entries.entry(key.clone()) {
            // Filled by a concurrent lookup while ours was in flight; keep the first answer.
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                entry.insert(matches.clone());
                self.order.push_back(key);
                while self.order.len() > self.capacity {
                    if let Some(oldest) = self.order.pop_front() {
                        debug!("Evicting geocode memo entry '{}'", oldest.0);
                        self.entries.remove(&oldest);
                    }
                }
                matches
            }
        }
    }
}

pub struct CoordinateResolver {
    provider: Arc<dyn GeocodeProvider>,
    memo: Mutex<Memo>,
}

impl CoordinateResolver {
    pub fn new(provider: Arc<dyn GeocodeProvider>) -> Self {
        Self::with_capacity(provider, DEFAULT_MEMO_CAPACITY)
    }

    pub fn with_capacity(provider: Arc<dyn GeocodeProvider>, capacity: usize) -> Self {
        Self {
            provider,
            memo: Mutex::new(Memo {
                entries: HashMap::new(),
                order: VecDeque::new(),
                capacity: capacity.max(1),
            }),
        }
    }

    /// Builds the provider query: `city,state,country` or `city,country` without a state.
    pub fn query_for(city: &str, state: Option<&str>, country: &str) -> String {
        match state.map(str::trim).filter(|s| !s.is_empty()) {
            Some(state) => format!("{},{},{}", city.trim(), state, country.trim()),
            None => format!("{},{}", city.trim(), country.trim()),
        }
    }

    /// Resolves `city` to a coordinate. `country` defaults to `US`.
    ///
    /// # Errors
    ///
    /// [`GeocodeError::NotFound`] when the provider has no match, or the provider's
    /// own error when the lookup fails.
    pub async fn resolve(
        &self,
        city: &str,
        state: Option<&str>,
        country: Option<&str>,
    ) -> Result<ResolvedLocation, GeocodeError> {
        let query = Self::query_for(city, state, country.unwrap_or(DEFAULT_COUNTRY));
        let (matches, cached) = self.lookup(&query, RESULT_LIMIT).await?;

        let Some(first) = matches.into_iter().next() else {
            info!("No geocoding match for '{}'", query);
            return Err(GeocodeError::NotFound { query });
        };

        let coordinate =
            LatLon::try_new(first.lat, first.lon).ok_or_else(|| GeocodeError::InvalidCoordinate {
                query: query.clone(),
                lat: first.lat,
                lon: first.lon,
            })?;

        Ok(ResolvedLocation {
            name: first.name,
            state: state.map(str::to_string).or(first.state),
            country: first.country,
            coordinate,
            cached,
        })
    }

    async fn lookup(&self, query: &str, limit: u32) -> Result<(Vec<GeoMatch>, bool), GeocodeError> {
        let key = (query.to_string(), limit);
        {
            let memo = self.memo.lock().await;
            if let Some(matches) = memo.entries.get(&key) {
                debug!("Geocode memo hit for '{}'", query);
                return Ok((matches.clone(), true));
            }
        }

        let matches = self.provider.direct(query, limit).await?;

        let mut memo = self.memo.lock().await;
        Ok((memo.insert(key, matches), false))
    }

    pub async fn memo_len(&self) -> usize {
        self.memo.lock().await.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{geo_match, StubGeocoder};

    #[test]
    fn test_query_shapes() {
        assert_eq!(
            CoordinateResolver::query_for("Denver", Some("CO"), "US"),
            "Denver,CO,US"
        );
        assert_eq!(CoordinateResolver::query_for("Paris", None, "FR"), "Paris,FR");
        assert_eq!(CoordinateResolver::query_for("Paris", Some(" "), "FR"), "Paris,FR");
    }

    #[tokio::test]
    async fn test_repeated_lookup_hits_memo() {
        let provider = Arc::new(
            StubGeocoder::new().with("Denver,CO,US", geo_match("Denver", 39.7392, -104.9903)),
        );
        let resolver = CoordinateResolver::new(provider.clone());

        let first = resolver.resolve("Denver", Some("CO"), None).await.unwrap();
        let second = resolver.resolve("Denver", Some("CO"), None).await.unwrap();

        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(first.coordinate, LatLon(39.7392, -104.9903));
        assert_eq!(first.state.as_deref(), Some("CO"));
        assert_eq!(first.country, "US");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_no_match_is_not_found_and_memoized() {
        let provider = Arc::new(StubGeocoder::new());
        let resolver = CoordinateResolver::new(provider.clone());

        for _ in 0..2 {
            let err = resolver.resolve("Atlantis", None, None).await.unwrap_err();
            match err {
                GeocodeError::NotFound { query } => assert_eq!(query, "Atlantis,US"),
                other => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_memoized() {
        let provider = Arc::new(StubGeocoder::new().failing());
        let resolver = CoordinateResolver::new(provider.clone());

        assert!(resolver.resolve("Denver", None, None).await.is_err());
        assert!(resolver.resolve("Denver", None, None).await.is_err());
        assert_eq!(provider.calls(), 2);
        assert_eq!(resolver.memo_len().await, 0);
    }

    #[tokio::test]
    async fn test_memo_evicts_oldest() {
        let provider = Arc::new(
            StubGeocoder::new()
                .with("A,US", geo_match("A", 1.0, 1.0))
                .with("B,US", geo_match("B", 2.0, 2.0))
                .with("C,US", geo_match("C", 3.0, 3.0)),
        );
        let resolver = CoordinateResolver::with_capacity(provider.clone(), 2);

        resolver.resolve("A", None, None).await.unwrap();
        resolver.resolve("B", None, None).await.unwrap();
        resolver.resolve("C", None, None).await.unwrap();
        assert_eq!(resolver.memo_len().await, 2);

        // B is still memoized, A was evicted.
        assert!(resolver.resolve("B", None, None).await.unwrap().cached);
        assert!(!resolver.resolve("A", None, None).await.unwrap().cached);
        assert_eq!(provider.calls(), 4);
    }

    #[tokio::test]
    async fn test_out_of_range_coordinate_is_rejected() {
        let provider =
            Arc::new(StubGeocoder::new().with("Nowhere,US", geo_match("Nowhere", 123.0, 0.0)));
        let resolver = CoordinateResolver::new(provider);
        let err = resolver.resolve("Nowhere", None, None).await.unwrap_err();
        assert!(matches!(err, GeocodeError::InvalidCoordinate { .. }));
    }
}
