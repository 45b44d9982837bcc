use crate::catalog::{describe_parameter, Activity};
use crate::geocoding::resolver::ResolvedLocation;
use crate::types::metadata::AcquisitionMetadata;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub app: String,
    pub version: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub debug: bool,
    pub environment: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LocationQuery {
    pub state: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub city: String,
    pub state: Option<String>,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub cached: bool,
}

impl From<ResolvedLocation> for LocationResponse {
    fn from(location: ResolvedLocation) -> Self {
        Self {
            city: location.name,
            state: location.state,
            country: location.country,
            latitude: location.coordinate.latitude(),
            longitude: location.coordinate.longitude(),
            cached: location.cached,
        }
    }
}

/// `/dataset` query string. Dates are `YYYYMMDD`.
#[derive(Debug, Deserialize)]
pub struct DatasetQuery {
    pub city: String,
    pub state: Option<String>,
    pub country: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub activity: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DatasetResponse {
    pub city: String,
    pub state: Option<String>,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(flatten)]
    pub metadata: AcquisitionMetadata,
}

#[derive(Debug, Serialize)]
pub struct ActivitySummary {
    pub name: &'static str,
    pub parameters: &'static [&'static str],
    pub aliases: Vec<&'static str>,
}

impl From<&'static Activity> for ActivitySummary {
    fn from(activity: &'static Activity) -> Self {
        Self {
            name: activity.name,
            parameters: activity.parameters,
            aliases: activity.aliases().collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ParameterInfo {
    pub code: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ActivityDetail {
    /// The name as requested; may be an alias of `name`.
    pub requested: String,
    pub name: &'static str,
    pub parameters: Vec<ParameterInfo>,
    pub aliases: Vec<&'static str>,
}

impl ActivityDetail {
    pub fn new(requested: &str, activity: &'static Activity) -> Self {
        Self {
            requested: requested.to_string(),
            name: activity.name,
            parameters: activity
                .parameters
                .iter()
                .map(|&code| ParameterInfo {
                    code,
                    description: describe_parameter(code),
                })
                .collect(),
            aliases: activity.aliases().collect(),
        }
    }
}
