use crate::catalog::{activities, canonical_activity};
use crate::error::WillItRainError;
use crate::server::error::{ApiError, LOCATION_NOT_FOUND};
use crate::server::models::{
    ActivityDetail, ActivitySummary, DatasetQuery, DatasetResponse, HealthResponse,
    LocationQuery, LocationResponse, RootResponse,
};
use crate::server::AppState;
use crate::types::date_range::parse_compact_date;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use log::info;
use std::sync::Arc;

pub async fn root(State(state): State<Arc<AppState>>) -> Json<RootResponse> {
    Json(RootResponse {
        app: state.info.app_name.clone(),
        version: state.info.version.clone(),
        message: format!("Welcome to the {} API", state.info.app_name),
    })
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        debug: state.info.debug,
        environment: state.info.environment.clone(),
    })
}

pub async fn location(
    State(state): State<Arc<AppState>>,
    Path(city): Path<String>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<LocationResponse>, ApiError> {
    let located = state
        .client
        .locate()
        .city(&city)
        .maybe_state(non_blank(&query.state))
        .maybe_country(non_blank(&query.country))
        .call()
        .await;

    match located {
        Ok(location) => Ok(Json(location.into())),
        Err(e) if e.is_not_found() => {
            info!("No location for '{}'", city);
            Err(ApiError::not_found(LOCATION_NOT_FOUND).with_city(&city))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn dataset(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DatasetQuery>,
) -> Result<Json<DatasetResponse>, ApiError> {
    let start = parse_optional_date(&query.start)?;
    let end = parse_optional_date(&query.end)?;

    let result = state
        .client
        .dataset()
        .city(&query.city)
        .maybe_state(non_blank(&query.state))
        .maybe_country(non_blank(&query.country))
        .maybe_start(start)
        .maybe_end(end)
        .maybe_activity(non_blank(&query.activity))
        .call()
        .await
        .map_err(|e| ApiError::for_city(e, &query.city))?;

    Ok(Json(DatasetResponse {
        city: result.location.name,
        state: result.location.state,
        country: result.location.country,
        activity: query.activity.filter(|a| !a.trim().is_empty()),
        metadata: result.acquisition.metadata,
    }))
}

pub async fn list_activities() -> Json<Vec<ActivitySummary>> {
    Json(activities().iter().map(ActivitySummary::from).collect())
}

pub async fn activity(Path(name): Path<String>) -> Result<Json<ActivityDetail>, ApiError> {
    canonical_activity(&name)
        .map(|activity| Json(ActivityDetail::new(&name, activity)))
        .ok_or_else(|| ApiError::not_found(format!("Unknown activity: {name}")))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_optional_date(value: &Option<String>) -> Result<Option<NaiveDate>, ApiError> {
    non_blank(value)
        .map(parse_compact_date)
        .transpose()
        .map_err(|e| ApiError::from(WillItRainError::from(e)))
}
