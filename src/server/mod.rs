//! HTTP surface: health and info endpoints, city lookup, dataset acquisition and the
//! activity catalog.

pub mod error;
pub mod handlers;
pub mod models;

use crate::config::{Settings, APP_VERSION};
use crate::will_it_rain::WillItRain;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Static facts reported by `/` and `/health`.
#[derive(Debug, Clone)]
pub struct AppInfo {
    pub app_name: String,
    pub version: String,
    pub debug: bool,
    pub environment: String,
}

impl AppInfo {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            app_name: settings.app_name.clone(),
            version: APP_VERSION.to_string(),
            debug: settings.debug,
            environment: settings.environment.clone(),
        }
    }
}

pub struct AppState {
    pub client: WillItRain,
    pub info: AppInfo,
}

/// All routes, open to any browser origin.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/location/{city}", get(handlers::location))
        .route("/dataset", get(handlers::dataset))
        .route("/activities", get(handlers::list_activities))
        .route("/activities/{name}", get(handlers::activity))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
