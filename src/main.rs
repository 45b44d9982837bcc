use clap::Parser;
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;
use will_it_rain::server::{router, AppInfo, AppState};
use will_it_rain::{Settings, WillItRain, WillItRainError};

#[tokio::main]
async fn main() -> Result<(), WillItRainError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::parse();
    if settings.openweather_api_key.is_none() {
        log::warn!("OPENWEATHER_API_KEY is not set; city lookups will fail");
    }

    let client = WillItRain::from_settings(&settings).await?;
    let state = Arc::new(AppState {
        client,
        info: AppInfo::from_settings(&settings),
    });

    let listener = TcpListener::bind(settings.bind_addr)
        .await
        .map_err(|e| WillItRainError::Bind(settings.bind_addr, e))?;
    info!(
        "{} v{} listening on {} ({})",
        settings.app_name,
        will_it_rain::APP_VERSION,
        settings.bind_addr,
        settings.environment
    );

    axum::serve(listener, router(state))
        .await
        .map_err(WillItRainError::Serve)
}
