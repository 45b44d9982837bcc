//! Process settings, read from command-line flags with environment-variable fallbacks.

use crate::dataset::fetcher::{DEFAULT_COMMUNITY, NASA_POWER_DAILY_URL};
use crate::dataset::normalize::Preamble;
use crate::geocoding::provider::OPENWEATHER_GEOCODE_URL;
use crate::utils::default_data_dir;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Parser)]
pub struct Settings {
    /// Name reported by the root endpoint
    #[arg(long, env = "APP_NAME", default_value = "Will It Rain")]
    pub app_name: String,

    /// Debug flag echoed by the health endpoint
    #[arg(long, env = "DEBUG")]
    pub debug: bool,

    /// Environment tag echoed by the health endpoint
    #[arg(long = "env", env = "ENV", default_value = "development")]
    pub environment: String,

    /// OpenWeather API key used for geocoding
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub openweather_api_key: Option<String>,

    /// Directory holding cached dataset files
    ///
    /// Defaults to `will_it_rain/raw` under the system cache directory.
    #[arg(long, env = "DATA_DIR", value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8000")]
    pub bind_addr: SocketAddr,

    #[arg(long, env = "POWER_BASE_URL", default_value = NASA_POWER_DAILY_URL)]
    pub power_base_url: String,

    #[arg(long, env = "GEOCODE_BASE_URL", default_value = OPENWEATHER_GEOCODE_URL)]
    pub geocode_base_url: String,

    /// NASA POWER user community (AG, RE or SB)
    #[arg(long, env = "POWER_COMMUNITY", default_value = DEFAULT_COMMUNITY)]
    pub power_community: String,

    /// Timeout for each upstream request, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Skip exactly this many preamble lines instead of looking for the header end marker
    #[arg(long, env = "POWER_PREAMBLE_LINES", value_name = "LINES")]
    pub power_preamble_lines: Option<usize>,
}

impl Settings {
    /// The configured data directory, or the default one under the system cache directory.
    pub fn resolve_data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(default_data_dir)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn preamble(&self) -> Preamble {
        match self.power_preamble_lines {
            Some(lines) => Preamble::Lines(lines),
            None => Preamble::default(),
        }
    }
}
