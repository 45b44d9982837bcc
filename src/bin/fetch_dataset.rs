//! Downloads the daily dataset for one coordinate (or city) into the cache and prints
//! its metadata and the first rows.
//!
//! ```text
//! fetch_dataset --lat 28.5383 --lon -81.3792 --start 20250101 --end 20250105
//! fetch_dataset --city Denver --state CO --activity hiking
//! ```

use clap::Parser;
use will_it_rain::{
    parse_compact_date, Acquisition, LatLon, Settings, VariableSet, WillItRain, WillItRainError,
};

#[derive(Debug, Parser)]
#[command(
    name = "fetch_dataset",
    version,
    about = "Download a NASA POWER daily dataset into the cache"
)]
struct Args {
    #[arg(long, allow_hyphen_values = true, requires = "lon", conflicts_with = "city")]
    lat: Option<f64>,

    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,

    /// Resolve this city instead of passing a coordinate
    #[arg(long, required_unless_present = "lat")]
    city: Option<String>,

    #[arg(long)]
    state: Option<String>,

    #[arg(long)]
    country: Option<String>,

    /// First day, YYYYMMDD
    #[arg(long, value_parser = parse_date)]
    start: Option<chrono::NaiveDate>,

    /// Last day, YYYYMMDD
    #[arg(long, value_parser = parse_date)]
    end: Option<chrono::NaiveDate>,

    /// Comma-separated variable codes, e.g. T2M,RH2M
    #[arg(long, conflicts_with = "activity")]
    variables: Option<VariableSet>,

    /// Select variables by activity (aliases allowed)
    #[arg(long)]
    activity: Option<String>,

    /// Rows to print
    #[arg(long, default_value_t = 5)]
    head: usize,

    #[command(flatten)]
    settings: Settings,
}

fn parse_date(value: &str) -> Result<chrono::NaiveDate, String> {
    parse_compact_date(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<(), WillItRainError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let client = WillItRain::from_settings(&args.settings).await?;

    let acquisition = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => {
            let variables = match (&args.variables, &args.activity) {
                (Some(variables), _) => Some(variables.clone()),
                (None, Some(activity)) => Some(
                    VariableSet::for_activity(activity)
                        .ok_or_else(|| WillItRainError::UnknownActivity(activity.clone()))?,
                ),
                (None, None) => None,
            };
            client
                .dataset_at()
                .coordinate(LatLon(lat, lon))
                .maybe_start(args.start)
                .maybe_end(args.end)
                .maybe_variables(variables)
                .call()
                .await?
        }
        _ => {
            let city = args.city.as_deref().unwrap_or_default();
            let result = client
                .dataset()
                .city(city)
                .maybe_state(args.state.as_deref())
                .maybe_country(args.country.as_deref())
                .maybe_start(args.start)
                .maybe_end(args.end)
                .maybe_activity(args.activity.as_deref())
                .call()
                .await?;
            println!("Resolved {} to {}", city, result.location.coordinate);
            result.acquisition
        }
    };

    print_summary(&acquisition, args.head);
    Ok(())
}

fn print_summary(acquisition: &Acquisition, head: usize) {
    match serde_json::to_string_pretty(&acquisition.metadata) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Could not render metadata: {e}"),
    }
    println!("{}", acquisition.table.head(Some(head)));
}
