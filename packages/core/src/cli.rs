use clap::Parser;

/// Arrival alarm CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "arrival-alarm",
    version,
    about = "Wakes you up when your device enters the radius around a destination"
)]
pub struct Cli {
    /// Destination latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub dest_lat: f64,

    /// Destination longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub dest_lon: f64,

    /// Alert radius around the destination in meters
    #[arg(long, default_value_t = 500.0)]
    pub radius: f64,

    /// Identifier for the destination geofence
    #[arg(long, default_value = "destination")]
    pub dest_id: String,

    /// Position source base URL (overrides POSITION_SOURCE_URL)
    #[arg(long)]
    pub position_url: Option<String>,

    /// Evaluation interval in seconds (overrides POLL_INTERVAL_SECONDS)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval: Option<u64>,
}
