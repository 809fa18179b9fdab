use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub position_source_url: String,
    pub poll_interval_seconds: u64,
    pub position_timeout_seconds: u64,
    pub alert_webhook_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let position_source_url =
            env::var("POSITION_SOURCE_URL").map_err(|_| "POSITION_SOURCE_URL is required")?;

        let poll_interval_seconds = env::var("POLL_INTERVAL_SECONDS")
            .map_err(|_| "POLL_INTERVAL_SECONDS is required")?
            .parse::<u64>()
            .map_err(|_| "POLL_INTERVAL_SECONDS must be a valid number")?;
        if poll_interval_seconds == 0 {
            return Err("POLL_INTERVAL_SECONDS must be greater than zero".to_string());
        }

        let position_timeout_seconds = match env::var("POSITION_TIMEOUT_SECONDS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| "POSITION_TIMEOUT_SECONDS must be a valid number")?,
            Err(_) => 5,
        };

        let alert_webhook_url = env::var("ALERT_WEBHOOK_URL").ok();

        Ok(Self {
            position_source_url,
            poll_interval_seconds,
            position_timeout_seconds,
            alert_webhook_url,
        })
    }
}
