use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use dotenvy::dotenv;

use arrival_alarm::alerts::log_alert::LogAlertDispatcher;
use arrival_alarm::alerts::webhook::WebhookAlertDispatcher;
use arrival_alarm::cli::Cli;
use arrival_alarm::config::Config;
use arrival_alarm::error::AppError;
use arrival_alarm::geofence::dispatcher::AlertDispatcher;
use arrival_alarm::geofence::{Coordinates, EngineConfig, Geofence, GeofenceEngine};
use arrival_alarm::logging::init_logging;
use arrival_alarm::metrics::AppMetrics;
use arrival_alarm::services::http_position::HttpPositionSource;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    let config = Config::from_env()
        .map_err(AppError::Config)
        .unwrap_or_else(|err| {
            tracing::error!("{}", err);
            std::process::exit(1);
        });

    // CLI flags override env config.
    let position_url = cli
        .position_url
        .clone()
        .unwrap_or_else(|| config.position_source_url.clone());
    let poll_interval_seconds = cli.poll_interval.unwrap_or(config.poll_interval_seconds);

    let engine_config = EngineConfig {
        poll_interval: Duration::from_secs(poll_interval_seconds),
        position_timeout: Duration::from_secs(config.position_timeout_seconds),
        ..EngineConfig::default()
    };

    let metrics = Arc::new(AppMetrics::new().unwrap_or_else(|err| {
        tracing::error!("Failed to register metrics: {}", err);
        std::process::exit(1);
    }));

    let position_source = Arc::new(HttpPositionSource::new(position_url));
    let dispatcher: Arc<dyn AlertDispatcher + Send + Sync> = match &config.alert_webhook_url {
        Some(url) => Arc::new(WebhookAlertDispatcher::new(url.clone())),
        None => Arc::new(LogAlertDispatcher::new()),
    };

    let engine = GeofenceEngine::new(engine_config, position_source, dispatcher, metrics.clone());

    let destination = Geofence {
        id: cli.dest_id.clone(),
        center: Coordinates::new(cli.dest_lat, cli.dest_lon),
        radius_m: cli.radius,
    };

    if let Err(err) = engine.add_geofence(destination).await {
        tracing::error!("{}", AppError::Geofence(err.to_string()));
        std::process::exit(1);
    }

    tracing::info!(
        "Arrival alarm armed for '{}' ({:.0} m radius around {:.4}, {:.4})",
        cli.dest_id,
        cli.radius,
        cli.dest_lat,
        cli.dest_lon
    );

    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
    }

    tracing::info!("Shutdown signal received. Stopping monitoring.");
    engine.shutdown().await;

    if let Ok(snapshot) = metrics.render() {
        tracing::debug!("Final metrics:\n{}", snapshot);
    }
}
