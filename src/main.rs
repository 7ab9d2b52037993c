//! Member portal client.
//!
//! Loads configuration (first argument, optional), boots the navigator at the
//! configured start location and prints the committed state summary as JSON.

use std::path::Path;

use member_portal::config::{load_config, ClientConfig};
use member_portal::lifecycle;
use member_portal::navigation::NavigationOutcome;
use member_portal::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => ClientConfig::default(),
    };

    logging::init(&config.observability);
    tracing::info!("member-portal v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        base_url = %config.api.base_url,
        start_location = %config.navigation.start_location,
        routes = config.routes.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let portal = lifecycle::start(&config)?;

    match portal.navigator.boot().await {
        NavigationOutcome::Committed(route) => {
            tracing::info!(route = %route.name, path = %route.path, "Boot complete")
        }
        NavigationOutcome::NotFound(location) => {
            tracing::warn!(location = %location, "Start location has no route")
        }
        NavigationOutcome::Failed(error) => {
            tracing::warn!(status = error.status, error = %error.message, "Boot failed")
        }
        NavigationOutcome::Superseded => {}
    }

    let summary = portal.navigator.store().snapshot().summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
