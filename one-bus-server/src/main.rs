use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use one_bus_server::cache::CachedObaClient;
use one_bus_server::config::ServerConfig;
use one_bus_server::oba::ObaClient;
use one_bus_server::web::{AppState, create_router};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "one_bus_server=info,tower_http=info";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let client = match ObaClient::new(config.oba.clone()) {
        Ok(client) => client,
        Err(e) => {
            error!("failed to create OneBusAway client: {e}");
            return ExitCode::FAILURE;
        }
    };

    if config.cache.is_enabled() {
        info!(ttl_secs = config.cache.ttl.as_secs(), "caching arrivals");
    } else {
        info!("arrivals cache disabled");
    }
    let oba = CachedObaClient::new(client, &config.cache);

    let app = create_router(AppState::new(oba));

    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("failed to bind {}: {e}", config.addr);
            return ExitCode::FAILURE;
        }
    };

    info!("One Bus listening on http://{}", config.addr);
    info!(upstream = %config.oba.base_url, "using OneBusAway");
    info!("API Endpoints:");
    info!("  GET  /health            - Health check");
    info!("  GET  /arrivals          - Arrivals at the nearest stop, soonest first");
    info!("  GET  /arrivals/grouped  - Arrivals at the nearest stop, grouped by route");

    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
