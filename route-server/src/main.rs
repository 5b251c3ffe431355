use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use route_server::cache::RouteCache;
use route_server::config::ServerConfig;
use route_server::graph::GraphStore;
use route_server::regulations::CargoRegulations;
use route_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    // No previous graph to fall back to: a failed first load is fatal
    let graph = match GraphStore::load(config.graph_source.clone(), config.reload_timeout).await {
        Ok(graph) => graph,
        Err(e) => {
            error!(source = %config.graph_source, error = %e, "Failed to load graph");
            return ExitCode::FAILURE;
        }
    };

    let regulations = match &config.regulations_path {
        Some(path) => match CargoRegulations::load(path) {
            Ok(regulations) => {
                info!(path = %path.display(), items = regulations.len(), "Loaded cargo regulations");
                Some(regulations)
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to load cargo regulations");
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    // Spawn background task to reload the graph
    if let Some(period) = config.reload_interval {
        let store = graph.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await; // First tick is immediate, skip it
            loop {
                interval.tick().await;
                // Failures are logged by the store; the previous graph keeps serving
                let _ = store.refresh().await;
            }
        });
    } else {
        warn!("Graph reloading disabled");
    }

    let state = AppState::new(
        graph,
        config.engine.clone(),
        regulations,
        RouteCache::new(&config.cache),
    );
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind_addr, error = %e, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };
    info!(addr = %config.bind_addr, "Route server listening");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
