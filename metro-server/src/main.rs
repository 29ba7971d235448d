use metro_server::config::ServerConfig;
use metro_server::graph::MetroGraph;
use metro_server::planner::DistanceModel;
use metro_server::web::{AppState, create_router};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("metro_server=info,tower_http=info")),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };

    // A graph that cannot be loaded is unusable: fail fast
    let graph = match MetroGraph::from_path(&config.data_path) {
        Ok((graph, summary)) => {
            info!(
                path = %config.data_path.display(),
                lines = summary.lines,
                stations = summary.stations,
                connections = summary.connections,
                skipped_records = summary.skipped_records,
                skipped_edges = summary.skipped_edges,
                "loaded metro graph"
            );
            graph
        }
        Err(e) => {
            error!(error = %e, "failed to load metro graph");
            std::process::exit(1);
        }
    };

    let state = AppState::new(graph, DistanceModel::default());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .expect("Failed to bind listen address");
    info!(addr = %config.addr, "metro route planner listening");
    info!("  GET  /health                  - Health check");
    info!("  GET  /stations                - All stations");
    info!("  GET  /lines                   - All lines");
    info!("  GET  /lines/:name/stations    - Stations of a line in order");
    info!("  GET  /route?from=&to=&strategy= - Plan a route");
    info!("  POST /stations, /lines, /connections - Edit the network");

    axum::serve(listener, app).await.expect("Server error");
}
