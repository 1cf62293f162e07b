//! meishi-server - REST API server binary.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use meishi_core::store::InMemoryCardStore;
use meishi_server::{
    create_pipeline, create_server, create_server_with_auth, load_config, AppState,
    ServerSettings,
};
use tokio::signal;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing; MEISHI_LOG_FORMAT=json switches to JSON lines
    let json_logs = std::env::var("MEISHI_LOG_FORMAT").is_ok_and(|f| f == "json");
    tracing_subscriber::registry()
        .with(json_logs.then(|| fmt::layer().json()))
        .with((!json_logs).then(fmt::layer))
        .with(
            EnvFilter::from_default_env()
                .add_directive(Level::INFO.into())
                .add_directive("meishi_server=debug".parse()?),
        )
        .init();

    // Get configuration from environment
    let host = std::env::var("MEISHI_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("MEISHI_PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()?;
    let require_auth = std::env::var("MEISHI_REQUIRE_AUTH").is_ok();
    let config_path = std::env::var("MEISHI_CONFIG").ok().map(PathBuf::from);

    // Build the pipeline
    let config = load_config(config_path.as_deref())?;
    let pipeline = create_pipeline(&config)?;
    let settings = ServerSettings::from_env();
    info!(
        max_cards = config.clustering.max_clusters,
        scan_timeout = ?settings.scan_timeout,
        max_upload_bytes = settings.max_upload_bytes,
        "Pipeline configured"
    );

    let state = AppState::new(pipeline, Arc::new(InMemoryCardStore::new()), settings);

    // Create server with or without auth
    let app = if require_auth {
        info!("Authentication enabled");
        create_server_with_auth(state)
    } else {
        info!("Authentication disabled");
        create_server(state)
    };

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting meishi-server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("Shutdown signal received");
        })
        .await?;

    info!("Server stopped cleanly");
    Ok(())
}
