use std::net::SocketAddr;
use std::sync::Arc;

use ga4_analytics::{AnalyticsConfig, AnalyticsDataApi};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ga4_api::config::ServerConfig;
use ga4_api::router::build_app_router;
use ga4_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ga4_api=debug,ga4_analytics=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let analytics_config = AnalyticsConfig::from_env();
    let api = AnalyticsDataApi::from_config(&analytics_config)
        .expect("Failed to initialise the GA4 Data API client");

    std::fs::create_dir_all(&config.export_dir).expect("Failed to create export directory");
    tracing::info!(dir = %config.export_dir.display(), "Export directory ready");

    if config.database_url.is_none() {
        tracing::warn!("DATABASE_URL not set, imports are disabled");
    }

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        report_source: Arc::new(api),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
