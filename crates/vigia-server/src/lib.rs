//! # vigia-server
//!
//! HTTP service for the Vigía community public-safety platform. Serves
//! the collection forms' submission endpoints, the viewer/chart data,
//! CSV exports, the Pareto report artifacts, and the geodata catalogs,
//! all over the spreadsheet store.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal::{self, unix::SignalKind};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use config::Config;
use state::AppState;

/// Build the application router over shared state.
pub fn app(state: Arc<AppState>) -> Router {
    routes::router(state)
}

/// Run the server until ctrl-c or SIGTERM.
pub async fn start_server(config: Config) -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("initializing state...");
    let state = AppState::new(config)?;

    let address = format!("0.0.0.0:{}", state.config.port);
    let listener = TcpListener::bind(&address).await?;
    info!("listening on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_ok() {
            info!("received ctrl-c, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => tracing::error!("failed to install signal handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
