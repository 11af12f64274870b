//! HTTP transport
//!
//! Exposes both exports over HTTP. The caller's tenant comes from the bearer
//! token, never from the request itself.
//!
//! | Route | Export |
//! |-------|--------|
//! | `GET /health` | liveness |
//! | `GET /exports/backup` | full backup |
//! | `GET /exports/movement?date=YYYY-MM-DD` | daily movement (today if omitted) |

pub mod errors;
pub mod handlers;

pub use errors::ApiError;

use crate::adapters::identity::IdentityProvider;
use crate::core::export::ExportOrchestrator;
use crate::domain::{EngineError, Result};
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ExportOrchestrator>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(orchestrator: ExportOrchestrator, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            identity,
        }
    }
}

/// Builds the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/exports/backup", get(handlers::full_backup))
        .route("/exports/movement", get(handlers::daily_movement))
        .with_state(state)
}

/// Binds `address` and serves until shutdown is signalled
///
/// # Errors
///
/// Returns `EngineError::Configuration` for an unparsable address and
/// `EngineError::Io` if binding or serving fails.
pub async fn serve(
    address: &str,
    drain_timeout: Duration,
    state: AppState,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let address: SocketAddr = address
        .parse()
        .map_err(|e| EngineError::Configuration(format!("Invalid bind address '{address}': {e}")))?;
    let listener = TcpListener::bind(address).await?;
    serve_on(listener, drain_timeout, state, shutdown).await
}

/// Serves on an already bound listener
///
/// After the shutdown signal, in-flight requests get `drain_timeout` to
/// finish; the server is then aborted.
pub async fn serve_on(
    listener: TcpListener,
    drain_timeout: Duration,
    state: AppState,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    tracing::info!(address = %listener.local_addr()?, "HTTP server listening");

    let app = router(state);
    let graceful = wait_for_shutdown(shutdown.clone());
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(graceful)
            .await
    });

    tokio::select! {
        joined = &mut server => return flatten(joined),
        _ = wait_for_shutdown(shutdown) => {}
    }

    tracing::info!(
        drain_timeout_secs = drain_timeout.as_secs(),
        "Shutdown requested, draining in-flight requests"
    );

    match tokio::time::timeout(drain_timeout, &mut server).await {
        Ok(joined) => flatten(joined),
        Err(_) => {
            server.abort();
            tracing::warn!("Drain timeout elapsed, aborting remaining requests");
            Ok(())
        }
    }
}

fn flatten(joined: std::result::Result<std::io::Result<()>, tokio::task::JoinError>) -> Result<()> {
    match joined {
        Ok(result) => {
            result?;
            tracing::info!("HTTP server stopped");
            Ok(())
        }
        Err(e) => Err(EngineError::Internal(format!("server task failed: {e}"))),
    }
}

/// Resolves once the flag is set or every sender is gone
pub async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
