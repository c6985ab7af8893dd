//! HTTP server for the Sales QA service (axum).
//!
//! Serves a static JSON dataset and answers questions about it through a
//! completion service.
//!
//! **Public API**: [`router`], [`run_serve`], [`run_serve_on_listener`].

mod app;
mod qa;
mod response;

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub use app::{router, AiRequest, AiResponse, AppState};
pub use qa::Forwarder;
pub use response::{ApiError, ValidationDetail};

/// Serves on an existing listener until `shutdown` resolves.
///
/// Used by tests (bind to 127.0.0.1:0, then pass the listener).
pub async fn run_serve_on_listener<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn run_serve(addr: &str, state: Arc<AppState>) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    run_serve_on_listener(listener, state, shutdown_signal()).await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await
        }
    }
}
