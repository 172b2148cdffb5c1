//! HTTP server hosting the mounted extensions.

use std::sync::Arc;

use nimbus_core::{MountPlan, NimbusConfig};
use tokio::net::TcpListener;

use crate::WebError;
use crate::router::build_router;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub plan: Arc<MountPlan>,
}

/// Binds the configured address and serves `plan` until Ctrl-C.
///
/// # Errors
/// - `WebError::Bind` - Address could not be bound
/// - `WebError::Serve` - Server stopped with an I/O error
pub async fn run_server(config: NimbusConfig, plan: MountPlan) -> Result<(), WebError> {
    let address = config.server.bind_address();
    let app = build_router(Arc::new(plan), &config.server);

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| WebError::Bind {
            address: address.clone(),
            source,
        })?;
    let local = listener.local_addr().map_err(WebError::Serve)?;

    tracing::info!(
        address = %local,
        api_prefix = %config.server.api_prefix,
        "Nimbus API server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(WebError::Serve)?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
