//! Nimbus Web - JSON API host
//!
//! Mounts the resources of a [`nimbus_core::MountPlan`] on an axum router
//! and renders failures as compute-style fault bodies.

pub mod fault;
pub mod handlers;
pub mod router;
pub mod server;

pub use fault::Fault;
pub use router::{RouteSpec, build_router, route_table};
pub use server::{AppState, run_server};

/// Errors raised while starting or running the HTTP server.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(std::io::Error),
}
