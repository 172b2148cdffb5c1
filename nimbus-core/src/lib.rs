//! Nimbus Core - extension contract for the compute API
//!
//! Defines how REST resources, nested resources and response hooks are
//! declared, validates those declarations in a registry, and carries the
//! shared configuration and tracing setup.

pub mod config;
pub mod errors;
pub mod extension;
pub mod registry;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::{ExtensionsConfig, NimbusConfig, ServerConfig};
pub use errors::{ApiError, RegistryError};
pub use extension::{
    ActionMap, ActionMethod, Controller, ControllerExtension, Extension, ExtensionDescriptor,
    HookContext, Operation, ParentSpec, Request, ResourceExtension, ResponseHook, ResponseObject,
};
pub use registry::{ExtensionRegistry, LoadedExtension, MountPlan, MountedAction, MountedResource};

/// Result of a single controller or hook invocation.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Top-level errors that can bubble up from any Nimbus subsystem.
#[derive(Debug, thiserror::Error)]
pub enum NimbusError {
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NimbusError {
    /// Checks if this error stems from how extensions were declared or selected.
    pub fn is_startup_error(&self) -> bool {
        matches!(
            self,
            NimbusError::Registry(_) | NimbusError::Configuration { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, NimbusError>;
