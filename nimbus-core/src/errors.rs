//! Error types for request handling and extension registration.

use thiserror::Error;

use crate::extension::Operation;

/// Errors raised while serving a single API request.
///
/// Each variant maps to one fault class on the HTTP surface; see
/// [`ApiError::status_code`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The requested identifier is not present in the resource's backing data.
    #[error("Resource {resource} could not be found: {id}")]
    NotFound {
        /// Collection name of the resource
        resource: String,
        /// Identifier that was looked up
        id: String,
    },

    /// A nested resource was invoked without the parent identifier.
    #[error("Resource {resource} requires a parent identifier")]
    MissingParent {
        /// Collection name of the nested resource
        resource: String,
    },

    /// Request body could not be decoded as JSON.
    #[error("Malformed request body: {reason}")]
    InvalidBody {
        /// Decoder error message
        reason: String,
    },

    /// Path captures or query string could not be decoded.
    #[error("Malformed request: {reason}")]
    InvalidRequest {
        /// Extractor error message
        reason: String,
    },

    /// The path exists but is not mounted for this verb.
    #[error("Method {method} is not allowed on {path}")]
    MethodNotAllowed {
        /// HTTP verb of the request
        method: String,
        /// Request path
        path: String,
    },

    /// The controller does not provide this operation.
    #[error("Operation {operation} is not implemented")]
    NotImplemented {
        /// Operation that was requested
        operation: Operation,
    },

    /// The controller does not know the named custom action.
    #[error("Unknown action {action} on {resource}")]
    UnknownAction {
        /// Collection name of the resource
        resource: String,
        /// Action name taken from the URL
        action: String,
    },
}

impl ApiError {
    /// Creates a not-found error for `id` within `resource`.
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// HTTP status code this error is surfaced with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } | Self::UnknownAction { .. } => 404,
            Self::MissingParent { .. } | Self::InvalidBody { .. } | Self::InvalidRequest { .. } => {
                400
            }
            Self::MethodNotAllowed { .. } => 405,
            Self::NotImplemented { .. } => 501,
        }
    }

    /// Name of the fault wrapper object in error response bodies.
    pub fn fault_name(&self) -> &'static str {
        match self.status_code() {
            400 => "badRequest",
            404 => "itemNotFound",
            405 => "badMethod",
            501 => "notImplemented",
            _ => "computeFault",
        }
    }
}

/// Errors raised while registering extensions or building the mount plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Extension alias '{alias}' is not URL-safe")]
    InvalidAlias { alias: String },

    #[error("Extension alias '{alias}' is already registered")]
    DuplicateAlias { alias: String },

    #[error("Extension '{alias}' has no description")]
    MissingDescription { alias: String },

    #[error("Extension '{alias}' has invalid update timestamp '{updated}': {reason}")]
    InvalidTimestamp {
        alias: String,
        updated: String,
        reason: String,
    },

    #[error("Collection '{collection}' is already mounted")]
    DuplicateCollection { collection: String },

    #[error("'{name}' on '{collection}' is not a valid path segment")]
    InvalidName { collection: String, name: String },

    #[error("Collection name '{collection}' is reserved")]
    ReservedCollection { collection: String },

    #[error("Action '{action}' is declared more than once on '{collection}'")]
    DuplicateAction { collection: String, action: String },

    #[error("Extension '{alias}' targets unknown collection '{collection}'")]
    UnknownCollection { alias: String, collection: String },

    #[error("Collection '{collection}' declares unknown parent '{parent}'")]
    UnknownParent { collection: String, parent: String },

    #[error("Extension '{alias}' declares actions on '{collection}' without a controller")]
    MissingController { alias: String, collection: String },
}
