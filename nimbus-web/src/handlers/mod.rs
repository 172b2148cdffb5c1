//! HTTP request handlers organized by functionality

pub mod dispatch;
pub mod extensions;

// Re-export handler functions
pub use dispatch::{
    RouteTarget, decode_body, dispatch, handle_route, method_not_allowed, route_not_found,
};
pub use extensions::{ExtensionView, list_extensions, show_extension};
