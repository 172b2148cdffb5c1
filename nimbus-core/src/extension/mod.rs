//! Declarative extension contract.
//!
//! An extension pairs an [`ExtensionDescriptor`] with the resources it adds
//! and the existing resources it hooks into. The registry validates these
//! declarations; the web host turns the result into routes.

mod controller;
mod hooks;
mod request;
mod resource;
mod response;

pub use controller::{Controller, Operation};
pub use hooks::{ControllerExtension, HookContext, ResponseHook};
pub use request::Request;
pub use resource::{ActionMap, ActionMethod, ParentSpec, ResourceExtension};
pub use response::ResponseObject;

/// Metadata advertised by every extension.
///
/// All fields are static so descriptors can be declared as constants next to
/// the controller they describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionDescriptor {
    /// Human-readable name, e.g. `ExampleResource`
    pub name: &'static str,
    /// Unique URL-safe alias, e.g. `os-example-resource`
    pub alias: &'static str,
    /// Namespace URI for schema and versioning purposes
    pub namespace: &'static str,
    /// RFC 3339 timestamp of the last change
    pub updated: &'static str,
    /// One-paragraph description; required
    pub description: &'static str,
}

impl ExtensionDescriptor {
    /// Returns true if `alias` is non-empty, starts with a lowercase letter or
    /// digit, and contains only lowercase letters, digits and `-`.
    pub fn is_url_safe(alias: &str) -> bool {
        let mut chars = alias.chars();
        match chars.next() {
            Some(first) if first.is_ascii_lowercase() || first.is_ascii_digit() => {}
            _ => return false,
        }
        chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }
}

/// Returns true if `name` can be mounted as one literal URL path segment:
/// non-empty ASCII letters, digits, `-` and `_`.
pub fn is_path_segment(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// A loadable unit of API functionality.
///
/// Implementations are listed explicitly by the embedding application and
/// handed to [`crate::ExtensionRegistry::register`].
pub trait Extension: Send + Sync {
    /// Descriptor advertised on the extensions listing.
    fn descriptor(&self) -> ExtensionDescriptor;

    /// New resources this extension mounts.
    fn resources(&self) -> Vec<ResourceExtension> {
        Vec::new()
    }

    /// Hooks and extra actions this extension grafts onto existing resources.
    fn controller_extensions(&self) -> Vec<ControllerExtension> {
        Vec::new()
    }
}
