//! Nimbus Contrib - example extensions
//!
//! Three self-contained extensions demonstrating the contract in
//! `nimbus_core`: a new top-level resource, a child resource nested under it,
//! and a controller extension hooking the first one.

pub mod example_child_resource;
pub mod example_controller_extension;
pub mod example_resource;
pub mod store;

use nimbus_core::Extension;

pub use example_child_resource::ExampleChildResource;
pub use example_controller_extension::ExampleControllerExtension;
pub use example_resource::ExampleResource;

/// Every bundled extension, in the order they must be registered.
///
/// Resources come before the extensions that nest under or hook them.
pub fn all_extensions() -> Vec<Box<dyn Extension>> {
    vec![
        Box::new(ExampleResource),
        Box::new(ExampleChildResource),
        Box::new(ExampleControllerExtension),
    ]
}
