//! Response hooks and controller extensions.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::resource::declare;
use super::{ActionMap, ActionMethod, Controller, Operation, Request, ResponseObject};

/// Everything the primary handler was invoked with.
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    pub operation: &'a Operation,
    pub request: &'a Request,
    /// Item id for member operations
    pub id: Option<&'a str>,
    /// Decoded request body, if any
    pub body: Option<&'a Value>,
}

/// Post-processing step run after a resource's handler succeeds.
///
/// Hooks see every operation on the collection they are attached to and pick
/// the ones they care about. They run in registration order, before the
/// response is serialized.
pub trait ResponseHook: Send + Sync {
    fn extend(&self, ctx: &HookContext<'_>, response: &mut ResponseObject);
}

impl<F> ResponseHook for F
where
    F: Fn(&HookContext<'_>, &mut ResponseObject) + Send + Sync,
{
    fn extend(&self, ctx: &HookContext<'_>, response: &mut ResponseObject) {
        self(ctx, response)
    }
}

/// Augments an already-registered collection.
#[derive(Clone)]
pub struct ControllerExtension {
    /// Collection name being extended
    pub collection: String,
    pub hook: Option<Arc<dyn ResponseHook>>,
    /// Serves `member_actions`; required when any are declared
    pub controller: Option<Arc<dyn Controller>>,
    pub member_actions: ActionMap,
    duplicate_actions: Vec<String>,
}

impl ControllerExtension {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            hook: None,
            controller: None,
            member_actions: ActionMap::new(),
            duplicate_actions: Vec::new(),
        }
    }

    pub fn with_hook(mut self, hook: Arc<dyn ResponseHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Sets the controller serving this extension's member actions.
    pub fn with_controller(mut self, controller: Arc<dyn Controller>) -> Self {
        self.controller = Some(controller);
        self
    }

    pub fn member_action(mut self, name: impl Into<String>, method: ActionMethod) -> Self {
        declare(&mut self.member_actions, &mut self.duplicate_actions, name.into(), method);
        self
    }

    /// Action names that were declared more than once.
    pub fn duplicate_actions(&self) -> &[String] {
        &self.duplicate_actions
    }
}

impl fmt::Debug for ControllerExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerExtension")
            .field("collection", &self.collection)
            .field("has_hook", &self.hook.is_some())
            .field("member_actions", &self.member_actions)
            .finish_non_exhaustive()
    }
}
