//! Resource declarations: collection name, parent, and custom actions.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::Controller;

/// HTTP verb a custom action is mounted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl ActionMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for ActionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Custom action name to the verb it answers.
pub type ActionMap = BTreeMap<String, ActionMethod>;

/// Parent collection a nested resource is mounted under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentSpec {
    /// Collection name of the parent, e.g. `os-example-resource`
    pub collection_name: String,
    /// Singular name of a parent member, e.g. `exp_res`
    pub member_name: String,
}

impl ParentSpec {
    pub fn new(collection_name: impl Into<String>, member_name: impl Into<String>) -> Self {
        Self {
            collection_name: collection_name.into(),
            member_name: member_name.into(),
        }
    }
}

/// A new REST resource contributed by an extension.
#[derive(Clone)]
pub struct ResourceExtension {
    pub collection: String,
    pub controller: Arc<dyn Controller>,
    pub parent: Option<ParentSpec>,
    pub member_actions: ActionMap,
    pub collection_actions: ActionMap,
    /// Action names declared more than once; the first declaration is kept
    duplicate_actions: Vec<String>,
}

impl ResourceExtension {
    /// Declares `collection` served by `controller`, with no actions.
    pub fn new(collection: impl Into<String>, controller: Arc<dyn Controller>) -> Self {
        Self {
            collection: collection.into(),
            controller,
            parent: None,
            member_actions: ActionMap::new(),
            collection_actions: ActionMap::new(),
            duplicate_actions: Vec::new(),
        }
    }

    /// Nests this resource under a member of `parent`.
    pub fn with_parent(mut self, parent: ParentSpec) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Adds a custom action on single items.
    pub fn member_action(mut self, name: impl Into<String>, method: ActionMethod) -> Self {
        declare(&mut self.member_actions, &mut self.duplicate_actions, name.into(), method);
        self
    }

    /// Adds a custom action on the whole collection.
    pub fn collection_action(mut self, name: impl Into<String>, method: ActionMethod) -> Self {
        declare(&mut self.collection_actions, &mut self.duplicate_actions, name.into(), method);
        self
    }

    /// Action names that were declared twice on the same map.
    pub fn duplicate_actions(&self) -> &[String] {
        &self.duplicate_actions
    }
}

/// Inserts `name` unless already present, in which case it is recorded in
/// `duplicates` and the earlier verb stays.
pub(crate) fn declare(
    actions: &mut ActionMap,
    duplicates: &mut Vec<String>,
    name: String,
    method: ActionMethod,
) {
    if actions.contains_key(&name) {
        duplicates.push(name);
    } else {
        actions.insert(name, method);
    }
}

impl fmt::Debug for ResourceExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceExtension")
            .field("collection", &self.collection)
            .field("parent", &self.parent)
            .field("member_actions", &self.member_actions)
            .field("collection_actions", &self.collection_actions)
            .finish_non_exhaustive()
    }
}
