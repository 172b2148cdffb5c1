//! Extension registry and mount plan.
//!
//! Extensions are registered explicitly, in order. The registry validates
//! each descriptor and declaration as it arrives; [`ExtensionRegistry::finalize`]
//! then resolves parents and controller extensions against the mounted
//! resources and produces an immutable [`MountPlan`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::config::ExtensionsConfig;
use crate::extension::{
    ActionMap, ActionMethod, Controller, ControllerExtension, Extension, ExtensionDescriptor,
    HookContext, Operation, ParentSpec, Request, ResourceExtension, ResponseHook, ResponseObject,
    is_path_segment,
};
use crate::{ApiError, ApiResult, RegistryError};

/// Top-level collection names the host claims for itself.
pub const RESERVED_COLLECTIONS: &[&str] = &["extensions"];

/// A descriptor that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedExtension {
    pub descriptor: ExtensionDescriptor,
    pub updated: DateTime<FixedOffset>,
}

/// Collects extension declarations before they are mounted.
#[derive(Default)]
pub struct ExtensionRegistry {
    config: ExtensionsConfig,
    loaded: Vec<LoadedExtension>,
    resources: Vec<(&'static str, ResourceExtension)>,
    controller_extensions: Vec<(&'static str, ControllerExtension)>,
    /// Top-level collections declared by extensions skipped through configuration
    disabled_collections: Vec<String>,
}

impl ExtensionRegistry {
    /// Creates a registry that loads every extension.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry that loads only what `config` enables.
    pub fn with_config(config: ExtensionsConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Validates and records one extension.
    ///
    /// Returns `Ok(false)` when the extension is disabled by configuration.
    /// A rejected extension leaves the registry unchanged.
    ///
    /// # Errors
    /// - `RegistryError::InvalidAlias` - Alias is not URL-safe
    /// - `RegistryError::MissingDescription` - Description is empty
    /// - `RegistryError::InvalidTimestamp` - `updated` is not RFC 3339
    /// - `RegistryError::DuplicateAlias` - Alias already loaded
    /// - `RegistryError::InvalidName` - Collection or action is not a plain path segment
    /// - `RegistryError::DuplicateAction` - Action declared twice on one resource
    /// - `RegistryError::ReservedCollection` - Resource uses a host-owned name
    /// - `RegistryError::DuplicateCollection` - Resource already mounted at that level
    /// - `RegistryError::MissingController` - Actions declared without a controller
    pub fn register(&mut self, extension: &dyn Extension) -> Result<bool, RegistryError> {
        let descriptor = extension.descriptor();
        let updated = validate_descriptor(&descriptor)?;
        let alias = descriptor.alias;

        if !self.config.is_enabled(alias) {
            tracing::info!(alias, "Extension disabled by configuration, skipping");
            self.disabled_collections.extend(
                extension
                    .resources()
                    .into_iter()
                    .filter(|r| r.parent.is_none())
                    .map(|r| r.collection),
            );
            return Ok(false);
        }

        if self.loaded.iter().any(|e| e.descriptor.alias == alias) {
            return Err(RegistryError::DuplicateAlias {
                alias: alias.to_string(),
            });
        }

        let resources = extension.resources();
        let mut pending: Vec<&ResourceExtension> = Vec::new();
        for resource in &resources {
            self.check_resource(resource, &pending)?;
            pending.push(resource);
        }

        let controller_extensions = extension.controller_extensions();
        for ext in &controller_extensions {
            check_actions(&ext.collection, ext.member_actions.keys(), ext.duplicate_actions())?;
            if !ext.member_actions.is_empty() && ext.controller.is_none() {
                return Err(RegistryError::MissingController {
                    alias: alias.to_string(),
                    collection: ext.collection.clone(),
                });
            }
        }

        tracing::info!(
            alias,
            name = descriptor.name,
            resources = resources.len(),
            controller_extensions = controller_extensions.len(),
            "Loaded extension"
        );

        self.loaded.push(LoadedExtension {
            descriptor,
            updated,
        });
        self.resources
            .extend(resources.into_iter().map(|r| (alias, r)));
        self.controller_extensions
            .extend(controller_extensions.into_iter().map(|c| (alias, c)));

        Ok(true)
    }

    /// Registers every extension in order, stopping at the first failure.
    ///
    /// # Errors
    /// Returns the first error raised by [`ExtensionRegistry::register`].
    pub fn register_all(&mut self, extensions: &[Box<dyn Extension>]) -> Result<usize, RegistryError> {
        let mut loaded = 0;
        for extension in extensions {
            if self.register(extension.as_ref())? {
                loaded += 1;
            }
        }
        Ok(loaded)
    }

    /// Descriptors loaded so far, in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ExtensionDescriptor> {
        self.loaded.iter().map(|e| &e.descriptor)
    }

    fn check_resource(
        &self,
        resource: &ResourceExtension,
        pending: &[&ResourceExtension],
    ) -> Result<(), RegistryError> {
        let collection = &resource.collection;
        if !is_path_segment(collection) {
            return Err(RegistryError::InvalidName {
                collection: collection.clone(),
                name: collection.clone(),
            });
        }
        check_actions(
            collection,
            resource
                .member_actions
                .keys()
                .chain(resource.collection_actions.keys()),
            resource.duplicate_actions(),
        )?;

        if resource.parent.is_none() && RESERVED_COLLECTIONS.contains(&collection.as_str()) {
            return Err(RegistryError::ReservedCollection {
                collection: collection.clone(),
            });
        }

        let parent_name = |r: &ResourceExtension| r.parent.as_ref().map(|p| p.collection_name.clone());
        let clashes = self
            .resources
            .iter()
            .map(|(_, r)| r)
            .chain(pending.iter().copied())
            .any(|r| r.collection == *collection && parent_name(r) == parent_name(resource));
        if clashes {
            return Err(RegistryError::DuplicateCollection {
                collection: collection.clone(),
            });
        }
        Ok(())
    }

    /// Resolves parents and controller extensions into a mount plan.
    ///
    /// # Errors
    /// - `RegistryError::UnknownParent` - Parent collection is not a mounted top-level resource
    /// - `RegistryError::UnknownCollection` - Controller extension targets nothing mounted
    /// - `RegistryError::DuplicateAction` - An added action or child collection collides
    ///   with an existing member action
    pub fn finalize(self) -> Result<MountPlan, RegistryError> {
        let mut resources: Vec<MountedResource> = self
            .resources
            .into_iter()
            .map(|(alias, r)| MountedResource::from_declaration(alias, r))
            .collect();

        let disabled = self.disabled_collections;
        let mounted_top_level = |collection: &str, resources: &[MountedResource]| {
            resources
                .iter()
                .any(|r| r.parent.is_none() && r.collection == collection)
        };

        for (alias, ext) in self.controller_extensions {
            if !mounted_top_level(&ext.collection, &resources) && disabled.contains(&ext.collection)
            {
                tracing::warn!(
                    alias,
                    collection = %ext.collection,
                    "Extended collection is disabled, skipping controller extension"
                );
                continue;
            }
            let target = resources
                .iter_mut()
                .find(|r| r.parent.is_none() && r.collection == ext.collection)
                .ok_or_else(|| RegistryError::UnknownCollection {
                    alias: alias.to_string(),
                    collection: ext.collection.clone(),
                })?;

            if let Some(controller) = &ext.controller {
                for (action, method) in &ext.member_actions {
                    if target.member_actions.contains_key(action) {
                        return Err(RegistryError::DuplicateAction {
                            collection: target.collection.clone(),
                            action: action.clone(),
                        });
                    }
                    target.member_actions.insert(
                        action.clone(),
                        MountedAction {
                            method: *method,
                            provider: alias,
                            controller: Arc::clone(controller),
                        },
                    );
                }
            }

            if let Some(hook) = ext.hook {
                tracing::debug!(alias, collection = %target.collection, "Attached response hook");
                target.hooks.push((alias, hook));
            }
        }

        let mut orphaned = Vec::new();
        for index in 0..resources.len() {
            let Some(parent) = resources[index].parent.clone() else {
                continue;
            };
            let collection = resources[index].collection.clone();
            if !mounted_top_level(&parent.collection_name, &resources)
                && disabled.contains(&parent.collection_name)
            {
                tracing::warn!(
                    collection = %collection,
                    parent = %parent.collection_name,
                    "Parent collection is disabled, skipping nested resource"
                );
                orphaned.push(index);
                continue;
            }
            let parent_resource = resources
                .iter()
                .find(|r| r.parent.is_none() && r.collection == parent.collection_name)
                .ok_or_else(|| RegistryError::UnknownParent {
                    collection: collection.clone(),
                    parent: parent.collection_name.clone(),
                })?;
            if parent_resource.member_actions.contains_key(&collection) {
                return Err(RegistryError::DuplicateAction {
                    collection: parent.collection_name.clone(),
                    action: collection,
                });
            }
        }

        let resources = resources
            .into_iter()
            .enumerate()
            .filter(|(index, _)| !orphaned.contains(index))
            .map(|(_, resource)| Arc::new(resource))
            .collect();

        Ok(MountPlan {
            extensions: self.loaded,
            resources,
        })
    }
}

fn check_actions<'a>(
    collection: &str,
    mut names: impl Iterator<Item = &'a String>,
    duplicates: &[String],
) -> Result<(), RegistryError> {
    if let Some(name) = names.find(|name| !is_path_segment(name)) {
        return Err(RegistryError::InvalidName {
            collection: collection.to_string(),
            name: name.clone(),
        });
    }
    if let Some(action) = duplicates.first() {
        return Err(RegistryError::DuplicateAction {
            collection: collection.to_string(),
            action: action.clone(),
        });
    }
    Ok(())
}

fn validate_descriptor(
    descriptor: &ExtensionDescriptor,
) -> Result<DateTime<FixedOffset>, RegistryError> {
    let alias = descriptor.alias;
    if !ExtensionDescriptor::is_url_safe(alias) {
        return Err(RegistryError::InvalidAlias {
            alias: alias.to_string(),
        });
    }
    if descriptor.description.trim().is_empty() {
        return Err(RegistryError::MissingDescription {
            alias: alias.to_string(),
        });
    }
    DateTime::parse_from_rfc3339(descriptor.updated).map_err(|e| {
        RegistryError::InvalidTimestamp {
            alias: alias.to_string(),
            updated: descriptor.updated.to_string(),
            reason: e.to_string(),
        }
    })
}

/// A member action and the controller that serves it.
#[derive(Clone)]
pub struct MountedAction {
    pub method: ActionMethod,
    /// Alias of the extension that declared the action
    pub provider: &'static str,
    controller: Arc<dyn Controller>,
}

impl fmt::Debug for MountedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedAction")
            .field("method", &self.method)
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

/// A resource ready to be routed, with its hooks in execution order.
pub struct MountedResource {
    pub collection: String,
    pub parent: Option<ParentSpec>,
    /// Alias of the extension that declared the resource
    pub provider: &'static str,
    controller: Arc<dyn Controller>,
    member_actions: BTreeMap<String, MountedAction>,
    collection_actions: ActionMap,
    hooks: Vec<(&'static str, Arc<dyn ResponseHook>)>,
}

impl MountedResource {
    fn from_declaration(provider: &'static str, declaration: ResourceExtension) -> Self {
        let controller = declaration.controller;
        let member_actions = declaration
            .member_actions
            .into_iter()
            .map(|(name, method)| {
                let action = MountedAction {
                    method,
                    provider,
                    controller: Arc::clone(&controller),
                };
                (name, action)
            })
            .collect();

        Self {
            collection: declaration.collection,
            parent: declaration.parent,
            provider,
            controller,
            member_actions,
            collection_actions: declaration.collection_actions,
            hooks: Vec::new(),
        }
    }

    pub fn member_actions(&self) -> &BTreeMap<String, MountedAction> {
        &self.member_actions
    }

    pub fn collection_actions(&self) -> &ActionMap {
        &self.collection_actions
    }

    /// Aliases of the extensions hooking this resource, in execution order.
    pub fn hook_providers(&self) -> Vec<&'static str> {
        self.hooks.iter().map(|(alias, _)| *alias).collect()
    }

    /// Runs `operation` and then every hook on the resulting response.
    ///
    /// Hooks are skipped when the handler fails.
    ///
    /// # Errors
    /// - `ApiError::MissingParent` - Nested resource invoked without a parent id
    /// - `ApiError::UnknownAction` - Action not mounted on this resource
    /// - Any error returned by the controller
    pub fn invoke(
        &self,
        operation: &Operation,
        req: &Request,
        id: Option<&str>,
        body: Option<&Value>,
    ) -> ApiResult<ResponseObject> {
        if self.parent.is_some() && req.parent_id().is_none() {
            return Err(ApiError::MissingParent {
                resource: self.collection.clone(),
            });
        }

        let item_id = || id.ok_or_else(|| ApiError::not_found(&self.collection, ""));
        let result = match operation {
            Operation::Index => self.controller.index(req),
            Operation::Show => self.controller.show(req, item_id()?),
            Operation::Create => self.controller.create(req, body),
            Operation::Update => self.controller.update(req, item_id()?, body),
            Operation::Delete => self.controller.delete(req, item_id()?),
            Operation::MemberAction(action) => {
                let mounted = self
                    .member_actions
                    .get(action)
                    .ok_or_else(|| self.unknown_action(action))?;
                mounted
                    .controller
                    .member_action(action, req, item_id()?, body)
            }
            Operation::CollectionAction(action) => {
                if !self.collection_actions.contains_key(action) {
                    return Err(self.unknown_action(action));
                }
                self.controller.collection_action(action, req, body)
            }
        };

        let mut response = result.map_err(|error| match error {
            ApiError::UnknownAction { action, .. } => self.unknown_action(&action),
            other => other,
        })?;

        let ctx = HookContext {
            operation,
            request: req,
            id,
            body,
        };
        for (alias, hook) in &self.hooks {
            hook.extend(&ctx, &mut response);
            for key in response.take_rejected() {
                tracing::warn!(
                    alias,
                    collection = %self.collection,
                    key = %key,
                    "Response hook tried to overwrite an existing field, keeping original"
                );
            }
        }

        Ok(response)
    }

    fn unknown_action(&self, action: &str) -> ApiError {
        ApiError::UnknownAction {
            resource: self.collection.clone(),
            action: action.to_string(),
        }
    }
}

impl fmt::Debug for MountedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedResource")
            .field("collection", &self.collection)
            .field("parent", &self.parent)
            .field("provider", &self.provider)
            .field("member_actions", &self.member_actions)
            .field("collection_actions", &self.collection_actions)
            .field("hooks", &self.hook_providers())
            .finish()
    }
}

/// Validated, immutable result of registration.
#[derive(Debug)]
pub struct MountPlan {
    extensions: Vec<LoadedExtension>,
    resources: Vec<Arc<MountedResource>>,
}

impl MountPlan {
    /// Registers `extensions` in order under `config` and finalizes.
    ///
    /// # Errors
    /// Any error from [`ExtensionRegistry::register`] or [`ExtensionRegistry::finalize`].
    pub fn from_extensions(
        config: &ExtensionsConfig,
        extensions: &[Box<dyn Extension>],
    ) -> Result<Self, RegistryError> {
        let mut registry = ExtensionRegistry::with_config(config.clone());
        let loaded = registry.register_all(extensions)?;
        let plan = registry.finalize()?;
        tracing::info!(
            loaded,
            skipped = extensions.len() - loaded,
            resources = plan.resources.len(),
            "Mount plan ready"
        );
        Ok(plan)
    }

    /// Loaded extensions in registration order.
    pub fn extensions(&self) -> &[LoadedExtension] {
        &self.extensions
    }

    pub fn extension(&self, alias: &str) -> Option<&LoadedExtension> {
        self.extensions.iter().find(|e| e.descriptor.alias == alias)
    }

    /// Mounted resources in registration order.
    pub fn resources(&self) -> &[Arc<MountedResource>] {
        &self.resources
    }

    /// Looks up a top-level resource by collection name.
    pub fn resource(&self, collection: &str) -> Option<&Arc<MountedResource>> {
        self.resources
            .iter()
            .find(|r| r.parent.is_none() && r.collection == collection)
    }
}
