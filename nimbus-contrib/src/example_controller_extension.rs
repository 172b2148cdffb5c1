//! Example controller extension.
//!
//! Hooks `show` and `custom_action_update` on `os-example-resource` to add an
//! `extends` field, and adds a `custom_extend` member action.

use std::sync::Arc;

use nimbus_core::{
    ActionMethod, ApiError, ApiResult, Controller, ControllerExtension, Extension,
    ExtensionDescriptor, HookContext, Operation, Request, ResponseHook, ResponseObject,
};
use serde_json::{Value, json};

use crate::example_resource;

/// Field the hook adds to extended responses.
pub const EXTENDS_FIELD: &str = "extends";

pub const CUSTOM_EXTEND: &str = "custom_extend";

pub const DESCRIPTOR: ExtensionDescriptor = ExtensionDescriptor {
    name: "ExampleControllerExtension",
    alias: "os-example-controller-extension",
    namespace: "http://docs.openstack.org/compute/ext/os-example-controller-extension/api/v1.2",
    updated: "2014-07-04T00:00:00+08:00",
    description: "Controller extension extends existing resources.",
};

/// Adds `extends` to `show` and `custom_action_update` responses.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtendsHook;

impl ResponseHook for ExtendsHook {
    fn extend(&self, ctx: &HookContext<'_>, response: &mut ResponseObject) {
        let (method, parameters) = match ctx.operation {
            Operation::Show => ("show", ctx.request.query_json()),
            Operation::MemberAction(action) if action == example_resource::CUSTOM_ACTION_UPDATE => {
                (action.as_str(), ctx.body.cloned().unwrap_or(Value::Null))
            }
            _ => return,
        };

        let extension = json!({
            "msg": format!("This is extended {method}()"),
            "id": ctx.id,
            "parameters": parameters,
        });
        if !response.extend_data(EXTENDS_FIELD, extension) {
            tracing::debug!(method, "Response already carries an extends field");
        }
    }
}

/// Serves the `custom_extend` action grafted onto `os-example-resource`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CustomExtendController;

impl Controller for CustomExtendController {
    fn member_action(
        &self,
        action: &str,
        req: &Request,
        id: &str,
        _body: Option<&Value>,
    ) -> ApiResult<ResponseObject> {
        if action != CUSTOM_EXTEND {
            return Err(ApiError::UnknownAction {
                resource: example_resource::COLLECTION.to_string(),
                action: action.to_string(),
            });
        }
        Ok(
            ResponseObject::with_message(format!("This custom_extend() on resource object: {id}"))
                .field("id", id)
                .field("parameters", req.query_json()),
        )
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ExampleControllerExtension;

impl Extension for ExampleControllerExtension {
    fn descriptor(&self) -> ExtensionDescriptor {
        DESCRIPTOR
    }

    fn controller_extensions(&self) -> Vec<ControllerExtension> {
        let extension = ControllerExtension::new(example_resource::COLLECTION)
            .with_hook(Arc::new(ExtendsHook))
            .with_controller(Arc::new(CustomExtendController))
            .member_action(CUSTOM_EXTEND, ActionMethod::Get);
        vec![extension]
    }
}
