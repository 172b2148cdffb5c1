//! Example child resource extension.
//!
//! Mounts `os-example-child-resource` under each member of
//! `os-example-resource`. The parent id comes from nested routing and is
//! echoed verbatim; it is not checked against the parent's data.

use std::sync::Arc;

use nimbus_core::{
    ApiError, ApiResult, Controller, Extension, ExtensionDescriptor, ParentSpec, Request,
    ResourceExtension, ResponseObject,
};

use crate::example_resource;

pub const COLLECTION: &str = "os-example-child-resource";

/// Singular name of a parent member.
pub const PARENT_MEMBER: &str = "exp_res";

pub const DESCRIPTOR: ExtensionDescriptor = ExtensionDescriptor {
    name: "ExampleChildResource",
    alias: "os-example-child-resource",
    namespace: "http://docs.openstack.org/compute/ext/os-example-child-resource/api/v1.2",
    updated: "2014-07-04T00:00:00+08:00",
    description: "Example child resource extension creates a new resource. The resource is \
                  child of a parent resource object.",
};

fn parent_id(req: &Request) -> ApiResult<&str> {
    req.parent_id().ok_or_else(|| ApiError::MissingParent {
        resource: COLLECTION.to_string(),
    })
}

/// Handler for `os-example-child-resource`; index and show only.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExampleChildController;

impl Controller for ExampleChildController {
    fn index(&self, req: &Request) -> ApiResult<ResponseObject> {
        let parent = parent_id(req)?;
        Ok(
            ResponseObject::with_message(format!("You are showing child index of parent: {parent}"))
                .field("parent_id", parent),
        )
    }

    fn show(&self, req: &Request, id: &str) -> ApiResult<ResponseObject> {
        let parent = parent_id(req)?;
        Ok(ResponseObject::with_message(format!(
            "You are showing child resource object {id} of parent {parent}"
        ))
        .field("parent_id", parent)
        .field("id", id)
        .field("parameters", req.query_json()))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ExampleChildResource;

impl Extension for ExampleChildResource {
    fn descriptor(&self) -> ExtensionDescriptor {
        DESCRIPTOR
    }

    fn resources(&self) -> Vec<ResourceExtension> {
        let parent = ParentSpec::new(example_resource::COLLECTION, PARENT_MEMBER);
        vec![ResourceExtension::new(COLLECTION, Arc::new(ExampleChildController)).with_parent(parent)]
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_index_echoes_parent() {
        let req = Request::new("tenant").with_parent("1");
        let response = ExampleChildController.index(&req).unwrap();
        assert_eq!(
            response.into_body(),
            json!({"data": {
                "msg": "You are showing child index of parent: 1",
                "parent_id": "1",
            }})
        );
    }

    #[test]
    fn test_show_does_not_validate_ids() {
        let req = Request::new("tenant")
            .with_parent("not-a-parent")
            .with_param("q", "x");
        let response = ExampleChildController.show(&req, "42").unwrap();
        assert_eq!(
            response.message(),
            Some("You are showing child resource object 42 of parent not-a-parent")
        );
        assert_eq!(response.get("parent_id"), Some(&json!("not-a-parent")));
        assert_eq!(response.get("id"), Some(&json!("42")));
        assert_eq!(response.get("parameters"), Some(&json!({"q": "x"})));
    }

    #[test]
    fn test_requires_parent_and_declares_it() {
        let expected: ApiResult<ResponseObject> = Err(ApiError::MissingParent {
            resource: COLLECTION.to_string(),
        });
        assert_eq!(ExampleChildController.index(&Request::new("tenant")), expected);
        assert_eq!(
            ExampleChildController.create(&Request::new("tenant").with_parent("1"), None),
            Err(ApiError::NotImplemented {
                operation: nimbus_core::Operation::Create
            })
        );

        let resources = ExampleChildResource.resources();
        assert_eq!(resources.len(), 1);
        assert_eq!(
            resources[0].parent,
            Some(ParentSpec::new("os-example-resource", "exp_res"))
        );
    }
}
