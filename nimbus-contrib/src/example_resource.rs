//! Example resource extension: a brand-new top-level collection.
//!
//! Mounts `os-example-resource` with the five standard verbs, two custom
//! actions on single items and two on the whole collection. Every response
//! echoes the relevant slice of the backing data and the request parameters;
//! nothing is ever written.

use std::sync::Arc;

use nimbus_core::{
    ActionMethod, ApiError, ApiResult, Controller, Extension, ExtensionDescriptor, Request,
    ResourceExtension, ResponseObject,
};
use serde_json::Value;

use crate::store;

/// Collection name the resource is mounted under.
pub const COLLECTION: &str = "os-example-resource";

pub const CUSTOM_ACTION: &str = "custom_action";
pub const CUSTOM_ACTION_UPDATE: &str = "custom_action_update";
pub const CUSTOM_COLLECTION_ACTION: &str = "custom_collection_action";
pub const CUSTOM_COLLECTION_ACTION_UPDATE: &str = "custom_collection_action_update";

pub const DESCRIPTOR: ExtensionDescriptor = ExtensionDescriptor {
    name: "ExampleResource",
    alias: "os-example-resource",
    namespace: "http://docs.openstack.org/compute/ext/os-example-resource/api/v1.2",
    updated: "2014-07-04T00:00:00+08:00",
    description: "Example resource extension creates a new resource, which represents a \
                  collection of objects.",
};

fn record_json(id: &str) -> ApiResult<Value> {
    store::get(id)
        .map(store::Record::to_json)
        .ok_or_else(|| ApiError::not_found(COLLECTION, id))
}

fn body_json(body: Option<&Value>) -> Value {
    body.cloned().unwrap_or(Value::Null)
}

/// Handler for `os-example-resource`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExampleResourceController;

impl Controller for ExampleResourceController {
    fn index(&self, _req: &Request) -> ApiResult<ResponseObject> {
        Ok(ResponseObject::with_message("You are showing index").field("data", store::snapshot()))
    }

    fn show(&self, req: &Request, id: &str) -> ApiResult<ResponseObject> {
        let record = record_json(id)?;
        Ok(
            ResponseObject::with_message(format!("You are showing resource object: {id}"))
                .field("data", record)
                .field("parameters", req.query_json()),
        )
    }

    fn create(&self, _req: &Request, body: Option<&Value>) -> ApiResult<ResponseObject> {
        Ok(ResponseObject::with_message("You are creating resource object")
            .field("parameters", body_json(body)))
    }

    fn update(&self, _req: &Request, id: &str, body: Option<&Value>) -> ApiResult<ResponseObject> {
        let record = record_json(id)?;
        Ok(
            ResponseObject::with_message(format!("You are updating resource object: {id}"))
                .field("data", record)
                .field("parameters", body_json(body)),
        )
    }

    fn delete(&self, _req: &Request, id: &str) -> ApiResult<ResponseObject> {
        let record = record_json(id)?;
        Ok(
            ResponseObject::with_message(format!("You are deleting resource object: {id}"))
                .field("data", record),
        )
    }

    fn member_action(
        &self,
        action: &str,
        req: &Request,
        id: &str,
        body: Option<&Value>,
    ) -> ApiResult<ResponseObject> {
        let parameters = match action {
            CUSTOM_ACTION => req.query_json(),
            CUSTOM_ACTION_UPDATE => body_json(body),
            _ => {
                return Err(ApiError::UnknownAction {
                    resource: COLLECTION.to_string(),
                    action: action.to_string(),
                });
            }
        };
        let record = record_json(id)?;
        Ok(ResponseObject::with_message(format!(
            "You are doing {action} on resource object: {id}"
        ))
        .field("data", record)
        .field("parameters", parameters))
    }

    fn collection_action(
        &self,
        action: &str,
        req: &Request,
        body: Option<&Value>,
    ) -> ApiResult<ResponseObject> {
        let parameters = match action {
            CUSTOM_COLLECTION_ACTION => req.query_json(),
            CUSTOM_COLLECTION_ACTION_UPDATE => body_json(body),
            _ => {
                return Err(ApiError::UnknownAction {
                    resource: COLLECTION.to_string(),
                    action: action.to_string(),
                });
            }
        };
        Ok(
            ResponseObject::with_message(format!("You are doing {action} on resource objects."))
                .field("data", store::snapshot())
                .field("parameters", parameters),
        )
    }
}

/// Registers [`ExampleResourceController`] as a new collection.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExampleResource;

impl Extension for ExampleResource {
    fn descriptor(&self) -> ExtensionDescriptor {
        DESCRIPTOR
    }

    fn resources(&self) -> Vec<ResourceExtension> {
        let resource = ResourceExtension::new(COLLECTION, Arc::new(ExampleResourceController))
            .member_action(CUSTOM_ACTION, ActionMethod::Get)
            .member_action(CUSTOM_ACTION_UPDATE, ActionMethod::Put)
            .collection_action(CUSTOM_COLLECTION_ACTION, ActionMethod::Get)
            .collection_action(CUSTOM_COLLECTION_ACTION_UPDATE, ActionMethod::Put);
        vec![resource]
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    fn req() -> Request {
        Request::new("16c4a399b6ad4c31b683984bd9188817")
    }

    #[test]
    fn test_show_known_item() {
        let response = ExampleResourceController.show(&req(), "2").unwrap();
        assert_eq!(
            response.into_body(),
            json!({"data": {
                "msg": "You are showing resource object: 2",
                "data": {"id": "2", "content": "It is a square"},
                "parameters": {},
            }})
        );
    }

    #[test]
    fn test_item_operations_reject_unknown_id() {
        let controller = ExampleResourceController;
        let expected: ApiResult<ResponseObject> = Err(ApiError::not_found(COLLECTION, "9"));

        assert_eq!(controller.show(&req(), "9"), expected);
        assert_eq!(controller.update(&req(), "9", None), expected);
        assert_eq!(controller.delete(&req(), "9"), expected);
        assert_eq!(
            controller.member_action(CUSTOM_ACTION, &req(), "9", None),
            expected
        );
    }

    #[test]
    fn test_index_lists_every_record_once() {
        let response = ExampleResourceController.index(&req()).unwrap();
        let data = response.get("data").unwrap().as_object().unwrap();

        assert_eq!(data.len(), store::all().count());
        for record in store::all() {
            assert_eq!(data.get(record.id), Some(&record.to_json()));
        }
    }

    #[test]
    fn test_create_and_update_echo_body() {
        let body = json!({"a": 10, "b": 13});
        let controller = ExampleResourceController;

        let created = controller.create(&req(), Some(&body)).unwrap();
        assert_eq!(created.message(), Some("You are creating resource object"));
        assert_eq!(created.get("parameters"), Some(&body));

        let updated = controller.update(&req(), "1", Some(&body)).unwrap();
        assert_eq!(updated.message(), Some("You are updating resource object: 1"));
        assert_eq!(updated.get("parameters"), Some(&body));

        let empty = controller.create(&req(), None).unwrap();
        assert_eq!(empty.get("parameters"), Some(&Value::Null));
    }

    #[test]
    fn test_custom_actions() {
        let controller = ExampleResourceController;
        let query = req().with_param("verbose", "1");

        let action = controller
            .member_action(CUSTOM_ACTION, &query, "3", None)
            .unwrap();
        assert_eq!(
            action.message(),
            Some("You are doing custom_action on resource object: 3")
        );
        assert_eq!(action.get("parameters"), Some(&json!({"verbose": "1"})));

        let collection = controller
            .collection_action(CUSTOM_COLLECTION_ACTION_UPDATE, &req(), Some(&json!({"a": 1})))
            .unwrap();
        assert_eq!(
            collection.message(),
            Some("You are doing custom_collection_action_update on resource objects.")
        );
        assert_eq!(collection.get("data"), Some(&store::snapshot()));

        assert!(matches!(
            controller.collection_action("bogus", &req(), None),
            Err(ApiError::UnknownAction { .. })
        ));
    }

    #[test]
    fn test_actions_leave_data_untouched() {
        let controller = ExampleResourceController;
        let before = controller.show(&req(), "1").unwrap();

        controller
            .member_action(CUSTOM_ACTION_UPDATE, &req(), "1", Some(&json!({"content": "x"})))
            .unwrap();
        controller.update(&req(), "1", Some(&json!({"content": "y"}))).unwrap();
        controller.delete(&req(), "1").unwrap();

        assert_eq!(controller.show(&req(), "1").unwrap(), before);
    }

    proptest! {
        #[test]
        fn test_show_matches_store(id in "[0-9]{1,3}") {
            let result = ExampleResourceController.show(&req(), &id);
            match store::get(&id) {
                Some(record) => {
                    let response = result.unwrap();
                    let expected = record.to_json();
                    prop_assert_eq!(response.get("data"), Some(&expected));
                }
                None => prop_assert_eq!(result, Err(ApiError::not_found(COLLECTION, id.as_str()))),
            }
        }

        #[test]
        fn test_show_echoes_query(key in "[a-z]{1,8}", value in "[ -~]{0,16}") {
            let request = req().with_param(key.clone(), value.clone());
            let response = ExampleResourceController.show(&request, "1").unwrap();
            let expected = json!({ key: value });
            prop_assert_eq!(response.get("parameters"), Some(&expected));
        }
    }
}
