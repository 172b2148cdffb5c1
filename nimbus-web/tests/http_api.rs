//! End-to-end tests of the HTTP surface with the bundled extensions mounted.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use nimbus_core::{ExtensionsConfig, MountPlan, ServerConfig};
use nimbus_web::build_router;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app_with(extensions: ExtensionsConfig) -> Router {
    let plan = MountPlan::from_extensions(&extensions, &nimbus_contrib::all_extensions()).unwrap();
    build_router(Arc::new(plan), &ServerConfig::default())
}

fn app() -> Router {
    app_with(ExtensionsConfig::default())
}

async fn call(app: Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_show_is_extended() {
    let (status, body) = call(
        app(),
        Method::GET,
        "/v2/tenant/os-example-resource/2?verbose=1",
        "",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"data": {
            "msg": "You are showing resource object: 2",
            "data": {"id": "2", "content": "It is a square"},
            "parameters": {"verbose": "1"},
            "extends": {
                "msg": "This is extended show()",
                "id": "2",
                "parameters": {"verbose": "1"},
            },
        }})
    );
}

#[tokio::test]
async fn test_index_lists_all_entries() {
    let (status, body) = call(app(), Method::GET, "/v2/tenant/os-example-resource", "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["msg"], json!("You are showing index"));
    let data = body["data"]["data"].as_object().unwrap();
    assert_eq!(data.len(), 3);
    assert_eq!(data["3"], json!({"id": "3", "content": "It is a triangle"}));
    assert!(body["data"].get("extends").is_none());
}

#[tokio::test]
async fn test_unknown_item_is_not_found() {
    for method in [Method::GET, Method::PUT, Method::DELETE] {
        let (status, body) =
            call(app(), method.clone(), "/v2/tenant/os-example-resource/9", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method}");
        assert_eq!(body["itemNotFound"]["code"], json!(404));
    }

    let (status, _) = call(
        app(),
        Method::GET,
        "/v2/tenant/os-example-resource/9/custom_action",
        "",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_and_update_echo_body() {
    let (status, body) = call(
        app(),
        Method::POST,
        "/v2/tenant/os-example-resource",
        r#"{"name": "cube"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"data": {
            "msg": "You are creating resource object",
            "parameters": {"name": "cube"},
        }})
    );

    let (status, body) = call(
        app(),
        Method::PUT,
        "/v2/tenant/os-example-resource/1",
        r#"{"content": "round"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["msg"], json!("You are updating resource object: 1"));
    assert_eq!(body["data"]["parameters"], json!({"content": "round"}));
}

#[tokio::test]
async fn test_member_action_update_is_extended_with_body() {
    let (status, body) = call(
        app(),
        Method::PUT,
        "/v2/tenant/os-example-resource/3/custom_action_update",
        r#"{"a": 10}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["msg"],
        json!("You are doing custom_action_update on resource object: 3")
    );
    assert_eq!(
        body["data"]["extends"],
        json!({
            "msg": "This is extended custom_action_update()",
            "id": "3",
            "parameters": {"a": 10},
        })
    );
}

#[tokio::test]
async fn test_collection_actions() {
    let (status, body) = call(
        app(),
        Method::GET,
        "/v2/tenant/os-example-resource/custom_collection_action?x=y",
        "",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["msg"],
        json!("You are doing custom_collection_action on resource objects.")
    );
    assert_eq!(body["data"]["parameters"], json!({"x": "y"}));

    let (status, body) = call(
        app(),
        Method::PUT,
        "/v2/tenant/os-example-resource/custom_collection_action_update",
        r#"{"all": true}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["parameters"], json!({"all": true}));
    assert_eq!(body["data"]["data"].as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn test_custom_extend_action() {
    let (status, body) = call(
        app(),
        Method::GET,
        "/v2/tenant/os-example-resource/7/custom_extend",
        "",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"data": {
            "msg": "This custom_extend() on resource object: 7",
            "id": "7",
            "parameters": {},
        }})
    );
}

#[tokio::test]
async fn test_child_resource_routes() {
    let (status, body) = call(
        app(),
        Method::GET,
        "/v2/tenant/os-example-resource/1/os-example-child-resource",
        "",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"data": {
            "msg": "You are showing child index of parent: 1",
            "parent_id": "1",
        }})
    );

    let (status, body) = call(
        app(),
        Method::GET,
        "/v2/tenant/os-example-resource/5/os-example-child-resource/8",
        "",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["msg"],
        json!("You are showing child resource object 8 of parent 5")
    );
    assert_eq!(body["data"]["id"], json!("8"));

    let (status, body) = call(
        app(),
        Method::POST,
        "/v2/tenant/os-example-resource/1/os-example-child-resource",
        "",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(body["notImplemented"]["code"], json!(501));
}

#[tokio::test]
async fn test_invalid_body_is_bad_request() {
    let (status, body) = call(
        app(),
        Method::POST,
        "/v2/tenant/os-example-resource",
        "{not json",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["badRequest"]["code"], json!(400));
}

#[tokio::test]
async fn test_disabled_controller_extension() {
    let mut extensions = ExtensionsConfig::default();
    extensions.disable("os-example-controller-extension");

    let (status, body) = call(
        app_with(extensions.clone()),
        Method::GET,
        "/v2/tenant/os-example-resource/2",
        "",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].get("extends").is_none());

    let (status, _) = call(
        app_with(extensions),
        Method::GET,
        "/v2/tenant/os-example-resource/2/custom_extend",
        "",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_extension_listing() {
    let (status, body) = call(app(), Method::GET, "/v2/tenant/extensions", "").await;
    assert_eq!(status, StatusCode::OK);

    let aliases: Vec<&str> = body["extensions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["alias"].as_str().unwrap())
        .collect();
    assert_eq!(
        aliases,
        vec![
            "os-example-resource",
            "os-example-child-resource",
            "os-example-controller-extension",
        ]
    );

    let (status, body) = call(
        app(),
        Method::GET,
        "/v2/tenant/extensions/os-example-child-resource",
        "",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["extension"]["name"], json!("ExampleChildResource"));
    assert_eq!(body["extension"]["updated"], json!("2014-07-04T00:00:00+08:00"));
    assert_eq!(body["extension"]["links"], json!([]));

    let (status, body) = call(app(), Method::GET, "/v2/tenant/extensions/os-nope", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.get("itemNotFound").is_some());
}

#[tokio::test]
async fn test_unrouted_path_is_not_found() {
    let (status, body) = call(app(), Method::GET, "/v2/tenant/os-unknown", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["itemNotFound"]["code"], json!(404));
}

#[tokio::test]
async fn test_undecodable_path_is_bad_request_fault() {
    let (status, body) = call(app(), Method::GET, "/v2/tenant/os-example-resource/%FF", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["badRequest"]["code"], json!(400));
    assert!(
        body["badRequest"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Malformed request")
    );

    let (status, body) = call(app(), Method::GET, "/v2/tenant/extensions/%FF", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("badRequest").is_some());
}

#[tokio::test]
async fn test_unmounted_verb_is_bad_method_fault() {
    let (status, body) = call(app(), Method::POST, "/v2/tenant/os-example-resource/1", "").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        body,
        json!({"badMethod": {
            "message": "Method POST is not allowed on /v2/tenant/os-example-resource/1",
            "code": 405,
        }})
    );

    let (status, body) = call(
        app(),
        Method::DELETE,
        "/v2/tenant/os-example-resource/custom_collection_action",
        "",
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["badMethod"]["code"], json!(405));
}
