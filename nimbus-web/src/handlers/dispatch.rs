//! Per-request dispatch into mounted resources.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::http::{Method, Uri};
use axum::response::Json;
use nimbus_core::{ApiError, MountedResource, Operation, Request};
use serde_json::Value;

use crate::fault::Fault;
use crate::router::{ITEM_PARAM, PROJECT_PARAM, item_param};

/// What a single route invokes.
#[derive(Debug, Clone)]
pub struct RouteTarget {
    pub resource: Arc<MountedResource>,
    pub operation: Operation,
}

/// Decodes an optional JSON body; empty or blank bodies are `None`.
///
/// # Errors
/// - `ApiError::InvalidBody` - Body is present but not valid JSON
pub fn decode_body(body: &[u8]) -> Result<Option<Value>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| ApiError::InvalidBody {
            reason: e.to_string(),
        })
}

/// Builds the request context from path captures and runs the target.
///
/// # Errors
/// - `Fault` - Wraps any error from body decoding, the controller, or the
///   nested-resource parent check
pub fn dispatch(
    target: &RouteTarget,
    params: &HashMap<String, String>,
    query: BTreeMap<String, String>,
    body: &[u8],
) -> Result<Json<Value>, Fault> {
    let resource = &target.resource;
    let project_id = params.get(PROJECT_PARAM).cloned().unwrap_or_default();

    let mut req = Request::new(project_id).with_query(query);
    if resource.parent.is_some() {
        if let Some(parent_id) = params.get(ITEM_PARAM) {
            req = req.with_parent(parent_id.clone());
        }
    }
    let id = params.get(item_param(resource)).map(String::as_str);

    let span = tracing::info_span!(
        "dispatch",
        request_id = %req.request_id(),
        project_id = %req.project_id(),
        collection = %resource.collection,
        operation = %target.operation,
    );

    span.in_scope(|| {
        let body = decode_body(body)?;
        tracing::debug!(id = ?id, has_body = body.is_some(), "Dispatching request");

        match resource.invoke(&target.operation, &req, id, body.as_ref()) {
            Ok(response) => {
                tracing::debug!("Request handled");
                Ok(Json(response.into_body()))
            }
            Err(error) => {
                tracing::info!(%error, "Request failed");
                Err(Fault::from(error))
            }
        }
    })
}

/// Unwraps the extractors of a resource route, turning any rejection into a
/// `badRequest` fault, then dispatches.
///
/// # Errors
/// - `Fault` - An extractor rejected the request, or [`dispatch`] failed
pub fn handle_route(
    target: &RouteTarget,
    params: Result<Path<HashMap<String, String>>, PathRejection>,
    query: Result<Query<BTreeMap<String, String>>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, Fault> {
    let Path(params) = params?;
    let Query(query) = query?;
    let body = body?;
    dispatch(target, &params, query, &body)
}

/// Fallback for known paths requested with an unmounted verb.
pub async fn method_not_allowed(method: Method, uri: Uri) -> Fault {
    tracing::debug!(%method, path = %uri.path(), "Verb not mounted");
    Fault::from(ApiError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_string(),
    })
}

/// Fallback for paths no route matches.
pub async fn route_not_found(uri: Uri) -> Fault {
    tracing::debug!(path = %uri.path(), "No route");
    Fault::from(ApiError::not_found("route", uri.path()))
}
