//! Route builder: turns a mount plan into an axum router.
//!
//! Layout, relative to `/{api_prefix}/{project_id}`:
//! - `{collection}`                      GET index, POST create
//! - `{collection}/{action}`             collection actions
//! - `{collection}/{id}`                 GET show, PUT update, DELETE delete
//! - `{collection}/{id}/{action}`        member actions
//! - `{parent}/{id}/{collection}[/{child_id}[/{action}]]` for nested resources
//! - `extensions`, `extensions/{alias}`  extension listing
//!
//! Static action segments take priority over the `{id}` capture.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::routing::{MethodFilter, MethodRouter, get};
use nimbus_core::{ActionMethod, MountPlan, MountedResource, Operation, ServerConfig};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    RouteTarget, handle_route, list_extensions, method_not_allowed, route_not_found,
    show_extension,
};
use crate::server::AppState;

pub const PROJECT_PARAM: &str = "project_id";
pub const ITEM_PARAM: &str = "id";
pub const CHILD_ITEM_PARAM: &str = "child_id";

/// One mounted (verb, path) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    pub method: ActionMethod,
    /// axum path template
    pub path: String,
    /// Index into `MountPlan::resources`
    pub resource: usize,
    pub operation: Operation,
}

fn collection_base(prefix: &str, resource: &MountedResource) -> String {
    match &resource.parent {
        Some(parent) => format!(
            "/{prefix}/{{{PROJECT_PARAM}}}/{}/{{{ITEM_PARAM}}}/{}",
            parent.collection_name, resource.collection
        ),
        None => format!("/{prefix}/{{{PROJECT_PARAM}}}/{}", resource.collection),
    }
}

/// Name of the path capture holding the item id of `resource`.
pub fn item_param(resource: &MountedResource) -> &'static str {
    if resource.parent.is_some() {
        CHILD_ITEM_PARAM
    } else {
        ITEM_PARAM
    }
}

/// Computes every route the plan mounts, in a stable order.
pub fn route_table(plan: &MountPlan, api_prefix: &str) -> Vec<RouteSpec> {
    let prefix = api_prefix.trim_matches('/');
    let mut routes = Vec::new();

    for (index, resource) in plan.resources().iter().enumerate() {
        let base = collection_base(prefix, resource);
        let item = format!("{base}/{{{}}}", item_param(resource));
        let mut push = |method, path: String, operation| {
            routes.push(RouteSpec {
                method,
                path,
                resource: index,
                operation,
            })
        };

        push(ActionMethod::Get, base.clone(), Operation::Index);
        push(ActionMethod::Post, base.clone(), Operation::Create);
        for (action, method) in resource.collection_actions() {
            push(
                *method,
                format!("{base}/{action}"),
                Operation::CollectionAction(action.clone()),
            );
        }
        push(ActionMethod::Get, item.clone(), Operation::Show);
        push(ActionMethod::Put, item.clone(), Operation::Update);
        push(ActionMethod::Delete, item.clone(), Operation::Delete);
        for (action, mounted) in resource.member_actions() {
            push(
                mounted.method,
                format!("{item}/{action}"),
                Operation::MemberAction(action.clone()),
            );
        }
    }

    routes
}

fn method_filter(method: ActionMethod) -> MethodFilter {
    match method {
        ActionMethod::Get => MethodFilter::GET,
        ActionMethod::Post => MethodFilter::POST,
        ActionMethod::Put => MethodFilter::PUT,
        ActionMethod::Delete => MethodFilter::DELETE,
    }
}

/// Builds the complete application router for `plan`.
pub fn build_router(plan: Arc<MountPlan>, config: &ServerConfig) -> Router {
    let prefix = config.api_prefix.trim_matches('/');
    let mut by_path: BTreeMap<String, MethodRouter<AppState>> = BTreeMap::new();

    for route in route_table(&plan, prefix) {
        let target = RouteTarget {
            resource: Arc::clone(&plan.resources()[route.resource]),
            operation: route.operation,
        };
        let handler = move |params: Result<Path<HashMap<String, String>>, PathRejection>,
                            query: Result<Query<BTreeMap<String, String>>, QueryRejection>,
                            body: Result<Bytes, BytesRejection>| {
            let target = target.clone();
            async move { handle_route(&target, params, query, body) }
        };

        let method_router = by_path.remove(&route.path).unwrap_or_else(MethodRouter::new);
        by_path.insert(route.path, method_router.on(method_filter(route.method), handler));
    }

    let mut router = Router::new();
    for (path, method_router) in by_path {
        tracing::debug!(path = %path, "Mounted route");
        router = router.route(&path, method_router);
    }

    router
        .route(
            &format!("/{prefix}/{{{PROJECT_PARAM}}}/extensions"),
            get(list_extensions),
        )
        .route(
            &format!("/{prefix}/{{{PROJECT_PARAM}}}/extensions/{{alias}}"),
            get(show_extension),
        )
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { plan })
}
