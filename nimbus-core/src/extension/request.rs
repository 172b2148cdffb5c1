//! Per-request context handed to controllers and hooks.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use uuid::Uuid;

/// Immutable view of an incoming request.
///
/// Carries the tenant scope and nested-resource parent taken from the URL,
/// the decoded query string, and an id used to correlate log lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    project_id: String,
    parent_id: Option<String>,
    query: BTreeMap<String, String>,
    request_id: Uuid,
}

impl Request {
    /// Creates a request scoped to `project_id` with a fresh request id.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            parent_id: None,
            query: BTreeMap::new(),
            request_id: Uuid::new_v4(),
        }
    }

    /// Sets the parent identifier supplied by nested routing.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Replaces the query parameters.
    pub fn with_query(mut self, query: BTreeMap<String, String>) -> Self {
        self.query = query;
        self
    }

    /// Adds a single query parameter, replacing an earlier value for `key`.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Query parameters as a JSON object, for echoing back in responses.
    pub fn query_json(&self) -> Value {
        let params: Map<String, Value> = self
            .query
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Value::Object(params)
    }
}
