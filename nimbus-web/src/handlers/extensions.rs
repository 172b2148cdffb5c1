//! Extension listing handlers

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::response::Json;
use nimbus_core::{ApiError, LoadedExtension};
use serde::Serialize;
use serde_json::{Value, json};

use crate::fault::Fault;
use crate::server::AppState;

/// Public view of a loaded extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionView {
    pub name: String,
    pub alias: String,
    pub namespace: String,
    pub updated: String,
    pub description: String,
    pub links: Vec<String>,
}

impl From<&LoadedExtension> for ExtensionView {
    fn from(loaded: &LoadedExtension) -> Self {
        let descriptor = &loaded.descriptor;
        Self {
            name: descriptor.name.to_string(),
            alias: descriptor.alias.to_string(),
            namespace: descriptor.namespace.to_string(),
            updated: loaded.updated.to_rfc3339(),
            description: descriptor.description.to_string(),
            links: Vec::new(),
        }
    }
}

pub async fn list_extensions(State(state): State<AppState>) -> Json<Value> {
    let extensions: Vec<ExtensionView> = state
        .plan
        .extensions()
        .iter()
        .map(ExtensionView::from)
        .collect();
    Json(json!({ "extensions": extensions }))
}

/// # Errors
/// - `Fault` - Path could not be decoded, or no loaded extension has `alias`
pub async fn show_extension(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<Value>, Fault> {
    let Path((_project_id, alias)) = path?;
    let loaded = state
        .plan
        .extension(&alias)
        .ok_or_else(|| ApiError::not_found("extensions", alias.as_str()))?;
    Ok(Json(json!({ "extension": ExtensionView::from(loaded) })))
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use nimbus_core::ExtensionDescriptor;

    use super::*;

    #[test]
    fn test_view_normalizes_timestamp() {
        let descriptor = ExtensionDescriptor {
            name: "Sample",
            alias: "os-sample",
            namespace: "http://example.com/os-sample",
            updated: "2014-07-04T00:00:00+08:00",
            description: "Sample extension.",
        };
        let loaded = LoadedExtension {
            descriptor,
            updated: DateTime::parse_from_rfc3339(descriptor.updated).unwrap(),
        };

        let view = ExtensionView::from(&loaded);
        assert_eq!(view.alias, "os-sample");
        assert_eq!(view.updated, "2014-07-04T00:00:00+08:00");
        assert!(view.links.is_empty());
    }
}
