//! Response builder shared by controllers and hooks.

use serde_json::{Map, Value, json};

/// The `data` object of a response, serialized as `{"data": {...}}`.
///
/// Controllers build it with [`ResponseObject::field`]. Hooks may only add
/// keys through [`ResponseObject::extend_data`], which never replaces what
/// the controller or an earlier hook wrote.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseObject {
    data: Map<String, Value>,
    rejected: Vec<String>,
}

impl ResponseObject {
    /// Starts a response whose `msg` field is `message`.
    pub fn with_message(message: impl Into<String>) -> Self {
        let mut data = Map::new();
        data.insert("msg".to_string(), Value::String(message.into()));
        Self {
            data,
            rejected: Vec::new(),
        }
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Inserts `key` only if absent. Returns whether the value was inserted.
    pub fn extend_data(&mut self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        let key = key.into();
        if self.data.contains_key(&key) {
            self.rejected.push(key);
            return false;
        }
        self.data.insert(key, value.into());
        true
    }

    /// Drains the keys `extend_data` refused since the last call.
    pub fn take_rejected(&mut self) -> Vec<String> {
        std::mem::take(&mut self.rejected)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn message(&self) -> Option<&str> {
        self.data.get("msg").and_then(Value::as_str)
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Wraps the data object into the final response body.
    pub fn into_body(self) -> Value {
        json!({ "data": Value::Object(self.data) })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_body_shape() {
        let body = ResponseObject::with_message("hello")
            .field("id", "2")
            .into_body();
        assert_eq!(body, json!({"data": {"msg": "hello", "id": "2"}}));
    }

    #[test]
    fn test_extend_data_never_clobbers() {
        let mut response = ResponseObject::with_message("original").field("id", "1");

        assert!(!response.extend_data("msg", "hooked"));
        assert!(!response.extend_data("id", "other"));
        assert!(response.extend_data("extends", json!({"msg": "extra"})));
        assert!(!response.extend_data("extends", json!({"msg": "second"})));

        assert_eq!(response.message(), Some("original"));
        assert_eq!(response.get("id"), Some(&json!("1")));
        assert_eq!(response.get("extends"), Some(&json!({"msg": "extra"})));
        assert_eq!(
            response.take_rejected(),
            vec!["msg".to_string(), "id".to_string(), "extends".to_string()]
        );
        assert!(response.take_rejected().is_empty());
    }

    proptest! {
        #[test]
        fn test_existing_fields_survive_any_hook(
            existing in prop::collection::btree_map("[a-z]{1,6}", "[a-z0-9]{0,8}", 0..6),
            added in prop::collection::btree_map("[a-z]{1,6}", "[a-z0-9]{0,8}", 0..6),
        ) {
            let mut response = ResponseObject::with_message("original");
            for (key, value) in &existing {
                response = response.field(key.as_str(), value.as_str());
            }
            let before = response.data().clone();

            for (key, value) in &added {
                let inserted = response.extend_data(key.as_str(), value.as_str());
                prop_assert_eq!(inserted, !before.contains_key(key));
            }

            for (key, value) in &before {
                prop_assert_eq!(response.get(key), Some(value));
            }
            let rejected = response.take_rejected();
            prop_assert!(rejected.iter().all(|key| before.contains_key(key)));
        }
    }
}
