//! Request handler contract for mounted resources.

use std::fmt;

use serde_json::Value;

use super::{Request, ResponseObject};
use crate::{ApiError, ApiResult};

/// Operation a request is dispatched to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    Index,
    Show,
    Create,
    Update,
    Delete,
    /// Custom action on a single item, mounted at `{collection}/{id}/{action}`
    MemberAction(String),
    /// Custom action on the whole collection, mounted at `{collection}/{action}`
    CollectionAction(String),
}

impl Operation {
    /// True for operations addressed at a single item.
    pub fn takes_id(&self) -> bool {
        matches!(
            self,
            Self::Show | Self::Update | Self::Delete | Self::MemberAction(_)
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index => f.write_str("index"),
            Self::Show => f.write_str("show"),
            Self::Create => f.write_str("create"),
            Self::Update => f.write_str("update"),
            Self::Delete => f.write_str("delete"),
            Self::MemberAction(action) | Self::CollectionAction(action) => f.write_str(action),
        }
    }
}

/// Handler for one resource collection.
///
/// Every method is synchronous and must not touch shared mutable state; the
/// host calls them concurrently from any worker thread. Methods a controller
/// does not override answer with [`ApiError::NotImplemented`] or
/// [`ApiError::UnknownAction`].
///
/// For nested resources the parent identifier is on the request, see
/// [`Request::parent_id`].
pub trait Controller: Send + Sync {
    /// `GET {collection}`
    ///
    /// # Errors
    /// - `ApiError::NotImplemented` - Unless overridden
    fn index(&self, _req: &Request) -> ApiResult<ResponseObject> {
        Err(ApiError::NotImplemented {
            operation: Operation::Index,
        })
    }

    /// `GET {collection}/{id}`
    ///
    /// # Errors
    /// - `ApiError::NotImplemented` - Unless overridden
    fn show(&self, _req: &Request, _id: &str) -> ApiResult<ResponseObject> {
        Err(ApiError::NotImplemented {
            operation: Operation::Show,
        })
    }

    /// `POST {collection}`
    ///
    /// # Errors
    /// - `ApiError::NotImplemented` - Unless overridden
    fn create(&self, _req: &Request, _body: Option<&Value>) -> ApiResult<ResponseObject> {
        Err(ApiError::NotImplemented {
            operation: Operation::Create,
        })
    }

    /// `PUT {collection}/{id}`
    ///
    /// # Errors
    /// - `ApiError::NotImplemented` - Unless overridden
    fn update(&self, _req: &Request, _id: &str, _body: Option<&Value>) -> ApiResult<ResponseObject> {
        Err(ApiError::NotImplemented {
            operation: Operation::Update,
        })
    }

    /// `DELETE {collection}/{id}`
    ///
    /// # Errors
    /// - `ApiError::NotImplemented` - Unless overridden
    fn delete(&self, _req: &Request, _id: &str) -> ApiResult<ResponseObject> {
        Err(ApiError::NotImplemented {
            operation: Operation::Delete,
        })
    }

    /// Custom action on a single item.
    ///
    /// # Errors
    /// - `ApiError::UnknownAction` - Unless overridden for `action`
    fn member_action(
        &self,
        action: &str,
        _req: &Request,
        _id: &str,
        _body: Option<&Value>,
    ) -> ApiResult<ResponseObject> {
        Err(ApiError::UnknownAction {
            resource: String::new(),
            action: action.to_string(),
        })
    }

    /// Custom action on the whole collection.
    ///
    /// # Errors
    /// - `ApiError::UnknownAction` - Unless overridden for `action`
    fn collection_action(
        &self,
        action: &str,
        _req: &Request,
        _body: Option<&Value>,
    ) -> ApiResult<ResponseObject> {
        Err(ApiError::UnknownAction {
            resource: String::new(),
            action: action.to_string(),
        })
    }
}
