//! Fault responses for failed requests.
//!
//! Every failure is rendered as `{"<faultName>": {"message": ..., "code": ...}}`.

use axum::extract::rejection::{BytesRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use nimbus_core::ApiError;
use serde_json::{Value, json};

/// An [`ApiError`] on its way out as an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault(pub ApiError);

impl Fault {
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn body(&self) -> Value {
        let status = self.status();
        let name = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "computeFault"
        } else {
            self.0.fault_name()
        };
        json!({
            name: {
                "message": self.0.to_string(),
                "code": status.as_u16(),
            }
        })
    }
}

impl From<ApiError> for Fault {
    fn from(error: ApiError) -> Self {
        Self(error)
    }
}

fn malformed(reason: String) -> Fault {
    Fault(ApiError::InvalidRequest { reason })
}

impl From<PathRejection> for Fault {
    fn from(rejection: PathRejection) -> Self {
        malformed(rejection.body_text())
    }
}

impl From<QueryRejection> for Fault {
    fn from(rejection: QueryRejection) -> Self {
        malformed(rejection.body_text())
    }
}

impl From<BytesRejection> for Fault {
    fn from(rejection: BytesRejection) -> Self {
        malformed(rejection.body_text())
    }
}

impl IntoResponse for Fault {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
