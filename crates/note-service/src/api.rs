//! JSON response envelope shared by all mutation endpoints.
//!
//! Every mutation answers `{err, data?, msg?}` where `err: 0` means success.
//! Domain codes (10001..) ride on HTTP 200 so the client can message the
//! user; envelope codes 400 and 500 also set the matching HTTP status.

use std::any::Any;

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

pub const ERR_BAD_CONTENT_TYPE: u32 = 400;
pub const ERR_INTERNAL: u32 = 500;
/// Body save hit a storage failure (distinct from auth failure so the
/// client can message the user accordingly).
pub const ERR_SAVE_FAILED: u32 = 10001;
pub const ERR_AUTH_FAILED: u32 = 10002;
pub const ERR_PW_FAILED: u32 = 10003;
pub const ERR_SETTING_FAILED: u32 = 10004;

#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub err: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl ApiResponse {
    pub fn ok() -> Self {
        Self {
            err: 0,
            data: None,
            msg: None,
        }
    }

    pub fn ok_with(data: Value) -> Self {
        Self {
            err: 0,
            data: Some(data),
            msg: None,
        }
    }

    pub fn err(code: u32, msg: impl Into<String>) -> Self {
        Self {
            err: code,
            data: None,
            msg: Some(msg.into()),
        }
    }

    pub fn bad_content_type() -> Self {
        Self::err(ERR_BAD_CONTENT_TYPE, "Invalid Content-Type")
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = match self.err {
            ERR_BAD_CONTENT_TYPE => StatusCode::BAD_REQUEST,
            ERR_INTERNAL => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::OK,
        };
        (status, Json(self)).into_response()
    }
}

/// Converts a handler panic into the generic 500 envelope.
/// Installed at the top of the middleware stack.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "application/json")],
        serde_json::json!({"err": ERR_INTERNAL, "msg": "Internal Server Error"}).to_string(),
    )
        .into_response()
}
