//! Password and settings mutations.
//!
//! Both endpoints re-run the auth decision on every call; authorization is
//! never cached server-side beyond what the token cookie itself encodes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::api::{
    ApiResponse, ERR_BAD_CONTENT_TYPE, ERR_INTERNAL, ERR_PW_FAILED, ERR_SETTING_FAILED,
};
use crate::share::share_hash;
use crate::{AppState, auth};
use note_store::NoteMode;

#[derive(Debug, Deserialize)]
pub struct PasswordRequest {
    pub passwd: String,
}

/// POST /:path/pw - set or clear the note password.
///
/// An empty password clears protection. The auth cookie is cleared in every
/// success response: changing the password invalidates existing sessions.
pub async fn set_password(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if !auth::is_json(&headers) {
        return ApiResponse::bad_content_type().into_response();
    }
    let request: PasswordRequest = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(_) => {
            return ApiResponse::err(ERR_BAD_CONTENT_TYPE, "Invalid JSON body").into_response();
        }
    };

    let mut record = state.store.get_note(&path).unwrap_or_default();

    if !auth::is_authorized(&headers, &path, &record.meta, &state.secret) {
        return ApiResponse::err(ERR_PW_FAILED, "Password setting failed or unauthorized!")
            .into_response();
    }

    record.meta.pw = if request.passwd.is_empty() {
        None
    } else {
        Some(auth::salt_password(&request.passwd, &state.config.password_salt))
    };

    match state.store.put_note(&path, record) {
        Ok(()) => (
            [(header::SET_COOKIE, auth::auth_cookie_clear(&path).to_string())],
            ApiResponse::ok(),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to set password for /{}: {}", path, e);
            ApiResponse::err(ERR_INTERNAL, "Failed to set password").into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    /// New rendering mode; absent leaves the current mode untouched.
    #[serde(default)]
    pub mode: Option<NoteMode>,
    /// New sharing state; absent leaves the current state untouched.
    #[serde(default)]
    pub share: Option<bool>,
}

/// POST /:path/setting - partial update of `mode` and `share`.
///
/// Toggling `share` on creates (or idempotently recreates) the hash→path
/// mapping and returns the hash; toggling it off deletes the mapping.
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if !auth::is_json(&headers) {
        return ApiResponse::bad_content_type().into_response();
    }
    let request: SettingsRequest = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(_) => {
            return ApiResponse::err(ERR_BAD_CONTENT_TYPE, "Invalid JSON body").into_response();
        }
    };

    let mut record = state.store.get_note(&path).unwrap_or_default();

    if !auth::is_authorized(&headers, &path, &record.meta, &state.secret) {
        return ApiResponse::err(ERR_SETTING_FAILED, "Update settings failed or unauthorized!")
            .into_response();
    }

    if let Some(mode) = request.mode {
        record.meta.mode = mode;
    }
    if let Some(share) = request.share {
        record.meta.share = share;
    }

    if let Err(e) = state.store.put_note(&path, record) {
        tracing::error!("Failed to update settings for /{}: {}", path, e);
        return ApiResponse::err(ERR_INTERNAL, "Failed to update settings").into_response();
    }

    match request.share {
        Some(true) => {
            let hash = share_hash(&path);
            match state.store.put_share(&hash, &path) {
                Ok(()) => ApiResponse::ok_with(serde_json::json!(hash)).into_response(),
                Err(e) => {
                    tracing::error!("Failed to create share mapping for /{}: {}", path, e);
                    ApiResponse::err(ERR_INTERNAL, "Failed to update settings").into_response()
                }
            }
        }
        Some(false) => {
            let hash = share_hash(&path);
            match state.store.delete_share(&hash) {
                Ok(_) => ApiResponse::ok().into_response(),
                Err(e) => {
                    tracing::error!("Failed to delete share mapping for /{}: {}", path, e);
                    ApiResponse::err(ERR_INTERNAL, "Failed to update settings").into_response()
                }
            }
        }
        None => ApiResponse::ok().into_response(),
    }
}
