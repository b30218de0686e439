//! Note page rendering and raw body saves.

use std::sync::Arc;

use axum::Form;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse};
use chrono::Utc;
use serde::Deserialize;

use crate::api::{ApiResponse, ERR_AUTH_FAILED, ERR_SAVE_FAILED};
use crate::pages::{self, i18n::Lang};
use crate::{AppState, auth, generate_random_string};

/// GET / - redirect to a fresh random note path.
///
/// The target path is not persisted until its first save.
pub async fn new_note_redirect(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let slug = generate_random_string(state.config.random_path_len);
    (StatusCode::FOUND, [(header::LOCATION, format!("/{}", slug))])
}

/// GET /:path - the edit page, or a password prompt when the note is
/// protected and the request carries no valid token.
pub async fn view_note(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Html<String> {
    let lang = Lang::from_headers(&headers);
    let record = state.store.get_note(&path).unwrap_or_default();

    if auth::is_authorized(&headers, &path, &record.meta, &state.secret) {
        Html(pages::edit_page(lang, &path, &record))
    } else {
        Html(pages::password_page(lang, &path))
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveForm {
    /// The new note body.
    pub t: String,
}

/// POST /:path - overwrite the note body (form-encoded autosave).
pub async fn save_body(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    headers: HeaderMap,
    Form(form): Form<SaveForm>,
) -> ApiResponse {
    let mut record = state.store.get_note(&path).unwrap_or_default();

    if !auth::is_authorized(&headers, &path, &record.meta, &state.secret) {
        return ApiResponse::err(
            ERR_AUTH_FAILED,
            "Password authentication failed! Try refreshing this page if you had just set a password.",
        );
    }

    record.body = form.t;
    record.meta.updated_at = Some(Utc::now().timestamp());

    match state.store.put_note(&path, record) {
        Ok(()) => ApiResponse::ok(),
        Err(e) => {
            tracing::error!("Failed to save note /{}: {}", path, e);
            ApiResponse::err(ERR_SAVE_FAILED, "Saving the note failed!")
        }
    }
}

/// Fallback for every unmatched route.
pub async fn not_found(headers: HeaderMap) -> impl IntoResponse {
    let lang = Lang::from_headers(&headers);
    (StatusCode::NOT_FOUND, Html(pages::not_found_page(lang)))
}
