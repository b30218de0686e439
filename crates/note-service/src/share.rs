//! Public read-only access to shared notes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use sha2::{Digest, Sha256};

use crate::pages::{self, i18n::Lang};
use crate::{AppState, render};

/// Deterministic share hash for a note path: truncated hex SHA-256.
///
/// Deterministic per path, so re-enabling share recreates the same mapping
/// and a path never accumulates more than one.
pub fn share_hash(path: &str) -> String {
    let digest = Sha256::digest(path.as_bytes());
    hex::encode(digest)[..16].to_string()
}

/// GET /share/:hash - read-only view of a shared note.
///
/// A valid hash renders the note's current content no matter its protection
/// state; publishing a share link deliberately bypasses the password.
pub async fn view_shared(
    State(state): State<Arc<AppState>>,
    Path(hash): Path<String>,
    headers: HeaderMap,
) -> Response {
    let lang = Lang::from_headers(&headers);

    let Some(path) = state.store.get_share(&hash) else {
        return (StatusCode::NOT_FOUND, Html(pages::not_found_page(lang))).into_response();
    };

    let record = state.store.get_note(&path).unwrap_or_default();
    let rendered = render::note_html(&record);
    Html(pages::share_page(lang, &path, &rendered)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_hashes_are_short_stable_and_distinct() {
        let a = share_hash("foo");
        assert_eq!(a.len(), 16);
        assert_eq!(a, share_hash("foo"));
        assert_ne!(a, share_hash("bar"));
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
