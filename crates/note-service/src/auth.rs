//! Auth decision logic and the password-authentication endpoint.
//!
//! A note is protected iff its metadata carries a non-empty password digest.
//! A caller is authorized iff the note is unprotected OR the request's
//! `auth` cookie holds a token that verifies for this exact path.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use cookie::Cookie;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::AppState;
use crate::api::{ApiResponse, ERR_AUTH_FAILED, ERR_BAD_CONTENT_TYPE};
use crate::token::{self, Claims};
use note_store::NoteMeta;

pub const AUTH_COOKIE_NAME: &str = "auth";

/// Salted password digest: hex(SHA-256(salt || password)).
///
/// Deterministic, so stored digests compare by plain equality.
pub fn salt_password(passwd: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(passwd.as_bytes());
    hex::encode(hasher.finalize())
}

/// Extract the `auth` cookie value from request headers.
pub fn auth_cookie(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?;
    let cookie_str = cookie_header.to_str().ok()?;

    for part in cookie_str.split(';') {
        if let Ok(cookie) = Cookie::parse(part.trim()) {
            if cookie.name() == AUTH_COOKIE_NAME {
                return Some(cookie.value().to_string());
            }
        }
    }
    None
}

/// Whether the request carries a token that verifies for this exact path.
pub fn has_valid_token(headers: &HeaderMap, path: &str, secret: &str) -> bool {
    auth_cookie(headers)
        .and_then(|t| token::verify(&t, secret))
        .is_some_and(|claims| claims.path == path)
}

/// The authorization rule for every read and mutation on a note.
pub fn is_authorized(headers: &HeaderMap, path: &str, meta: &NoteMeta, secret: &str) -> bool {
    !meta.is_protected() || has_valid_token(headers, path, secret)
}

/// True when the request declares a JSON body.
pub fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_start().starts_with("application/json"))
}

/// Build the path-scoped, http-only `auth` cookie for a fresh token.
pub fn auth_cookie_set(path: &str, token: String, lifetime_days: i64) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE_NAME, token))
        .path(format!("/{}", path))
        .http_only(true)
        .max_age(time::Duration::days(lifetime_days))
        .build()
}

/// Build the clearing variant of the `auth` cookie (far-past expiry).
pub fn auth_cookie_clear(path: &str) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE_NAME, ""))
        .path(format!("/{}", path))
        .http_only(true)
        .expires(time::OffsetDateTime::UNIX_EPOCH)
        .build()
}

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub passwd: String,
}

/// POST /:path/auth - check a password and issue the auth cookie.
///
/// Repeated failures are not throttled; rate limiting is out of scope.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if !is_json(&headers) {
        return ApiResponse::bad_content_type().into_response();
    }
    let request: AuthRequest = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(_) => {
            return ApiResponse::err(ERR_BAD_CONTENT_TYPE, "Invalid JSON body").into_response();
        }
    };

    let meta = state.store.get_note(&path).unwrap_or_default().meta;
    if meta.is_protected() {
        let digest = salt_password(&request.passwd, &state.config.password_salt);
        if meta.pw.as_deref() == Some(digest.as_str()) {
            let claims = Claims::for_path(&path, state.config.token_lifetime_days);
            let signed = token::sign(&claims, &state.secret);
            let cookie = auth_cookie_set(&path, signed, state.config.token_lifetime_days);

            tracing::info!("Issued auth token for /{}", path);
            return (
                [(header::SET_COOKIE, cookie.to_string())],
                ApiResponse::ok_with(serde_json::json!({"refresh": true})),
            )
                .into_response();
        }
    }
    ApiResponse::err(ERR_AUTH_FAILED, "Password authentication failed!").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret";

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn protected_meta() -> NoteMeta {
        NoteMeta {
            pw: Some(salt_password("hunter2", "salt")),
            ..NoteMeta::default()
        }
    }

    #[test]
    fn salting_is_deterministic_and_salt_sensitive() {
        assert_eq!(salt_password("pw", "a"), salt_password("pw", "a"));
        assert_ne!(salt_password("pw", "a"), salt_password("pw", "b"));
        assert_ne!(salt_password("pw", "a"), salt_password("other", "a"));
    }

    #[test]
    fn unprotected_note_is_always_authorized() {
        let headers = HeaderMap::new();
        assert!(is_authorized(
            &headers,
            "foo",
            &NoteMeta::default(),
            SECRET
        ));
    }

    #[test]
    fn protected_note_requires_a_valid_token() {
        let meta = protected_meta();
        assert!(!is_authorized(&HeaderMap::new(), "foo", &meta, SECRET));

        let signed = token::sign(&Claims::for_path("foo", 7), SECRET);
        let headers = headers_with_cookie(&format!("auth={}", signed));
        assert!(is_authorized(&headers, "foo", &meta, SECRET));
    }

    #[test]
    fn token_for_another_path_does_not_authorize() {
        let meta = protected_meta();
        let signed = token::sign(&Claims::for_path("bar", 7), SECRET);
        let headers = headers_with_cookie(&format!("auth={}", signed));
        assert!(!is_authorized(&headers, "foo", &meta, SECRET));
    }

    #[test]
    fn auth_cookie_is_found_among_other_cookies() {
        let headers = headers_with_cookie("theme=dark; auth=tok; lang=en");
        assert_eq!(auth_cookie(&headers).as_deref(), Some("tok"));
        assert_eq!(auth_cookie(&HeaderMap::new()), None);
    }

    #[test]
    fn set_and_clear_cookies_are_path_scoped() {
        let set = auth_cookie_set("foo", "tok".to_string(), 7).to_string();
        assert!(set.contains("Path=/foo"));
        assert!(set.contains("HttpOnly"));

        let clear = auth_cookie_clear("foo").to_string();
        assert!(clear.contains("Path=/foo"));
        assert!(clear.contains("1970"));
    }

    #[test]
    fn json_content_type_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_json(&headers));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        assert!(is_json(&headers));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain"),
        );
        assert!(!is_json(&headers));
    }
}
