//! Path-addressed note sharing service.
//!
//! Every single-segment URL path is a note. Unprotected notes render an
//! inline editor; protected notes demand a password and issue a path-scoped
//! signed cookie on success. Notes can be published read-only under
//! `/share/<hash>`.

pub mod api;
pub mod auth;
pub mod config;
pub mod notes;
pub mod pages;
pub mod render;
pub mod settings;
pub mod share;
pub mod token;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use note_store::Store;

/// Shared application state
pub struct AppState {
    pub config: Config,
    /// Token signing secret, resolved at startup (config value or generated).
    pub secret: String,
    pub store: Store,
}

/// Build the service router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(notes::new_note_redirect))
        .route("/share/{hash}", get(share::view_shared))
        .route("/{path}", get(notes::view_note).post(notes::save_body))
        .route("/{path}/auth", post(auth::authenticate))
        .route("/{path}/pw", post(settings::set_password))
        .route("/{path}/setting", post(settings::update_settings))
        .fallback(notes::not_found)
        .layer(CatchPanicLayer::custom(api::panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Generate a random alphanumeric string.
pub fn generate_random_string(len: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..len)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_strings_are_alphanumeric_and_sized() {
        let s = generate_random_string(16);
        assert_eq!(s.len(), 16);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn random_strings_differ() {
        assert_ne!(generate_random_string(16), generate_random_string(16));
    }
}
