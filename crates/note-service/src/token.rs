//! Signed auth tokens.
//!
//! A token binds a note path to "authorized" status for a limited time:
//! base64url(claims JSON) + "." + base64url(HMAC-SHA256 of the claims).
//! `sign`/`verify` are the whole surface; the cookie layer above never
//! inspects token internals.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Claims embedded in an auth token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The note path this token authorizes.
    pub path: String,
    /// Expiry, unix seconds.
    pub exp: i64,
}

impl Claims {
    /// Claims for `path` expiring `lifetime_days` from now.
    pub fn for_path(path: &str, lifetime_days: i64) -> Self {
        Self {
            path: path.to_string(),
            exp: (Utc::now() + Duration::days(lifetime_days)).timestamp(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.exp <= Utc::now().timestamp()
    }
}

fn keyed_mac(secret: &str) -> HmacSha256 {
    HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length")
}

/// Sign claims into a token string.
pub fn sign(claims: &Claims, secret: &str) -> String {
    let payload = serde_json::to_vec(claims).expect("claims serialize to JSON");
    let mut mac = keyed_mac(secret);
    mac.update(&payload);
    let sig = mac.finalize().into_bytes();
    format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(&payload),
        URL_SAFE_NO_PAD.encode(sig)
    )
}

/// Verify a token's signature and expiry; returns its claims when valid.
pub fn verify(token: &str, secret: &str) -> Option<Claims> {
    let (payload_b64, sig_b64) = token.split_once('.')?;
    let payload = URL_SAFE_NO_PAD.decode(payload_b64).ok()?;
    let sig = URL_SAFE_NO_PAD.decode(sig_b64).ok()?;

    let mut mac = keyed_mac(secret);
    mac.update(&payload);
    mac.verify_slice(&sig).ok()?;

    let claims: Claims = serde_json::from_slice(&payload).ok()?;
    if claims.is_expired() {
        return None;
    }
    Some(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn sign_verify_roundtrips() {
        let claims = Claims::for_path("foo", 7);
        let token = sign(&claims, SECRET);
        assert_eq!(verify(&token, SECRET), Some(claims));
    }

    #[test]
    fn wrong_secret_fails() {
        let token = sign(&Claims::for_path("foo", 7), SECRET);
        assert_eq!(verify(&token, "other-secret"), None);
    }

    #[test]
    fn tampered_payload_fails() {
        let claims = Claims::for_path("foo", 7);
        let token = sign(&claims, SECRET);

        let forged_payload =
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&Claims::for_path("bar", 7)).unwrap());
        let sig = token.split_once('.').unwrap().1;
        assert_eq!(verify(&format!("{forged_payload}.{sig}"), SECRET), None);
    }

    #[test]
    fn expired_claims_fail() {
        let claims = Claims {
            path: "foo".to_string(),
            exp: Utc::now().timestamp() - 60,
        };
        let token = sign(&claims, SECRET);
        assert_eq!(verify(&token, SECRET), None);
    }

    #[test]
    fn garbage_tokens_fail() {
        assert_eq!(verify("", SECRET), None);
        assert_eq!(verify("not-a-token", SECRET), None);
        assert_eq!(verify("a.b.c", SECRET), None);
        assert_eq!(verify("!!!.???", SECRET), None);
    }
}
