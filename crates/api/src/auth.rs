use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated satellite identity, extracted from HTTP Basic Auth.
/// The Basic `user` component becomes the satellite that scopes wallet
/// claims and payment queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Satellite(pub String);

impl FromRequestParts<AppState> for Satellite {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let (satellite, secret) = decode_basic(header).ok_or(ApiError::Unauthorized)?;

        let expected = state.api_keys.get(&satellite).ok_or(ApiError::Unauthorized)?;
        if !constant_time_eq(expected.as_bytes(), secret.as_bytes()) {
            return Err(ApiError::Unauthorized);
        }

        Ok(Satellite(satellite))
    }
}

fn decode_basic(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (user, secret) = text.split_once(':')?;
    Some((user.to_string(), secret.to_string()))
}

/// Compares two byte strings in time independent of where they first
/// differ, so failed auth attempts can't be timed to learn the secret.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_user_and_secret() {
        let header = format!("Basic {}", STANDARD.encode("eu1:s3cret"));
        let (user, secret) = decode_basic(&header).unwrap();
        assert_eq!(user, "eu1");
        assert_eq!(secret, "s3cret");
    }

    #[test]
    fn rejects_missing_basic_prefix() {
        assert!(decode_basic("Bearer abcd").is_none());
    }

    #[test]
    fn constant_time_eq_matches_standard_equality() {
        assert!(constant_time_eq(b"secret", b"secret"));
        assert!(!constant_time_eq(b"secret", b"wrong!"));
        assert!(!constant_time_eq(b"secret", b"secre"));
    }
}
