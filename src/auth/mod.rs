pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config;

/// Stateless identity assertion carried by every authenticated request.
/// The payload is exactly the identity descriptor plus issuance/expiry times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub is_admin: bool,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(username: String, is_admin: bool) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            username,
            is_admin,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidToken(String),
    InvalidSecret,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidToken(msg) => write!(f, "Invalid JWT token: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
        }
    }
}

impl std::error::Error for JwtError {}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Verify signature and structural validity, returning the decoded identity.
/// Any failure (malformed structure, bad signature, expiry) is an invalid-token error.
pub fn verify_jwt(token: &str) -> Result<Claims, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

/// Strip an optional case-insensitive "Bearer" scheme and surrounding
/// whitespace. A scheme-only header yields an empty credential; a raw token
/// without the scheme is accepted as-is.
pub fn strip_bearer(header_value: &str) -> &str {
    let trimmed = header_value.trim();
    match trimmed.get(..6) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bearer") => {
            let rest = &trimmed[6..];
            // "Bearertoken" is a raw token, not a scheme
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                rest.trim_start()
            } else {
                trimmed
            }
        }
        _ => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_round_trips() {
        let claims = Claims::new("u1".to_string(), false);
        let token = generate_jwt(&claims).expect("token");

        let decoded = verify_jwt(&token).expect("verify");
        assert_eq!(decoded.username, "u1");
        assert!(!decoded.is_admin);
        assert_eq!(decoded.iat, claims.iat);
    }

    #[test]
    fn admin_flag_survives_round_trip() {
        let token = generate_jwt(&Claims::new("root".to_string(), true)).expect("token");
        let decoded = verify_jwt(&token).expect("verify");
        assert!(decoded.is_admin);
    }

    #[test]
    fn tampered_token_fails_verification() {
        let token = generate_jwt(&Claims::new("u1".to_string(), false)).expect("token");

        // Flip the final signature character to a different base64url character
        let mut chars: Vec<char> = token.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == 'A' { 'B' } else { 'A' };
        let tampered: String = chars.into_iter().collect();

        assert!(verify_jwt(&tampered).is_err());
    }

    #[test]
    fn strip_bearer_is_case_insensitive_and_trims() {
        assert_eq!(strip_bearer("Bearer abc.def.ghi"), "abc.def.ghi");
        assert_eq!(strip_bearer("bearer abc.def.ghi"), "abc.def.ghi");
        assert_eq!(strip_bearer("  BEARER   abc.def.ghi  "), "abc.def.ghi");
        assert_eq!(strip_bearer("abc.def.ghi"), "abc.def.ghi");
    }

    #[test]
    fn scheme_only_header_yields_empty_credential() {
        assert_eq!(strip_bearer("Bearer"), "");
        assert_eq!(strip_bearer("Bearer   "), "");
        assert_eq!(strip_bearer("  bearer "), "");
    }

    #[test]
    fn scheme_prefix_without_separator_is_a_raw_token() {
        assert_eq!(strip_bearer("Bearertok"), "Bearertok");
    }
}
