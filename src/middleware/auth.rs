use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{strip_bearer, verify_jwt, Claims};
use crate::error::ApiError;
use crate::middleware::gates;

/// Authenticated user context extracted from a verified JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
    pub is_admin: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.username,
            is_admin: claims.is_admin,
        }
    }
}

/// Optional-identity extraction. Always runs first: attaches an AuthUser
/// extension when a valid credential was presented, otherwise attaches
/// nothing. Never rejects - a missing or malformed credential on a public
/// route simply yields no identity.
pub async fn load_identity(headers: HeaderMap, mut request: Request, next: Next) -> Response {
    if let Some(token) = bearer_token(&headers) {
        match verify_jwt(&token) {
            Ok(claims) => {
                request.extensions_mut().insert(AuthUser::from(claims));
            }
            Err(e) => {
                tracing::debug!("Ignoring invalid bearer credential: {}", e);
            }
        }
    }
    next.run(request).await
}

/// Require-logged-in middleware for route groups that demand an identity
pub async fn require_auth(request: Request, next: Next) -> Result<Response, ApiError> {
    gates::require_logged_in(request.extensions().get::<AuthUser>())?;
    Ok(next.run(request).await)
}

/// Require-admin middleware for route groups restricted to administrators
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    gates::require_admin(request.extensions().get::<AuthUser>())?;
    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header, if present
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    let token = strip_bearer(auth_str);
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_handles_missing_header() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn bearer_token_strips_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer tok123"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("tok123"));
    }

    #[test]
    fn bearer_token_rejects_empty_credential() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer   "));
        assert_eq!(bearer_token(&headers), None);
    }
}
