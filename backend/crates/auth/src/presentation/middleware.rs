//! Auth Middleware
//!
//! Middleware for requiring a valid session token on protected routes.
//! Token verification is purely cryptographic; there is no server-side
//! session lookup.

use axum::body::Body;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::config::AuthConfig;
use crate::error::AuthError;
use crate::token::{Claims, TokenCodec};

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState {
    codec: TokenCodec,
}

impl AuthMiddlewareState {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            codec: TokenCodec::new(config.token_secret),
        }
    }
}

/// Narrow identity capability for downstream handlers
///
/// Carries only what protected routes need; built from verified claims,
/// never from a database lookup.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub email: String,
    pub full_name: Option<String>,
}

impl CurrentUser {
    fn from_claims(claims: &Claims) -> Self {
        Self {
            email: claims.sub.clone(),
            full_name: claims
                .extra
                .get("fullName")
                .and_then(|v| v.as_str())
                .map(str::to_string),
        }
    }
}

/// Middleware that requires a valid bearer session token
pub async fn require_session(
    state: AuthMiddlewareState,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let Some(token) = extract_bearer_token(req.headers()) else {
        return Err(AuthError::InvalidToken.into_response());
    };

    let claims = match state.codec.verify(token) {
        Ok(claims) => claims,
        Err(_) => return Err(AuthError::InvalidToken.into_response()),
    };

    req.extensions_mut().insert(CurrentUser::from_claims(&claims));

    Ok(next.run(req).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def"),
        );
        assert_eq!(extract_bearer_token(&headers), Some("abc.def"));
    }

    #[test]
    fn test_extract_bearer_token_missing_or_wrong_scheme() {
        let headers = HeaderMap::new();
        assert_eq!(extract_bearer_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn test_current_user_from_claims() {
        let codec = TokenCodec::new([1u8; 32]);
        let mut extra = std::collections::HashMap::new();
        extra.insert("fullName".to_string(), serde_json::json!("Ana Lee"));
        let token = codec.issue("ana@x.com", extra, std::time::Duration::from_secs(60));

        let claims = codec.verify(&token).unwrap();
        let current = CurrentUser::from_claims(&claims);
        assert_eq!(current.email, "ana@x.com");
        assert_eq!(current.full_name.as_deref(), Some("Ana Lee"));
    }
}
