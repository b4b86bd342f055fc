use auth::TokenError;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;
use crate::user::errors::AuthError;

const BEARER_PREFIX: &str = "Bearer ";

/// Extension type to store the authenticated user in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Middleware that validates the bearer token and adds the caller's identity
/// to request extensions. Rejected requests never reach the handler.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(req.headers()).map_err(|e| {
        tracing::warn!(error = %e, "Rejected request without usable credentials");
        ApiError::from(e)
    })?;

    let verified = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "JWT validation failed");
        ApiError::from(AuthError::Token(e))
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: UserId(verified.subject),
    });

    Ok(next.run(req).await)
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
///
/// A missing or blank header is `MissingToken`; anything else that is not a
/// well-formed bearer credential is a malformed token.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Err(AuthError::MissingToken);
    };

    let value = value.to_str().map_err(|_| {
        AuthError::Token(TokenError::Malformed(
            "authorization header is not visible ASCII".to_string(),
        ))
    })?;

    if value.trim().is_empty() {
        return Err(AuthError::MissingToken);
    }

    value.strip_prefix(BEARER_PREFIX).ok_or_else(|| {
        AuthError::Token(TokenError::Malformed(
            "authorization scheme is not Bearer".to_string(),
        ))
    })
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(
            extract_bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingToken)
        );
    }

    #[test]
    fn test_blank_header_is_missing() {
        assert_eq!(
            extract_bearer_token(&headers_with("")),
            Err(AuthError::MissingToken)
        );
        assert_eq!(
            extract_bearer_token(&headers_with("   ")),
            Err(AuthError::MissingToken)
        );
    }

    #[test]
    fn test_wrong_scheme_is_malformed() {
        for value in ["Basic dXNlcjpwYXNz", "bearer abc", "Bearerabc", "Token abc"] {
            assert!(matches!(
                extract_bearer_token(&headers_with(value)),
                Err(AuthError::Token(TokenError::Malformed(_)))
            ));
        }
    }

    #[test]
    fn test_non_ascii_header_is_malformed() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap(),
        );

        assert!(matches!(
            extract_bearer_token(&headers),
            Err(AuthError::Token(TokenError::Malformed(_)))
        ));
    }

    #[test]
    fn test_bearer_token_extracted() {
        assert_eq!(
            extract_bearer_token(&headers_with("Bearer abc.def.ghi")),
            Ok("abc.def.ghi")
        );
    }
}
