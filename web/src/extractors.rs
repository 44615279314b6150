//! Custom Axum extractors.

use crate::error::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Bearer token from the `Authorization` header.
///
/// Rejects the request with 401 when the header is missing or not a Bearer
/// scheme. Verification against the session issuer happens in the handler,
/// which has access to the gateway state.
///
/// # Example
///
/// ```ignore
/// async fn handler(BearerToken(token): BearerToken) -> Result<..., AppError> {
///     let user_id = gateway.sessions().verify(&token)?;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        header
            .strip_prefix("Bearer ")
            .filter(|token| !token.is_empty())
            .map(|token| Self(token.to_string()))
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}
