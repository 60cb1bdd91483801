//! Authenticated caller identity extractor.
//!
//! Identity verification happens in the upstream gateway, which forwards the
//! verified caller id in the `x-user-id` header. This extractor surfaces that
//! id to handlers; it performs no verification of its own.

use crate::errors::{messages, AppError};
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Header carrying the gateway-verified caller identity.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor for the authenticated caller's identity.
///
/// Rejects with `401 Unauthorized` when the header is absent or is not a
/// valid UUID.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::AuthUser;
///
/// async fn list_own(AuthUser(owner_id): AuthUser) -> String {
///     format!("Listings for {}", owner_id)
/// }
/// ```
pub struct AuthUser(pub Uuid);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized(messages::UNAUTHORIZED.to_string()).into_response()
            })?;

        match Uuid::parse_str(raw) {
            Ok(id) => Ok(AuthUser(id)),
            Err(_) => {
                Err(AppError::Unauthorized(messages::UNAUTHORIZED.to_string()).into_response())
            }
        }
    }
}
