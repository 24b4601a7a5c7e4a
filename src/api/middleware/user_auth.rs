//! User authentication extractors using JWT tokens

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::User;

const NOT_AUTHENTICATED: &str = "User is not authenticated";

/// Extractor that requires a valid JWT for an active, non-deleted user
///
/// The token is read from `Authorization: Bearer <jwt_token>` and the user
/// is re-loaded from storage, so deactivation and soft-deletion take effect
/// before the token expires.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_token(&parts.headers)?;

        debug!("Validating JWT token");

        let claims = state
            .jwt_service
            .validate(&token)
            .map_err(|_| ApiError::unauthorized(NOT_AUTHENTICATED))?;
        let user_id = claims
            .user_id()
            .map_err(|_| ApiError::unauthorized(NOT_AUTHENTICATED))?;

        let user = state
            .user_service
            .get_authenticated(user_id)
            .await?
            .ok_or_else(|| ApiError::unauthorized(NOT_AUTHENTICATED))?;

        Ok(RequireUser(user))
    }
}

/// Extract JWT token from Authorization header
pub fn extract_jwt_token(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Ok(token.to_string());
            }
        }
    }

    Err(ApiError::unauthorized(NOT_AUTHENTICATED))
}
