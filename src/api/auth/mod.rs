//! Registration and login endpoints

use axum::{extract::State, http::StatusCode, routing::post, Router};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, LoginRequest, LoginResponse, RegisterBody, UserResponse};

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiError> {
    let user = state.user_service.register(body.into()).await?;
    let token = state.jwt_service.generate(&user)?;

    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            token,
            user: UserResponse::from(&user),
            reactivated: false,
        }),
    ))
}

/// POST /api/auth/login
///
/// Logging in to a soft-deleted account restores it and reports
/// `reactivated: true`.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiError> {
    let outcome = state
        .user_service
        .authenticate(&request.email, &request.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let token = state.jwt_service.generate(&outcome.user)?;
    info!(user_id = %outcome.user.id(), reactivated = outcome.reactivated, "User logged in");

    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            token,
            user: UserResponse::from(&outcome.user),
            reactivated: outcome.reactivated,
        }),
    ))
}
