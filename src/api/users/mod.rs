//! User endpoints: directory listing and self-service profile management

use axum::{extract::State, routing::get, Router};
use serde::Deserialize;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{
    ApiError, CursorPage, DeleteResponse, Json, Path, Query, UpdateUserBody, UserResponse,
};
use crate::domain::user::{UserFilters, UserId};

/// Create the users router
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/me", get(get_me).patch(update_me).delete(delete_me))
        .route("/{id}", get(get_user))
}

fn default_true() -> bool {
    true
}

/// Query string of `GET /api/users`
#[derive(Debug, Deserialize)]
pub struct ListUsersParams {
    pub limit: Option<usize>,
    pub cursor: Option<String>,
    #[serde(rename = "searchString")]
    pub search_string: Option<String>,
    #[serde(rename = "searchIgnoreCase", default = "default_true")]
    pub search_ignore_case: bool,
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<CursorPage<UserResponse>>, ApiError> {
    let filters = UserFilters::new(params.search_string, params.search_ignore_case);

    let listing = state
        .user_service
        .list_page(params.cursor.as_deref(), params.limit, filters)
        .await?;

    Ok(Json(CursorPage::from_page(
        listing.page,
        listing.limit,
        UserResponse::from,
    )))
}

/// GET /api/users/me
pub async fn get_me(RequireUser(user): RequireUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

/// PATCH /api/users/me
pub async fn update_me(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<UpdateUserBody>,
) -> Result<Json<UserResponse>, ApiError> {
    let updated = state.user_service.update_profile(user.id(), body.into()).await?;
    Ok(Json(UserResponse::from(&updated)))
}

/// DELETE /api/users/me
pub async fn delete_me(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.user_service.soft_delete(user.id()).await?;
    Ok(Json(DeleteResponse { deleted: true }))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireUser(_user): RequireUser,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = UserId::new(id).map_err(|_| ApiError::not_found("User not found."))?;

    let user = state
        .user_service
        .get_visible(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found."))?;

    Ok(Json(UserResponse::from(&user)))
}
