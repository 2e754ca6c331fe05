//! Account management handlers (admin).

use axum::{extract::State, response::Json, routing::get, Extension, Router};

use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::types::ApiResponse;

/// Create account management routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/", get(list_users))
}

/// List all accounts (admin only)
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All accounts", body = [UserResponse]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<UserResponse>>>> {
    require_admin(&current_user)?;

    let users = state.user_service.list_users().await?;
    let responses = users.into_iter().map(UserResponse::from).collect();

    Ok(Json(ApiResponse::success(responses)))
}
