// handlers/protected/users.rs - GET /users, /users/me, /users/:user_id

use axum::extract::{Path, State};
use axum::Extension;

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::UserService;
use crate::state::AppState;

/// GET /users - All accounts.
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = UserService::new(&state).list_users().await?;
    Ok(ApiResponse::success(users))
}

/// GET /users/me
pub async fn me(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<User> {
    let user = UserService::new(&state).get_user(caller.user_id).await?;
    Ok(ApiResponse::success(user))
}

/// GET /users/:user_id - Only the caller's own record.
pub async fn show(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(user_id): Path<String>,
) -> ApiResult<User> {
    let user_id = state.authorize_owner(&caller, &user_id, "user details")?;
    let user = UserService::new(&state).get_user(user_id).await?;
    Ok(ApiResponse::success(user))
}
