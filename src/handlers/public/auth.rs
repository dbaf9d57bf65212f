// handlers/public/auth.rs - POST /auth/register, /auth/login, /auth/logout

use axum::extract::State;
use serde_json::{json, Value};

use crate::database::models::User;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::services::{LoginRequest, LoginResponse, RegisterRequest, UserService};
use crate::state::AppState;

/// POST /auth/register - Create an account.
///
/// ```json
/// { "name": "string", "email": "string", "password": "string", "role": "student|donor|mentor" }
/// ```
///
/// Responds 201 with the new user (`verified` is always false). A registered
/// email, in any letter case, yields 409.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> ApiResult<User> {
    let user = UserService::new(&state).register(request).await?;
    Ok(ApiResponse::created(user))
}

/// POST /auth/login - Exchange email and password for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let response = UserService::new(&state).login(request).await?;
    Ok(ApiResponse::success(response))
}

/// POST /auth/logout - Tokens are stateless; the client discards its copy.
pub async fn logout() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({ "message": "Successfully logged out" })))
}
