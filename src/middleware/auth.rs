use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::database::models::{User, UserRole};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller extracted from a verified bearer token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            role: user.role,
        }
    }
}

/// JWT authentication middleware that validates tokens and resolves the caller
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Extract JWT from Authorization header
    let token = extract_jwt_from_headers(&headers).map_err(|msg| {
        tracing::debug!("Rejected request without usable bearer token: {}", msg);
        ApiError::unauthorized(msg)
    })?;

    // Validate and decode JWT
    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::warn!("Bearer token rejected: {}", e);
        ApiError::from(e)
    })?;
    let user_id = claims.user_id()?;

    // The account must still exist
    let user = state.store.find_user(user_id).await?.ok_or_else(|| {
        tracing::warn!(%user_id, "Token subject no longer exists");
        ApiError::unauthorized("Could not validate credentials")
    })?;

    request.extensions_mut().insert(AuthUser::from(user));

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        Some(_) => Err("Empty JWT token"),
        None => Err("Authorization header must use Bearer token format"),
    }
}
