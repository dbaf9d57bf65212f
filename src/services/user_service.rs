use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::IssuedToken;
use crate::database::models::{NewUser, User, UserRole};
use crate::error::ApiError;
use crate::state::AppState;

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 100;
const EMAIL_MAX: usize = 254;
const LOGIN_FAILED: &str = "Incorrect email or password";

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub token: IssuedToken,
    pub user: User,
}

/// Account registration, login and lookup.
pub struct UserService<'a> {
    state: &'a AppState,
}

impl<'a> UserService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<User, ApiError> {
        let (name, email) = validate_registration(&request)?;
        let password_hash = self.state.passwords.hash(&request.password)?;

        let user = self
            .state
            .store
            .insert_user(NewUser {
                name,
                email,
                password_hash,
                role: request.role,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "Registered new user");
        Ok(user)
    }

    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        let email = request.email.trim().to_lowercase();

        let Some(user) = self.state.store.find_user_by_email(&email).await? else {
            tracing::warn!("Login attempt for unknown account");
            return Err(ApiError::unauthorized(LOGIN_FAILED));
        };

        if !self.state.passwords.verify(&user.password_hash, &request.password)? {
            tracing::warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(ApiError::unauthorized(LOGIN_FAILED));
        }

        let token = self.state.tokens.issue(user.id, &user.email, user.role)?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(LoginResponse { token, user })
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.state.store.list_users().await?)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User, ApiError> {
        self.state
            .store
            .find_user(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))
    }
}

/// Returns the normalized (trimmed name, lower-cased email) pair.
fn validate_registration(request: &RegisterRequest) -> Result<(String, String), ApiError> {
    let mut errors = HashMap::new();

    let name = request.name.trim().to_string();
    let name_len = name.chars().count();
    if name_len < NAME_MIN {
        errors.insert("name".to_string(), format!("Name must be at least {} characters long", NAME_MIN));
    } else if name_len > NAME_MAX {
        errors.insert("name".to_string(), format!("Name must be at most {} characters long", NAME_MAX));
    }

    let email = request.email.trim().to_lowercase();
    if email.len() > EMAIL_MAX {
        errors.insert("email".to_string(), "Email address is too long".to_string());
    } else if !is_plausible_email(&email) {
        errors.insert("email".to_string(), "Invalid email address".to_string());
    }

    if request.password.is_empty() {
        errors.insert("password".to_string(), "Password is required".to_string());
    }

    if !request.role.is_self_assignable() {
        errors.insert("role".to_string(), "Role cannot be self-assigned".to_string());
    }

    if errors.is_empty() {
        Ok((name, email))
    } else {
        Err(ApiError::invalid_fields(errors))
    }
}

fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}
