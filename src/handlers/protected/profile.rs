// handlers/protected/profile.rs - /students/:user_id/profile

use axum::extract::{Path, State};
use axum::Extension;

use crate::database::models::{NewStudent, ProfileProgress, Student, StudentPatch};
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::services::StudentService;
use crate::state::AppState;

const KIND: &str = "profile";

/// POST /students/:user_id/profile - Create the extended profile (201).
///
/// Required: `phone`, `address`, `help_text`. The account must have the
/// student role and may hold only one profile.
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(user_id): Path<String>,
    ApiJson(profile): ApiJson<NewStudent>,
) -> ApiResult<Student> {
    let user_id = state.authorize_owner(&caller, &user_id, KIND)?;
    let student = StudentService::new(&state).create_profile(user_id, profile).await?;
    Ok(ApiResponse::created(student))
}

/// GET /students/:user_id/profile
pub async fn show(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(user_id): Path<String>,
) -> ApiResult<Student> {
    let user_id = state.authorize_owner(&caller, &user_id, KIND)?;
    let student = StudentService::new(&state).require_student(user_id).await?;
    Ok(ApiResponse::success(student))
}

/// PUT /students/:user_id/profile - Partial update.
///
/// Omitted fields stay as they are; `null` clears an optional field.
pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(user_id): Path<String>,
    ApiJson(patch): ApiJson<StudentPatch>,
) -> ApiResult<Student> {
    let user_id = state.authorize_owner(&caller, &user_id, KIND)?;
    let student = StudentService::new(&state).update_profile(user_id, patch).await?;
    Ok(ApiResponse::success(student))
}

/// POST /students/:user_id/profile/submit
pub async fn submit(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(user_id): Path<String>,
) -> ApiResult<ProfileProgress> {
    let user_id = state.authorize_owner(&caller, &user_id, KIND)?;
    let progress = StudentService::new(&state).submit_profile(user_id).await?;
    Ok(ApiResponse::success(progress))
}

/// GET /students/:user_id/profile/progress
pub async fn progress(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(user_id): Path<String>,
) -> ApiResult<ProfileProgress> {
    let user_id = state.authorize_owner(&caller, &user_id, KIND)?;
    let progress = StudentService::new(&state).progress(user_id).await?;
    Ok(ApiResponse::success(progress))
}
