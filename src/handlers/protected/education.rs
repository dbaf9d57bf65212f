// handlers/protected/education.rs - /students/:user_id/education[/:education_id]

use axum::extract::{Path, State};
use axum::Extension;

use crate::database::models::{EducationEntry, EducationPatch, NewEducation};
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::services::StudentService;
use crate::state::AppState;

const KIND: &str = "education entries";

/// GET /students/:user_id/education - Newest first.
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<EducationEntry>> {
    let user_id = state.authorize_owner(&caller, &user_id, KIND)?;
    let entries = StudentService::new(&state).list_education(user_id).await?;
    Ok(ApiResponse::success(entries))
}

/// POST /students/:user_id/education
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(user_id): Path<String>,
    ApiJson(entry): ApiJson<NewEducation>,
) -> ApiResult<EducationEntry> {
    let user_id = state.authorize_owner(&caller, &user_id, KIND)?;
    let entry = StudentService::new(&state).add_education(user_id, entry).await?;
    Ok(ApiResponse::created(entry))
}

/// GET /students/:user_id/education/:education_id
pub async fn show(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((user_id, education_id)): Path<(String, String)>,
) -> ApiResult<EducationEntry> {
    let user_id = state.authorize_owner(&caller, &user_id, KIND)?;
    let entry = StudentService::new(&state)
        .get_education(user_id, &education_id)
        .await?;
    Ok(ApiResponse::success(entry))
}

/// PUT /students/:user_id/education/:education_id - Partial update.
pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((user_id, education_id)): Path<(String, String)>,
    ApiJson(patch): ApiJson<EducationPatch>,
) -> ApiResult<EducationEntry> {
    let user_id = state.authorize_owner(&caller, &user_id, KIND)?;
    let entry = StudentService::new(&state)
        .update_education(user_id, &education_id, patch)
        .await?;
    Ok(ApiResponse::success(entry))
}

/// DELETE /students/:user_id/education/:education_id - 204 on success.
pub async fn delete(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((user_id, education_id)): Path<(String, String)>,
) -> ApiResult<()> {
    let user_id = state.authorize_owner(&caller, &user_id, KIND)?;
    StudentService::new(&state)
        .delete_education(user_id, &education_id)
        .await?;
    Ok(ApiResponse::no_content())
}
