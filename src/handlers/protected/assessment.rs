// handlers/protected/assessment.rs - /students/:user_id/assessment/*

use axum::extract::{Path, State};
use axum::Extension;

use crate::database::models::{
    AssessmentDefinition, AssessmentHistoryEntry, AssessmentReport, AssessmentStart,
    AssessmentStatus, SubmissionReceipt, SubmitAnswers,
};
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::services::AssessmentService;
use crate::state::AppState;

const KIND: &str = "assessments";

/// GET .../assessment/available - Active catalog entries, newest first.
pub async fn available(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<AssessmentDefinition>> {
    let user_id = state.authorize_owner(&caller, &user_id, KIND)?;
    let assessments = AssessmentService::new(&state).available(user_id).await?;
    Ok(ApiResponse::success(assessments))
}

/// GET .../assessment/start/:assessment_id - Definition plus questions.
pub async fn start(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((user_id, assessment_id)): Path<(String, String)>,
) -> ApiResult<AssessmentStart> {
    let user_id = state.authorize_owner(&caller, &user_id, KIND)?;
    let started = AssessmentService::new(&state)
        .start(user_id, &assessment_id)
        .await?;
    Ok(ApiResponse::success(started))
}

/// POST .../assessment/submit/:assessment_id
///
/// ```json
/// { "answers": { "q1": "Technology", "q2": "Visual" } }
/// ```
pub async fn submit(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((user_id, assessment_id)): Path<(String, String)>,
    ApiJson(body): ApiJson<SubmitAnswers>,
) -> ApiResult<SubmissionReceipt> {
    let user_id = state.authorize_owner(&caller, &user_id, KIND)?;
    let receipt = AssessmentService::new(&state)
        .submit(user_id, &assessment_id, body)
        .await?;
    Ok(ApiResponse::success(receipt))
}

/// GET .../assessment/report/:submission_id
pub async fn report(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((user_id, submission_id)): Path<(String, String)>,
) -> ApiResult<AssessmentReport> {
    let user_id = state.authorize_owner(&caller, &user_id, KIND)?;
    let report = AssessmentService::new(&state)
        .report(user_id, &submission_id)
        .await?;
    Ok(ApiResponse::success(report))
}

/// GET .../assessment/history - Submissions newest first.
pub async fn history(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<AssessmentHistoryEntry>> {
    let user_id = state.authorize_owner(&caller, &user_id, KIND)?;
    let history = AssessmentService::new(&state).history(user_id).await?;
    Ok(ApiResponse::success(history))
}

/// GET .../assessment/status/:assessment_id - Whether a (re)take is allowed.
pub async fn status(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((user_id, assessment_id)): Path<(String, String)>,
) -> ApiResult<AssessmentStatus> {
    let user_id = state.authorize_owner(&caller, &user_id, KIND)?;
    let status = AssessmentService::new(&state)
        .status(user_id, &assessment_id)
        .await?;
    Ok(ApiResponse::success(status))
}
