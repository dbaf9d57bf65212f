use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::database::models::{
    AssessmentDefinition, AssessmentHistoryEntry, AssessmentReport, AssessmentStart,
    AssessmentStatus, SubmissionReceipt, SubmitAnswers,
};
use crate::error::ApiError;
use crate::services::StudentService;
use crate::state::AppState;

const UNKNOWN_ASSESSMENT: &str = "Unknown Assessment";

/// Catalog browsing, attempts and reports for one student.
pub struct AssessmentService<'a> {
    state: &'a AppState,
}

impl<'a> AssessmentService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn available(&self, user_id: Uuid) -> Result<Vec<AssessmentDefinition>, ApiError> {
        StudentService::new(self.state).require_student(user_id).await?;
        Ok(self.state.store.list_active_assessments().await?)
    }

    pub async fn start(&self, user_id: Uuid, raw_assessment_id: &str) -> Result<AssessmentStart, ApiError> {
        let student = StudentService::new(self.state).require_student(user_id).await?;
        let assessment = self.active_assessment(raw_assessment_id).await?;

        let status = self.eligibility(student.student_id, &assessment).await?;
        if !status.can_take_assessment {
            return Err(ApiError::forbidden(status.message));
        }

        let questions = self.state.questions.questions_for(&assessment).await?;
        tracing::info!(
            student_id = %student.student_id,
            assessment_id = %assessment.assessment_id,
            "Assessment started"
        );

        Ok(AssessmentStart {
            assessment_id: assessment.assessment_id,
            assessment_name: assessment.assessment_name,
            assessment_type: assessment.assessment_type,
            description: assessment.description,
            total_questions: assessment.total_questions,
            time_limit_minutes: assessment.time_limit_minutes,
            questions,
            message: "Assessment started successfully".to_string(),
        })
    }

    /// Records an attempt. Answers are accepted but not scored or stored.
    pub async fn submit(
        &self,
        user_id: Uuid,
        raw_assessment_id: &str,
        body: SubmitAnswers,
    ) -> Result<SubmissionReceipt, ApiError> {
        let student = StudentService::new(self.state).require_student(user_id).await?;
        let assessment = self.active_assessment(raw_assessment_id).await?;

        let status = self.eligibility(student.student_id, &assessment).await?;
        if !status.can_take_assessment {
            return Err(ApiError::forbidden(status.message));
        }

        let report_url = format!(
            "{}/assessment_reports/{}.pdf",
            self.state.config.assessment.reports_base_url,
            Uuid::new_v4()
        );
        let submission = self
            .state
            .store
            .record_submission(student.student_id, assessment.assessment_id, Some(report_url))
            .await?;

        tracing::info!(
            student_id = %student.student_id,
            submission_id = %submission.submission_id,
            answers = body.answers.len(),
            "Assessment submitted"
        );

        Ok(SubmissionReceipt {
            submission_id: submission.submission_id,
            assessment_id: assessment.assessment_id,
            assessment_name: assessment.assessment_name,
            assessment_completed: true,
            report_pdf_url: submission.report_pdf_url,
            submitted_at: submission.submitted_at,
            message: "Assessment submitted successfully. Profile is now visible to donors.".to_string(),
        })
    }

    pub async fn report(&self, user_id: Uuid, raw_submission_id: &str) -> Result<AssessmentReport, ApiError> {
        let student = StudentService::new(self.state).require_student(user_id).await?;

        let not_found = || ApiError::not_found("Assessment submission not found");
        let submission_id = Uuid::parse_str(raw_submission_id).map_err(|_| not_found())?;
        let submission = self
            .state
            .store
            .find_submission(submission_id)
            .await?
            .ok_or_else(not_found)?;

        if submission.student_id != student.student_id {
            tracing::warn!(%submission_id, "Report requested by a different student");
            return Err(ApiError::forbidden("You can only access your own assessment reports"));
        }

        let assessment_name = self
            .state
            .store
            .find_assessment(submission.assessment_id)
            .await?
            .map(|a| a.assessment_name)
            .unwrap_or_else(|| UNKNOWN_ASSESSMENT.to_string());

        Ok(AssessmentReport {
            submission_id: submission.submission_id,
            student_id: submission.student_id,
            assessment_id: submission.assessment_id,
            assessment_name,
            report_pdf_url: submission.report_pdf_url,
            submitted_at: submission.submitted_at,
        })
    }

    pub async fn history(&self, user_id: Uuid) -> Result<Vec<AssessmentHistoryEntry>, ApiError> {
        let student = StudentService::new(self.state).require_student(user_id).await?;
        let submissions = self.state.store.list_submissions(student.student_id).await?;

        let mut catalog: HashMap<Uuid, Option<AssessmentDefinition>> = HashMap::new();
        let mut history = Vec::with_capacity(submissions.len());
        for submission in submissions {
            if !catalog.contains_key(&submission.assessment_id) {
                let found = self.state.store.find_assessment(submission.assessment_id).await?;
                catalog.insert(submission.assessment_id, found);
            }
            let definition = catalog.get(&submission.assessment_id).and_then(Option::as_ref);

            history.push(AssessmentHistoryEntry {
                submission_id: submission.submission_id,
                assessment_id: submission.assessment_id,
                assessment_name: definition
                    .map(|d| d.assessment_name.clone())
                    .unwrap_or_else(|| UNKNOWN_ASSESSMENT.to_string()),
                assessment_type: definition
                    .map(|d| d.assessment_type.clone())
                    .unwrap_or_else(|| "unknown".to_string()),
                report_pdf_url: submission.report_pdf_url,
                submitted_at: submission.submitted_at,
            });
        }
        Ok(history)
    }

    pub async fn status(&self, user_id: Uuid, raw_assessment_id: &str) -> Result<AssessmentStatus, ApiError> {
        let student = StudentService::new(self.state).require_student(user_id).await?;
        let assessment = self.active_assessment(raw_assessment_id).await?;
        self.eligibility(student.student_id, &assessment).await
    }

    async fn active_assessment(&self, raw_assessment_id: &str) -> Result<AssessmentDefinition, ApiError> {
        let not_found = || ApiError::not_found("Assessment not found or inactive");
        let assessment_id = Uuid::parse_str(raw_assessment_id).map_err(|_| not_found())?;
        self.state
            .store
            .find_active_assessment(assessment_id)
            .await?
            .ok_or_else(not_found)
    }

    async fn eligibility(
        &self,
        student_id: Uuid,
        assessment: &AssessmentDefinition,
    ) -> Result<AssessmentStatus, ApiError> {
        let last = self
            .state
            .store
            .latest_submission(student_id, assessment.assessment_id)
            .await?;
        Ok(self.state.eligibility.evaluate(assessment, last.as_ref(), Utc::now()))
    }
}
