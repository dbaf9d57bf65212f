use chrono::{DateTime, Utc};

use crate::database::models::{AssessmentDefinition, AssessmentStatus, AssessmentSubmission};

/// Decides whether a student may (re)take an assessment.
pub trait EligibilityPolicy: Send + Sync {
    /// `last` is the student's most recent submission for `assessment`, if any.
    fn evaluate(
        &self,
        assessment: &AssessmentDefinition,
        last: Option<&AssessmentSubmission>,
        now: DateTime<Utc>,
    ) -> AssessmentStatus;
}

/// Retakes are always allowed.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnlimitedAttempts;

impl EligibilityPolicy for UnlimitedAttempts {
    fn evaluate(
        &self,
        _assessment: &AssessmentDefinition,
        last: Option<&AssessmentSubmission>,
        _now: DateTime<Utc>,
    ) -> AssessmentStatus {
        match last {
            None => AssessmentStatus {
                can_take_assessment: true,
                last_assessment_date: None,
                next_available_date: None,
                message: "No previous submissions found. You can take this assessment.".to_string(),
            },
            Some(submission) => AssessmentStatus {
                can_take_assessment: true,
                last_assessment_date: Some(submission.submitted_at),
                next_available_date: None,
                message: "You can retake this assessment.".to_string(),
            },
        }
    }
}
