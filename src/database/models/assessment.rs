use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Catalog entry describing an assessment students can take.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssessmentDefinition {
    pub assessment_id: Uuid,
    pub assessment_name: String,
    /// aptitude, personality, career_interest, ...
    pub assessment_type: String,
    pub description: Option<String>,
    pub total_questions: i32,
    pub time_limit_minutes: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AssessmentDefinition {
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        description: Option<String>,
        total_questions: i32,
        time_limit_minutes: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            assessment_id: Uuid::new_v4(),
            assessment_name: name.into(),
            assessment_type: kind.into(),
            description,
            total_questions,
            time_limit_minutes,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Catalog used to seed the in-memory store for demos.
pub fn default_catalog() -> Vec<AssessmentDefinition> {
    let base = Utc::now();
    let mut catalog = vec![
        AssessmentDefinition::new(
            "Career Interest Inventory",
            "career_interest",
            Some("Maps interests to broad career clusters".to_string()),
            30,
            20,
        ),
        AssessmentDefinition::new(
            "Personality Profile",
            "personality",
            Some("Short-form personality questionnaire".to_string()),
            40,
            25,
        ),
        AssessmentDefinition::new(
            "General Aptitude",
            "aptitude",
            Some("Numerical, verbal and logical reasoning".to_string()),
            50,
            45,
        ),
    ];
    // Distinct timestamps keep newest-first listings stable.
    for (i, def) in catalog.iter_mut().enumerate() {
        def.created_at = base - Duration::seconds(i as i64);
        def.updated_at = def.created_at;
    }
    catalog
}

/// One recorded attempt. Never modified after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssessmentSubmission {
    pub submission_id: Uuid,
    pub student_id: Uuid,
    pub assessment_id: Uuid,
    pub report_pdf_url: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Response of `GET .../assessment/start/:assessment_id`.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentStart {
    pub assessment_id: Uuid,
    pub assessment_name: String,
    pub assessment_type: String,
    pub description: Option<String>,
    pub total_questions: i32,
    pub time_limit_minutes: i32,
    pub questions: Value,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnswers {
    pub answers: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub submission_id: Uuid,
    pub assessment_id: Uuid,
    pub assessment_name: String,
    pub assessment_completed: bool,
    pub report_pdf_url: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentReport {
    pub submission_id: Uuid,
    pub student_id: Uuid,
    pub assessment_id: Uuid,
    pub assessment_name: String,
    pub report_pdf_url: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentHistoryEntry {
    pub submission_id: Uuid,
    pub assessment_id: Uuid,
    pub assessment_name: String,
    pub assessment_type: String,
    pub report_pdf_url: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AssessmentStatus {
    pub can_take_assessment: bool,
    pub last_assessment_date: Option<DateTime<Utc>>,
    pub next_available_date: Option<DateTime<Utc>>,
    pub message: String,
}
