use async_trait::async_trait;
use serde_json::{json, Value};

use crate::database::models::AssessmentDefinition;
use crate::error::ApiError;

/// Supplies the question set shown when an assessment starts.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    async fn questions_for(&self, assessment: &AssessmentDefinition) -> Result<Value, ApiError>;
}

/// Fixed three-question set used until a real question bank is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderQuestions;

#[async_trait]
impl QuestionProvider for PlaceholderQuestions {
    async fn questions_for(&self, _assessment: &AssessmentDefinition) -> Result<Value, ApiError> {
        Ok(json!({
            "q1": {
                "question": "What is your primary area of interest?",
                "options": ["Technology", "Business", "Arts", "Science"],
                "type": "multiple_choice"
            },
            "q2": {
                "question": "How would you describe your learning style?",
                "options": ["Visual", "Auditory", "Kinesthetic", "Reading/Writing"],
                "type": "multiple_choice"
            },
            "q3": {
                "question": "What motivates you most in your studies?",
                "options": ["Personal Growth", "Career Advancement", "Social Impact", "Financial Security"],
                "type": "multiple_choice"
            }
        }))
    }
}
