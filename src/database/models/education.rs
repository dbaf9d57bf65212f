use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::Patch;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EducationEntry {
    pub education_id: Uuid,
    pub student_id: Uuid,
    pub institution_name: String,
    /// Free text: "Class 10", "Class 12", "Undergraduate", ...
    pub education_level: String,
    pub year_of_passing: String,
    pub marks_obtained: Option<String>,
    pub report_card_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewEducation {
    pub institution_name: String,
    pub education_level: String,
    pub year_of_passing: String,
    #[serde(default)]
    pub marks_obtained: Option<String>,
    #[serde(default)]
    pub report_card_url: Option<String>,
}

impl NewEducation {
    pub fn into_entry(self, student_id: Uuid, now: DateTime<Utc>) -> EducationEntry {
        EducationEntry {
            education_id: Uuid::new_v4(),
            student_id,
            institution_name: self.institution_name,
            education_level: self.education_level,
            year_of_passing: self.year_of_passing,
            marks_obtained: self.marks_obtained,
            report_card_url: self.report_card_url,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EducationPatch {
    #[serde(default)]
    pub institution_name: Patch<String>,
    #[serde(default)]
    pub education_level: Patch<String>,
    #[serde(default)]
    pub year_of_passing: Patch<String>,
    #[serde(default)]
    pub marks_obtained: Patch<String>,
    #[serde(default)]
    pub report_card_url: Patch<String>,
}

impl EducationPatch {
    pub fn apply(self, entry: &mut EducationEntry, now: DateTime<Utc>) {
        self.institution_name.apply_to(&mut entry.institution_name);
        self.education_level.apply_to(&mut entry.education_level);
        self.year_of_passing.apply_to(&mut entry.year_of_passing);
        self.marks_obtained.apply_to_option(&mut entry.marks_obtained);
        self.report_card_url.apply_to_option(&mut entry.report_card_url);
        entry.updated_at = now;
    }
}
