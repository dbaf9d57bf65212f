use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::Patch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "parent_live_status", rename_all = "lowercase")]
pub enum ParentLiveStatus {
    Both,
    One,
    None,
}

/// Extended student profile, one per student account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub student_id: Uuid,
    pub user_id: Uuid,
    pub phone: String,
    pub address: String,
    pub photo_url: Option<String>,
    pub video_url: Option<String>,
    pub help_text: String,

    // Personal
    pub gender: Option<String>,
    pub age: Option<i32>,

    // Parent / guardian
    pub parent_guardian_occupation: Option<String>,
    pub parent_guardian_monthly_income: Option<String>,
    pub parents_education_status: Option<String>,
    pub parent_live_status: Option<ParentLiveStatus>,

    // Scholarship
    pub scholarship_amount_requested: Option<String>,
    pub is_eligible_for_zakat: Option<bool>,

    // Applicant (when someone applies on the student's behalf)
    pub applicant_email: Option<String>,
    pub applicant_type: Option<String>,
    pub applicant_name: Option<String>,
    pub applicant_mobile_number: Option<String>,

    pub profile_completed: bool,
    pub assessment_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /students/:user_id/profile`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewStudent {
    pub phone: String,
    pub address: String,
    pub help_text: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub parent_guardian_occupation: Option<String>,
    #[serde(default)]
    pub parent_guardian_monthly_income: Option<String>,
    #[serde(default)]
    pub parents_education_status: Option<String>,
    #[serde(default)]
    pub parent_live_status: Option<ParentLiveStatus>,
    #[serde(default)]
    pub scholarship_amount_requested: Option<String>,
    #[serde(default)]
    pub is_eligible_for_zakat: Option<bool>,
    #[serde(default)]
    pub applicant_email: Option<String>,
    #[serde(default)]
    pub applicant_type: Option<String>,
    #[serde(default)]
    pub applicant_name: Option<String>,
    #[serde(default)]
    pub applicant_mobile_number: Option<String>,
}

impl NewStudent {
    pub fn into_student(self, user_id: Uuid, now: DateTime<Utc>) -> Student {
        Student {
            student_id: Uuid::new_v4(),
            user_id,
            phone: self.phone,
            address: self.address,
            photo_url: self.photo_url,
            video_url: self.video_url,
            help_text: self.help_text,
            gender: self.gender,
            age: self.age,
            parent_guardian_occupation: self.parent_guardian_occupation,
            parent_guardian_monthly_income: self.parent_guardian_monthly_income,
            parents_education_status: self.parents_education_status,
            parent_live_status: self.parent_live_status,
            scholarship_amount_requested: self.scholarship_amount_requested,
            is_eligible_for_zakat: self.is_eligible_for_zakat,
            applicant_email: self.applicant_email,
            applicant_type: self.applicant_type,
            applicant_name: self.applicant_name,
            applicant_mobile_number: self.applicant_mobile_number,
            profile_completed: false,
            assessment_completed: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body of `PUT /students/:user_id/profile`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentPatch {
    #[serde(default)]
    pub phone: Patch<String>,
    #[serde(default)]
    pub address: Patch<String>,
    #[serde(default)]
    pub help_text: Patch<String>,
    #[serde(default)]
    pub photo_url: Patch<String>,
    #[serde(default)]
    pub video_url: Patch<String>,
    #[serde(default)]
    pub gender: Patch<String>,
    #[serde(default)]
    pub age: Patch<i32>,
    #[serde(default)]
    pub parent_guardian_occupation: Patch<String>,
    #[serde(default)]
    pub parent_guardian_monthly_income: Patch<String>,
    #[serde(default)]
    pub parents_education_status: Patch<String>,
    #[serde(default)]
    pub parent_live_status: Patch<ParentLiveStatus>,
    #[serde(default)]
    pub scholarship_amount_requested: Patch<String>,
    #[serde(default)]
    pub is_eligible_for_zakat: Patch<bool>,
    #[serde(default)]
    pub applicant_email: Patch<String>,
    #[serde(default)]
    pub applicant_type: Patch<String>,
    #[serde(default)]
    pub applicant_name: Patch<String>,
    #[serde(default)]
    pub applicant_mobile_number: Patch<String>,
}

impl StudentPatch {
    /// Each field is checked on its own; nothing absent is written.
    pub fn apply(self, student: &mut Student, now: DateTime<Utc>) {
        self.phone.apply_to(&mut student.phone);
        self.address.apply_to(&mut student.address);
        self.help_text.apply_to(&mut student.help_text);
        self.photo_url.apply_to_option(&mut student.photo_url);
        self.video_url.apply_to_option(&mut student.video_url);
        self.gender.apply_to_option(&mut student.gender);
        self.age.apply_to_option(&mut student.age);
        self.parent_guardian_occupation
            .apply_to_option(&mut student.parent_guardian_occupation);
        self.parent_guardian_monthly_income
            .apply_to_option(&mut student.parent_guardian_monthly_income);
        self.parents_education_status
            .apply_to_option(&mut student.parents_education_status);
        self.parent_live_status.apply_to_option(&mut student.parent_live_status);
        self.scholarship_amount_requested
            .apply_to_option(&mut student.scholarship_amount_requested);
        self.is_eligible_for_zakat
            .apply_to_option(&mut student.is_eligible_for_zakat);
        self.applicant_email.apply_to_option(&mut student.applicant_email);
        self.applicant_type.apply_to_option(&mut student.applicant_type);
        self.applicant_name.apply_to_option(&mut student.applicant_name);
        self.applicant_mobile_number
            .apply_to_option(&mut student.applicant_mobile_number);
        student.updated_at = now;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileProgress {
    pub profile_completed: bool,
    pub assessment_completed: bool,
    pub message: String,
}
