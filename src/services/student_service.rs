use std::collections::HashMap;

use uuid::Uuid;

use crate::database::models::{
    EducationEntry, EducationPatch, NewEducation, NewStudent, ProfileProgress, Student,
    StudentPatch, UserRole,
};
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::Patch;

/// Student profiles and their education history.
///
/// Callers pass a `user_id` that has already passed the ownership check.
pub struct StudentService<'a> {
    state: &'a AppState,
}

impl<'a> StudentService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Loads the profile belonging to `user_id`.
    pub async fn require_student(&self, user_id: Uuid) -> Result<Student, ApiError> {
        self.state
            .store
            .find_student_by_user(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Student profile not found"))
    }

    pub async fn create_profile(&self, user_id: Uuid, profile: NewStudent) -> Result<Student, ApiError> {
        let user = self
            .state
            .store
            .find_user(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;
        if user.role != UserRole::Student {
            return Err(ApiError::forbidden("Only student accounts can have a student profile"));
        }

        let mut errors = HashMap::new();
        require_text(&mut errors, "phone", &profile.phone);
        require_text(&mut errors, "address", &profile.address);
        require_text(&mut errors, "help_text", &profile.help_text);
        check(errors)?;

        let student = self.state.store.insert_student(user_id, profile).await?;
        tracing::info!(%user_id, student_id = %student.student_id, "Created student profile");
        Ok(student)
    }

    pub async fn update_profile(&self, user_id: Uuid, patch: StudentPatch) -> Result<Student, ApiError> {
        let student = self.require_student(user_id).await?;

        let mut errors = HashMap::new();
        require_patch(&mut errors, "phone", &patch.phone);
        require_patch(&mut errors, "address", &patch.address);
        require_patch(&mut errors, "help_text", &patch.help_text);
        check(errors)?;

        let updated = self.state.store.update_student(student.student_id, patch).await?;
        tracing::debug!(student_id = %updated.student_id, "Updated student profile");
        Ok(updated)
    }

    /// Sets `profile_completed`. Calling it again changes nothing.
    pub async fn submit_profile(&self, user_id: Uuid) -> Result<ProfileProgress, ApiError> {
        let student = self.require_student(user_id).await?;
        let student = self.state.store.mark_profile_completed(student.student_id).await?;
        tracing::info!(student_id = %student.student_id, "Student profile submitted");

        Ok(ProfileProgress {
            profile_completed: student.profile_completed,
            assessment_completed: student.assessment_completed,
            message: "Profile completed successfully. You can now proceed to assessments.".to_string(),
        })
    }

    pub async fn progress(&self, user_id: Uuid) -> Result<ProfileProgress, ApiError> {
        let student = self.require_student(user_id).await?;
        Ok(ProfileProgress {
            profile_completed: student.profile_completed,
            assessment_completed: student.assessment_completed,
            message: "Student progress retrieved successfully".to_string(),
        })
    }

    pub async fn list_education(&self, user_id: Uuid) -> Result<Vec<EducationEntry>, ApiError> {
        let student = self.require_student(user_id).await?;
        Ok(self.state.store.list_education(student.student_id).await?)
    }

    pub async fn add_education(&self, user_id: Uuid, entry: NewEducation) -> Result<EducationEntry, ApiError> {
        let student = self.require_student(user_id).await?;

        let mut errors = HashMap::new();
        require_text(&mut errors, "institution_name", &entry.institution_name);
        require_text(&mut errors, "education_level", &entry.education_level);
        require_text(&mut errors, "year_of_passing", &entry.year_of_passing);
        check(errors)?;

        let created = self.state.store.insert_education(student.student_id, entry).await?;
        tracing::debug!(education_id = %created.education_id, "Added education entry");
        Ok(created)
    }

    pub async fn get_education(&self, user_id: Uuid, raw_education_id: &str) -> Result<EducationEntry, ApiError> {
        let student = self.require_student(user_id).await?;
        let education_id = parse_education_id(raw_education_id)?;

        self.state
            .store
            .find_education(student.student_id, education_id)
            .await?
            .ok_or_else(education_not_found)
    }

    pub async fn update_education(
        &self,
        user_id: Uuid,
        raw_education_id: &str,
        patch: EducationPatch,
    ) -> Result<EducationEntry, ApiError> {
        let student = self.require_student(user_id).await?;
        let education_id = parse_education_id(raw_education_id)?;

        let mut errors = HashMap::new();
        require_patch(&mut errors, "institution_name", &patch.institution_name);
        require_patch(&mut errors, "education_level", &patch.education_level);
        require_patch(&mut errors, "year_of_passing", &patch.year_of_passing);
        check(errors)?;

        Ok(self
            .state
            .store
            .update_education(student.student_id, education_id, patch)
            .await?)
    }

    pub async fn delete_education(&self, user_id: Uuid, raw_education_id: &str) -> Result<(), ApiError> {
        let student = self.require_student(user_id).await?;
        let education_id = parse_education_id(raw_education_id)?;

        self.state
            .store
            .delete_education(student.student_id, education_id)
            .await?;
        tracing::debug!(%education_id, "Deleted education entry");
        Ok(())
    }
}

fn education_not_found() -> ApiError {
    ApiError::not_found("Education entry not found")
}

/// Ids that are not UUIDs cannot name an entry.
fn parse_education_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| education_not_found())
}

fn require_text(errors: &mut HashMap<String, String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), format!("{} is required", field));
    }
}

/// Required fields may be left out of a patch but not cleared or blanked.
fn require_patch(errors: &mut HashMap<String, String>, field: &str, patch: &Patch<String>) {
    match patch {
        Patch::Absent => {}
        Patch::Null => {
            errors.insert(field.to_string(), format!("{} cannot be null", field));
        }
        Patch::Value(value) => require_text(errors, field, value),
    }
}

fn check(errors: HashMap<String, String>) -> Result<(), ApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::invalid_fields(errors))
    }
}
