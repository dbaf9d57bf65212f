use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    AssessmentDefinition, AssessmentSubmission, EducationEntry, EducationPatch, NewEducation,
    NewStudent, NewUser, Student, StudentPatch, User,
};

/// User accounts. Email uniqueness is enforced here.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn insert_user(&self, new_user: NewUser) -> Result<User, DatabaseError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn list_users(&self) -> Result<Vec<User>, DatabaseError>;
}

/// Student profiles and everything they own.
///
/// Sub-resource lookups are always scoped by `student_id`; an id belonging to
/// a different student behaves exactly like a missing one.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fails with `Conflict` when the user already has a profile.
    async fn insert_student(&self, user_id: Uuid, profile: NewStudent)
        -> Result<Student, DatabaseError>;
    async fn find_student_by_user(&self, user_id: Uuid) -> Result<Option<Student>, DatabaseError>;
    async fn update_student(
        &self,
        student_id: Uuid,
        patch: StudentPatch,
    ) -> Result<Student, DatabaseError>;
    async fn mark_profile_completed(&self, student_id: Uuid) -> Result<Student, DatabaseError>;
    /// Removes the profile together with its education entries and submissions.
    async fn delete_student(&self, student_id: Uuid) -> Result<(), DatabaseError>;

    /// Newest first.
    async fn list_education(&self, student_id: Uuid) -> Result<Vec<EducationEntry>, DatabaseError>;
    async fn find_education(
        &self,
        student_id: Uuid,
        education_id: Uuid,
    ) -> Result<Option<EducationEntry>, DatabaseError>;
    async fn insert_education(
        &self,
        student_id: Uuid,
        entry: NewEducation,
    ) -> Result<EducationEntry, DatabaseError>;
    async fn update_education(
        &self,
        student_id: Uuid,
        education_id: Uuid,
        patch: EducationPatch,
    ) -> Result<EducationEntry, DatabaseError>;
    async fn delete_education(&self, student_id: Uuid, education_id: Uuid)
        -> Result<(), DatabaseError>;

    /// Stores the submission and sets `assessment_completed` in one transaction.
    async fn record_submission(
        &self,
        student_id: Uuid,
        assessment_id: Uuid,
        report_pdf_url: Option<String>,
    ) -> Result<AssessmentSubmission, DatabaseError>;
    /// Newest first.
    async fn list_submissions(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<AssessmentSubmission>, DatabaseError>;
    async fn find_submission(
        &self,
        submission_id: Uuid,
    ) -> Result<Option<AssessmentSubmission>, DatabaseError>;
    async fn latest_submission(
        &self,
        student_id: Uuid,
        assessment_id: Uuid,
    ) -> Result<Option<AssessmentSubmission>, DatabaseError>;
}

#[async_trait]
pub trait AssessmentCatalog: Send + Sync {
    /// Active definitions, newest first.
    async fn list_active_assessments(&self) -> Result<Vec<AssessmentDefinition>, DatabaseError>;
    async fn find_active_assessment(
        &self,
        assessment_id: Uuid,
    ) -> Result<Option<AssessmentDefinition>, DatabaseError>;
    /// Any definition, active or not.
    async fn find_assessment(
        &self,
        assessment_id: Uuid,
    ) -> Result<Option<AssessmentDefinition>, DatabaseError>;
}

/// Everything the handlers need from persistence.
#[async_trait]
pub trait Store: CredentialStore + ProfileStore + AssessmentCatalog {
    async fn health_check(&self) -> Result<(), DatabaseError>;
}
