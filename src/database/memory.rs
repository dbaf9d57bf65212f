use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    default_catalog, AssessmentDefinition, AssessmentSubmission, EducationEntry, EducationPatch,
    NewEducation, NewStudent, NewUser, Student, StudentPatch, User,
};
use crate::database::repository::{AssessmentCatalog, CredentialStore, ProfileStore, Store};

/// In-process store for tests and `--in-memory` demo runs.
///
/// All tables sit behind one lock, so every operation is atomic.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    students: HashMap<Uuid, Student>,
    education: Vec<EducationEntry>,
    assessments: Vec<AssessmentDefinition>,
    submissions: Vec<AssessmentSubmission>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with the default assessment catalog.
    pub fn seeded() -> Self {
        Self {
            inner: RwLock::new(Tables {
                assessments: default_catalog(),
                ..Default::default()
            }),
        }
    }

    /// Add or replace a catalog entry. The catalog has no HTTP surface.
    pub async fn put_assessment(&self, definition: AssessmentDefinition) {
        let mut tables = self.inner.write().await;
        tables
            .assessments
            .retain(|a| a.assessment_id != definition.assessment_id);
        tables.assessments.push(definition);
    }

    /// Counts rows still owned by `student_id` (education, submissions).
    pub async fn owned_row_counts(&self, student_id: Uuid) -> (usize, usize) {
        let tables = self.inner.read().await;
        (
            tables.education.iter().filter(|e| e.student_id == student_id).count(),
            tables.submissions.iter().filter(|s| s.student_id == student_id).count(),
        )
    }
}

/// Newest first; later inserts win ties.
fn newest_first<T: Clone>(rows: impl DoubleEndedIterator<Item = T>, at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut out: Vec<T> = rows.rev().collect();
    out.sort_by(|a, b| at(b).cmp(&at(a)));
    out
}

fn student_missing() -> DatabaseError {
    DatabaseError::NotFound("Student profile not found".to_string())
}

fn education_missing() -> DatabaseError {
    DatabaseError::NotFound("Education entry not found".to_string())
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn insert_user(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.inner.write().await;
        if tables.users.iter().any(|u| u.email == new_user.email) {
            return Err(DatabaseError::Conflict("Email already registered".to_string()));
        }
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            verified: false,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let tables = self.inner.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.inner.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let tables = self.inner.read().await;
        Ok(newest_first(tables.users.iter().cloned(), |u| u.created_at))
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn insert_student(
        &self,
        user_id: Uuid,
        profile: NewStudent,
    ) -> Result<Student, DatabaseError> {
        let mut tables = self.inner.write().await;
        if !tables.users.iter().any(|u| u.id == user_id) {
            return Err(DatabaseError::NotFound("User not found".to_string()));
        }
        if tables.students.values().any(|s| s.user_id == user_id) {
            return Err(DatabaseError::Conflict("Student profile already exists".to_string()));
        }
        let student = profile.into_student(user_id, Utc::now());
        tables.students.insert(student.student_id, student.clone());
        Ok(student)
    }

    async fn find_student_by_user(&self, user_id: Uuid) -> Result<Option<Student>, DatabaseError> {
        let tables = self.inner.read().await;
        Ok(tables.students.values().find(|s| s.user_id == user_id).cloned())
    }

    async fn update_student(
        &self,
        student_id: Uuid,
        patch: StudentPatch,
    ) -> Result<Student, DatabaseError> {
        let mut tables = self.inner.write().await;
        let student = tables.students.get_mut(&student_id).ok_or_else(student_missing)?;
        patch.apply(student, Utc::now());
        Ok(student.clone())
    }

    async fn mark_profile_completed(&self, student_id: Uuid) -> Result<Student, DatabaseError> {
        let mut tables = self.inner.write().await;
        let student = tables.students.get_mut(&student_id).ok_or_else(student_missing)?;
        if !student.profile_completed {
            student.profile_completed = true;
            student.updated_at = Utc::now();
        }
        Ok(student.clone())
    }

    async fn delete_student(&self, student_id: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.inner.write().await;
        tables.students.remove(&student_id).ok_or_else(student_missing)?;
        tables.education.retain(|e| e.student_id != student_id);
        tables.submissions.retain(|s| s.student_id != student_id);
        Ok(())
    }

    async fn list_education(&self, student_id: Uuid) -> Result<Vec<EducationEntry>, DatabaseError> {
        let tables = self.inner.read().await;
        let rows = tables
            .education
            .iter()
            .filter(|e| e.student_id == student_id)
            .cloned()
            .collect::<Vec<_>>();
        Ok(newest_first(rows.into_iter(), |e| e.created_at))
    }

    async fn find_education(
        &self,
        student_id: Uuid,
        education_id: Uuid,
    ) -> Result<Option<EducationEntry>, DatabaseError> {
        let tables = self.inner.read().await;
        Ok(tables
            .education
            .iter()
            .find(|e| e.education_id == education_id && e.student_id == student_id)
            .cloned())
    }

    async fn insert_education(
        &self,
        student_id: Uuid,
        entry: NewEducation,
    ) -> Result<EducationEntry, DatabaseError> {
        let mut tables = self.inner.write().await;
        if !tables.students.contains_key(&student_id) {
            return Err(student_missing());
        }
        let entry = entry.into_entry(student_id, Utc::now());
        tables.education.push(entry.clone());
        Ok(entry)
    }

    async fn update_education(
        &self,
        student_id: Uuid,
        education_id: Uuid,
        patch: EducationPatch,
    ) -> Result<EducationEntry, DatabaseError> {
        let mut tables = self.inner.write().await;
        let entry = tables
            .education
            .iter_mut()
            .find(|e| e.education_id == education_id && e.student_id == student_id)
            .ok_or_else(education_missing)?;
        patch.apply(entry, Utc::now());
        Ok(entry.clone())
    }

    async fn delete_education(
        &self,
        student_id: Uuid,
        education_id: Uuid,
    ) -> Result<(), DatabaseError> {
        let mut tables = self.inner.write().await;
        let before = tables.education.len();
        tables
            .education
            .retain(|e| !(e.education_id == education_id && e.student_id == student_id));
        if tables.education.len() == before {
            return Err(education_missing());
        }
        Ok(())
    }

    async fn record_submission(
        &self,
        student_id: Uuid,
        assessment_id: Uuid,
        report_pdf_url: Option<String>,
    ) -> Result<AssessmentSubmission, DatabaseError> {
        let mut tables = self.inner.write().await;
        let now = Utc::now();
        let student = tables
            .students
            .get_mut(&student_id)
            .ok_or_else(|| DatabaseError::NotFound("Student not found".to_string()))?;
        student.assessment_completed = true;
        student.updated_at = now;

        let submission = AssessmentSubmission {
            submission_id: Uuid::new_v4(),
            student_id,
            assessment_id,
            report_pdf_url,
            submitted_at: now,
        };
        tables.submissions.push(submission.clone());
        Ok(submission)
    }

    async fn list_submissions(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<AssessmentSubmission>, DatabaseError> {
        let tables = self.inner.read().await;
        let rows = tables
            .submissions
            .iter()
            .filter(|s| s.student_id == student_id)
            .cloned()
            .collect::<Vec<_>>();
        Ok(newest_first(rows.into_iter(), |s| s.submitted_at))
    }

    async fn find_submission(
        &self,
        submission_id: Uuid,
    ) -> Result<Option<AssessmentSubmission>, DatabaseError> {
        let tables = self.inner.read().await;
        Ok(tables
            .submissions
            .iter()
            .find(|s| s.submission_id == submission_id)
            .cloned())
    }

    async fn latest_submission(
        &self,
        student_id: Uuid,
        assessment_id: Uuid,
    ) -> Result<Option<AssessmentSubmission>, DatabaseError> {
        let tables = self.inner.read().await;
        let rows = tables
            .submissions
            .iter()
            .filter(|s| s.student_id == student_id && s.assessment_id == assessment_id)
            .cloned()
            .collect::<Vec<_>>();
        Ok(newest_first(rows.into_iter(), |s| s.submitted_at).into_iter().next())
    }
}

#[async_trait]
impl AssessmentCatalog for MemoryStore {
    async fn list_active_assessments(&self) -> Result<Vec<AssessmentDefinition>, DatabaseError> {
        let tables = self.inner.read().await;
        let rows = tables
            .assessments
            .iter()
            .filter(|a| a.is_active)
            .cloned()
            .collect::<Vec<_>>();
        Ok(newest_first(rows.into_iter(), |a| a.created_at))
    }

    async fn find_active_assessment(
        &self,
        assessment_id: Uuid,
    ) -> Result<Option<AssessmentDefinition>, DatabaseError> {
        let tables = self.inner.read().await;
        Ok(tables
            .assessments
            .iter()
            .find(|a| a.assessment_id == assessment_id && a.is_active)
            .cloned())
    }

    async fn find_assessment(
        &self,
        assessment_id: Uuid,
    ) -> Result<Option<AssessmentDefinition>, DatabaseError> {
        let tables = self.inner.read().await;
        Ok(tables
            .assessments
            .iter()
            .find(|a| a.assessment_id == assessment_id)
            .cloned())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::UserRole;

    async fn student_fixture(store: &MemoryStore) -> Student {
        let user = store
            .insert_user(NewUser {
                name: "Bilal".to_string(),
                email: "bilal@example.org".to_string(),
                password_hash: "hash".to_string(),
                role: UserRole::Student,
            })
            .await
            .unwrap();
        store
            .insert_student(
                user.id,
                NewStudent {
                    phone: "123".to_string(),
                    address: "Street 1".to_string(),
                    help_text: "Books".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
    }

    fn school(name: &str) -> NewEducation {
        NewEducation {
            institution_name: name.to_string(),
            education_level: "Class 10".to_string(),
            year_of_passing: "2023".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        student_fixture(&store).await;
        let err = store
            .insert_user(NewUser {
                name: "Other".to_string(),
                email: "bilal@example.org".to_string(),
                password_hash: "hash".to_string(),
                role: UserRole::Donor,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    #[tokio::test]
    async fn second_profile_conflicts() {
        let store = MemoryStore::new();
        let student = student_fixture(&store).await;
        let err = store
            .insert_student(student.user_id, NewStudent::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    #[tokio::test]
    async fn education_lists_newest_first() {
        let store = MemoryStore::new();
        let student = student_fixture(&store).await;
        store.insert_education(student.student_id, school("First")).await.unwrap();
        store.insert_education(student.student_id, school("Second")).await.unwrap();

        let entries = store.list_education(student.student_id).await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.institution_name.as_str()).collect();
        assert_eq!(names, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn deleting_student_cascades() {
        let store = MemoryStore::seeded();
        let student = student_fixture(&store).await;
        let assessment = store.list_active_assessments().await.unwrap().remove(0);

        let entry = store.insert_education(student.student_id, school("School")).await.unwrap();
        let submission = store
            .record_submission(student.student_id, assessment.assessment_id, None)
            .await
            .unwrap();

        store.delete_student(student.student_id).await.unwrap();

        assert_eq!(store.owned_row_counts(student.student_id).await, (0, 0));
        assert!(store
            .find_education(student.student_id, entry.education_id)
            .await
            .unwrap()
            .is_none());
        assert!(store.find_submission(submission.submission_id).await.unwrap().is_none());
        assert!(store.find_student_by_user(student.user_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn inactive_assessments_are_hidden() {
        let store = MemoryStore::seeded();
        let mut retired = AssessmentDefinition::new("Retired", "aptitude", None, 10, 10);
        retired.is_active = false;
        let retired_id = retired.assessment_id;
        store.put_assessment(retired).await;

        let active = store.list_active_assessments().await.unwrap();
        assert_eq!(active.len(), 3);
        assert!(active.iter().all(|a| a.assessment_id != retired_id));
        assert!(store.find_active_assessment(retired_id).await.unwrap().is_none());
        assert!(store.find_assessment(retired_id).await.unwrap().is_some());
    }
}
