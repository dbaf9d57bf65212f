use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{
    AssessmentDefinition, AssessmentSubmission, EducationEntry, EducationPatch, NewEducation,
    NewStudent, NewUser, Student, StudentPatch, User,
};
use crate::database::repository::{AssessmentCatalog, CredentialStore, ProfileStore, Store};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, verified, created_at";

const STUDENT_COLUMNS: &str = "student_id, user_id, phone, address, photo_url, video_url, help_text, \
     gender, age, parent_guardian_occupation, parent_guardian_monthly_income, \
     parents_education_status, parent_live_status, scholarship_amount_requested, \
     is_eligible_for_zakat, applicant_email, applicant_type, applicant_name, \
     applicant_mobile_number, profile_completed, assessment_completed, created_at, updated_at";

const EDUCATION_COLUMNS: &str = "education_id, student_id, institution_name, education_level, \
     year_of_passing, marks_obtained, report_card_url, created_at, updated_at";

const ASSESSMENT_COLUMNS: &str = "assessment_id, assessment_name, assessment_type, description, \
     total_questions, time_limit_minutes, is_active, created_at, updated_at";

const SUBMISSION_COLUMNS: &str =
    "submission_id, student_id, assessment_id, report_pdf_url, submitted_at";

/// Postgres-backed store. Schema lives in `sql/schema.sql`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn lock_student(
        tx: &mut Transaction<'_, Postgres>,
        student_id: Uuid,
    ) -> Result<Student, DatabaseError> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE student_id = $1 FOR UPDATE");
        sqlx::query_as::<_, Student>(&sql)
            .bind(student_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Student profile not found".to_string()))
    }

    async fn save_student(
        tx: &mut Transaction<'_, Postgres>,
        student: &Student,
    ) -> Result<Student, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE students SET
                phone = $2, address = $3, photo_url = $4, video_url = $5, help_text = $6,
                gender = $7, age = $8, parent_guardian_occupation = $9,
                parent_guardian_monthly_income = $10, parents_education_status = $11,
                parent_live_status = $12, scholarship_amount_requested = $13,
                is_eligible_for_zakat = $14, applicant_email = $15, applicant_type = $16,
                applicant_name = $17, applicant_mobile_number = $18,
                profile_completed = $19, assessment_completed = $20, updated_at = $21
            WHERE student_id = $1
            RETURNING {STUDENT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, Student>(&sql)
            .bind(student.student_id)
            .bind(&student.phone)
            .bind(&student.address)
            .bind(&student.photo_url)
            .bind(&student.video_url)
            .bind(&student.help_text)
            .bind(&student.gender)
            .bind(student.age)
            .bind(&student.parent_guardian_occupation)
            .bind(&student.parent_guardian_monthly_income)
            .bind(&student.parents_education_status)
            .bind(student.parent_live_status)
            .bind(&student.scholarship_amount_requested)
            .bind(student.is_eligible_for_zakat)
            .bind(&student.applicant_email)
            .bind(&student.applicant_type)
            .bind(&student.applicant_name)
            .bind(&student.applicant_mobile_number)
            .bind(student.profile_completed)
            .bind(student.assessment_completed)
            .bind(student.updated_at)
            .fetch_one(&mut **tx)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn insert_user(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash, role, verified, created_at) \
             VALUES ($1, $2, $3, $4, $5, false, $6) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new_user.name)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(new_user.role)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Email already registered"))
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn insert_student(
        &self,
        user_id: Uuid,
        profile: NewStudent,
    ) -> Result<Student, DatabaseError> {
        let s = profile.into_student(user_id, Utc::now());
        let sql = format!(
            r#"
            INSERT INTO students ({STUDENT_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                    $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23)
            RETURNING {STUDENT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Student>(&sql)
            .bind(s.student_id)
            .bind(s.user_id)
            .bind(&s.phone)
            .bind(&s.address)
            .bind(&s.photo_url)
            .bind(&s.video_url)
            .bind(&s.help_text)
            .bind(&s.gender)
            .bind(s.age)
            .bind(&s.parent_guardian_occupation)
            .bind(&s.parent_guardian_monthly_income)
            .bind(&s.parents_education_status)
            .bind(s.parent_live_status)
            .bind(&s.scholarship_amount_requested)
            .bind(s.is_eligible_for_zakat)
            .bind(&s.applicant_email)
            .bind(&s.applicant_type)
            .bind(&s.applicant_name)
            .bind(&s.applicant_mobile_number)
            .bind(s.profile_completed)
            .bind(s.assessment_completed)
            .bind(s.created_at)
            .bind(s.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Student profile already exists"))
    }

    async fn find_student_by_user(&self, user_id: Uuid) -> Result<Option<Student>, DatabaseError> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE user_id = $1");
        Ok(sqlx::query_as::<_, Student>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_student(
        &self,
        student_id: Uuid,
        patch: StudentPatch,
    ) -> Result<Student, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let mut student = Self::lock_student(&mut tx, student_id).await?;
        patch.apply(&mut student, Utc::now());
        let saved = Self::save_student(&mut tx, &student).await?;
        tx.commit().await?;
        debug!("Updated student profile {}", student_id);
        Ok(saved)
    }

    async fn mark_profile_completed(&self, student_id: Uuid) -> Result<Student, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let mut student = Self::lock_student(&mut tx, student_id).await?;
        if !student.profile_completed {
            student.profile_completed = true;
            student.updated_at = Utc::now();
            student = Self::save_student(&mut tx, &student).await?;
        }
        tx.commit().await?;
        Ok(student)
    }

    async fn delete_student(&self, student_id: Uuid) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM student_education WHERE student_id = $1")
            .bind(student_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM student_assessment WHERE student_id = $1")
            .bind(student_id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM students WHERE student_id = $1")
            .bind(student_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Student profile not found".to_string()));
        }
        tx.commit().await?;
        Ok(())
    }

    async fn list_education(&self, student_id: Uuid) -> Result<Vec<EducationEntry>, DatabaseError> {
        let sql = format!(
            "SELECT {EDUCATION_COLUMNS} FROM student_education \
             WHERE student_id = $1 ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, EducationEntry>(&sql)
            .bind(student_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_education(
        &self,
        student_id: Uuid,
        education_id: Uuid,
    ) -> Result<Option<EducationEntry>, DatabaseError> {
        let sql = format!(
            "SELECT {EDUCATION_COLUMNS} FROM student_education \
             WHERE education_id = $1 AND student_id = $2"
        );
        Ok(sqlx::query_as::<_, EducationEntry>(&sql)
            .bind(education_id)
            .bind(student_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_education(
        &self,
        student_id: Uuid,
        entry: NewEducation,
    ) -> Result<EducationEntry, DatabaseError> {
        let e = entry.into_entry(student_id, Utc::now());
        let sql = format!(
            "INSERT INTO student_education ({EDUCATION_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {EDUCATION_COLUMNS}"
        );
        sqlx::query_as::<_, EducationEntry>(&sql)
            .bind(e.education_id)
            .bind(e.student_id)
            .bind(&e.institution_name)
            .bind(&e.education_level)
            .bind(&e.year_of_passing)
            .bind(&e.marks_obtained)
            .bind(&e.report_card_url)
            .bind(e.created_at)
            .bind(e.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| DatabaseError::from_write(err, "Education entry already exists"))
    }

    async fn update_education(
        &self,
        student_id: Uuid,
        education_id: Uuid,
        patch: EducationPatch,
    ) -> Result<EducationEntry, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let select = format!(
            "SELECT {EDUCATION_COLUMNS} FROM student_education \
             WHERE education_id = $1 AND student_id = $2 FOR UPDATE"
        );
        let mut entry = sqlx::query_as::<_, EducationEntry>(&select)
            .bind(education_id)
            .bind(student_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Education entry not found".to_string()))?;

        patch.apply(&mut entry, Utc::now());

        let update = format!(
            "UPDATE student_education SET institution_name = $2, education_level = $3, \
             year_of_passing = $4, marks_obtained = $5, report_card_url = $6, updated_at = $7 \
             WHERE education_id = $1 RETURNING {EDUCATION_COLUMNS}"
        );
        let saved = sqlx::query_as::<_, EducationEntry>(&update)
            .bind(entry.education_id)
            .bind(&entry.institution_name)
            .bind(&entry.education_level)
            .bind(&entry.year_of_passing)
            .bind(&entry.marks_obtained)
            .bind(&entry.report_card_url)
            .bind(entry.updated_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(saved)
    }

    async fn delete_education(
        &self,
        student_id: Uuid,
        education_id: Uuid,
    ) -> Result<(), DatabaseError> {
        let result =
            sqlx::query("DELETE FROM student_education WHERE education_id = $1 AND student_id = $2")
                .bind(education_id)
                .bind(student_id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Education entry not found".to_string()));
        }
        Ok(())
    }

    async fn record_submission(
        &self,
        student_id: Uuid,
        assessment_id: Uuid,
        report_pdf_url: Option<String>,
    ) -> Result<AssessmentSubmission, DatabaseError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let flagged = sqlx::query(
            "UPDATE students SET assessment_completed = true, updated_at = $2 WHERE student_id = $1",
        )
        .bind(student_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;
        if flagged.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Student not found".to_string()));
        }

        let sql = format!(
            "INSERT INTO student_assessment ({SUBMISSION_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {SUBMISSION_COLUMNS}"
        );
        let submission = sqlx::query_as::<_, AssessmentSubmission>(&sql)
            .bind(Uuid::new_v4())
            .bind(student_id)
            .bind(assessment_id)
            .bind(&report_pdf_url)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(submission)
    }

    async fn list_submissions(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<AssessmentSubmission>, DatabaseError> {
        let sql = format!(
            "SELECT {SUBMISSION_COLUMNS} FROM student_assessment \
             WHERE student_id = $1 ORDER BY submitted_at DESC"
        );
        Ok(sqlx::query_as::<_, AssessmentSubmission>(&sql)
            .bind(student_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_submission(
        &self,
        submission_id: Uuid,
    ) -> Result<Option<AssessmentSubmission>, DatabaseError> {
        let sql = format!("SELECT {SUBMISSION_COLUMNS} FROM student_assessment WHERE submission_id = $1");
        Ok(sqlx::query_as::<_, AssessmentSubmission>(&sql)
            .bind(submission_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn latest_submission(
        &self,
        student_id: Uuid,
        assessment_id: Uuid,
    ) -> Result<Option<AssessmentSubmission>, DatabaseError> {
        let sql = format!(
            "SELECT {SUBMISSION_COLUMNS} FROM student_assessment \
             WHERE student_id = $1 AND assessment_id = $2 \
             ORDER BY submitted_at DESC LIMIT 1"
        );
        Ok(sqlx::query_as::<_, AssessmentSubmission>(&sql)
            .bind(student_id)
            .bind(assessment_id)
            .fetch_optional(&self.pool)
            .await?)
    }
}

#[async_trait]
impl AssessmentCatalog for PgStore {
    async fn list_active_assessments(&self) -> Result<Vec<AssessmentDefinition>, DatabaseError> {
        let sql = format!(
            "SELECT {ASSESSMENT_COLUMNS} FROM assessment_master \
             WHERE is_active = true ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, AssessmentDefinition>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_active_assessment(
        &self,
        assessment_id: Uuid,
    ) -> Result<Option<AssessmentDefinition>, DatabaseError> {
        let sql = format!(
            "SELECT {ASSESSMENT_COLUMNS} FROM assessment_master \
             WHERE assessment_id = $1 AND is_active = true"
        );
        Ok(sqlx::query_as::<_, AssessmentDefinition>(&sql)
            .bind(assessment_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_assessment(
        &self,
        assessment_id: Uuid,
    ) -> Result<Option<AssessmentDefinition>, DatabaseError> {
        let sql = format!("SELECT {ASSESSMENT_COLUMNS} FROM assessment_master WHERE assessment_id = $1");
        Ok(sqlx::query_as::<_, AssessmentDefinition>(&sql)
            .bind(assessment_id)
            .fetch_optional(&self.pool)
            .await?)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
