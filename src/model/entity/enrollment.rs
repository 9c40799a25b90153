use crate::impl_paginatable_for;
use crate::model::entity::{Course, Student};
use crate::model::repo::{BelongsTo, Describe, ResourceTyped};
use crate::model::validation::validate_decimal;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A student's registration in a course. The same pair may be enrolled
/// more than once, and `progress` is not clamped to 0..=100.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Enrollment {
    id: Uuid,
    student_id: Uuid,
    course_id: Uuid,
    enrolled_at: DateTime<Utc>,
    progress: Decimal,
}

#[derive(Debug, Deserialize, Serialize, Validate, utoipa::ToSchema)]
pub struct EnrollmentCreate {
    pub student_id: Uuid,
    pub course_id: Uuid,
    #[validate(custom(function = validate_decimal))]
    pub progress: Option<Decimal>,
}

impl ResourceTyped for Enrollment {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Enrollment
    }
}

impl Enrollment {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn student_id(&self) -> Uuid {
        self.student_id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn enrolled_at(&self) -> DateTime<Utc> {
        self.enrolled_at
    }

    pub fn progress(&self) -> Decimal {
        self.progress
    }
}

#[async_trait]
impl CrudRepository<Enrollment, EnrollmentCreate, Uuid> for Enrollment {
    async fn create(mm: &ModelManager, data: EnrollmentCreate) -> DatabaseResult<Self> {
        data.validate()?;

        let enrollment = sqlx::query_as(
            r#"
            INSERT INTO enrollments (id, student_id, course_id, progress)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.student_id)
        .bind(data.course_id)
        .bind(data.progress.unwrap_or(Decimal::ZERO))
        .fetch_one(mm.executor())
        .await?;

        Ok(enrollment)
    }

    async fn update(self, mm: &ModelManager, data: EnrollmentCreate) -> DatabaseResult<Self> {
        data.validate()?;

        let progress = data.progress.unwrap_or(self.progress);
        let updated = sqlx::query_as(
            "UPDATE enrollments SET student_id = $1, course_id = $2, progress = $3 WHERE id = $4 RETURNING *",
        )
        .bind(data.student_id)
        .bind(data.course_id)
        .bind(progress)
        .bind(self.id)
        .fetch_one(mm.executor())
        .await?;

        Ok(updated)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM enrollments WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM enrollments ORDER BY enrolled_at LIMIT $1 OFFSET $2")
                .bind(limit)
                .bind(offset)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM enrollments")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Enrollment, EnrollmentCreate, Uuid);

#[async_trait]
impl BelongsTo<Student> for Enrollment {
    async fn all_by(mm: &ModelManager, student_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM enrollments WHERE student_id = $1 ORDER BY enrolled_at",
        )
        .bind(student_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }
}

#[async_trait]
impl BelongsTo<Course> for Enrollment {
    async fn all_by(mm: &ModelManager, course_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM enrollments WHERE course_id = $1 ORDER BY enrolled_at",
        )
        .bind(course_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }
}

#[async_trait]
impl Describe for Enrollment {
    async fn describe(&self, mm: &ModelManager) -> DatabaseResult<String> {
        let row = EnrollmentDetailRow::find_by_id(mm, self.id).await?;
        Ok(row.to_string())
    }
}

// Utils

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct EnrollmentDetailRow {
    pub id: Uuid,
    pub username: String,
    pub course_title: String,
    pub progress: Decimal,
}

impl EnrollmentDetailRow {
    pub async fn find_by_id(mm: &ModelManager, enrollment_id: Uuid) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            SELECT e.id, u.username, c.title AS course_title, e.progress
            FROM enrollments e
            JOIN students s ON s.id = e.student_id
            JOIN users u ON u.id = s.user_id
            JOIN courses c ON c.id = e.course_id
            WHERE e.id = $1
            "#,
        )
        .bind(enrollment_id)
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }
}

impl std::fmt::Display for EnrollmentDetailRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} enrolled in {}", self.username, self.course_title)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_names_student_and_course() {
        let row = EnrollmentDetailRow {
            id: Uuid::new_v4(),
            username: String::from("jdoe"),
            course_title: String::from("Rust for Beginners"),
            progress: Decimal::ZERO,
        };
        assert_eq!(row.to_string(), "jdoe enrolled in Rust for Beginners");
    }

    #[test]
    fn progress_precision_is_checked_not_bounds() {
        let mut data = EnrollmentCreate {
            student_id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            progress: Some(Decimal::new(15050, 2)), // 150.50, above 100 is fine
        };
        assert!(data.validate().is_ok());

        data.progress = Some(Decimal::new(12345, 3)); // 12.345
        assert!(data.validate().is_err());

        data.progress = None;
        assert!(data.validate().is_ok());
    }
}
