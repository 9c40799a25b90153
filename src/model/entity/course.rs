use crate::impl_describe_with_display;
use crate::impl_paginatable_for;
use crate::model::entity::Lecturer;
use crate::model::repo::{BelongsTo, ResourceTyped};
use crate::model::upload::{DEFAULT_DISPLAY_PICTURE, UploadField};
use crate::model::validation::validate_course_image;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Course {
    id: Uuid,
    title: String,
    description: String,
    image: String,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, Validate, utoipa::ToSchema)]
pub struct CourseCreate {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: String,
    #[validate(custom(function = validate_course_image))]
    pub image: Option<String>,
    /// Owning lecturer.
    pub created_by: Uuid,
}

impl ResourceTyped for Course {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Course
    }
}

impl Course {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn created_by(&self) -> Uuid {
        self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl std::fmt::Display for Course {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[async_trait]
impl CrudRepository<Course, CourseCreate, Uuid> for Course {
    async fn create(mm: &ModelManager, data: CourseCreate) -> DatabaseResult<Self> {
        data.validate()?;

        let image = data
            .image
            .as_deref()
            .map(|name| UploadField::CourseImage.path(name))
            .unwrap_or_else(|| String::from(DEFAULT_DISPLAY_PICTURE));

        let course = sqlx::query_as(
            r#"
            INSERT INTO courses (id, title, description, image, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.title)
        .bind(&data.description)
        .bind(&image)
        .bind(data.created_by)
        .fetch_one(mm.executor())
        .await?;

        Ok(course)
    }

    /// Also refreshes `updated_at`; `created_at` never moves.
    async fn update(self, mm: &ModelManager, data: CourseCreate) -> DatabaseResult<Self> {
        data.validate()?;

        let image = data
            .image
            .as_deref()
            .map(|name| UploadField::CourseImage.path(name))
            .unwrap_or(self.image);

        let course = sqlx::query_as(
            r#"
            UPDATE courses
            SET title = $1, description = $2, image = $3, created_by = $4, updated_at = now()
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(&image)
        .bind(data.created_by)
        .bind(self.id)
        .fetch_one(mm.executor())
        .await?;

        Ok(course)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses WHERE id = $1")
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
            sqlx::query_as("SELECT * FROM courses ORDER BY created_at DESC LIMIT $1 OFFSET $2")
                .bind(limit)
                .bind(offset)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Course, CourseCreate, Uuid);
impl_describe_with_display!(Course);

#[async_trait]
impl BelongsTo<Lecturer> for Course {
    async fn all_by(mm: &ModelManager, lecturer_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM courses WHERE created_by = $1 ORDER BY created_at")
                .bind(lecturer_id)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }
}

impl Course {
    pub async fn find_by_title(mm: &ModelManager, title: &str) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses WHERE title = $1 ORDER BY created_at LIMIT 1")
            .bind(title)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_is_title() {
        let course = Course {
            id: Uuid::new_v4(),
            title: String::from("Rust for Beginners"),
            description: String::new(),
            image: String::from(DEFAULT_DISPLAY_PICTURE),
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(course.to_string(), "Rust for Beginners");
    }

    #[test]
    fn title_is_bounded() {
        let data = CourseCreate {
            title: "x".repeat(256),
            description: String::from("desc"),
            image: None,
            created_by: Uuid::new_v4(),
        };
        assert!(data.validate().unwrap_err().field_errors().contains_key("title"));
    }
}
