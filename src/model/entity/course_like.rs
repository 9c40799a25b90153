use crate::impl_paginatable_for;
use crate::model::entity::{Course, Student};
use crate::model::repo::{BelongsTo, Describe, ResourceTyped};
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Nothing stops a student from liking the same course twice.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct CourseLike {
    id: Uuid,
    student_id: Uuid,
    course_id: Uuid,
    liked_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CourseLikeCreate {
    pub student_id: Uuid,
    pub course_id: Uuid,
}

impl ResourceTyped for CourseLike {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::CourseLike
    }
}

impl CourseLike {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn student_id(&self) -> Uuid {
        self.student_id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn liked_at(&self) -> DateTime<Utc> {
        self.liked_at
    }
}

#[async_trait]
impl CrudRepository<CourseLike, CourseLikeCreate, Uuid> for CourseLike {
    async fn create(mm: &ModelManager, data: CourseLikeCreate) -> DatabaseResult<Self> {
        let like = sqlx::query_as(
            "INSERT INTO course_likes (id, student_id, course_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.student_id)
        .bind(data.course_id)
        .fetch_one(mm.executor())
        .await?;

        Ok(like)
    }

    async fn update(self, mm: &ModelManager, data: CourseLikeCreate) -> DatabaseResult<Self> {
        let updated = sqlx::query_as("UPDATE course_likes SET student_id = $1, course_id = $2 WHERE id = $3 RETURNING *")
            .bind(data.student_id)
            .bind(data.course_id)
            .bind(self.id)
            .fetch_one(mm.executor())
            .await?;

        Ok(updated)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM course_likes WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM course_likes WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM course_likes ORDER BY liked_at LIMIT $1 OFFSET $2")
                .bind(limit)
                .bind(offset)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM course_likes")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(CourseLike, CourseLikeCreate, Uuid);

#[async_trait]
impl BelongsTo<Student> for CourseLike {
    async fn all_by(mm: &ModelManager, student_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM course_likes WHERE student_id = $1 ORDER BY liked_at")
                .bind(student_id)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }
}

#[async_trait]
impl BelongsTo<Course> for CourseLike {
    async fn all_by(mm: &ModelManager, course_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM course_likes WHERE course_id = $1 ORDER BY liked_at")
                .bind(course_id)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }
}

#[async_trait]
impl Describe for CourseLike {
    async fn describe(&self, mm: &ModelManager) -> DatabaseResult<String> {
        let row = CourseLikeDetailRow::find_by_id(mm, self.id).await?;
        Ok(row.to_string())
    }
}

// Utils

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CourseLikeDetailRow {
    pub id: Uuid,
    pub username: String,
    pub course_title: String,
}

impl CourseLikeDetailRow {
    pub async fn find_by_id(mm: &ModelManager, like_id: Uuid) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            SELECT l.id, u.username, c.title AS course_title
            FROM course_likes l
            JOIN students s ON s.id = l.student_id
            JOIN users u ON u.id = s.user_id
            JOIN courses c ON c.id = l.course_id
            WHERE l.id = $1
            "#,
        )
        .bind(like_id)
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }
}

impl std::fmt::Display for CourseLikeDetailRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} liked {}", self.username, self.course_title)
    }
}

impl Course {
    pub async fn count_likes(mm: &ModelManager, course_id: Uuid) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM course_likes WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(mm.executor())
            .await?;
        Ok(result)
    }
}
