use crate::impl_paginatable_for;
use crate::model::entity::UserEntity;
use crate::model::repo::{BelongsTo, Describe, ResourceTyped};
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Student {
    id: Uuid,
    user_id: Uuid,
    intended: String,
}

#[derive(Debug, Deserialize, Serialize, Validate, utoipa::ToSchema)]
pub struct StudentCreate {
    pub user_id: Uuid,
    pub intended: String,
}

impl ResourceTyped for Student {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Student
    }
}

impl Student {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn intended(&self) -> &str {
        &self.intended
    }
}

#[async_trait]
impl CrudRepository<Student, StudentCreate, Uuid> for Student {
    async fn create(mm: &ModelManager, data: StudentCreate) -> DatabaseResult<Self> {
        data.validate()?;

        let student = sqlx::query_as(
            "INSERT INTO students (id, user_id, intended) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(&data.intended)
        .fetch_one(mm.executor())
        .await?;

        Ok(student)
    }

    async fn update(self, mm: &ModelManager, data: StudentCreate) -> DatabaseResult<Self> {
        data.validate()?;

        let updated = sqlx::query_as("UPDATE students SET user_id = $1, intended = $2 WHERE id = $3 RETURNING *")
            .bind(data.user_id)
            .bind(&data.intended)
            .bind(self.id)
            .fetch_one(mm.executor())
            .await?;

        Ok(updated)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM students WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM students ORDER BY id LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Student, StudentCreate, Uuid);

#[async_trait]
impl BelongsTo<UserEntity> for Student {
    async fn all_by(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM students WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }
}

#[async_trait]
impl Describe for Student {
    async fn describe(&self, mm: &ModelManager) -> DatabaseResult<String> {
        let username: String = sqlx::query_scalar("SELECT username FROM users WHERE id = $1")
            .bind(self.user_id)
            .fetch_one(mm.executor())
            .await?;
        Ok(username)
    }
}

impl Student {
    /// At most one student row exists per user.
    pub async fn find_by_user(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM students WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    pub async fn find_by_username(
        mm: &ModelManager,
        username: &str,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(
            r#"
            SELECT s.*
            FROM students s
            JOIN users u ON u.id = s.user_id
            WHERE u.username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(mm.executor())
        .await?;
        Ok(result)
    }
}
