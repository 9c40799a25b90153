use crate::impl_paginatable_for;
use crate::model::entity::UserEntity;
use crate::model::repo::{BelongsTo, Describe, ResourceTyped};
use crate::model::upload::{DEFAULT_DISPLAY_PICTURE, UploadField};
use crate::model::validation::validate_profile_picture;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Lecturer {
    id: Uuid,
    user_id: Uuid,
    bio: Option<String>,
    profile_picture: String,
}

#[derive(Debug, Deserialize, Serialize, Validate, utoipa::ToSchema)]
pub struct LecturerCreate {
    pub user_id: Uuid,
    pub bio: Option<String>,
    /// File name or path of the picture; omitted means the default picture.
    #[validate(custom(function = validate_profile_picture))]
    pub profile_picture: Option<String>,
}

impl ResourceTyped for Lecturer {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Lecturer
    }
}

impl Lecturer {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    pub fn profile_picture(&self) -> &str {
        &self.profile_picture
    }
}

impl LecturerCreate {
    fn picture_path(&self) -> Option<String> {
        self.profile_picture
            .as_deref()
            .map(|name| UploadField::ProfilePicture.path(name))
    }
}

#[async_trait]
impl CrudRepository<Lecturer, LecturerCreate, Uuid> for Lecturer {
    async fn create(mm: &ModelManager, data: LecturerCreate) -> DatabaseResult<Self> {
        data.validate()?;

        let lecturer = sqlx::query_as(
            r#"
            INSERT INTO lecturers (id, user_id, bio, profile_picture)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(&data.bio)
        .bind(
            data.picture_path()
                .unwrap_or_else(|| String::from(DEFAULT_DISPLAY_PICTURE)),
        )
        .fetch_one(mm.executor())
        .await?;

        Ok(lecturer)
    }

    async fn update(self, mm: &ModelManager, data: LecturerCreate) -> DatabaseResult<Self> {
        data.validate()?;

        let picture = data
            .picture_path()
            .unwrap_or_else(|| self.profile_picture.clone());

        let updated = sqlx::query_as(
            "UPDATE lecturers SET user_id = $1, bio = $2, profile_picture = $3 WHERE id = $4 RETURNING *",
        )
        .bind(data.user_id)
        .bind(&data.bio)
        .bind(&picture)
        .bind(self.id)
        .fetch_one(mm.executor())
        .await?;

        Ok(updated)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM lecturers WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM lecturers WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM lecturers ORDER BY id LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lecturers")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Lecturer, LecturerCreate, Uuid);

#[async_trait]
impl BelongsTo<UserEntity> for Lecturer {
    async fn all_by(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM lecturers WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }
}

#[async_trait]
impl Describe for Lecturer {
    async fn describe(&self, mm: &ModelManager) -> DatabaseResult<String> {
        let username: String = sqlx::query_scalar("SELECT username FROM users WHERE id = $1")
            .bind(self.user_id)
            .fetch_one(mm.executor())
            .await?;
        Ok(username)
    }
}

impl Lecturer {
    pub async fn find_by_user(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM lecturers WHERE user_id = $1")
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
            SELECT l.*
            FROM lecturers l
            JOIN users u ON u.id = l.user_id
            WHERE u.username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(mm.executor())
        .await?;
        Ok(result)
    }
}
