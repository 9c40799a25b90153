use crate::impl_describe_with_display;
use crate::impl_paginatable_for;
use crate::model::entity::Module;
use crate::model::repo::{BelongsTo, ResourceTyped};
use crate::model::upload::UploadField;
use crate::model::validation::validate_video;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Video {
    id: Uuid,
    module_id: Uuid,
    title: String,
    video: String,
    order_index: i32,
}

#[derive(Debug, Deserialize, Serialize, Validate, utoipa::ToSchema)]
pub struct VideoCreate {
    pub module_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    /// mp4, avi or mov
    #[validate(custom(function = validate_video))]
    pub video: String,
    pub order_index: i32,
}

impl ResourceTyped for Video {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Video
    }
}

impl Video {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn module_id(&self) -> Uuid {
        self.module_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn video(&self) -> &str {
        &self.video
    }

    pub fn order_index(&self) -> i32 {
        self.order_index
    }
}

impl std::fmt::Display for Video {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[async_trait]
impl CrudRepository<Video, VideoCreate, Uuid> for Video {
    async fn create(mm: &ModelManager, data: VideoCreate) -> DatabaseResult<Self> {
        data.validate()?;

        let id = Uuid::new_v4();
        let video = UploadField::Video.path(&data.video);
        sqlx::query("INSERT INTO videos (id, module_id, title, video, order_index) VALUES ($1,$2,$3,$4,$5)")
            .bind(id)
            .bind(data.module_id)
            .bind(&data.title)
            .bind(&video)
            .bind(data.order_index)
            .execute(mm.executor())
            .await?;

        Ok(Video {
            id,
            module_id: data.module_id,
            title: data.title,
            video,
            order_index: data.order_index,
        })
    }

    async fn update(self, mm: &ModelManager, data: VideoCreate) -> DatabaseResult<Self> {
        data.validate()?;

        let video = UploadField::Video.path(&data.video);
        let updated = sqlx::query_as("UPDATE videos SET module_id = $1, title = $2, video = $3, order_index = $4 WHERE id = $5 RETURNING *")
            .bind(data.module_id)
            .bind(&data.title)
            .bind(&video)
            .bind(data.order_index)
            .bind(self.id)
            .fetch_one(mm.executor())
            .await?;

        Ok(updated)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM videos WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM videos ORDER BY module_id, order_index LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Video, VideoCreate, Uuid);
impl_describe_with_display!(Video);

#[async_trait]
impl BelongsTo<Module> for Video {
    async fn all_by(mm: &ModelManager, module_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM videos WHERE module_id = $1 ORDER BY order_index")
                .bind(module_id)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn only_container_formats_pass() {
        let mut data = VideoCreate {
            module_id: Uuid::new_v4(),
            title: String::from("Intro"),
            video: String::from("intro.mov"),
            order_index: 0,
        };
        assert!(data.validate().is_ok());

        data.video = String::from("intro.mkv");
        assert!(data.validate().unwrap_err().field_errors().contains_key("video"));
    }

    #[test]
    fn display_is_title() {
        let video = Video {
            id: Uuid::new_v4(),
            module_id: Uuid::new_v4(),
            title: String::from("Intro"),
            video: String::from("videos/intro.mp4"),
            order_index: 0,
        };
        assert_eq!(video.to_string(), "Intro");
    }
}
