use crate::impl_describe_with_display;
use crate::impl_paginatable_for;
use crate::model::entity::Module;
use crate::model::repo::{BelongsTo, ResourceTyped};
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Lesson {
    id: Uuid,
    module_id: Uuid,
    title: String,
    content: String,
    order_index: i32,
}

impl ResourceTyped for Lesson {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Lesson
    }
}

impl Lesson {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn module_id(&self) -> Uuid {
        self.module_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn order_index(&self) -> i32 {
        self.order_index
    }
}

impl std::fmt::Display for Lesson {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[derive(Debug, Deserialize, Serialize, Validate, utoipa::ToSchema)]
pub struct LessonCreate {
    pub module_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub content: String,
    pub order_index: i32,
}

#[async_trait]
impl CrudRepository<Lesson, LessonCreate, Uuid> for Lesson {
    async fn create(mm: &ModelManager, data: LessonCreate) -> DatabaseResult<Self> {
        data.validate()?;

        let result = sqlx::query("INSERT INTO lessons (id, module_id, title, content, order_index) VALUES ($1,$2,$3,$4,$5) RETURNING id")
            .bind(Uuid::new_v4())
            .bind(data.module_id)
            .bind(&data.title)
            .bind(&data.content)
            .bind(data.order_index)
            .fetch_one(mm.executor())
            .await?;

        let id = result.try_get("id")?;
        Ok(Lesson {
            id,
            module_id: data.module_id,
            title: data.title,
            content: data.content,
            order_index: data.order_index,
        })
    }

    async fn update(self, mm: &ModelManager, data: LessonCreate) -> DatabaseResult<Self> {
        data.validate()?;

        let updated = sqlx::query_as("UPDATE lessons SET module_id = $1, title = $2, content = $3, order_index = $4 WHERE id = $5 RETURNING *")
            .bind(data.module_id)
            .bind(&data.title)
            .bind(&data.content)
            .bind(data.order_index)
            .bind(self.id)
            .fetch_one(mm.executor())
            .await?;

        Ok(updated)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM lessons WHERE id = $1")
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
            "SELECT * FROM lessons ORDER BY module_id, order_index LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Lesson, LessonCreate, Uuid);
impl_describe_with_display!(Lesson);

#[async_trait]
impl BelongsTo<Module> for Lesson {
    async fn all_by(mm: &ModelManager, module_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM lessons WHERE module_id = $1 ORDER BY order_index")
                .bind(module_id)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }
}

impl Lesson {
    pub async fn find_by_title(mm: &ModelManager, title: &str) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM lessons WHERE title = $1 LIMIT 1")
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
        let lesson = Lesson {
            id: Uuid::new_v4(),
            module_id: Uuid::new_v4(),
            title: String::from("Moves"),
            content: String::from("# Moves"),
            order_index: 1,
        };
        assert_eq!(lesson.to_string(), "Moves");
    }
}
