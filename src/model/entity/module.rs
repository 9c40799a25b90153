use crate::impl_describe_with_display;
use crate::impl_paginatable_for;
use crate::model::entity::Course;
use crate::model::repo::{BelongsTo, ResourceTyped};
use crate::model::upload::UploadField;
use crate::model::validation::validate_module_resource;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Module {
    id: Uuid,
    course_id: Uuid,
    title: String,
    description: String,
    /// Path of the PDF handout under `pdfs/`.
    resources: String,
    order_index: i32,
}

#[derive(Debug, Deserialize, Serialize, Validate, utoipa::ToSchema)]
pub struct ModuleCreate {
    pub course_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: String,
    #[validate(custom(function = validate_module_resource))]
    pub resources: String,
    pub order_index: i32,
}

impl ResourceTyped for Module {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Module
    }
}

impl Module {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn resources(&self) -> &str {
        &self.resources
    }

    pub fn order_index(&self) -> i32 {
        self.order_index
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[async_trait]
impl CrudRepository<Module, ModuleCreate, Uuid> for Module {
    async fn create(mm: &ModelManager, data: ModuleCreate) -> DatabaseResult<Self> {
        data.validate()?;

        let id = Uuid::new_v4();
        let resources = UploadField::ModuleResource.path(&data.resources);
        sqlx::query("INSERT INTO modules (id, course_id, title, description, resources, order_index) VALUES ($1,$2,$3,$4,$5,$6)")
            .bind(id)
            .bind(data.course_id)
            .bind(&data.title)
            .bind(&data.description)
            .bind(&resources)
            .bind(data.order_index)
            .execute(mm.executor())
            .await?;

        Ok(Module {
            id,
            course_id: data.course_id,
            title: data.title,
            description: data.description,
            resources,
            order_index: data.order_index,
        })
    }

    async fn update(self, mm: &ModelManager, data: ModuleCreate) -> DatabaseResult<Self> {
        data.validate()?;

        let resources = UploadField::ModuleResource.path(&data.resources);
        let updated = sqlx::query_as(
            "UPDATE modules SET course_id = $1, title = $2, description = $3, resources = $4, order_index = $5 WHERE id = $6 RETURNING *",
        )
        .bind(data.course_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(&resources)
        .bind(data.order_index)
        .bind(self.id)
        .fetch_one(mm.executor())
        .await?;

        Ok(updated)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM modules WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM modules WHERE id = $1")
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
            "SELECT * FROM modules ORDER BY course_id, order_index LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM modules")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Module, ModuleCreate, Uuid);
impl_describe_with_display!(Module);

#[async_trait]
impl BelongsTo<Course> for Module {
    async fn all_by(mm: &ModelManager, course_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM modules WHERE course_id = $1 ORDER BY order_index")
                .bind(course_id)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }
}

impl Module {
    pub async fn find_by_title(mm: &ModelManager, title: &str) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM modules WHERE title = $1 LIMIT 1")
            .bind(title)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

// Utils

/// One course with its modules, each carrying its lessons and videos as JSON
/// arrays ordered by `order_index`.
#[derive(sqlx::FromRow)]
pub struct ModuleOutlineRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub resources: String,
    pub order_index: i32,
    pub lessons: serde_json::Value,
    pub videos: serde_json::Value,
}

impl ModuleOutlineRow {
    pub async fn fetch_by_course(mm: &ModelManager, course_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let rows: Vec<ModuleOutlineRow> = sqlx::query_as(
            r#"
            SELECT
                m.id,
                m.title,
                m.description,
                m.resources,
                m.order_index,
                COALESCE((
                    SELECT json_agg(
                        json_build_object('id', l.id, 'title', l.title, 'order_index', l.order_index)
                        ORDER BY l.order_index
                    )
                    FROM lessons l
                    WHERE l.module_id = m.id
                ), '[]'::json) AS lessons,
                COALESCE((
                    SELECT json_agg(
                        json_build_object('id', v.id, 'title', v.title, 'video', v.video, 'order_index', v.order_index)
                        ORDER BY v.order_index
                    )
                    FROM videos v
                    WHERE v.module_id = m.id
                ), '[]'::json) AS videos
            FROM modules m
            WHERE m.course_id = $1
            ORDER BY m.order_index
            "#,
        )
        .bind(course_id)
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}
