use crate::impl_describe_with_display;
use crate::impl_paginatable_for;
use crate::model::entity::Question;
use crate::model::repo::{BelongsTo, ResourceTyped};
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Choice {
    id: Uuid,
    question_id: Uuid,
    text: String,
    is_correct: bool,
}

impl ResourceTyped for Choice {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Choice
    }
}

impl Choice {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn question_id(&self) -> Uuid {
        self.question_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[derive(Debug, Deserialize, Serialize, Validate, utoipa::ToSchema)]
pub struct ChoiceCreate {
    pub question_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub text: String,
    pub is_correct: Option<bool>,
}

#[async_trait]
impl CrudRepository<Choice, ChoiceCreate, Uuid> for Choice {
    async fn create(mm: &ModelManager, data: ChoiceCreate) -> DatabaseResult<Self> {
        data.validate()?;

        let id = Uuid::new_v4();
        let is_correct = data.is_correct.unwrap_or(false);
        sqlx::query("INSERT INTO choices (id, question_id, text, is_correct) VALUES ($1,$2,$3,$4)")
            .bind(id)
            .bind(data.question_id)
            .bind(&data.text)
            .bind(is_correct)
            .execute(mm.executor())
            .await?;

        Ok(Choice {
            id,
            question_id: data.question_id,
            text: data.text,
            is_correct,
        })
    }

    async fn update(self, mm: &ModelManager, data: ChoiceCreate) -> DatabaseResult<Self> {
        data.validate()?;

        let is_correct = data.is_correct.unwrap_or(false);
        let updated = sqlx::query_as("UPDATE choices SET question_id = $1, text = $2, is_correct = $3 WHERE id = $4 RETURNING *")
            .bind(data.question_id)
            .bind(&data.text)
            .bind(is_correct)
            .bind(self.id)
            .fetch_one(mm.executor())
            .await?;

        Ok(updated)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM choices WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM choices WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM choices ORDER BY question_id, text LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM choices")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Choice, ChoiceCreate, Uuid);
impl_describe_with_display!(Choice);

#[async_trait]
impl BelongsTo<Question> for Choice {
    /// No ordering column on choices, insertion order is not kept either.
    async fn all_by(mm: &ModelManager, question_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let rows: Vec<Self> = sqlx::query_as(
            r#"
            SELECT *
            FROM choices c
            WHERE c.question_id = $1
            ORDER BY c.text
            "#,
        )
        .bind(question_id)
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}
