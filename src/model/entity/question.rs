use crate::impl_describe_with_display;
use crate::impl_paginatable_for;
use crate::model::entity::Quiz;
use crate::model::repo::{BelongsTo, ResourceTyped};
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Question {
    id: Uuid,
    quiz_id: Uuid,
    text: String,
    order_index: i32,
}

#[derive(Debug, Deserialize, Serialize, Validate, utoipa::ToSchema)]
pub struct QuestionCreate {
    pub quiz_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub text: String,
    pub order_index: i32,
}

impl ResourceTyped for Question {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Question
    }
}

impl Question {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn quiz_id(&self) -> Uuid {
        self.quiz_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn order_index(&self) -> i32 {
        self.order_index
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[async_trait]
impl CrudRepository<Question, QuestionCreate, Uuid> for Question {
    async fn create(mm: &ModelManager, data: QuestionCreate) -> DatabaseResult<Self> {
        data.validate()?;

        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO questions (id, quiz_id, text, order_index) VALUES ($1,$2,$3,$4)")
            .bind(id)
            .bind(data.quiz_id)
            .bind(&data.text)
            .bind(data.order_index)
            .execute(mm.executor())
            .await?;

        Ok(Question {
            id,
            quiz_id: data.quiz_id,
            text: data.text,
            order_index: data.order_index,
        })
    }

    async fn update(self, mm: &ModelManager, data: QuestionCreate) -> DatabaseResult<Self> {
        data.validate()?;

        let updated = sqlx::query_as("UPDATE questions SET quiz_id = $1, text = $2, order_index = $3 WHERE id = $4 RETURNING *")
            .bind(data.quiz_id)
            .bind(&data.text)
            .bind(data.order_index)
            .bind(self.id)
            .fetch_one(mm.executor())
            .await?;

        Ok(updated)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM questions WHERE id = $1")
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
            "SELECT * FROM questions ORDER BY quiz_id, order_index LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Question, QuestionCreate, Uuid);
impl_describe_with_display!(Question);

#[async_trait]
impl BelongsTo<Quiz> for Question {
    async fn all_by(mm: &ModelManager, quiz_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM questions WHERE quiz_id = $1 ORDER BY order_index")
                .bind(quiz_id)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }
}

impl Question {
    pub async fn find_by_text(mm: &ModelManager, text: &str) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM questions WHERE text = $1 LIMIT 1")
            .bind(text)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_is_text() {
        let question = Question {
            id: Uuid::new_v4(),
            quiz_id: Uuid::new_v4(),
            text: String::from("Can two &mut coexist?"),
            order_index: 1,
        };
        assert_eq!(question.to_string(), "Can two &mut coexist?");
    }
}
