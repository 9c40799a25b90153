use crate::impl_describe_with_display;
use crate::impl_paginatable_for;
use crate::model::entity::Lesson;
use crate::model::repo::{BelongsTo, ResourceTyped};
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Quiz {
    id: Uuid,
    lesson_id: Uuid,
    title: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate, utoipa::ToSchema)]
pub struct QuizCreate {
    pub lesson_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: Option<String>,
}

impl ResourceTyped for Quiz {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Quiz
    }
}

impl Quiz {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn lesson_id(&self) -> Uuid {
        self.lesson_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl std::fmt::Display for Quiz {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[async_trait]
impl CrudRepository<Quiz, QuizCreate, Uuid> for Quiz {
    async fn create(mm: &ModelManager, data: QuizCreate) -> DatabaseResult<Self> {
        data.validate()?;

        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO quizzes (id, lesson_id, title, description) VALUES ($1,$2,$3,$4)")
            .bind(id)
            .bind(data.lesson_id)
            .bind(&data.title)
            .bind(&data.description)
            .execute(mm.executor())
            .await?;

        Ok(Quiz {
            id,
            lesson_id: data.lesson_id,
            title: data.title,
            description: data.description,
        })
    }

    async fn update(self, mm: &ModelManager, data: QuizCreate) -> DatabaseResult<Self> {
        data.validate()?;

        let updated = sqlx::query_as("UPDATE quizzes SET lesson_id = $1, title = $2, description = $3 WHERE id = $4 RETURNING *")
            .bind(data.lesson_id)
            .bind(&data.title)
            .bind(&data.description)
            .bind(self.id)
            .fetch_one(mm.executor())
            .await?;

        Ok(updated)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM quizzes WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM quizzes ORDER BY lesson_id, title LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quizzes")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Quiz, QuizCreate, Uuid);
impl_describe_with_display!(Quiz);

#[async_trait]
impl BelongsTo<Lesson> for Quiz {
    async fn all_by(mm: &ModelManager, lesson_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM quizzes WHERE lesson_id = $1 ORDER BY title")
            .bind(lesson_id)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }
}

impl Quiz {
    pub async fn find_by_title(mm: &ModelManager, title: &str) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM quizzes WHERE title = $1 LIMIT 1")
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
        let quiz = Quiz {
            id: Uuid::new_v4(),
            lesson_id: Uuid::new_v4(),
            title: String::from("Borrowing"),
            description: None,
        };
        assert_eq!(quiz.to_string(), "Borrowing");
    }
}
