use crate::impl_paginatable_for;
use crate::model::entity::{Quiz, Student};
use crate::model::repo::{BelongsTo, Describe, ResourceTyped};
use crate::model::validation::validate_decimal;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct QuizResult {
    id: Uuid,
    student_id: Uuid,
    quiz_id: Uuid,
    score: Decimal,
    taken_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, Validate, utoipa::ToSchema)]
pub struct QuizResultCreate {
    pub student_id: Uuid,
    pub quiz_id: Uuid,
    #[validate(custom(function = validate_decimal))]
    pub score: Decimal,
}

impl ResourceTyped for QuizResult {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::QuizResult
    }
}

impl QuizResult {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn student_id(&self) -> Uuid {
        self.student_id
    }

    pub fn quiz_id(&self) -> Uuid {
        self.quiz_id
    }

    pub fn score(&self) -> Decimal {
        self.score
    }

    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }
}

#[async_trait]
impl CrudRepository<QuizResult, QuizResultCreate, Uuid> for QuizResult {
    async fn create(mm: &ModelManager, data: QuizResultCreate) -> DatabaseResult<Self> {
        data.validate()?;

        let result = sqlx::query_as(
            r#"
            INSERT INTO quiz_results (id, student_id, quiz_id, score)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.student_id)
        .bind(data.quiz_id)
        .bind(data.score)
        .fetch_one(mm.executor())
        .await?;

        Ok(result)
    }

    async fn update(self, mm: &ModelManager, data: QuizResultCreate) -> DatabaseResult<Self> {
        data.validate()?;

        let result = sqlx::query_as(
            r#"
            UPDATE quiz_results SET student_id = $1, quiz_id = $2, score = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(data.student_id)
        .bind(data.quiz_id)
        .bind(data.score)
        .bind(self.id)
        .fetch_one(mm.executor())
        .await?;

        Ok(result)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM quiz_results WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM quiz_results WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM quiz_results ORDER BY taken_at LIMIT $1 OFFSET $2")
                .bind(limit)
                .bind(offset)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quiz_results")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(QuizResult, QuizResultCreate, Uuid);

#[async_trait]
impl BelongsTo<Student> for QuizResult {
    async fn all_by(mm: &ModelManager, student_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM quiz_results WHERE student_id = $1 ORDER BY taken_at")
                .bind(student_id)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }
}

#[async_trait]
impl BelongsTo<Quiz> for QuizResult {
    async fn all_by(mm: &ModelManager, quiz_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM quiz_results WHERE quiz_id = $1 ORDER BY taken_at")
                .bind(quiz_id)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }
}

#[async_trait]
impl Describe for QuizResult {
    async fn describe(&self, mm: &ModelManager) -> DatabaseResult<String> {
        let row: QuizResultDetailRow = sqlx::query_as(
            r#"
            SELECT u.username, r.score, q.title AS quiz_title
            FROM quiz_results r
            JOIN students s ON s.id = r.student_id
            JOIN users u ON u.id = s.user_id
            JOIN quizzes q ON q.id = r.quiz_id
            WHERE r.id = $1
            "#,
        )
        .bind(self.id)
        .fetch_one(mm.executor())
        .await?;

        Ok(row.to_string())
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct QuizResultDetailRow {
    pub username: String,
    pub score: Decimal,
    pub quiz_title: String,
}

impl std::fmt::Display for QuizResultDetailRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} scored {} in {}", self.username, self.score, self.quiz_title)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_keeps_score_scale() {
        let row = QuizResultDetailRow {
            username: String::from("jdoe"),
            score: Decimal::new(8550, 2),
            quiz_title: String::from("Borrowing"),
        };
        assert_eq!(row.to_string(), "jdoe scored 85.50 in Borrowing");
    }
}
