use crate::impl_paginatable_for;
use crate::model::entity::{Course, Student};
use crate::model::repo::{BelongsTo, Describe, ResourceTyped};
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Wishlist {
    id: Uuid,
    student_id: Uuid,
    course_id: Uuid,
    added_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct WishlistCreate {
    pub student_id: Uuid,
    pub course_id: Uuid,
}

impl ResourceTyped for Wishlist {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Wishlist
    }
}

impl Wishlist {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn student_id(&self) -> Uuid {
        self.student_id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }
}

#[async_trait]
impl CrudRepository<Wishlist, WishlistCreate, Uuid> for Wishlist {
    async fn create(mm: &ModelManager, data: WishlistCreate) -> DatabaseResult<Self> {
        let entry = sqlx::query_as(
            "INSERT INTO wishlists (id, student_id, course_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.student_id)
        .bind(data.course_id)
        .fetch_one(mm.executor())
        .await?;

        Ok(entry)
    }

    async fn update(self, mm: &ModelManager, data: WishlistCreate) -> DatabaseResult<Self> {
        let updated = sqlx::query_as("UPDATE wishlists SET student_id = $1, course_id = $2 WHERE id = $3 RETURNING *")
            .bind(data.student_id)
            .bind(data.course_id)
            .bind(self.id)
            .fetch_one(mm.executor())
            .await?;

        Ok(updated)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM wishlists WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM wishlists WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM wishlists ORDER BY added_at LIMIT $1 OFFSET $2")
                .bind(limit)
                .bind(offset)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wishlists")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Wishlist, WishlistCreate, Uuid);

#[async_trait]
impl BelongsTo<Student> for Wishlist {
    async fn all_by(mm: &ModelManager, student_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM wishlists WHERE student_id = $1 ORDER BY added_at")
                .bind(student_id)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }
}

#[async_trait]
impl BelongsTo<Course> for Wishlist {
    async fn all_by(mm: &ModelManager, course_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM wishlists WHERE course_id = $1 ORDER BY added_at")
                .bind(course_id)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }
}

#[async_trait]
impl Describe for Wishlist {
    async fn describe(&self, mm: &ModelManager) -> DatabaseResult<String> {
        let row = WishlistDetailRow::find_by_id(mm, self.id).await?;
        Ok(row.to_string())
    }
}

// Utils

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct WishlistDetailRow {
    pub id: Uuid,
    pub username: String,
    pub course_title: String,
}

impl WishlistDetailRow {
    pub async fn find_by_id(mm: &ModelManager, entry_id: Uuid) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            SELECT w.id, u.username, c.title AS course_title
            FROM wishlists w
            JOIN students s ON s.id = w.student_id
            JOIN users u ON u.id = s.user_id
            JOIN courses c ON c.id = w.course_id
            WHERE w.id = $1
            "#,
        )
        .bind(entry_id)
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }
}

impl std::fmt::Display for WishlistDetailRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} added {} to wishlist", self.username, self.course_title)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn wishlist_description() {
        let row = WishlistDetailRow {
            id: Uuid::new_v4(),
            username: String::from("jdoe"),
            course_title: String::from("Rust for Beginners"),
        };
        assert_eq!(row.to_string(), "jdoe added Rust for Beginners to wishlist");
    }
}
