use crate::impl_describe_with_display;
use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::validation::validate_username;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Account identity. Students and lecturers hang off it one-to-one.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct UserEntity {
    id: Uuid,
    username: String,
    #[serde(skip)]
    password_hash: String,
    first_name: String,
    last_name: String,
    email: String,
    phone_number: String,
    date_of_birth: NaiveDate,
    is_active: bool,
    is_staff: bool,
    date_joined: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, Validate, utoipa::ToSchema)]
pub struct UserEntityCreateUpdate {
    #[validate(length(min = 1, max = 150), custom(function = validate_username))]
    pub username: String,
    pub password_hash: String,
    #[validate(length(min = 1, max = 225))]
    pub first_name: String,
    #[validate(length(min = 1, max = 225))]
    pub last_name: String,
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 15))]
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
}

impl ResourceTyped for UserEntity {
    fn get_resource_type() -> crate::model::repo::ResourceType {
        crate::model::repo::ResourceType::User
    }
}

impl UserEntity {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn hash(&self) -> &str {
        &self.password_hash
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_staff(&self) -> bool {
        self.is_staff
    }

    pub fn date_joined(&self) -> DateTime<Utc> {
        self.date_joined
    }
}

impl std::fmt::Display for UserEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.username)
    }
}

/// Lowercases the domain part, the local part is left alone.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

#[async_trait]
impl CrudRepository<UserEntity, UserEntityCreateUpdate, Uuid> for UserEntity {
    async fn create(mm: &ModelManager, data: UserEntityCreateUpdate) -> DatabaseResult<Self> {
        data.validate()?;

        let user = sqlx::query_as(
            r#"
            INSERT INTO users
                (id, username, password_hash, first_name, last_name, email, phone_number,
                 date_of_birth, is_active, is_staff)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.username)
        .bind(&data.password_hash)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(normalize_email(&data.email))
        .bind(&data.phone_number)
        .bind(data.date_of_birth)
        .bind(data.is_active.unwrap_or(true))
        .bind(data.is_staff.unwrap_or(false))
        .fetch_one(mm.executor())
        .await?;

        Ok(user)
    }

    async fn update(self, mm: &ModelManager, data: UserEntityCreateUpdate) -> DatabaseResult<Self> {
        data.validate()?;

        let user = sqlx::query_as(
            r#"
            UPDATE users SET
                username = $1, password_hash = $2, first_name = $3, last_name = $4,
                email = $5, phone_number = $6, date_of_birth = $7, is_active = $8, is_staff = $9
            WHERE id = $10
            RETURNING *
            "#,
        )
        .bind(&data.username)
        .bind(&data.password_hash)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(normalize_email(&data.email))
        .bind(&data.phone_number)
        .bind(data.date_of_birth)
        .bind(data.is_active.unwrap_or(self.is_active))
        .bind(data.is_staff.unwrap_or(self.is_staff))
        .bind(self.id)
        .fetch_one(mm.executor())
        .await?;

        Ok(user)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM users ORDER BY date_joined, username LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(UserEntity, UserEntityCreateUpdate, Uuid);
impl_describe_with_display!(UserEntity);

impl UserEntity {
    pub async fn find_by_username(
        mm: &ModelManager,
        username: &str,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    pub async fn find_by_email(mm: &ModelManager, email: &str) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(normalize_email(email))
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn payload() -> UserEntityCreateUpdate {
        UserEntityCreateUpdate {
            username: String::from("jdoe"),
            password_hash: String::from("hash"),
            first_name: String::from("Jane"),
            last_name: String::from("Doe"),
            email: String::from("jane@example.com"),
            phone_number: String::from("+15550100"),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            is_active: None,
            is_staff: None,
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn invalid_fields_are_reported() {
        let mut data = payload();
        data.email = String::from("not-an-email");
        data.phone_number = "1".repeat(16);
        data.username = String::from("bad name");
        data.first_name = String::new();

        let errors = data.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("phone_number"));
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("first_name"));
        assert!(!fields.contains_key("last_name"));
    }

    #[test]
    fn email_domain_is_lowercased() {
        assert_eq!(normalize_email("Jane.Doe@Example.COM"), "Jane.Doe@example.com");
        assert_eq!(normalize_email("  nobody "), "nobody");
    }
}
