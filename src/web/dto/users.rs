use chrono::NaiveDate;
use serde::Deserialize;

use crate::model::entity::{UserEntity, UserEntityCreateUpdate};

/// Account payload as sent by clients. The password is hashed before it
/// reaches the model layer.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UserCreateBody {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
}

impl UserCreateBody {
    pub fn into_entity(self, password_hash: String) -> UserEntityCreateUpdate {
        UserEntityCreateUpdate {
            username: self.username,
            password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            date_of_birth: self.date_of_birth,
            is_active: self.is_active,
            is_staff: self.is_staff,
        }
    }
}

/// Same as [`UserCreateBody`], except the password may be left out to keep
/// the current one.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UserUpdateBody {
    pub username: String,
    pub password: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
}

impl UserUpdateBody {
    pub fn into_entity(self, current: &UserEntity, new_hash: Option<String>) -> UserEntityCreateUpdate {
        UserEntityCreateUpdate {
            username: self.username,
            password_hash: new_hash.unwrap_or_else(|| current.hash().to_string()),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            date_of_birth: self.date_of_birth,
            is_active: self.is_active,
            is_staff: self.is_staff,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn create_body_carries_hash() {
        let body: UserCreateBody = serde_json::from_value(serde_json::json!({
            "username": "jdoe",
            "password": "secret",
            "first_name": "Jane",
            "last_name": "Doe",
            "email": "jane@example.com",
            "phone_number": "+15550100",
            "date_of_birth": "1990-05-17"
        }))
        .unwrap();

        let entity = body.into_entity(String::from("argon-hash"));
        assert_eq!(entity.password_hash, "argon-hash");
        assert_eq!(entity.username, "jdoe");
        assert!(entity.is_active.is_none());
    }
}
