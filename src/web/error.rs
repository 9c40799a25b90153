use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use crate::{
    auth::CryptError,
    error::log_error,
    model::{DatabaseError, ResourceType},
};

pub type WebResult<T> = std::result::Result<T, WebError>;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("ResourceNotFound: {resource_type:?}")]
    ResourceNotFound { resource_type: ResourceType },

    #[error("ResourceConflict: {resource_type:?}, constraint: {constraint:?}")]
    ResourceConflict {
        resource_type: ResourceType,
        constraint: Option<String>,
    },

    #[error("ResourceInvalid: {resource_type:?}. Errors: {errors}")]
    ResourceInvalid {
        resource_type: ResourceType,
        errors: validator::ValidationErrors,
    },

    #[error("ResourceBadReference: {resource_type:?}, constraint: {constraint:?}")]
    ResourceBadReference {
        resource_type: ResourceType,
        constraint: Option<String>,
    },

    #[error("ResourceFetchError: {resource_type:?}. Error: {error}")]
    ResourceFetchError {
        resource_type: ResourceType,
        error: DatabaseError,
    },
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("ServerCryptError: {0}")]
    ServerCryptError(#[from] crate::auth::CryptError),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    pub fn client_display(&self) -> String {
        String::from("Internal server error.")
    }
}

impl ResourceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            Self::ResourceConflict { .. } => StatusCode::CONFLICT,
            Self::ResourceInvalid { .. } => StatusCode::BAD_REQUEST,
            Self::ResourceBadReference { .. } => StatusCode::BAD_REQUEST,
            Self::ResourceFetchError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ResourceNotFound { .. } => String::from("Resource error, resource not found."),
            Self::ResourceConflict { .. } => {
                String::from("Resource error, resource already exists.")
            }
            Self::ResourceInvalid { .. } => String::from("Resource error, validation failed."),
            Self::ResourceBadReference { .. } => {
                String::from("Resource error, referenced resource does not exist.")
            }
            Self::ResourceFetchError { .. } => {
                String::from("Resource error, unable to fetch resource.")
            }
        }
    }

    /// Per-field validation messages, safe to show to clients.
    pub fn field_errors(&self) -> Option<serde_json::Value> {
        match self {
            Self::ResourceInvalid { errors, .. } => serde_json::to_value(errors).ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum WebError {
    #[error("ResourceError - {0}")]
    ResourceError(#[from] ResourceError),
    #[error("ServerError - {0}")]
    ServerError(#[from] ServerError),
}

impl WebError {
    pub fn resource_not_found(r#type: ResourceType) -> Self {
        Self::ResourceError(ResourceError::ResourceNotFound {
            resource_type: r#type,
        })
    }

    pub fn resource_conflict(r#type: ResourceType, constraint: Option<String>) -> Self {
        Self::ResourceError(ResourceError::ResourceConflict {
            resource_type: r#type,
            constraint,
        })
    }

    pub fn resource_fetch_error(r#type: ResourceType, error: DatabaseError) -> Self {
        Self::ResourceError(ResourceError::ResourceFetchError {
            resource_type: r#type,
            error,
        })
    }

    /// Sorts a model error into the client-facing category.
    pub fn from_database(r#type: ResourceType, error: DatabaseError) -> Self {
        match error {
            DatabaseError::ValidationError(errors) => {
                Self::ResourceError(ResourceError::ResourceInvalid {
                    resource_type: r#type,
                    errors,
                })
            }
            e if e.is_unique_violation() => {
                Self::resource_conflict(r#type, e.constraint().map(String::from))
            }
            e if e.is_foreign_key_violation() => {
                Self::ResourceError(ResourceError::ResourceBadReference {
                    resource_type: r#type,
                    constraint: e.constraint().map(String::from),
                })
            }
            e if e.is_not_found() => Self::resource_not_found(r#type),
            e => Self::resource_fetch_error(r#type, e),
        }
    }

    pub fn server_crypt_error(e: CryptError) -> Self {
        Self::ServerError(ServerError::ServerCryptError(e))
    }

    pub fn status_code(&self) -> axum::http::StatusCode {
        match self {
            Self::ResourceError(e) => e.status_code(),
            Self::ServerError(e) => e.status_code(),
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ResourceError(e) => e.client_display(),
            Self::ServerError(e) => e.client_display(),
        }
    }

    pub fn field_errors(&self) -> Option<serde_json::Value> {
        match self {
            Self::ResourceError(e) => e.field_errors(),
            Self::ServerError(_) => None,
        }
    }
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message for the client
    pub message: String,
    /// HTTP status code (stringified)
    pub status_code: String,
    /// Field validation errors, keyed by field name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
    /// Optional debug details (only in debug mode)
    pub details: Option<String>,
}

impl IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        log_error(&self);

        let status_code = self.status_code();
        let display = self.client_display();

        let body = ErrorResponse {
            message: display,
            status_code: status_code.as_str().to_string(),
            errors: self.field_errors(),
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        };

        (status_code, Json(body)).into_response()
    }
}
