use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    auth::hash_password,
    model::{
        CrudRepository, ResourceTyped,
        entity::{UserEntity, UserEntityCreateUpdate},
    },
    web::{
        AppState, WebError, WebResult,
        dto::{UserCreateBody, UserUpdateBody},
        error::ErrorResponse,
        routes::crud,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route(
            "/",
            post(user_create_handler).get(crud::page_handler::<UserEntity, UserEntityCreateUpdate>),
        )
        .route(
            "/{id}",
            put(user_update_handler)
                .get(crud::get_handler::<UserEntity, UserEntityCreateUpdate>)
                .delete(crud::delete_handler::<UserEntity, UserEntityCreateUpdate>),
        )
        .route(
            "/{id}/display",
            get(crud::display_handler::<UserEntity, UserEntityCreateUpdate>),
        )
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = UserCreateBody,
    description = "Creates new user, the password is stored as an argon2 hash",
    responses(
        (status = 201, description = "User created successfully", body = UserEntity),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "users"
)]
async fn user_create_handler(
    State(state): State<AppState>,
    Json(payload): Json<UserCreateBody>,
) -> WebResult<impl IntoResponse> {
    let hash = hash_password(&payload.password).map_err(WebError::server_crypt_error)?;

    let created = UserEntity::create(state.mm(), payload.into_entity(hash))
        .await
        .map_err(|e| WebError::from_database(UserEntity::get_resource_type(), e))?;

    tracing::debug!("user {} created", created.username());
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    request_body = UserUpdateBody,
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User updated successfully", body = UserEntity),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "users"
)]
async fn user_update_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserUpdateBody>,
) -> WebResult<impl IntoResponse> {
    let found = crud::find_or_404::<UserEntity, UserEntityCreateUpdate>(&state, id).await?;

    let new_hash = match payload.password.as_deref() {
        Some(password) => Some(hash_password(password).map_err(WebError::server_crypt_error)?),
        None => None,
    };

    let data = payload.into_entity(&found, new_hash);
    let updated = found
        .update(state.mm(), data)
        .await
        .map_err(|e| WebError::from_database(UserEntity::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(updated)))
}
