use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{
    model::{
        BelongsTo, CrudRepository, Describe, PaginatableRepository, ResourceTyped, exists,
    },
    web::{AppState, WebError, WebResult, dto::DisplayResponse, routes::PaginationQuery},
};

/// Create/page/get/update/delete/display for one table. `related` carries the
/// extra `/{id}/...` routes of the resource.
pub fn routes<T, C, S>(state: AppState, related: Router<AppState>) -> Router<S>
where
    T: CrudRepository<T, C, Uuid>
        + PaginatableRepository<T, C, Uuid>
        + ResourceTyped
        + Describe
        + Serialize
        + Send
        + Sync
        + 'static,
    C: DeserializeOwned + Send + 'static,
{
    Router::new()
        .route("/", get(page_handler::<T, C>).post(create_handler::<T, C>))
        .route(
            "/{id}",
            get(get_handler::<T, C>)
                .put(update_handler::<T, C>)
                .delete(delete_handler::<T, C>),
        )
        .route("/{id}/display", get(display_handler::<T, C>))
        .merge(related)
        .with_state(state)
}

pub async fn find_or_404<T, C>(state: &AppState, id: Uuid) -> WebResult<T>
where
    T: CrudRepository<T, C, Uuid> + ResourceTyped,
{
    T::find_by_id(state.mm(), id)
        .await
        .map_err(|e| WebError::from_database(T::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(T::get_resource_type()))
}

pub async fn create_handler<T, C>(
    State(state): State<AppState>,
    Json(payload): Json<C>,
) -> WebResult<impl IntoResponse>
where
    T: CrudRepository<T, C, Uuid> + ResourceTyped + Serialize,
{
    let created = T::create(state.mm(), payload)
        .await
        .map_err(|e| WebError::from_database(T::get_resource_type(), e))?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn page_handler<T, C>(
    Query(page): Query<PaginationQuery>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse>
where
    T: CrudRepository<T, C, Uuid> + PaginatableRepository<T, C, Uuid> + ResourceTyped + Serialize,
{
    let page = T::page(state.mm(), page.limit(), page.offset())
        .await
        .map_err(|e| WebError::from_database(T::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(page)))
}

pub async fn get_handler<T, C>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse>
where
    T: CrudRepository<T, C, Uuid> + ResourceTyped + Serialize,
{
    let found = find_or_404::<T, C>(&state, id).await?;
    Ok((StatusCode::OK, Json(found)))
}

pub async fn update_handler<T, C>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<C>,
) -> WebResult<impl IntoResponse>
where
    T: CrudRepository<T, C, Uuid> + ResourceTyped + Serialize,
{
    let found = find_or_404::<T, C>(&state, id).await?;
    let updated = found
        .update(state.mm(), payload)
        .await
        .map_err(|e| WebError::from_database(T::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(updated)))
}

pub async fn delete_handler<T, C>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse>
where
    T: CrudRepository<T, C, Uuid> + ResourceTyped,
{
    let found = find_or_404::<T, C>(&state, id).await?;
    found
        .delete(state.mm())
        .await
        .map_err(|e| WebError::from_database(T::get_resource_type(), e))?;

    Ok(StatusCode::OK)
}

pub async fn display_handler<T, C>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse>
where
    T: CrudRepository<T, C, Uuid> + ResourceTyped + Describe,
{
    let found = find_or_404::<T, C>(&state, id).await?;
    let display = found
        .describe(state.mm())
        .await
        .map_err(|e| WebError::from_database(T::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(DisplayResponse { display })))
}

/// Every `T` row pointing at the parent `P` named in the path.
pub async fn children_handler<P, T>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse>
where
    P: ResourceTyped,
    T: BelongsTo<P> + ResourceTyped + Serialize,
{
    let parent = P::get_resource_type();
    let found = exists(state.mm(), parent, id)
        .await
        .map_err(|e| WebError::from_database(parent, e))?;

    if !found {
        return Err(WebError::resource_not_found(parent));
    }

    let children = <T as BelongsTo<P>>::all_by(state.mm(), id)
        .await
        .map_err(|e| WebError::from_database(T::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(children)))
}
