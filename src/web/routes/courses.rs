use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    model::{
        ResourceTyped,
        entity::{Course, CourseCreate, ModuleOutlineRow},
    },
    web::{AppState, WebError, WebResult, dto::CourseOutline, error::ErrorResponse, routes::crud},
};

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}/outline",
    params(("id" = Uuid, Path, description = "Course id")),
    description = "Course with its modules, each module with ordered lessons and videos",
    responses(
        (status = 200, description = "Course outline", body = CourseOutline),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
pub async fn course_outline_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let course = crud::find_or_404::<Course, CourseCreate>(&state, id).await?;

    let likes = Course::count_likes(state.mm(), id)
        .await
        .map_err(|e| WebError::from_database(Course::get_resource_type(), e))?;
    let rows = ModuleOutlineRow::fetch_by_course(state.mm(), id)
        .await
        .map_err(|e| WebError::from_database(Course::get_resource_type(), e))?;

    let outline = CourseOutline::from_rows(course, likes, rows)
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(outline)))
}
