use crate::{
    Config,
    error::AppResult,
    model::entity::{
        Choice, ChoiceCreate, Course, CourseCreate, CourseLike, CourseLikeCreate, Enrollment,
        EnrollmentCreate, Lecturer, LecturerCreate, Lesson, LessonCreate, Module, ModuleCreate,
        Question, QuestionCreate, Quiz, QuizCreate, QuizResult, QuizResultCreate, Student,
        StudentCreate, Video, VideoCreate, Wishlist, WishlistCreate,
    },
    utils::uploads::get_uploads_dir,
    web::{AppState, doc::ApiDoc},
};
use axum::{Router, routing::get};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod courses;
pub mod crud;
pub mod users;

use crud::children_handler;

pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    limit: Option<i64>,
    offset: Option<i64>,
}

impl PaginationQuery {
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

pub fn build_app<S: Send + Sync + Clone + 'static>(
    state: AppState,
    config: &'static Config,
) -> AppResult<Router<S>> {
    let uploads = get_uploads_dir(config)?;
    tracing::debug!("serving uploads from {}", uploads.display());

    let courses = Router::new()
        .route("/{id}/modules", get(children_handler::<Course, Module>))
        .route("/{id}/enrollments", get(children_handler::<Course, Enrollment>))
        .route("/{id}/likes", get(children_handler::<Course, CourseLike>))
        .route("/{id}/wishlists", get(children_handler::<Course, Wishlist>))
        .route("/{id}/outline", get(courses::course_outline_handler));

    let lecturers =
        Router::new().route("/{id}/courses", get(children_handler::<Lecturer, Course>));

    let modules = Router::new()
        .route("/{id}/lessons", get(children_handler::<Module, Lesson>))
        .route("/{id}/videos", get(children_handler::<Module, Video>));

    let lessons = Router::new().route("/{id}/quizzes", get(children_handler::<Lesson, Quiz>));

    let quizzes = Router::new()
        .route("/{id}/questions", get(children_handler::<Quiz, Question>))
        .route("/{id}/results", get(children_handler::<Quiz, QuizResult>));

    let questions =
        Router::new().route("/{id}/choices", get(children_handler::<Question, Choice>));

    let students = Router::new()
        .route("/{id}/enrollments", get(children_handler::<Student, Enrollment>))
        .route("/{id}/results", get(children_handler::<Student, QuizResult>))
        .route("/{id}/likes", get(children_handler::<Student, CourseLike>))
        .route("/{id}/wishlist", get(children_handler::<Student, Wishlist>));

    let mut router = Router::new()
        .nest("/api/v1/users", users::routes(state.clone()))
        .nest(
            "/api/v1/students",
            crud::routes::<Student, StudentCreate, S>(state.clone(), students),
        )
        .nest(
            "/api/v1/lecturers",
            crud::routes::<Lecturer, LecturerCreate, S>(state.clone(), lecturers),
        )
        .nest(
            "/api/v1/courses",
            crud::routes::<Course, CourseCreate, S>(state.clone(), courses),
        )
        .nest(
            "/api/v1/modules",
            crud::routes::<Module, ModuleCreate, S>(state.clone(), modules),
        )
        .nest(
            "/api/v1/videos",
            crud::routes::<Video, VideoCreate, S>(state.clone(), Router::new()),
        )
        .nest(
            "/api/v1/lessons",
            crud::routes::<Lesson, LessonCreate, S>(state.clone(), lessons),
        )
        .nest(
            "/api/v1/enrollments",
            crud::routes::<Enrollment, EnrollmentCreate, S>(state.clone(), Router::new()),
        )
        .nest(
            "/api/v1/quizzes",
            crud::routes::<Quiz, QuizCreate, S>(state.clone(), quizzes),
        )
        .nest(
            "/api/v1/questions",
            crud::routes::<Question, QuestionCreate, S>(state.clone(), questions),
        )
        .nest(
            "/api/v1/choices",
            crud::routes::<Choice, ChoiceCreate, S>(state.clone(), Router::new()),
        )
        .nest(
            "/api/v1/quiz-results",
            crud::routes::<QuizResult, QuizResultCreate, S>(state.clone(), Router::new()),
        )
        .nest(
            "/api/v1/likes",
            crud::routes::<CourseLike, CourseLikeCreate, S>(state.clone(), Router::new()),
        )
        .nest(
            "/api/v1/wishlists",
            crud::routes::<Wishlist, WishlistCreate, S>(state.clone(), Router::new()),
        )
        .nest_service("/api/v1/media", ServeDir::new(uploads))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http());

    if config.app().docs() {
        let openapi = ApiDoc::openapi();

        router = router.merge(SwaggerUi::new("/api/v1/docs").url("/api-doc/openapi.json", openapi));
    }

    Ok(router)
}

#[cfg(test)]
mod test {
    use super::*;

    fn query(limit: Option<i64>, offset: Option<i64>) -> PaginationQuery {
        PaginationQuery { limit, offset }
    }

    #[test]
    fn pagination_defaults() {
        let q = query(None, None);
        assert_eq!(q.limit(), DEFAULT_PAGE_LIMIT);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn pagination_is_clamped() {
        let q = query(Some(10_000), Some(-5));
        assert_eq!(q.limit(), MAX_PAGE_LIMIT);
        assert_eq!(q.offset(), 0);

        assert_eq!(query(Some(0), None).limit(), 1);
    }
}
