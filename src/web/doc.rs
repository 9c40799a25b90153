use utoipa::OpenApi;

use crate::{
    model::entity::{
        Choice, ChoiceCreate, Course, CourseCreate, CourseLike, CourseLikeCreate, Enrollment,
        EnrollmentCreate, Lecturer, LecturerCreate, Lesson, LessonCreate, Module, ModuleCreate,
        Question, QuestionCreate, Quiz, QuizCreate, QuizResult, QuizResultCreate, Student,
        StudentCreate, UserEntity, Video, VideoCreate, Wishlist, WishlistCreate,
    },
    web::{
        dto::{
            CourseOutline, DisplayResponse, LessonShort, ModuleOutline, UserCreateBody,
            UserUpdateBody, VideoShort,
        },
        error::ErrorResponse,
    },
};

/// Generic CRUD routes share one handler set, only the hand-written ones carry
/// path docs. Every row and payload shape is registered as a schema.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::routes::users::user_create_handler,
        crate::web::routes::users::user_update_handler,
        crate::web::routes::courses::course_outline_handler,
    ),
    components(schemas(
        UserEntity,
        UserCreateBody,
        UserUpdateBody,
        Student,
        StudentCreate,
        Lecturer,
        LecturerCreate,
        Course,
        CourseCreate,
        Module,
        ModuleCreate,
        Video,
        VideoCreate,
        Lesson,
        LessonCreate,
        Enrollment,
        EnrollmentCreate,
        Quiz,
        QuizCreate,
        Question,
        QuestionCreate,
        Choice,
        ChoiceCreate,
        QuizResult,
        QuizResultCreate,
        CourseLike,
        CourseLikeCreate,
        Wishlist,
        WishlistCreate,
        CourseOutline,
        ModuleOutline,
        LessonShort,
        VideoShort,
        DisplayResponse,
        ErrorResponse,
    )),
    tags(
        (name = "users", description = "Accounts"),
        (name = "courses", description = "Courses and their content"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn documents_user_and_outline_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/users"));
        assert!(doc.paths.paths.contains_key("/api/v1/users/{id}"));
        assert!(doc.paths.paths.contains_key("/api/v1/courses/{id}/outline"));
    }

    #[test]
    fn registers_every_entity_schema() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;

        for name in [
            "UserEntity",
            "Student",
            "Lecturer",
            "Course",
            "Module",
            "Video",
            "Lesson",
            "Enrollment",
            "Quiz",
            "Question",
            "Choice",
            "QuizResult",
            "CourseLike",
            "Wishlist",
        ] {
            assert!(schemas.contains_key(name), "missing schema {name}");
            if name != "UserEntity" {
                let create = format!("{name}Create");
                assert!(schemas.contains_key(&create), "missing schema {create}");
            }
        }
    }
}
