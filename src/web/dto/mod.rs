mod courses;
pub use courses::{CourseOutline, LessonShort, ModuleOutline, VideoShort};

mod users;
pub use users::{UserCreateBody, UserUpdateBody};

#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct DisplayResponse {
    pub display: String,
}
