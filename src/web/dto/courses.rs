use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{
    DatabaseResult,
    entity::{Course, ModuleOutlineRow},
};

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LessonShort {
    pub id: Uuid,
    pub title: String,
    pub order_index: i32,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct VideoShort {
    pub id: Uuid,
    pub title: String,
    pub video: String,
    pub order_index: i32,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ModuleOutline {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub resources: String,
    pub order_index: i32,
    pub lessons: Vec<LessonShort>,
    pub videos: Vec<VideoShort>,
}

impl TryFrom<ModuleOutlineRow> for ModuleOutline {
    type Error = serde_json::Error;

    fn try_from(value: ModuleOutlineRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            title: value.title,
            description: value.description,
            resources: value.resources,
            order_index: value.order_index,
            lessons: serde_json::from_value(value.lessons)?,
            videos: serde_json::from_value(value.videos)?,
        })
    }
}

/// Full table of contents of a course.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CourseOutline {
    #[serde(flatten)]
    pub course: Course,
    pub likes: i64,
    pub modules: Vec<ModuleOutline>,
}

impl CourseOutline {
    pub fn from_rows(course: Course, likes: i64, rows: Vec<ModuleOutlineRow>) -> DatabaseResult<Self> {
        let modules = rows
            .into_iter()
            .map(ModuleOutline::try_from)
            .collect::<Result<_, _>>()?;

        Ok(Self {
            course,
            likes,
            modules,
        })
    }
}
