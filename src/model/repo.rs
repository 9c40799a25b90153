use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{ModelManager, error::DatabaseResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    User,
    Student,
    Lecturer,
    Course,
    Module,
    Video,
    Lesson,
    Enrollment,
    Quiz,
    Question,
    Choice,
    QuizResult,
    CourseLike,
    Wishlist,
}

impl ResourceType {
    pub fn table(&self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Student => "students",
            Self::Lecturer => "lecturers",
            Self::Course => "courses",
            Self::Module => "modules",
            Self::Video => "videos",
            Self::Lesson => "lessons",
            Self::Enrollment => "enrollments",
            Self::Quiz => "quizzes",
            Self::Question => "questions",
            Self::Choice => "choices",
            Self::QuizResult => "quiz_results",
            Self::CourseLike => "course_likes",
            Self::Wishlist => "wishlists",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, limit: i64, offset: i64) -> Self {
        Self {
            items,
            total,
            limit,
            offset,
        }
    }
}

pub trait ResourceTyped {
    fn get_resource_type() -> ResourceType;
}

#[async_trait::async_trait]
pub trait CrudRepository<T, CreateUpdate, V>
where
    T: ResourceTyped,
    V: Clone + Copy,
{
    async fn create(mm: &ModelManager, data: CreateUpdate) -> DatabaseResult<T>;
    async fn update(self, mm: &ModelManager, data: CreateUpdate) -> DatabaseResult<T>
    where
        Self: Sized;

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()>
    where
        Self: Sized;

    async fn find_by_id(mm: &ModelManager, id: V) -> DatabaseResult<Option<T>>;
    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<T>>;
    async fn count(mm: &ModelManager) -> DatabaseResult<i64>;
}

#[async_trait::async_trait]
pub trait PaginatableRepository<T, CreateUpdate, V>
where
    T: ResourceTyped + CrudRepository<T, CreateUpdate, V>,
    V: Clone + Copy,
{
    async fn page(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Page<T>>;
}

/// Filter-by-relation: every row of `Self` pointing at the given `P` row.
#[async_trait::async_trait]
pub trait BelongsTo<P: ResourceTyped>: Sized {
    async fn all_by(mm: &ModelManager, parent_id: Uuid) -> DatabaseResult<Vec<Self>>;
}

/// Human-readable representation of a row. Rows that need columns of other
/// tables (e.g. the student's username) load them here.
#[async_trait::async_trait]
pub trait Describe {
    async fn describe(&self, mm: &ModelManager) -> DatabaseResult<String>;
}

pub async fn exists(mm: &ModelManager, resource: ResourceType, id: Uuid) -> DatabaseResult<bool> {
    let query = format!("SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1)", resource.table());
    let result: bool = sqlx::query_scalar(&query)
        .bind(id)
        .fetch_one(mm.executor())
        .await?;
    Ok(result)
}

#[macro_export]
macro_rules! impl_paginatable_for {
    ($ent:ident, $ent_create:ident, $ent_id:ident) => {
        #[async_trait::async_trait]
        impl $crate::model::PaginatableRepository<$ent, $ent_create, $ent_id> for $ent {
            async fn page(
                mm: &ModelManager,
                limit: i64,
                offset: i64,
            ) -> DatabaseResult<$crate::model::Page<$ent>> {
                let items = $ent::list(mm, limit, offset).await?;
                let count = $ent::count(mm).await?;
                Ok($crate::model::Page::new(items, count, limit, offset))
            }
        }
    };
}

/// `Describe` for rows whose `Display` needs nothing but their own columns.
#[macro_export]
macro_rules! impl_describe_with_display {
    ($ent:ident) => {
        #[async_trait::async_trait]
        impl $crate::model::Describe for $ent {
            async fn describe(&self, _mm: &ModelManager) -> DatabaseResult<String> {
                Ok(self.to_string())
            }
        }
    };
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn table_names_are_distinct() {
        let all = [
            ResourceType::User,
            ResourceType::Student,
            ResourceType::Lecturer,
            ResourceType::Course,
            ResourceType::Module,
            ResourceType::Video,
            ResourceType::Lesson,
            ResourceType::Enrollment,
            ResourceType::Quiz,
            ResourceType::Question,
            ResourceType::Choice,
            ResourceType::QuizResult,
            ResourceType::CourseLike,
            ResourceType::Wishlist,
        ];
        let mut tables: Vec<_> = all.iter().map(ResourceType::table).collect();
        tables.sort();
        tables.dedup();
        assert_eq!(tables.len(), all.len());
    }

    #[test]
    fn page_keeps_window() {
        let page = Page::new(vec![1, 2], 10, 2, 4);
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.total, 10);
        assert_eq!(page.limit, 2);
        assert_eq!(page.offset, 4);
    }
}
