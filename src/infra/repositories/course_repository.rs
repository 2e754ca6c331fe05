//! Course repository - persistence for the catalog.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::course::{self, Entity as CourseEntity};
use crate::domain::{Course, Lesson};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Fields accepted on course creation
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub faculty: String,
    pub category: String,
    pub difficulty: String,
    pub price: i64,
    pub thumbnail_url: String,
    pub lessons: Vec<Lesson>,
}

/// Partial update applied to an existing course
#[derive(Debug, Clone, Default)]
pub struct CourseChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub faculty: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub price: Option<i64>,
    pub thumbnail_url: Option<String>,
    pub lessons: Option<Vec<Lesson>>,
}

/// Course repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Course>>;

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Course>>;

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Course>>;

    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Course>, u64)>;

    async fn create(&self, course: NewCourse) -> AppResult<Course>;

    async fn update(&self, id: Uuid, changes: CourseChanges) -> AppResult<Course>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// SeaORM-backed course repository.
pub struct CourseStore {
    db: Arc<DatabaseConnection>,
}

impl CourseStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn lessons_json(lessons: &[Lesson]) -> AppResult<serde_json::Value> {
    serde_json::to_value(lessons)
        .map_err(|e| AppError::internal(format!("Failed to serialize lessons: {}", e)))
}

#[async_trait]
impl CourseRepository for CourseStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Course>> {
        let model = CourseEntity::find_by_id(id).one(&*self.db).await?;
        Ok(model.map(Course::from))
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Course>> {
        let model = CourseEntity::find()
            .filter(course::Column::Slug.eq(slug))
            .one(&*self.db)
            .await?;
        Ok(model.map(Course::from))
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Course>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = CourseEntity::find()
            .filter(course::Column::Id.is_in(ids))
            .all(&*self.db)
            .await?;
        Ok(models.into_iter().map(Course::from).collect())
    }

    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Course>, u64)> {
        let paginator = CourseEntity::find()
            .order_by_desc(course::Column::CreatedAt)
            .paginate(&*self.db, params.limit());

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page_index()).await?;

        Ok((models.into_iter().map(Course::from).collect(), total))
    }

    async fn create(&self, new: NewCourse) -> AppResult<Course> {
        let now = Utc::now();
        let active_model = course::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(new.title),
            slug: Set(new.slug),
            description: Set(new.description),
            faculty: Set(new.faculty),
            category: Set(new.category),
            difficulty: Set(new.difficulty),
            price: Set(new.price),
            thumbnail_url: Set(new.thumbnail_url),
            lessons: Set(lessons_json(&new.lessons)?),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&*self.db).await?;
        Ok(Course::from(model))
    }

    async fn update(&self, id: Uuid, changes: CourseChanges) -> AppResult<Course> {
        let model = CourseEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: course::ActiveModel = model.into();

        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(slug) = changes.slug {
            active.slug = Set(slug);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(faculty) = changes.faculty {
            active.faculty = Set(faculty);
        }
        if let Some(category) = changes.category {
            active.category = Set(category);
        }
        if let Some(difficulty) = changes.difficulty {
            active.difficulty = Set(difficulty);
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(thumbnail_url) = changes.thumbnail_url {
            active.thumbnail_url = Set(thumbnail_url);
        }
        if let Some(lessons) = changes.lessons {
            active.lessons = Set(lessons_json(&lessons)?);
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&*self.db).await?;
        Ok(Course::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = CourseEntity::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
