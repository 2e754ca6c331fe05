//! Course service - thin catalog CRUD.
//!
//! No search or filtering logic lives here; the catalog is plumbing the
//! enrollment core validates against.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{slugify, Course, Difficulty, Lesson};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{CourseChanges, NewCourse};
use crate::infra::CourseRepository;
use crate::types::{Paginated, PaginationParams};

/// Lesson fields accepted from the caller; ids are generated server-side.
#[derive(Debug, Clone)]
pub struct LessonInput {
    pub title: String,
    pub content_html: String,
    pub video_url: String,
    pub order: Option<u32>,
}

/// Course creation input
#[derive(Debug, Clone)]
pub struct CreateCourseData {
    pub title: String,
    pub description: String,
    pub faculty: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub price: i64,
    pub thumbnail_url: String,
    pub lessons: Vec<LessonInput>,
}

/// Course update input; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateCourseData {
    pub title: Option<String>,
    pub description: Option<String>,
    pub faculty: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub price: Option<i64>,
    pub thumbnail_url: Option<String>,
    pub lessons: Option<Vec<LessonInput>>,
}

/// Course service trait for dependency injection.
#[async_trait]
pub trait CourseService: Send + Sync {
    async fn list_courses(&self, params: PaginationParams) -> AppResult<Paginated<Course>>;

    async fn get_course(&self, id: Uuid) -> AppResult<Course>;

    async fn create_course(&self, data: CreateCourseData) -> AppResult<Course>;

    async fn update_course(&self, id: Uuid, data: UpdateCourseData) -> AppResult<Course>;

    async fn delete_course(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of CourseService.
pub struct CourseManager {
    courses: Arc<dyn CourseRepository>,
}

impl CourseManager {
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    /// Derive a slug for the title, suffixing a timestamp when the plain
    /// slug is already taken by a different course.
    async fn unique_slug(&self, title: &str, current_id: Option<Uuid>) -> AppResult<String> {
        let base = slugify(title);
        match self.courses.find_by_slug(&base).await? {
            Some(existing) if Some(existing.id) != current_id => {
                Ok(format!("{}-{}", base, Utc::now().timestamp_millis()))
            }
            _ => Ok(base),
        }
    }
}

fn materialize_lessons(inputs: Vec<LessonInput>) -> Vec<Lesson> {
    inputs
        .into_iter()
        .enumerate()
        .map(|(i, input)| Lesson {
            id: Uuid::new_v4(),
            title: input.title,
            content_html: input.content_html,
            video_url: input.video_url,
            order: input.order.unwrap_or(i as u32 + 1),
        })
        .collect()
}

#[async_trait]
impl CourseService for CourseManager {
    async fn list_courses(&self, params: PaginationParams) -> AppResult<Paginated<Course>> {
        let (courses, total) = self.courses.list(&params).await?;
        Ok(Paginated::new(courses, params.page, params.limit(), total))
    }

    async fn get_course(&self, id: Uuid) -> AppResult<Course> {
        self.courses.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    async fn create_course(&self, data: CreateCourseData) -> AppResult<Course> {
        if data.price < 0 {
            return Err(AppError::validation("Price must be non-negative"));
        }

        let slug = self.unique_slug(&data.title, None).await?;

        self.courses
            .create(NewCourse {
                title: data.title,
                slug,
                description: data.description,
                faculty: data.faculty,
                category: data.category,
                difficulty: data.difficulty.to_string(),
                price: data.price,
                thumbnail_url: data.thumbnail_url,
                lessons: materialize_lessons(data.lessons),
            })
            .await
    }

    async fn update_course(&self, id: Uuid, data: UpdateCourseData) -> AppResult<Course> {
        if matches!(data.price, Some(p) if p < 0) {
            return Err(AppError::validation("Price must be non-negative"));
        }

        let slug = match &data.title {
            Some(title) => Some(self.unique_slug(title, Some(id)).await?),
            None => None,
        };

        self.courses
            .update(
                id,
                CourseChanges {
                    title: data.title,
                    slug,
                    description: data.description,
                    faculty: data.faculty,
                    category: data.category,
                    difficulty: data.difficulty.map(|d| d.to_string()),
                    price: data.price,
                    thumbnail_url: data.thumbnail_url,
                    lessons: data.lessons.map(materialize_lessons),
                },
            )
            .await
    }

    async fn delete_course(&self, id: Uuid) -> AppResult<()> {
        self.courses.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockCourseRepository;
    use mockall::predicate::eq;

    fn sample_course(id: Uuid, slug: &str) -> Course {
        Course {
            id,
            title: "Intro to Rust".into(),
            slug: slug.into(),
            description: "desc".into(),
            faculty: "Engineering".into(),
            category: "programming".into(),
            difficulty: Difficulty::Beginner,
            price: 0,
            thumbnail_url: String::new(),
            lessons: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_assigns_lesson_ids_and_order() {
        let mut repo = MockCourseRepository::new();
        repo.expect_find_by_slug()
            .with(eq("intro-to-rust"))
            .returning(|_| Ok(None));
        repo.expect_create().returning(|new| {
            assert_eq!(new.slug, "intro-to-rust");
            assert_eq!(new.lessons.len(), 2);
            assert_eq!(new.lessons[0].order, 1);
            assert_eq!(new.lessons[1].order, 2);
            assert_ne!(new.lessons[0].id, new.lessons[1].id);
            Ok(sample_course(Uuid::new_v4(), &new.slug))
        });

        let service = CourseManager::new(Arc::new(repo));
        let lesson = |title: &str| LessonInput {
            title: title.into(),
            content_html: String::new(),
            video_url: String::new(),
            order: None,
        };

        service
            .create_course(CreateCourseData {
                title: "Intro to Rust".into(),
                description: "desc".into(),
                faculty: "Engineering".into(),
                category: "programming".into(),
                difficulty: Difficulty::Beginner,
                price: 0,
                thumbnail_url: String::new(),
                lessons: vec![lesson("One"), lesson("Two")],
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn slug_collision_gets_suffixed() {
        let taken = Uuid::new_v4();
        let mut repo = MockCourseRepository::new();
        repo.expect_find_by_slug()
            .returning(move |slug| Ok(Some(sample_course(taken, slug))));
        repo.expect_create().returning(|new| {
            assert!(new.slug.starts_with("intro-to-rust-"));
            Ok(sample_course(Uuid::new_v4(), &new.slug))
        });

        let service = CourseManager::new(Arc::new(repo));
        service
            .create_course(CreateCourseData {
                title: "Intro to Rust".into(),
                description: "desc".into(),
                faculty: "Engineering".into(),
                category: "programming".into(),
                difficulty: Difficulty::Beginner,
                price: 0,
                thumbnail_url: String::new(),
                lessons: vec![],
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn negative_price_is_rejected() {
        let repo = MockCourseRepository::new();
        let service = CourseManager::new(Arc::new(repo));

        let err = service
            .create_course(CreateCourseData {
                title: "Bad".into(),
                description: "desc".into(),
                faculty: "Engineering".into(),
                category: "programming".into(),
                difficulty: Difficulty::Beginner,
                price: -5,
                thumbnail_url: String::new(),
                lessons: vec![],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }
}
