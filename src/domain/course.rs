//! Course domain entity.
//!
//! Courses are catalog entries referenced by the enrollment core; the
//! price class (0 = free, > 0 = paid) and the lesson list are what the
//! enrollment engine validates against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Course difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty: {}", other)),
        }
    }
}

/// A single lesson within a course. Lesson ids are generated server-side
/// and are the keys of the enrollment progress map.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Lesson {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub content_html: String,
    #[serde(default)]
    pub video_url: String,
    pub order: u32,
}

/// Course domain entity
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub faculty: String,
    pub category: String,
    pub difficulty: Difficulty,
    /// Price in major currency units; 0 means free
    pub price: i64,
    pub thumbnail_url: String,
    pub lessons: Vec<Lesson>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    pub fn is_free(&self) -> bool {
        self.price == 0
    }

    /// Whether the given lesson id belongs to this course
    pub fn has_lesson(&self, lesson_id: Uuid) -> bool {
        self.lessons.iter().any(|l| l.id == lesson_id)
    }
}

/// Compact course projection used in enrollment listings
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CourseSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub thumbnail_url: String,
    pub price: i64,
    pub lessons: Vec<Lesson>,
}

impl From<&Course> for CourseSummary {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            title: course.title.clone(),
            description: course.description.clone(),
            category: course.category.clone(),
            difficulty: course.difficulty,
            thumbnail_url: course.thumbnail_url.clone(),
            price: course.price,
            lessons: course.lessons.clone(),
        }
    }
}

/// Derive a URL slug from a course title: lowercase, alphanumeric runs
/// joined by single hyphens.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true;

    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}
