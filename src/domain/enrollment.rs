//! Enrollment domain entity.
//!
//! The authoritative record linking one account to one course: its
//! payment flag and the per-lesson completion map. Exactly one
//! enrollment may exist per (account, course) pair; the storage layer
//! enforces that with a uniqueness constraint.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::course::CourseSummary;
use super::user::UserSummary;

/// Enrollment domain entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Enrollment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    /// True when this enrollment was granted through the paid path
    pub is_paid: bool,
    /// Per-lesson completion map, keyed by lesson id
    pub progress: HashMap<Uuid, bool>,
    pub created_at: DateTime<Utc>,
}

impl Enrollment {
    /// Whether the owning account matches the caller
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Enrollment joined with its course summary, for learner-facing listings
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EnrollmentView {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub course: CourseSummary,
}

/// Enrollment joined with account and course, for the admin listing
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminEnrollmentView {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_title: Option<String>,
}
