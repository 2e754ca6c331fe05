//! Enrollment repository - the ledger's persistence layer.
//!
//! Two storage-level guarantees live here:
//! - one enrollment per (user, course), enforced by the unique index and
//!   detected at insert time (never check-then-act);
//! - progress writes touch exactly one lesson key via `jsonb_set`, so
//!   concurrent updates to different lessons commute.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set, SqlErr, Statement,
};
use std::sync::Arc;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::enrollment::{self, Entity as EnrollmentEntity};
use crate::domain::Enrollment;
use crate::errors::{AppError, AppResult};

/// Enrollment repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Insert a new enrollment with an empty progress map.
    ///
    /// A unique-constraint violation on (user_id, course_id) maps to
    /// `AlreadyEnrolled`; callers must not pre-check for existence.
    async fn insert(&self, user_id: Uuid, course_id: Uuid, is_paid: bool)
        -> AppResult<Enrollment>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Enrollment>>;

    async fn find_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> AppResult<Option<Enrollment>>;

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Enrollment>>;

    /// All enrollments, newest first (admin projection).
    async fn list_all(&self) -> AppResult<Vec<Enrollment>>;

    /// Set a single lesson's completion flag, leaving all other keys
    /// untouched.
    async fn set_lesson_progress(
        &self,
        enrollment_id: Uuid,
        lesson_id: Uuid,
        completed: bool,
    ) -> AppResult<()>;
}

/// SeaORM-backed enrollment repository.
pub struct EnrollmentStore {
    db: Arc<DatabaseConnection>,
}

impl EnrollmentStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EnrollmentRepository for EnrollmentStore {
    async fn insert(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        is_paid: bool,
    ) -> AppResult<Enrollment> {
        let active_model = enrollment::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            course_id: Set(course_id),
            is_paid: Set(is_paid),
            progress: Set(serde_json::json!({})),
            created_at: Set(Utc::now()),
        };

        let model = active_model
            .insert(&*self.db)
            .await
            .map_err(|e| classify_insert_err(e.sql_err(), e))?;

        Ok(Enrollment::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Enrollment>> {
        let model = EnrollmentEntity::find_by_id(id).one(&*self.db).await?;
        Ok(model.map(Enrollment::from))
    }

    async fn find_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> AppResult<Option<Enrollment>> {
        let model = EnrollmentEntity::find()
            .filter(enrollment::Column::UserId.eq(user_id))
            .filter(enrollment::Column::CourseId.eq(course_id))
            .one(&*self.db)
            .await?;
        Ok(model.map(Enrollment::from))
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Enrollment>> {
        let models = EnrollmentEntity::find()
            .filter(enrollment::Column::UserId.eq(user_id))
            .order_by_desc(enrollment::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        Ok(models.into_iter().map(Enrollment::from).collect())
    }

    async fn list_all(&self) -> AppResult<Vec<Enrollment>> {
        let models = EnrollmentEntity::find()
            .order_by_desc(enrollment::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        Ok(models.into_iter().map(Enrollment::from).collect())
    }

    async fn set_lesson_progress(
        &self,
        enrollment_id: Uuid,
        lesson_id: Uuid,
        completed: bool,
    ) -> AppResult<()> {
        // Targeted single-key update; a whole-record rewrite would let
        // concurrent updates on different lessons clobber each other.
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"UPDATE "enrollments"
               SET "progress" = jsonb_set("progress", ARRAY[$1::text], to_jsonb($2::boolean))
               WHERE "id" = $3"#,
            [
                lesson_id.to_string().into(),
                completed.into(),
                enrollment_id.into(),
            ],
        );

        let result = self.db.execute(stmt).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

/// Translate the driver's report of a violated (user_id, course_id) unique
/// index into the domain conflict; every other failure stays a database
/// error.
fn classify_insert_err(sql_err: Option<SqlErr>, e: DbErr) -> AppError {
    match sql_err {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::AlreadyEnrolled,
        _ => AppError::from(e),
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    #[test]
    fn unique_violation_maps_to_already_enrolled() {
        let err = classify_insert_err(
            Some(SqlErr::UniqueConstraintViolation(
                "duplicate key value violates unique constraint \"idx_enrollments_user_course\""
                    .to_string(),
            )),
            DbErr::Custom("duplicate key".to_string()),
        );

        assert!(matches!(err, AppError::AlreadyEnrolled));
    }

    #[test]
    fn unclassified_failures_stay_database_errors() {
        let err = classify_insert_err(None, DbErr::Custom("connection reset".to_string()));

        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn insert_returns_the_stored_enrollment() {
        let user_id = Uuid::new_v4();
        let course_id = Uuid::new_v4();
        let model = enrollment::Model {
            id: Uuid::new_v4(),
            user_id,
            course_id,
            is_paid: true,
            progress: serde_json::json!({}),
            created_at: Utc::now(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model.clone()]])
            .into_connection();

        let stored = EnrollmentStore::new(Arc::new(db))
            .insert(user_id, course_id, true)
            .await
            .unwrap();

        assert_eq!(stored.id, model.id);
        assert_eq!(stored.user_id, user_id);
        assert!(stored.progress.is_empty());
    }

    #[tokio::test]
    async fn insert_surfaces_driver_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors(vec![DbErr::Custom("connection reset".to_string())])
            .into_connection();

        let err = EnrollmentStore::new(Arc::new(db))
            .insert(Uuid::new_v4(), Uuid::new_v4(), false)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Database(_)));
    }
}
