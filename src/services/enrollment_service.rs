//! Enrollment service - the enrollment and access-control core.
//!
//! Owns the free-vs-paid access model: free courses enroll directly,
//! paid courses enroll only against a provider-verified checkout
//! session, and lesson progress is gated on ownership and payment.
//! Uniqueness of (user, course) is delegated to the storage layer's
//! constraint; this service never pre-checks before inserting.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    AdminEnrollmentView, Course, CourseSummary, Enrollment, EnrollmentView, User, UserSummary,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{CheckoutProvider, CourseRepository, EnrollmentRepository, PaymentState, UserRepository};

/// Enrollment service trait for dependency injection.
#[async_trait]
pub trait EnrollmentService: Send + Sync {
    /// Enroll the caller in a free course.
    async fn enroll_free(&self, user_id: Uuid, course_id: Uuid) -> AppResult<Enrollment>;

    /// Enroll the caller in a paid course, gated on a completed checkout
    /// session for this exact (user, course) pair.
    async fn enroll_paid(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        session_id: String,
    ) -> AppResult<Enrollment>;

    /// Set one lesson's completion flag on an enrollment the caller owns.
    async fn update_progress(
        &self,
        caller_id: Uuid,
        enrollment_id: Uuid,
        lesson_id: Uuid,
        completed: bool,
    ) -> AppResult<()>;

    /// The caller's enrollments with course summaries.
    async fn list_mine(&self, user_id: Uuid) -> AppResult<Vec<EnrollmentView>>;

    /// All enrollments with account and course context (admin).
    async fn list_all(&self) -> AppResult<Vec<AdminEnrollmentView>>;
}

/// Concrete implementation of EnrollmentService.
pub struct EnrollmentLedger {
    enrollments: Arc<dyn EnrollmentRepository>,
    courses: Arc<dyn CourseRepository>,
    users: Arc<dyn UserRepository>,
    provider: Arc<dyn CheckoutProvider>,
}

impl EnrollmentLedger {
    pub fn new(
        enrollments: Arc<dyn EnrollmentRepository>,
        courses: Arc<dyn CourseRepository>,
        users: Arc<dyn UserRepository>,
        provider: Arc<dyn CheckoutProvider>,
    ) -> Self {
        Self {
            enrollments,
            courses,
            users,
            provider,
        }
    }

    async fn course_or_not_found(&self, course_id: Uuid) -> AppResult<Course> {
        self.courses
            .find_by_id(course_id)
            .await?
            .ok_or(AppError::NotFound)
    }
}

#[async_trait]
impl EnrollmentService for EnrollmentLedger {
    async fn enroll_free(&self, user_id: Uuid, course_id: Uuid) -> AppResult<Enrollment> {
        let course = self.course_or_not_found(course_id).await?;

        if !course.is_free() {
            return Err(AppError::PaymentRequired);
        }

        // Insert directly; the unique (user, course) constraint resolves
        // the race between concurrent enroll calls.
        self.enrollments.insert(user_id, course_id, false).await
    }

    async fn enroll_paid(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        session_id: String,
    ) -> AppResult<Enrollment> {
        let course = self.courses.find_by_id(course_id).await?;
        let course = match course {
            Some(course) if !course.is_free() => course,
            _ => return Err(AppError::InvalidCourse),
        };

        // Paid access is granted only against a provider-confirmed
        // payment whose session metadata binds this (user, course) pair.
        let session = self.provider.retrieve_session(&session_id).await?;
        let session_matches = session.payment_state == PaymentState::Paid
            && session.user_id == Some(user_id)
            && session.course_id == Some(course.id);

        if !session_matches {
            tracing::warn!(
                user_id = %user_id,
                course_id = %course_id,
                session_id = %session_id,
                "paid enrollment rejected: checkout session not verified"
            );
            return Err(AppError::PaymentRequired);
        }

        self.enrollments.insert(user_id, course_id, true).await
    }

    async fn update_progress(
        &self,
        caller_id: Uuid,
        enrollment_id: Uuid,
        lesson_id: Uuid,
        completed: bool,
    ) -> AppResult<()> {
        let enrollment = self
            .enrollments
            .find_by_id(enrollment_id)
            .await?
            .ok_or(AppError::NotFound)?;

        // Ownership is independent of role: admins do not write others'
        // progress.
        if !enrollment.is_owned_by(caller_id) {
            return Err(AppError::Forbidden);
        }

        let course = self.course_or_not_found(enrollment.course_id).await?;

        if !course.is_free() && !enrollment.is_paid {
            return Err(AppError::PaymentRequired);
        }

        if !course.has_lesson(lesson_id) {
            return Err(AppError::InvalidLesson);
        }

        self.enrollments
            .set_lesson_progress(enrollment_id, lesson_id, completed)
            .await
    }

    async fn list_mine(&self, user_id: Uuid) -> AppResult<Vec<EnrollmentView>> {
        let enrollments = self.enrollments.list_by_user(user_id).await?;

        let course_ids: Vec<Uuid> = enrollments.iter().map(|e| e.course_id).collect();
        let courses: HashMap<Uuid, Course> = self
            .courses
            .find_many(course_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        // Enrollments whose course has been removed from the catalog are
        // dropped from the listing.
        Ok(enrollments
            .into_iter()
            .filter_map(|enrollment| {
                courses.get(&enrollment.course_id).map(|course| EnrollmentView {
                    course: CourseSummary::from(course),
                    enrollment,
                })
            })
            .collect())
    }

    async fn list_all(&self) -> AppResult<Vec<AdminEnrollmentView>> {
        let enrollments = self.enrollments.list_all().await?;

        let user_ids: Vec<Uuid> = enrollments.iter().map(|e| e.user_id).collect();
        let course_ids: Vec<Uuid> = enrollments.iter().map(|e| e.course_id).collect();

        let users: HashMap<Uuid, User> = self
            .users
            .find_many(user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let courses: HashMap<Uuid, Course> = self
            .courses
            .find_many(course_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(enrollments
            .into_iter()
            .map(|enrollment| AdminEnrollmentView {
                user: users.get(&enrollment.user_id).map(UserSummary::from),
                course_title: courses
                    .get(&enrollment.course_id)
                    .map(|c| c.title.clone()),
                enrollment,
            })
            .collect())
    }
}
