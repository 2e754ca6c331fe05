//! Payment service - the checkout handoff.
//!
//! Builds a provider checkout session for a paid course and returns the
//! provider's redirect URL. Enrollment itself happens later through the
//! paid-enrollment path, which re-verifies the session with the provider.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{Config, MINOR_UNITS_PER_MAJOR};
use crate::errors::{AppError, AppResult};
use crate::infra::{CheckoutProvider, CheckoutRequest, CourseRepository, EnrollmentRepository};

/// Payment service trait for dependency injection.
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Create a checkout session for a paid course; returns the
    /// provider-hosted redirect URL.
    async fn create_checkout(
        &self,
        user_id: Uuid,
        user_email: String,
        course_id: Uuid,
    ) -> AppResult<String>;
}

/// Concrete implementation of PaymentService.
pub struct CheckoutHandoff {
    courses: Arc<dyn CourseRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
    provider: Arc<dyn CheckoutProvider>,
    config: Config,
}

impl CheckoutHandoff {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
        provider: Arc<dyn CheckoutProvider>,
        config: Config,
    ) -> Self {
        Self {
            courses,
            enrollments,
            provider,
            config,
        }
    }
}

#[async_trait]
impl PaymentService for CheckoutHandoff {
    async fn create_checkout(
        &self,
        user_id: Uuid,
        user_email: String,
        course_id: Uuid,
    ) -> AppResult<String> {
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if course.is_free() {
            return Err(AppError::InvalidCourse);
        }

        if self
            .enrollments
            .find_by_user_and_course(user_id, course_id)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyEnrolled);
        }

        let session = self
            .provider
            .create_session(CheckoutRequest {
                customer_email: user_email,
                product_name: course.title.clone(),
                amount_minor: course.price * MINOR_UNITS_PER_MAJOR,
                currency: self.config.checkout_currency.clone(),
                success_url: format!(
                    "{}/payment-success?courseId={}",
                    self.config.frontend_url, course_id
                ),
                cancel_url: format!("{}/courses", self.config.frontend_url),
                user_id,
                course_id,
            })
            .await?;

        session
            .url
            .ok_or_else(|| AppError::payment("provider returned no redirect URL"))
    }
}
