//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, course_handler, enrollment_handler, payment_handler, user_handler,
};
use crate::domain::{
    AdminEnrollmentView, Course, CourseSummary, Difficulty, Enrollment, EnrollmentView, Lesson,
    UserResponse, UserRole, UserSummary,
};
use crate::services::TokenResponse;

/// OpenAPI documentation for LearnHub
#[derive(OpenApi)]
#[openapi(
    info(
        title = "LearnHub API",
        version = "0.1.0",
        description = "E-learning backend with course catalog, enrollments, and checkout",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::signup,
        auth_handler::login,
        auth_handler::logout,
        auth_handler::me,
        // User endpoints
        user_handler::list_users,
        // Course endpoints
        course_handler::list_courses,
        course_handler::get_course,
        course_handler::create_course,
        course_handler::update_course,
        course_handler::delete_course,
        // Enrollment endpoints
        enrollment_handler::enroll_free,
        enrollment_handler::enroll_paid,
        enrollment_handler::list_mine,
        enrollment_handler::update_progress,
        enrollment_handler::list_all,
        // Payment endpoints
        payment_handler::create_checkout,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            UserSummary,
            Difficulty,
            Lesson,
            Course,
            CourseSummary,
            Enrollment,
            EnrollmentView,
            AdminEnrollmentView,
            TokenResponse,
            // Auth types
            auth_handler::SignupRequest,
            auth_handler::LoginRequest,
            auth_handler::AuthResponse,
            // Course types
            course_handler::LessonRequest,
            course_handler::CreateCourseRequest,
            course_handler::UpdateCourseRequest,
            // Enrollment types
            enrollment_handler::EnrollRequest,
            enrollment_handler::EnrollPaidRequest,
            enrollment_handler::UpdateProgressRequest,
            // Payment types
            payment_handler::CheckoutRequestBody,
            payment_handler::CheckoutResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Account registration and login"),
        (name = "Users", description = "Account administration"),
        (name = "Courses", description = "Course catalog"),
        (name = "Enrollments", description = "Enrollment and lesson progress"),
        (name = "Payments", description = "Checkout handoff")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
