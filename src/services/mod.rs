//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on repository and provider traits
//! for dependency inversion.

mod auth_service;
mod course_service;
mod enrollment_service;
mod payment_service;
mod user_service;

pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use course_service::{
    CourseManager, CourseService, CreateCourseData, LessonInput, UpdateCourseData,
};
pub use enrollment_service::{EnrollmentLedger, EnrollmentService};
pub use payment_service::{CheckoutHandoff, PaymentService};
pub use user_service::{UserManager, UserService};
