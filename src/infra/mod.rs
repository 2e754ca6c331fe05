//! Infrastructure layer - External systems integration.
//!
//! Database connections, repositories, and the payment provider client.

pub mod db;
pub mod payment;
pub mod repositories;

pub use db::{Database, Migrator};
pub use payment::{CheckoutProvider, CheckoutRequest, CheckoutSession, PaymentState, StripeCheckout};
pub use repositories::{
    CourseRepository, CourseStore, EnrollmentRepository, EnrollmentStore, UserRepository, UserStore,
};

#[cfg(any(test, feature = "test-utils"))]
pub use payment::MockCheckoutProvider;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockCourseRepository, MockEnrollmentRepository, MockUserRepository};
