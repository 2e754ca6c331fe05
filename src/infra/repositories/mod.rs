//! Repository layer - Data access abstraction.
//!
//! Repositories provide an abstraction over data persistence; services
//! depend on the traits, never on SeaORM directly.

mod course_repository;
mod enrollment_repository;
pub(crate) mod entities;
mod user_repository;

pub use course_repository::{CourseChanges, CourseRepository, CourseStore, NewCourse};
pub use enrollment_repository::{EnrollmentRepository, EnrollmentStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use course_repository::MockCourseRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use enrollment_repository::MockEnrollmentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
