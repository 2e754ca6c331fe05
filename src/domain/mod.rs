//! Domain layer - Core business entities and logic.
//!
//! Contains the entities and value objects of the enrollment and
//! access-control core, independent of infrastructure concerns.

pub mod course;
pub mod enrollment;
pub mod password;
pub mod user;

pub use course::{slugify, Course, CourseSummary, Difficulty, Lesson};
pub use enrollment::{AdminEnrollmentView, Enrollment, EnrollmentView};
pub use password::Password;
pub use user::{User, UserResponse, UserRole, UserSummary};
