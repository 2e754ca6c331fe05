//! HTTP request handlers.

pub mod auth_handler;
pub mod course_handler;
pub mod enrollment_handler;
pub mod payment_handler;
pub mod user_handler;

pub use auth_handler::{auth_protected_routes, auth_routes};
pub use course_handler::{course_protected_routes, course_routes};
pub use enrollment_handler::enrollment_routes;
pub use payment_handler::payment_routes;
pub use user_handler::user_routes;
