//! SeaORM entity definitions.
//!
//! These are database-specific models separate from domain entities.

pub mod course;
pub mod enrollment;
pub mod user;
