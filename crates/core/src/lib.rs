//! Domain layer for the cinegrade review service.
//!
//! Holds everything that does not talk to PostgreSQL directly: shared
//! identifier types, the error taxonomy, grade and field rules, the
//! concurrent existence resolver and the validation gateway built on it.

pub mod error;
pub mod grade;
pub mod pagination;
pub mod resolver;
pub mod roles;
pub mod types;
pub mod validation;
