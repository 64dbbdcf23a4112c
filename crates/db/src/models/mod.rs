//! Row types and request/insert DTOs.
//!
//! Request DTOs (`*Request`) deserialize from camelCase JSON with every
//! field defaulted, so a missing field is reported by validation rather
//! than rejected by the body parser. Identifier fields stay strings until
//! the validation gateway has checked them. Insert/update DTOs carry typed,
//! already-validated values and are what the repositories consume.

pub mod actor;
pub mod comment;
pub mod movie;
pub mod movie_actor;
pub mod user;
