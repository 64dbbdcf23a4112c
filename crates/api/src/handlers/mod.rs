pub mod actors;
pub mod auth;
pub mod comments;
pub mod movies;
pub mod users;
