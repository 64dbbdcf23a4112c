//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` (or an open transaction) as the first argument.

pub mod actor_repo;
pub mod comment_repo;
pub mod movie_actor_repo;
pub mod movie_repo;
pub mod user_repo;

pub use actor_repo::ActorRepo;
pub use comment_repo::CommentRepo;
pub use movie_actor_repo::MovieActorRepo;
pub use movie_repo::MovieRepo;
pub use user_repo::UserRepo;
