//! Movie/actor pivot rows.

use cinegrade_core::types::DbId;
use sqlx::FromRow;

/// A live actor joined through the pivot, tagged with the movie it was
/// reached from. Used to decorate movie lists in one query.
#[derive(Debug, Clone, FromRow)]
pub struct LinkedActor {
    pub movie_id: DbId,
    #[sqlx(flatten)]
    pub actor: crate::models::actor::Actor,
}
