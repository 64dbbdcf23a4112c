use axum::routing::{get, post};
use axum::Router;

use crate::handlers::movies;
use crate::state::AppState;

/// Routes mounted at `/movies`.
///
/// ```text
/// GET    /                       -> list (?withActors=true embeds actors)
/// POST   /                       -> create with actors (admin)
/// GET    /{id}                   -> get_by_id, with actors
/// PATCH  /{id}                   -> update (admin)
/// DELETE /{id}                   -> delete (admin)
/// POST   /{id}/actors            -> add_actors (admin)
/// DELETE /{id}/actors            -> remove_actors (admin)
/// GET    /{id}/comments          -> get_with_comments
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(movies::list).post(movies::create))
        .route(
            "/{id}",
            get(movies::get_by_id)
                .patch(movies::update)
                .delete(movies::delete),
        )
        .route(
            "/{id}/actors",
            post(movies::add_actors).delete(movies::remove_actors),
        )
        .route("/{id}/comments", get(movies::get_with_comments))
}
