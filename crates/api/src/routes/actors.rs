use axum::routing::get;
use axum::Router;

use crate::handlers::actors;
use crate::state::AppState;

/// Routes mounted at `/actors`.
///
/// ```text
/// GET    /                       -> list
/// POST   /                       -> create (admin)
/// GET    /{id}                   -> get_by_id
/// PATCH  /{id}                   -> update (admin)
/// DELETE /{id}                   -> delete, drops movie links (admin)
/// GET    /{id}/movies            -> get_with_movies
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(actors::list).post(actors::create))
        .route(
            "/{id}",
            get(actors::get_by_id)
                .patch(actors::update)
                .delete(actors::delete),
        )
        .route("/{id}/movies", get(actors::get_with_movies))
}
