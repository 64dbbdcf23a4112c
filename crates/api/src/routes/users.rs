use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /                       -> list (admin)
/// POST   /                       -> register (public)
/// GET    /{id}                   -> get_by_id (self or admin)
/// PATCH  /{id}                   -> update (self or admin)
/// DELETE /{id}                   -> delete (self or admin)
/// GET    /{id}/comments          -> get_with_comments (self or admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::register))
        .route(
            "/{id}",
            get(users::get_by_id)
                .patch(users::update)
                .delete(users::delete),
        )
        .route("/{id}/comments", get(users::get_with_comments))
}
