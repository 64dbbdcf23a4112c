use axum::routing::get;
use axum::Router;

use crate::handlers::comments;
use crate::state::AppState;

/// Routes mounted at `/comments`.
///
/// ```text
/// GET    /                       -> list (admin)
/// POST   /                       -> create (auth)
/// GET    /{id}                   -> get_by_id
/// PATCH  /{id}                   -> update (author or admin)
/// DELETE /{id}                   -> delete (author or admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(comments::list).post(comments::create))
        .route(
            "/{id}",
            get(comments::get_by_id)
                .patch(comments::update)
                .delete(comments::delete),
        )
}
