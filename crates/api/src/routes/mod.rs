pub mod actors;
pub mod auth;
pub mod comments;
pub mod health;
pub mod movies;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/login                     login (public)
///
/// /users                          list (admin), register (public)
/// /users/{id}                     get, update, delete (self or admin)
/// /users/{id}/comments            user with comments (self or admin)
///
/// /actors                         list, create
/// /actors/{id}                    get, update, delete
/// /actors/{id}/movies             actor with filmography
///
/// /movies                         list, create with actors
/// /movies/{id}                    get, update, delete
/// /movies/{id}/actors             add, remove actors
/// /movies/{id}/comments           movie with actors and comments
///
/// /comments                       list (admin), create
/// /comments/{id}                  get, update, delete (author or admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/actors", actors::router())
        .nest("/movies", movies::router())
        .nest("/comments", comments::router())
}
