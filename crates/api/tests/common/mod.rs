#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use cinegrade_api::auth::jwt::{generate_access_token, JwtConfig};
use cinegrade_api::auth::password::hash_password;
use cinegrade_api::config::ServerConfig;
use cinegrade_api::router::build_app_router;
use cinegrade_api::state::AppState;
use cinegrade_core::roles::Privileged;
use cinegrade_db::models::user::{CreateUser, User};
use cinegrade_db::repositories::UserRepo;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "Sup3r-secret!";

/// Build a test `ServerConfig` with safe defaults.
///
/// A small lookup concurrency keeps the resolver fan-out bounded below
/// the test pool size.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 5,
        lookup_concurrency: 2,
        bootstrap_admin: None,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router, with the production middleware stack,
/// over the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    build_app_router(AppState::new(pool, config.clone()), &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] directly through the repository.
pub async fn create_user(pool: &PgPool, email: &str, is_admin: bool) -> User {
    let input = CreateUser {
        email: email.to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        name: "Test".to_string(),
        surname: "User".to_string(),
        birthday: None,
        is_admin,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Mint an access token for `user` with the test JWT secret.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, user.role(), &test_config().jwt)
        .expect("token generation should succeed")
}

/// Create an admin and return it together with a bearer token.
pub async fn admin_with_token(pool: &PgPool) -> (User, String) {
    let admin = create_user(pool, "admin@cinegrade.test", true).await;
    let token = token_for(&admin);
    (admin, token)
}

/// Create a regular user and return it together with a bearer token.
pub async fn user_with_token(pool: &PgPool, email: &str) -> (User, String) {
    let user = create_user(pool, email, false).await;
    let token = token_for(&user);
    (user, token)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn delete_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), Some(body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

// ---------------------------------------------------------------------------
// API fixtures
// ---------------------------------------------------------------------------

/// Create an actor through the API and return its id.
pub async fn create_actor(app: &Router, token: &str, creator: &User, name: &str) -> String {
    let body = serde_json::json!({
        "name": name,
        "surname": "Doe",
        "birthday": "1970-01-01",
        "creatorId": creator.id,
    });
    let response = post_json_auth(app.clone(), "/api/v1/actors", body, token).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"]
        .as_str()
        .expect("actor id")
        .to_string()
}

/// JSON body for `POST /movies`.
pub fn movie_body(creator: &User, title: &str, actors: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "director": "Jane Director",
        "releaseDate": "2001-05-04",
        "creatorId": creator.id,
        "actors": actors,
    })
}

/// Create a movie through the API and return its id.
pub async fn create_movie(
    app: &Router,
    token: &str,
    creator: &User,
    title: &str,
    actors: &[&str],
) -> String {
    let response = post_json_auth(
        app.clone(),
        "/api/v1/movies",
        movie_body(creator, title, actors),
        token,
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"]
        .as_str()
        .expect("movie id")
        .to_string()
}

/// Ids of the `actors` array of a movie response, in response order.
pub fn actor_ids(json: &serde_json::Value) -> Vec<String> {
    json["actors"]
        .as_array()
        .expect("actors array")
        .iter()
        .map(|a| a["id"].as_str().expect("actor id").to_string())
        .collect()
}
