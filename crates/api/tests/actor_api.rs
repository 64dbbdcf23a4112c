//! HTTP-level tests for actors and the actor delete cascade.

mod common;

use axum::http::StatusCode;
use common::{
    actor_ids, admin_with_token, body_json, create_actor, create_movie, delete_auth, get,
    patch_json_auth, post_json_auth, user_with_token,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_actor_requires_admin_creator(pool: PgPool) {
    let (admin, token) = admin_with_token(&pool).await;
    let (user, user_token) = user_with_token(&pool, "fan@cinegrade.test").await;
    let app = common::build_test_app(pool);

    let body = json!({
        "name": "Alice",
        "surname": "Doe",
        "birthday": "1970-01-01",
        "creatorId": user.id,
    });
    let response = post_json_auth(app.clone(), "/api/v1/actors", body.clone(), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["fields"]["creatorId"].is_array());

    let response = post_json_auth(app.clone(), "/api/v1/actors", body, &user_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let id = create_actor(&app, &token, &admin, "Alice").await;
    let json = body_json(get(app, &format!("/api/v1/actors/{id}")).await).await;
    assert_eq!(json["creatorId"], admin.id.to_string());
    assert_eq!(json["birthday"], "1970-01-01");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_actor(pool: PgPool) {
    let (admin, token) = admin_with_token(&pool).await;
    let app = common::build_test_app(pool);
    let id = create_actor(&app, &token, &admin, "Alice").await;
    let uri = format!("/api/v1/actors/{id}");

    let response = patch_json_auth(
        app.clone(),
        &uri,
        json!({ "picture": "not a url" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = patch_json_auth(app, &uri, json!({ "surname": "Smith" }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Alice");
    assert_eq!(json["surname"], "Smith");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_actor_unlinks_every_movie(pool: PgPool) {
    let (admin, token) = admin_with_token(&pool).await;
    let app = common::build_test_app(pool.clone());
    let a = create_actor(&app, &token, &admin, "Alice").await;
    let b = create_actor(&app, &token, &admin, "Bob").await;
    let first = create_movie(&app, &token, &admin, "First", &[&a, &b]).await;
    let second = create_movie(&app, &token, &admin, "Second", &[&a]).await;

    let response = delete_auth(app.clone(), &format!("/api/v1/actors/{a}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get(app.clone(), &format!("/api/v1/movies/{first}")).await).await;
    assert_eq!(actor_ids(&json), vec![b]);
    let json = body_json(get(app.clone(), &format!("/api/v1/movies/{second}")).await).await;
    assert_eq!(actor_ids(&json), Vec::<String>::new());

    let response = get(app.clone(), &format!("/api/v1/actors/{a}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Deleting twice is a 404, not a second cascade.
    let response = delete_auth(app.clone(), &format!("/api/v1/actors/{a}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // A deleted actor cannot be linked again.
    let uri = format!("/api/v1/movies/{second}/actors");
    let response = post_json_auth(app, &uri, json!({ "actors": [a] }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_filmography_hides_deleted_movies(pool: PgPool) {
    let (admin, token) = admin_with_token(&pool).await;
    let app = common::build_test_app(pool);
    let a = create_actor(&app, &token, &admin, "Alice").await;
    let kept = create_movie(&app, &token, &admin, "Kept", &[&a]).await;
    let dropped = create_movie(&app, &token, &admin, "Dropped", &[&a]).await;
    delete_auth(app.clone(), &format!("/api/v1/movies/{dropped}"), &token).await;

    let json = body_json(get(app, &format!("/api/v1/actors/{a}/movies")).await).await;
    assert_eq!(json["id"], a.as_str());
    let movies = json["movies"].as_array().unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0]["id"], kept.as_str());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_actors_paginates(pool: PgPool) {
    let (admin, token) = admin_with_token(&pool).await;
    let app = common::build_test_app(pool);
    for name in ["A", "B", "C"] {
        create_actor(&app, &token, &admin, name).await;
    }

    let json = body_json(get(app.clone(), "/api/v1/actors?limit=2").await).await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    let json = body_json(get(app, "/api/v1/actors?limit=2&offset=2").await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}
