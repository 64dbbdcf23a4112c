//! HTTP-level tests for comments and the movie average grade.

mod common;

use axum::http::StatusCode;
use common::{
    admin_with_token, body_json, create_actor, create_movie, delete_auth, get, get_auth,
    patch_json_auth, post_json_auth, user_with_token,
};
use serde_json::json;
use sqlx::PgPool;

async fn comment(app: &axum::Router, token: &str, movie: &str, grade: f64) -> String {
    let body = json!({ "comment": "Seen it.", "grade": grade, "movieId": movie });
    let response = post_json_auth(app.clone(), "/api/v1/comments", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_str().unwrap().to_string()
}

async fn average(app: &axum::Router, movie: &str) -> f64 {
    let json = body_json(get(app.clone(), &format!("/api/v1/movies/{movie}")).await).await;
    json["averageGrade"].as_f64().unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_average_grade_tracks_live_comments(pool: PgPool) {
    let (admin, token) = admin_with_token(&pool).await;
    let (_user, user_token) = user_with_token(&pool, "critic@cinegrade.test").await;
    let app = common::build_test_app(pool);
    let a = create_actor(&app, &token, &admin, "Alice").await;
    let movie = create_movie(&app, &token, &admin, "Graded", &[&a]).await;

    comment(&app, &user_token, &movie, 2.0).await;
    comment(&app, &user_token, &movie, 3.0).await;
    let four = comment(&app, &user_token, &movie, 4.0).await;
    assert_eq!(average(&app, &movie).await, 3.0);

    let response = delete_auth(app.clone(), &format!("/api/v1/comments/{four}"), &user_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(average(&app, &movie).await, 2.5);

    let json = body_json(get(app, &format!("/api/v1/movies/{movie}/comments")).await).await;
    assert_eq!(json["comments"].as_array().unwrap().len(), 2);
    assert_eq!(json["actors"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_grade_update_refreshes_average(pool: PgPool) {
    let (admin, token) = admin_with_token(&pool).await;
    let (_user, user_token) = user_with_token(&pool, "critic@cinegrade.test").await;
    let app = common::build_test_app(pool);
    let a = create_actor(&app, &token, &admin, "Alice").await;
    let movie = create_movie(&app, &token, &admin, "Regraded", &[&a]).await;
    let id = comment(&app, &user_token, &movie, 1.0).await;

    let uri = format!("/api/v1/comments/{id}");
    let response = patch_json_auth(app.clone(), &uri, json!({ "grade": 4.5 }), &user_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(average(&app, &movie).await, 4.5);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_grade_rules(pool: PgPool) {
    let (admin, token) = admin_with_token(&pool).await;
    let (_user, user_token) = user_with_token(&pool, "critic@cinegrade.test").await;
    let app = common::build_test_app(pool);
    let a = create_actor(&app, &token, &admin, "Alice").await;
    let movie = create_movie(&app, &token, &admin, "Strict", &[&a]).await;

    for grade in [json!(0.5), json!(5.5), json!(3.25), json!(null)] {
        let body = json!({ "comment": "Hmm", "grade": grade, "movieId": movie });
        let response = post_json_auth(app.clone(), "/api/v1/comments", body, &user_token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "grade = {grade}");
        let json = body_json(response).await;
        assert!(json["fields"]["grade"].is_array());
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_comment_on_deleted_movie_is_404(pool: PgPool) {
    let (admin, token) = admin_with_token(&pool).await;
    let (_user, user_token) = user_with_token(&pool, "critic@cinegrade.test").await;
    let app = common::build_test_app(pool);
    let a = create_actor(&app, &token, &admin, "Alice").await;
    let movie = create_movie(&app, &token, &admin, "Retired", &[&a]).await;
    delete_auth(app.clone(), &format!("/api/v1/movies/{movie}"), &token).await;

    let body = json!({ "comment": "Late", "grade": 3, "movieId": movie });
    let response = post_json_auth(app, "/api/v1/comments", body, &user_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_only_author_or_admin_may_change_comment(pool: PgPool) {
    let (admin, token) = admin_with_token(&pool).await;
    let (_author, author_token) = user_with_token(&pool, "author@cinegrade.test").await;
    let (_other, other_token) = user_with_token(&pool, "other@cinegrade.test").await;
    let app = common::build_test_app(pool);
    let a = create_actor(&app, &token, &admin, "Alice").await;
    let movie = create_movie(&app, &token, &admin, "Owned", &[&a]).await;
    let id = comment(&app, &author_token, &movie, 3.0).await;
    let uri = format!("/api/v1/comments/{id}");

    let response =
        patch_json_auth(app.clone(), &uri, json!({ "comment": "Mine now" }), &other_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = delete_auth(app.clone(), &uri, &other_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = get(app, &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_comment_listing_is_admin_only(pool: PgPool) {
    let (admin, token) = admin_with_token(&pool).await;
    let (_user, user_token) = user_with_token(&pool, "critic@cinegrade.test").await;
    let app = common::build_test_app(pool);
    let a = create_actor(&app, &token, &admin, "Alice").await;
    let movie = create_movie(&app, &token, &admin, "Listed", &[&a]).await;
    comment(&app, &user_token, &movie, 5.0).await;

    let response = get_auth(app.clone(), "/api/v1/comments", &user_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app, "/api/v1/comments", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}
