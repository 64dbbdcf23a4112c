//! Handlers for the `/comments` resource.
//!
//! The author of a new comment is the caller. Only the author or an admin
//! may change or delete a comment. Each write refreshes the movie's
//! average grade through the `trg_comments_average_grade` trigger.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cinegrade_core::error::CoreError;
use cinegrade_core::types::DbId;
use cinegrade_core::validation::gateway::checked;
use cinegrade_core::validation::rules::parse_id;
use cinegrade_core::validation::FieldErrors;
use cinegrade_db::models::comment::{
    Comment, CreateComment, CreateCommentRequest, UpdateComment, UpdateCommentRequest,
};
use cinegrade_db::repositories::{CommentRepo, MovieRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::ListParams;
use crate::state::AppState;

fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}

/// POST /api/v1/comments
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Json(input): Json<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    FieldErrors::from_validate(&input).into_result()?;
    let movie_id = checked(parse_id(&input.movie_id), "movieId")?;

    if UserRepo::find_by_id(&state.pool, caller.user_id).await?.is_none() {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Account no longer exists".into(),
        )));
    }
    if MovieRepo::find_by_id(&state.pool, movie_id).await?.is_none() {
        return Err(not_found("Movie", movie_id));
    }

    let create = CreateComment {
        comment: input.comment.trim().to_string(),
        grade: checked(input.grade, "grade")?,
        user_id: caller.user_id,
        movie_id,
    };
    // The insert re-checks both rows, so a concurrent delete still lands here.
    let comment = CommentRepo::create(&state.pool, &create)
        .await?
        .ok_or(not_found("Movie", movie_id))?;

    tracing::info!(
        comment_id = %comment.id,
        movie_id = %movie_id,
        user_id = %caller.user_id,
        "comment created",
    );
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/v1/comments
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Comment>>> {
    let comments =
        CommentRepo::list(&state.pool, params.limit(), params.offset(), params.deleted).await?;
    Ok(Json(comments))
}

/// GET /api/v1/comments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Comment>> {
    let comment = CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found("Comment", id))?;
    Ok(Json(comment))
}

/// PATCH /api/v1/comments/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCommentRequest>,
) -> AppResult<Json<Comment>> {
    FieldErrors::from_validate(&input).into_result()?;

    let existing = CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found("Comment", id))?;
    caller.ensure_self_or_admin(existing.user_id)?;

    let comment = CommentRepo::update(&state.pool, id, &UpdateComment::from(&input))
        .await?
        .ok_or(not_found("Comment", id))?;

    tracing::info!(comment_id = %id, by = %caller.user_id, "comment updated");
    Ok(Json(comment))
}

/// DELETE /api/v1/comments/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found("Comment", id))?;
    caller.ensure_self_or_admin(existing.user_id)?;

    if CommentRepo::soft_delete(&state.pool, id).await? {
        tracing::info!(comment_id = %id, by = %caller.user_id, "comment deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Comment", id))
    }
}
