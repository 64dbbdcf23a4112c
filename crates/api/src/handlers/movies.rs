//! Handlers for the `/movies` resource and its actor links.
//!
//! Creating a movie and changing its actor set go through the validation
//! gateway first, then through [`MovieActorRepo`], which re-resolves the
//! actors inside its own transaction before touching `movies_actors`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cinegrade_core::error::CoreError;
use cinegrade_core::resolver::Resolved;
use cinegrade_core::types::DbId;
use cinegrade_core::validation::gateway::checked;
use cinegrade_core::validation::FieldErrors;
use cinegrade_db::models::actor::Actor;
use cinegrade_db::models::movie::{
    ActorSetRequest, CreateMovie, CreateMovieRequest, Movie, MovieWithActors, MovieWithComments,
    UpdateMovie, UpdateMovieRequest,
};
use cinegrade_db::repositories::{MovieActorRepo, MovieRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::ListParams;
use crate::state::AppState;

/// Response of `GET /movies`, shaped by the `withActors` flag.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MovieList {
    Plain(Vec<Movie>),
    WithActors(Vec<MovieWithActors>),
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Movie", id })
}

fn resolved_ids(resolved: &[Resolved<Actor>]) -> Vec<DbId> {
    resolved.iter().map(|r| r.id).collect()
}

// ---------------------------------------------------------------------------
// Movie CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/movies
///
/// Creates the movie and links every listed actor, in order, atomically.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateMovieRequest>,
) -> AppResult<(StatusCode, Json<MovieWithActors>)> {
    let gateway = state.gateway();
    let mut errors = FieldErrors::from_validate(&input);
    let creator_id = gateway
        .check_admin("creatorId", &input.creator_id, &mut errors)
        .await?;
    let actors = gateway
        .check_actor_set("actors", &input.actors, &mut errors)
        .await?;
    errors.into_result()?;

    let create = CreateMovie::from_request(&input, checked(creator_id, "creatorId")?)?;
    let actor_ids = resolved_ids(&checked(actors, "actors")?);

    let movie = MovieActorRepo::create_movie_with_actors(
        &state.pool,
        &create,
        &actor_ids,
        gateway.actors(),
        gateway.max_concurrent(),
    )
    .await?;

    tracing::info!(
        movie_id = %movie.movie.id,
        actor_count = movie.actors.len(),
        by = %admin.user_id,
        "movie created",
    );
    Ok((StatusCode::CREATED, Json(movie)))
}

/// GET /api/v1/movies
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<MovieList>> {
    let (limit, offset) = (params.limit(), params.offset());
    let movies = if params.with_actors {
        MovieList::WithActors(
            MovieRepo::list_with_actors(&state.pool, limit, offset, params.deleted).await?,
        )
    } else {
        MovieList::Plain(MovieRepo::list(&state.pool, limit, offset, params.deleted).await?)
    };
    Ok(Json(movies))
}

/// GET /api/v1/movies/{id}
///
/// Actors are listed in the order they were linked.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MovieWithActors>> {
    let movie = MovieRepo::find_with_actors(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    Ok(Json(movie))
}

/// GET /api/v1/movies/{id}/comments
pub async fn get_with_comments(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MovieWithComments>> {
    let movie = MovieRepo::find_with_comments(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    Ok(Json(movie))
}

/// PATCH /api/v1/movies/{id}
///
/// A title already used by another live movie is rejected with 409.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMovieRequest>,
) -> AppResult<Json<Movie>> {
    FieldErrors::from_validate(&input).into_result()?;

    let changes = UpdateMovie::from_request(&input)?;
    let movie = MovieRepo::update(&state.pool, id, &changes)
        .await?
        .ok_or(not_found(id))?;

    tracing::info!(movie_id = %id, by = %admin.user_id, "movie updated");
    Ok(Json(movie))
}

/// DELETE /api/v1/movies/{id}
///
/// Tombstones the movie only. Its links stay in place and stop showing up
/// in filmographies because those read live movies only.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if MovieRepo::soft_delete(&state.pool, id).await? {
        tracing::info!(movie_id = %id, by = %admin.user_id, "movie deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

// ---------------------------------------------------------------------------
// Actor links
// ---------------------------------------------------------------------------

/// Validate an actor set for a movie that must currently be live.
async fn checked_actor_set(
    state: &AppState,
    movie_id: DbId,
    input: &ActorSetRequest,
) -> AppResult<Vec<DbId>> {
    if MovieRepo::find_by_id(&state.pool, movie_id).await?.is_none() {
        return Err(not_found(movie_id));
    }

    let mut errors = FieldErrors::new();
    let actors = state
        .gateway()
        .check_actor_set("actors", &input.actors, &mut errors)
        .await?;
    errors.into_result()?;
    Ok(resolved_ids(&checked(actors, "actors")?))
}

/// POST /api/v1/movies/{id}/actors
///
/// Links every listed actor. Fails with 409 if any is already linked.
pub async fn add_actors(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ActorSetRequest>,
) -> AppResult<StatusCode> {
    let actor_ids = checked_actor_set(&state, id, &input).await?;
    let gateway = state.gateway();
    MovieActorRepo::add_actors(
        &state.pool,
        id,
        &actor_ids,
        gateway.actors(),
        gateway.max_concurrent(),
    )
    .await?;

    tracing::info!(movie_id = %id, count = actor_ids.len(), by = %admin.user_id, "actors linked");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/movies/{id}/actors
///
/// Unlinks every listed actor. Fails with 409 if any is not linked.
pub async fn remove_actors(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ActorSetRequest>,
) -> AppResult<StatusCode> {
    let actor_ids = checked_actor_set(&state, id, &input).await?;
    let gateway = state.gateway();
    MovieActorRepo::remove_actors(
        &state.pool,
        id,
        &actor_ids,
        gateway.actors(),
        gateway.max_concurrent(),
    )
    .await?;

    tracing::info!(movie_id = %id, count = actor_ids.len(), by = %admin.user_id, "actors unlinked");
    Ok(StatusCode::NO_CONTENT)
}
