//! Handlers for the `/actors` resource.
//!
//! Writes require an admin token. Deleting an actor drops every link to a
//! movie and tombstones the actor in one transaction.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cinegrade_core::error::CoreError;
use cinegrade_core::types::DbId;
use cinegrade_core::validation::gateway::checked;
use cinegrade_core::validation::FieldErrors;
use cinegrade_db::models::actor::{
    Actor, ActorWithMovies, CreateActor, CreateActorRequest, UpdateActor, UpdateActorRequest,
};
use cinegrade_db::repositories::{ActorRepo, MovieActorRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::ListParams;
use crate::state::AppState;

/// POST /api/v1/actors
///
/// `creatorId` must name a live admin user.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateActorRequest>,
) -> AppResult<(StatusCode, Json<Actor>)> {
    let mut errors = FieldErrors::from_validate(&input);
    let creator_id = state
        .gateway()
        .check_admin("creatorId", &input.creator_id, &mut errors)
        .await?;
    errors.into_result()?;

    let create = CreateActor::from_request(&input, checked(creator_id, "creatorId")?)?;
    let actor = ActorRepo::create(&state.pool, &create).await?;

    tracing::info!(actor_id = %actor.id, by = %admin.user_id, "actor created");
    Ok((StatusCode::CREATED, Json(actor)))
}

/// GET /api/v1/actors
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Actor>>> {
    let actors =
        ActorRepo::list(&state.pool, params.limit(), params.offset(), params.deleted).await?;
    Ok(Json(actors))
}

/// GET /api/v1/actors/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Actor>> {
    let actor = ActorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Actor",
            id,
        }))?;
    Ok(Json(actor))
}

/// GET /api/v1/actors/{id}/movies
///
/// Filmography lists live movies only.
pub async fn get_with_movies(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ActorWithMovies>> {
    let actor = ActorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Actor",
            id,
        }))?;
    let movies = MovieActorRepo::movies_for_actor(&state.pool, id).await?;
    Ok(Json(ActorWithMovies { actor, movies }))
}

/// PATCH /api/v1/actors/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateActorRequest>,
) -> AppResult<Json<Actor>> {
    FieldErrors::from_validate(&input).into_result()?;

    let changes = UpdateActor::from_request(&input)?;
    let actor = ActorRepo::update(&state.pool, id, &changes)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Actor",
            id,
        }))?;

    tracing::info!(actor_id = %id, by = %admin.user_id, "actor updated");
    Ok(Json(actor))
}

/// DELETE /api/v1/actors/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ActorRepo::delete_with_links(&state.pool, id).await? {
        tracing::info!(actor_id = %id, by = %admin.user_id, "actor deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Actor",
            id,
        }))
    }
}
