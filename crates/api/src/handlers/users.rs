//! Handlers for the `/users` resource.
//!
//! Registration is public and listing is admin-only. Reading, updating and deleting a user is allowed
//! for that user or an admin.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cinegrade_core::error::CoreError;
use cinegrade_core::types::DbId;
use cinegrade_core::validation::gateway::checked;
use cinegrade_core::validation::rules::parse_date;
use cinegrade_core::validation::FieldErrors;
use cinegrade_db::models::user::{
    CreateUser, RegisterUserRequest, UpdateUser, UpdateUserRequest, UserResponse, UserWithComments,
};
use cinegrade_db::repositories::{CommentRepo, UserRepo};

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::ListParams;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

fn hash(password: &str) -> AppResult<String> {
    hash_password(password).map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

/// POST /api/v1/users
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    FieldErrors::from_validate(&input).into_result()?;

    let create = CreateUser::from_request(&input, hash(&input.password)?)?;
    let user = UserRepo::create(&state.pool, &create).await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users =
        UserRepo::list(&state.pool, params.limit(), params.offset(), params.deleted).await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    caller.ensure_self_or_admin(id)?;
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(UserResponse::from(&user)))
}

/// GET /api/v1/users/{id}/comments
pub async fn get_with_comments(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserWithComments>> {
    caller.ensure_self_or_admin(id)?;
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let comments = CommentRepo::list_for_user(&state.pool, id).await?;
    Ok(Json(UserWithComments {
        user: UserResponse::from(&user),
        comments,
    }))
}

/// PATCH /api/v1/users/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    caller.ensure_self_or_admin(id)?;
    FieldErrors::from_validate(&input).into_result()?;

    let password_hash = match &input.password {
        Some(p) => Some(hash(p)?),
        None => None,
    };
    let birthday = match &input.birthday {
        Some(raw) => Some(checked(parse_date(raw), "birthday")?),
        None => None,
    };
    let changes = UpdateUser {
        name: input.name.as_deref().map(|s| s.trim().to_string()),
        surname: input.surname.as_deref().map(|s| s.trim().to_string()),
        password_hash,
        birthday,
    };

    let user = UserRepo::update(&state.pool, id, &changes)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(user_id = %id, by = %caller.user_id, "user updated");
    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /api/v1/users/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    caller.ensure_self_or_admin(id)?;
    if UserRepo::soft_delete(&state.pool, id).await? {
        tracing::info!(user_id = %id, by = %caller.user_id, "user deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
