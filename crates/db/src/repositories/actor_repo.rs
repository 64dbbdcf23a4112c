//! Repository for the `actors` table.

use sqlx::PgPool;
use cinegrade_core::types::DbId;

use crate::models::actor::{Actor, CreateActor, UpdateActor};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, surname, birthday, picture, creator_id, created_at, updated_at, deleted_at";

/// Provides CRUD operations for actors and the delete cascade over links.
pub struct ActorRepo;

impl ActorRepo {
    /// Insert a new actor, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateActor) -> Result<Actor, sqlx::Error> {
        let query = format!(
            "INSERT INTO actors (name, surname, birthday, picture, creator_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Actor>(&query)
            .bind(&input.name)
            .bind(&input.surname)
            .bind(input.birthday)
            .bind(&input.picture)
            .bind(input.creator_id)
            .fetch_one(pool)
            .await
    }

    /// Find a live actor by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Actor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM actors WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Actor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an actor by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Actor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM actors WHERE id = $1");
        sqlx::query_as::<_, Actor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List actors, newest first.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
        include_deleted: bool,
    ) -> Result<Vec<Actor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM actors
             WHERE ($3 OR deleted_at IS NULL)
             ORDER BY created_at DESC, id
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Actor>(&query)
            .bind(limit)
            .bind(offset)
            .bind(include_deleted)
            .fetch_all(pool)
            .await
    }

    /// Update a live actor. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateActor,
    ) -> Result<Option<Actor>, sqlx::Error> {
        let query = format!(
            "UPDATE actors SET
                name = COALESCE($2, name),
                surname = COALESCE($3, surname),
                birthday = COALESCE($4, birthday),
                picture = COALESCE($5, picture),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Actor>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.surname)
            .bind(input.birthday)
            .bind(&input.picture)
            .fetch_optional(pool)
            .await
    }

    /// Remove every link to the actor, then soft-delete it, in one transaction.
    ///
    /// The actor row is locked first so a concurrent link insert either
    /// commits before the link delete runs or sees the tombstone.
    /// Returns `false` (and changes nothing) if the actor is not live.
    pub async fn delete_with_links(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<DbId> = sqlx::query_scalar(
            "SELECT id FROM actors WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        if locked.is_none() {
            tx.rollback().await?;
            return Ok(false);
        }

        let unlinked = sqlx::query("DELETE FROM movies_actors WHERE actor_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("UPDATE actors SET deleted_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(actor_id = %id, unlinked, "actor deleted with links");
        Ok(true)
    }
}
