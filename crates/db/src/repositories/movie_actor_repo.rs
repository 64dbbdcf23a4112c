//! Repository for the `movies_actors` pivot: the relationship store.
//!
//! Liveness of every actor is confirmed concurrently through an
//! [`ExistenceLookup`] (each lookup on its own pool connection) before any
//! write. Writes then run one at a time on the single open transaction, each
//! guarded so that an actor tombstoned after the lookup inserts nothing and
//! aborts the whole operation.

use std::collections::HashSet;

use cinegrade_core::error::CoreError;
use cinegrade_core::resolver::{self, ExistenceLookup};
use cinegrade_core::types::DbId;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::models::actor::Actor;
use crate::models::movie::{CreateMovie, Movie, MovieWithActors};
use crate::models::movie_actor::LinkedActor;
use crate::repositories::MovieRepo;

/// Actor columns qualified for joins through the pivot.
const ACTOR_COLUMNS: &str = "a.id, a.name, a.surname, a.birthday, a.picture, a.creator_id, \
    a.created_at, a.updated_at, a.deleted_at";

/// Movie columns qualified for joins through the pivot.
const MOVIE_COLUMNS: &str = "m.id, m.title, m.director, m.release_date, m.synopsis, m.picture, \
    m.average_grade, m.creator_id, m.created_at, m.updated_at, m.deleted_at";

type Tx<'c> = sqlx::Transaction<'c, sqlx::Postgres>;

/// Owns creation and editing of movie/actor links.
pub struct MovieActorRepo;

impl MovieActorRepo {
    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Create a movie and link every actor in `actor_ids`, all or nothing.
    ///
    /// `actor_ids` must be duplicate-free. The returned actors follow the
    /// order of `actor_ids`.
    pub async fn create_movie_with_actors<L>(
        pool: &PgPool,
        input: &CreateMovie,
        actor_ids: &[DbId],
        actors: &L,
        max_concurrent: usize,
    ) -> Result<MovieWithActors, StoreError>
    where
        L: ExistenceLookup<Record = Actor>,
    {
        // Fan-out runs on its own connections; never while holding `tx`.
        let resolved = match resolver::resolve_ids(actors, actor_ids, max_concurrent).await {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::warn!(title = %input.title, failed = e.failures.len(), "actor re-check failed, movie not created");
                return Err(CoreError::from(e).into());
            }
        };

        let mut tx = pool.begin().await?;
        let movie = MovieRepo::insert(&mut tx, input).await?;

        let missing = Self::link_all(&mut tx, movie.id, actor_ids).await?;
        if !missing.is_empty() {
            tx.rollback().await?;
            tracing::warn!(title = %input.title, ?missing, "actors vanished during link, movie rolled back");
            return Err(CoreError::MissingReferences {
                entity: "Actor",
                ids: missing,
            }
            .into());
        }

        tx.commit().await?;
        tracing::info!(movie_id = %movie.id, actors = actor_ids.len(), "movie created with actors");

        Ok(MovieWithActors {
            movie,
            actors: resolved.into_iter().map(|r| r.record).collect(),
        })
    }

    /// Link `actor_ids` to a live movie. Rejected in full if any actor is
    /// already linked.
    pub async fn add_actors<L>(
        pool: &PgPool,
        movie_id: DbId,
        actor_ids: &[DbId],
        actors: &L,
        max_concurrent: usize,
    ) -> Result<(), StoreError>
    where
        L: ExistenceLookup<Record = Actor>,
    {
        resolver::resolve_ids(actors, actor_ids, max_concurrent)
            .await
            .map_err(CoreError::from)?;

        let mut tx = pool.begin().await?;
        Self::lock_live_movie(&mut tx, movie_id).await?;

        let linked = Self::linked_among(&mut tx, movie_id, actor_ids).await?;
        if !linked.is_empty() {
            tx.rollback().await?;
            tracing::warn!(movie_id = %movie_id, ?linked, "add rejected: actors already linked");
            return Err(CoreError::Conflict(format!(
                "Actors already linked to movie {movie_id}: {}",
                join_ids(&linked)
            ))
            .into());
        }

        let missing = Self::link_all(&mut tx, movie_id, actor_ids).await?;
        if !missing.is_empty() {
            tx.rollback().await?;
            return Err(CoreError::MissingReferences {
                entity: "Actor",
                ids: missing,
            }
            .into());
        }

        tx.commit().await?;
        tracing::info!(movie_id = %movie_id, added = actor_ids.len(), "actors linked");
        Ok(())
    }

    /// Unlink `actor_ids` from a live movie. Rejected in full if any actor
    /// is not currently linked to it.
    pub async fn remove_actors<L>(
        pool: &PgPool,
        movie_id: DbId,
        actor_ids: &[DbId],
        actors: &L,
        max_concurrent: usize,
    ) -> Result<(), StoreError>
    where
        L: ExistenceLookup<Record = Actor>,
    {
        resolver::resolve_ids(actors, actor_ids, max_concurrent)
            .await
            .map_err(CoreError::from)?;

        let mut tx = pool.begin().await?;
        Self::lock_live_movie(&mut tx, movie_id).await?;

        let linked: HashSet<DbId> = Self::linked_among(&mut tx, movie_id, actor_ids)
            .await?
            .into_iter()
            .collect();
        let unlinked: Vec<DbId> = actor_ids
            .iter()
            .copied()
            .filter(|id| !linked.contains(id))
            .collect();
        if !unlinked.is_empty() {
            tx.rollback().await?;
            tracing::warn!(movie_id = %movie_id, ?unlinked, "remove rejected: actors not linked");
            return Err(CoreError::Conflict(format!(
                "Actors not linked to movie {movie_id}: {}",
                join_ids(&unlinked)
            ))
            .into());
        }

        let removed = sqlx::query(
            "DELETE FROM movies_actors WHERE movie_id = $1 AND actor_id = ANY($2)",
        )
        .bind(movie_id)
        .bind(actor_ids)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;
        tracing::info!(movie_id = %movie_id, removed, "actors unlinked");
        Ok(())
    }

    /// Lock the movie row for the rest of the transaction; NotFound if it is
    /// missing or tombstoned.
    async fn lock_live_movie(tx: &mut Tx<'_>, movie_id: DbId) -> Result<(), StoreError> {
        let locked: Option<DbId> = sqlx::query_scalar(
            "SELECT id FROM movies WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(movie_id)
        .fetch_optional(&mut **tx)
        .await?;

        match locked {
            Some(_) => Ok(()),
            None => Err(CoreError::NotFound {
                entity: "Movie",
                id: movie_id,
            }
            .into()),
        }
    }

    /// Which of `actor_ids` are already linked to the movie, in input order.
    async fn linked_among(
        tx: &mut Tx<'_>,
        movie_id: DbId,
        actor_ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<DbId> = sqlx::query_scalar(
            "SELECT actor_id FROM movies_actors WHERE movie_id = $1 AND actor_id = ANY($2)",
        )
        .bind(movie_id)
        .bind(actor_ids)
        .fetch_all(&mut **tx)
        .await?;

        let found: HashSet<DbId> = rows.into_iter().collect();
        Ok(actor_ids
            .iter()
            .copied()
            .filter(|id| found.contains(id))
            .collect())
    }

    /// Insert one link per actor, sequentially, on the open transaction.
    ///
    /// Each insert only happens if the actor is still live and takes a share
    /// lock on it, so a concurrent actor delete waits for this transaction.
    /// Returns the actors that were no longer live.
    async fn link_all(
        tx: &mut Tx<'_>,
        movie_id: DbId,
        actor_ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let mut missing = Vec::new();
        for &actor_id in actor_ids {
            let inserted = sqlx::query(
                "INSERT INTO movies_actors (movie_id, actor_id)
                 SELECT $1, a.id FROM actors a
                  WHERE a.id = $2 AND a.deleted_at IS NULL
                  FOR SHARE",
            )
            .bind(movie_id)
            .bind(actor_id)
            .execute(&mut **tx)
            .await?
            .rows_affected();

            if inserted == 0 {
                missing.push(actor_id);
            }
        }
        Ok(missing)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Live actors linked to a movie, in the order they were linked.
    pub async fn actors_for_movie(
        pool: &PgPool,
        movie_id: DbId,
    ) -> Result<Vec<Actor>, sqlx::Error> {
        let query = format!(
            "SELECT {ACTOR_COLUMNS}
             FROM movies_actors ma
             JOIN actors a ON a.id = ma.actor_id AND a.deleted_at IS NULL
             WHERE ma.movie_id = $1
             ORDER BY ma.created_at, ma.id"
        );
        sqlx::query_as::<_, Actor>(&query)
            .bind(movie_id)
            .fetch_all(pool)
            .await
    }

    /// Live actors for several movies at once, in link order per movie.
    pub async fn actors_for_movies(
        pool: &PgPool,
        movie_ids: &[DbId],
    ) -> Result<Vec<LinkedActor>, sqlx::Error> {
        if movie_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT ma.movie_id, {ACTOR_COLUMNS}
             FROM movies_actors ma
             JOIN actors a ON a.id = ma.actor_id AND a.deleted_at IS NULL
             WHERE ma.movie_id = ANY($1)
             ORDER BY ma.movie_id, ma.created_at, ma.id"
        );
        sqlx::query_as::<_, LinkedActor>(&query)
            .bind(movie_ids)
            .fetch_all(pool)
            .await
    }

    /// Live movies an actor is linked to, by release date.
    pub async fn movies_for_actor(
        pool: &PgPool,
        actor_id: DbId,
    ) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!(
            "SELECT {MOVIE_COLUMNS}
             FROM movies_actors ma
             JOIN movies m ON m.id = ma.movie_id AND m.deleted_at IS NULL
             WHERE ma.actor_id = $1
             ORDER BY m.release_date DESC, m.id"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(actor_id)
            .fetch_all(pool)
            .await
    }
}

fn join_ids(ids: &[DbId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
