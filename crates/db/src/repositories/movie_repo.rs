//! Repository for the `movies` table.
//!
//! Creation goes through [`MovieActorRepo::create_movie_with_actors`] so a
//! movie never exists without its actors; this repository provides the
//! in-transaction insert it uses plus the read, update and delete paths.
//!
//! [`MovieActorRepo::create_movie_with_actors`]: crate::repositories::MovieActorRepo::create_movie_with_actors

use std::collections::HashMap;

use sqlx::PgPool;
use cinegrade_core::types::DbId;

use crate::models::movie::{CreateMovie, Movie, MovieWithActors, MovieWithComments, UpdateMovie};
use crate::repositories::{CommentRepo, MovieActorRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, director, release_date, synopsis, picture, \
    average_grade, creator_id, created_at, updated_at, deleted_at";

/// Provides CRUD operations for movies and their denormalized read views.
pub struct MovieRepo;

impl MovieRepo {
    /// Insert a movie row inside an open transaction.
    ///
    /// A live title collision surfaces as a unique violation on
    /// `uq_movies_title_live`.
    pub async fn insert(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &CreateMovie,
    ) -> Result<Movie, sqlx::Error> {
        let query = format!(
            "INSERT INTO movies (title, director, release_date, synopsis, picture, creator_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(&input.title)
            .bind(&input.director)
            .bind(input.release_date)
            .bind(&input.synopsis)
            .bind(&input.picture)
            .bind(input.creator_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a live movie by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a movie by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1");
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List movies, newest first.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
        include_deleted: bool,
    ) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies
             WHERE ($3 OR deleted_at IS NULL)
             ORDER BY created_at DESC, id
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(limit)
            .bind(offset)
            .bind(include_deleted)
            .fetch_all(pool)
            .await
    }

    /// Find a live movie enriched with its live actors in link order.
    pub async fn find_with_actors(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MovieWithActors>, sqlx::Error> {
        let Some(movie) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let actors = MovieActorRepo::actors_for_movie(pool, movie.id).await?;
        Ok(Some(MovieWithActors { movie, actors }))
    }

    /// List movies with their actors, fetching all links in one query.
    pub async fn list_with_actors(
        pool: &PgPool,
        limit: i64,
        offset: i64,
        include_deleted: bool,
    ) -> Result<Vec<MovieWithActors>, sqlx::Error> {
        let movies = Self::list(pool, limit, offset, include_deleted).await?;
        let ids: Vec<DbId> = movies.iter().map(|m| m.id).collect();

        let mut by_movie: HashMap<DbId, Vec<_>> = HashMap::new();
        for linked in MovieActorRepo::actors_for_movies(pool, &ids).await? {
            by_movie.entry(linked.movie_id).or_default().push(linked.actor);
        }

        Ok(movies
            .into_iter()
            .map(|movie| {
                let actors = by_movie.remove(&movie.id).unwrap_or_default();
                MovieWithActors { movie, actors }
            })
            .collect())
    }

    /// Find a live movie with its actors and live comments.
    pub async fn find_with_comments(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MovieWithComments>, sqlx::Error> {
        let Some(MovieWithActors { movie, actors }) = Self::find_with_actors(pool, id).await? else {
            return Ok(None);
        };
        let comments = CommentRepo::list_for_movie(pool, movie.id).await?;
        Ok(Some(MovieWithComments {
            movie,
            actors,
            comments,
        }))
    }

    /// Update a live movie. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMovie,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!(
            "UPDATE movies SET
                title = COALESCE($2, title),
                director = COALESCE($3, director),
                release_date = COALESCE($4, release_date),
                synopsis = COALESCE($5, synopsis),
                picture = COALESCE($6, picture),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.director)
            .bind(input.release_date)
            .bind(&input.synopsis)
            .bind(&input.picture)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a movie. Links are kept; read paths filter the tombstone.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE movies SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
