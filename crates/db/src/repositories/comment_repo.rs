//! Repository for the `comments` table.
//!
//! Every write here fires `trg_comments_average_grade`, which refreshes the
//! parent movie's `average_grade` in the same statement.

use sqlx::PgPool;
use cinegrade_core::types::DbId;

use crate::models::comment::{Comment, CreateComment, UpdateComment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, comment, grade, user_id, movie_id, created_at, updated_at, deleted_at";

/// Provides CRUD operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a comment if both the movie and the author are live.
    ///
    /// Returns `None` when either reference is missing or tombstoned.
    pub async fn create(
        pool: &PgPool,
        input: &CreateComment,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (comment, grade, user_id, movie_id)
             SELECT $1, $2, u.id, m.id
               FROM users u, movies m
              WHERE u.id = $3 AND u.deleted_at IS NULL
                AND m.id = $4 AND m.deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(&input.comment)
            .bind(input.grade)
            .bind(input.user_id)
            .bind(input.movie_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a live comment by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM comments WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List comments, newest first.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
        include_deleted: bool,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments
             WHERE ($3 OR deleted_at IS NULL)
             ORDER BY created_at DESC, id
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(limit)
            .bind(offset)
            .bind(include_deleted)
            .fetch_all(pool)
            .await
    }

    /// Live comments on a movie, newest first.
    pub async fn list_for_movie(
        pool: &PgPool,
        movie_id: DbId,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments
             WHERE movie_id = $1 AND deleted_at IS NULL
             ORDER BY created_at DESC, id"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(movie_id)
            .fetch_all(pool)
            .await
    }

    /// Live comments by a user, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments
             WHERE user_id = $1 AND deleted_at IS NULL
             ORDER BY created_at DESC, id"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a live comment. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateComment,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "UPDATE comments SET
                comment = COALESCE($2, comment),
                grade = COALESCE($3, grade),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(&input.comment)
            .bind(input.grade)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a comment. The trigger drops it from the movie average.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE comments SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
