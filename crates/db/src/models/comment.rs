//! Comment entity model and DTOs.

use cinegrade_core::grade::validate_grade;
use cinegrade_core::types::{DbId, Timestamp};
use cinegrade_core::validation::rules::{validate_id, validate_not_blank};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A comment row from the `comments` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: DbId,
    pub comment: String,
    pub grade: f64,
    pub user_id: DbId,
    pub movie_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// The author is taken from the access token, never from the body.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[validate(
        length(min = 1, max = 5000, message = "The comment field is required."),
        custom(function = "validate_not_blank")
    )]
    pub comment: String,
    #[validate(
        required(message = "The grade field is required."),
        custom(function = "validate_grade")
    )]
    pub grade: Option<f64>,
    #[validate(custom(function = "validate_id"))]
    pub movie_id: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateCommentRequest {
    #[validate(
        length(min = 1, max = 5000, message = "The comment field must not be empty."),
        custom(function = "validate_not_blank")
    )]
    pub comment: Option<String>,
    #[validate(custom(function = "validate_grade"))]
    pub grade: Option<f64>,
}

/// DTO for inserting a comment.
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub comment: String,
    pub grade: f64,
    pub user_id: DbId,
    pub movie_id: DbId,
}

/// DTO for updating a comment. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateComment {
    pub comment: Option<String>,
    pub grade: Option<f64>,
}

impl From<&UpdateCommentRequest> for UpdateComment {
    fn from(input: &UpdateCommentRequest) -> Self {
        Self {
            comment: input.comment.clone(),
            grade: input.grade,
        }
    }
}
