//! Movie entity model and DTOs.

use cinegrade_core::error::CoreError;
use cinegrade_core::types::{Date, DbId, Timestamp};
use cinegrade_core::validation::gateway::checked;
use cinegrade_core::validation::rules::{parse_date, validate_date, validate_not_blank};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::actor::Actor;
use crate::models::comment::Comment;

/// A movie row from the `movies` table.
///
/// `average_grade` is maintained by the `trg_comments_average_grade`
/// trigger and is never written by the application.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: DbId,
    pub title: String,
    pub director: String,
    pub release_date: Date,
    pub synopsis: Option<String>,
    pub picture: Option<String>,
    pub average_grade: f64,
    pub creator_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// A movie decorated with its linked live actors.
#[derive(Debug, Clone, Serialize)]
pub struct MovieWithActors {
    #[serde(flatten)]
    pub movie: Movie,
    pub actors: Vec<Actor>,
}

/// A movie with its actors and live comments.
#[derive(Debug, Clone, Serialize)]
pub struct MovieWithComments {
    #[serde(flatten)]
    pub movie: Movie,
    pub actors: Vec<Actor>,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateMovieRequest {
    #[validate(
        length(min = 1, max = 255, message = "The title field is required."),
        custom(function = "validate_not_blank")
    )]
    pub title: String,
    #[validate(
        length(min = 1, max = 255, message = "The director field is required."),
        custom(function = "validate_not_blank")
    )]
    pub director: String,
    #[validate(custom(function = "validate_date"))]
    pub release_date: String,
    #[validate(length(max = 5000, message = "The synopsis field is too long."))]
    pub synopsis: Option<String>,
    #[validate(url(message = "The picture field must be a valid URL."))]
    pub picture: Option<String>,
    /// Checked by the validation gateway: must name a live admin.
    pub creator_id: String,
    /// Checked by the validation gateway: non-empty, distinct, all live.
    pub actors: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateMovieRequest {
    #[validate(
        length(min = 1, max = 255, message = "The title field must not be empty."),
        custom(function = "validate_not_blank")
    )]
    pub title: Option<String>,
    #[validate(
        length(min = 1, max = 255, message = "The director field must not be empty."),
        custom(function = "validate_not_blank")
    )]
    pub director: Option<String>,
    #[validate(custom(function = "validate_date"))]
    pub release_date: Option<String>,
    #[validate(length(max = 5000, message = "The synopsis field is too long."))]
    pub synopsis: Option<String>,
    #[validate(url(message = "The picture field must be a valid URL."))]
    pub picture: Option<String>,
}

/// Body of the add/remove actor endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ActorSetRequest {
    pub actors: Vec<String>,
}

/// DTO for inserting a movie. Actors are passed separately to the
/// relationship store.
#[derive(Debug, Clone)]
pub struct CreateMovie {
    pub title: String,
    pub director: String,
    pub release_date: Date,
    pub synopsis: Option<String>,
    pub picture: Option<String>,
    pub creator_id: DbId,
}

impl CreateMovie {
    pub fn from_request(input: &CreateMovieRequest, creator_id: DbId) -> Result<Self, CoreError> {
        Ok(Self {
            title: input.title.trim().to_string(),
            director: input.director.trim().to_string(),
            release_date: checked(parse_date(&input.release_date), "releaseDate")?,
            synopsis: input.synopsis.clone(),
            picture: input.picture.clone(),
            creator_id,
        })
    }
}

/// DTO for updating a movie. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateMovie {
    pub title: Option<String>,
    pub director: Option<String>,
    pub release_date: Option<Date>,
    pub synopsis: Option<String>,
    pub picture: Option<String>,
}

impl UpdateMovie {
    pub fn from_request(input: &UpdateMovieRequest) -> Result<Self, CoreError> {
        let release_date = match &input.release_date {
            Some(raw) => Some(checked(parse_date(raw), "releaseDate")?),
            None => None,
        };
        Ok(Self {
            title: input.title.as_deref().map(|s| s.trim().to_string()),
            director: input.director.as_deref().map(|s| s.trim().to_string()),
            release_date,
            synopsis: input.synopsis.clone(),
            picture: input.picture.clone(),
        })
    }
}
