//! Actor entity model and DTOs.

use cinegrade_core::error::CoreError;
use cinegrade_core::types::{Date, DbId, Timestamp};
use cinegrade_core::validation::gateway::checked;
use cinegrade_core::validation::rules::{parse_date, validate_date, validate_not_blank};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::movie::Movie;

/// An actor row from the `actors` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: DbId,
    pub name: String,
    pub surname: String,
    pub birthday: Date,
    pub picture: Option<String>,
    pub creator_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// An actor with the live movies they are linked to.
#[derive(Debug, Clone, Serialize)]
pub struct ActorWithMovies {
    #[serde(flatten)]
    pub actor: Actor,
    pub movies: Vec<Movie>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateActorRequest {
    #[validate(
        length(min = 1, max = 100, message = "The name field is required."),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(
        length(min = 1, max = 100, message = "The surname field is required."),
        custom(function = "validate_not_blank")
    )]
    pub surname: String,
    #[validate(custom(function = "validate_date"))]
    pub birthday: String,
    #[validate(url(message = "The picture field must be a valid URL."))]
    pub picture: Option<String>,
    /// Checked by the validation gateway: must name a live admin.
    pub creator_id: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateActorRequest {
    #[validate(
        length(min = 1, max = 100, message = "The name field must not be empty."),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    #[validate(
        length(min = 1, max = 100, message = "The surname field must not be empty."),
        custom(function = "validate_not_blank")
    )]
    pub surname: Option<String>,
    #[validate(custom(function = "validate_date"))]
    pub birthday: Option<String>,
    #[validate(url(message = "The picture field must be a valid URL."))]
    pub picture: Option<String>,
}

/// DTO for inserting an actor.
#[derive(Debug, Clone)]
pub struct CreateActor {
    pub name: String,
    pub surname: String,
    pub birthday: Date,
    pub picture: Option<String>,
    pub creator_id: DbId,
}

impl CreateActor {
    pub fn from_request(input: &CreateActorRequest, creator_id: DbId) -> Result<Self, CoreError> {
        Ok(Self {
            name: input.name.trim().to_string(),
            surname: input.surname.trim().to_string(),
            birthday: checked(parse_date(&input.birthday), "birthday")?,
            picture: input.picture.clone(),
            creator_id,
        })
    }
}

/// DTO for updating an actor. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateActor {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub birthday: Option<Date>,
    pub picture: Option<String>,
}

impl UpdateActor {
    pub fn from_request(input: &UpdateActorRequest) -> Result<Self, CoreError> {
        let birthday = match &input.birthday {
            Some(raw) => Some(checked(parse_date(raw), "birthday")?),
            None => None,
        };
        Ok(Self {
            name: input.name.as_deref().map(|s| s.trim().to_string()),
            surname: input.surname.as_deref().map(|s| s.trim().to_string()),
            birthday,
            picture: input.picture.clone(),
        })
    }
}
