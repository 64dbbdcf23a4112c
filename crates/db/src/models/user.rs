//! User entity model and DTOs.

use cinegrade_core::error::CoreError;
use cinegrade_core::roles::Privileged;
use cinegrade_core::types::{Date, DbId, Timestamp};
use cinegrade_core::validation::gateway::checked;
use cinegrade_core::validation::rules::{
    parse_date, validate_date, validate_not_blank, validate_password,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::comment::Comment;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub surname: String,
    pub birthday: Option<Date>,
    pub is_admin: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl Privileged for User {
    fn is_admin(&self) -> bool {
        self.is_admin
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub surname: String,
    pub birthday: Option<Date>,
    pub is_admin: bool,
    /// `"admin"` or `"user"`, derived from `is_admin`.
    pub role: &'static str,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            surname: user.surname.clone(),
            birthday: user.birthday,
            is_admin: user.is_admin,
            role: user.role(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// A user together with their live comments, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct UserWithComments {
    #[serde(flatten)]
    pub user: UserResponse,
    pub comments: Vec<Comment>,
}

/// Registration body.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[validate(email(message = "The email field must be a valid email address."))]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
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
    pub birthday: Option<String>,
}

/// Partial update body. Only present fields change.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateUserRequest {
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
    #[validate(custom(function = "validate_password"))]
    pub password: Option<String>,
    #[validate(custom(function = "validate_date"))]
    pub birthday: Option<String>,
}

/// DTO for inserting a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub surname: String,
    pub birthday: Option<Date>,
    pub is_admin: bool,
}

impl CreateUser {
    /// Build from a registration body that already passed validation.
    pub fn from_request(
        input: &RegisterUserRequest,
        password_hash: String,
    ) -> Result<Self, CoreError> {
        let birthday = match &input.birthday {
            Some(raw) => Some(checked(parse_date(raw), "birthday")?),
            None => None,
        };
        Ok(Self {
            email: input.email.trim().to_lowercase(),
            password_hash,
            name: input.name.trim().to_string(),
            surname: input.surname.trim().to_string(),
            birthday,
            is_admin: false,
        })
    }
}

/// DTO for updating a user. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub password_hash: Option<String>,
    pub birthday: Option<Date>,
}
