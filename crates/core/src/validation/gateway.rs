//! Relationship-aware request validation.
//!
//! The gateway runs the rules that need storage: "this id names a live
//! admin user" and "this id set is non-empty, duplicate-free and every
//! entry resolves to a live actor". Failures are recorded into the same
//! [`FieldErrors`] the structural rules use; only storage failures abort
//! early, as `Err(CoreError::Internal)`.

use crate::error::CoreError;
use crate::resolver::{self, ExistenceLookup, Lookup, Resolved};
use crate::roles::Privileged;
use crate::types::DbId;
use crate::validation::rules::{check_set_shape, parse_id};
use crate::validation::FieldErrors;

pub struct ValidationGateway<U, A> {
    users: U,
    actors: A,
    max_concurrent: usize,
}

impl<U, A> ValidationGateway<U, A>
where
    U: ExistenceLookup,
    U::Record: Privileged,
    A: ExistenceLookup,
{
    pub fn new(users: U, actors: A, max_concurrent: usize) -> Self {
        Self {
            users,
            actors,
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub fn actors(&self) -> &A {
        &self.actors
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// `raw` must parse and name a live user carrying the admin flag.
    ///
    /// Returns the parsed id when the rule passed, `None` when a failure was
    /// recorded under `field`.
    pub async fn check_admin(
        &self,
        field: &str,
        raw: &str,
        errors: &mut FieldErrors,
    ) -> Result<Option<DbId>, CoreError> {
        let Some(id) = parse_id(raw) else {
            errors.add(field, format!("The {field} field must be a valid identifier."));
            return Ok(None);
        };

        match self.users.lookup(id).await? {
            Lookup::Live(user) if user.is_admin() => Ok(Some(id)),
            Lookup::Live(_) => {
                tracing::warn!(user_id = %id, "non-admin user named as creator");
                errors.add(field, format!("The {field} field must reference an admin user."));
                Ok(None)
            }
            Lookup::Tombstoned | Lookup::Missing => {
                errors.add(field, format!("The {field} field must reference an existing user."));
                Ok(None)
            }
        }
    }

    /// `raw` must be non-empty, duplicate-free, and resolve entirely.
    ///
    /// On success the live actor records come back in input order.
    pub async fn check_actor_set(
        &self,
        field: &str,
        raw: &[String],
        errors: &mut FieldErrors,
    ) -> Result<Option<Vec<Resolved<A::Record>>>, CoreError> {
        if let Err(shape) = check_set_shape(raw) {
            errors.add(field, shape.message(field));
            return Ok(None);
        }

        match resolver::resolve_all(&self.actors, raw, self.max_concurrent).await {
            Ok(resolved) => Ok(Some(resolved)),
            Err(e) if e.is_storage_failure() => Err(e.into()),
            Err(e) => {
                e.record_into(field, errors);
                Ok(None)
            }
        }
    }
}

/// Take the value of a check once `errors.into_result()` has passed.
pub fn checked<T>(value: Option<T>, field: &str) -> Result<T, CoreError> {
    value.ok_or_else(|| CoreError::Internal(format!("{field} passed validation without a value")))
}
