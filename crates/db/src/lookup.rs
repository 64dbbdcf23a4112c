//! Pool-backed [`ExistenceLookup`] implementations.
//!
//! Each lookup checks out its own connection from the pool, so a resolver
//! fan-out never shares a connection or transaction between futures.

use async_trait::async_trait;
use cinegrade_core::error::CoreError;
use cinegrade_core::resolver::{ExistenceLookup, Lookup};
use cinegrade_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::actor::Actor;
use crate::models::user::User;
use crate::repositories::{ActorRepo, UserRepo};

fn classify<T>(
    row: Result<Option<T>, sqlx::Error>,
    deleted_at: impl Fn(&T) -> Option<Timestamp>,
) -> Result<Lookup<T>, CoreError> {
    match row {
        Ok(Some(r)) if deleted_at(&r).is_none() => Ok(Lookup::Live(r)),
        Ok(Some(_)) => Ok(Lookup::Tombstoned),
        Ok(None) => Ok(Lookup::Missing),
        Err(e) => Err(CoreError::Internal(e.to_string())),
    }
}

#[derive(Clone)]
pub struct PgActorLookup {
    pool: PgPool,
}

impl PgActorLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExistenceLookup for PgActorLookup {
    type Record = Actor;
    const ENTITY: &'static str = "Actor";

    async fn lookup(&self, id: DbId) -> Result<Lookup<Actor>, CoreError> {
        classify(
            ActorRepo::find_by_id_include_deleted(&self.pool, id).await,
            |a| a.deleted_at,
        )
    }
}

#[derive(Clone)]
pub struct PgUserLookup {
    pool: PgPool,
}

impl PgUserLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExistenceLookup for PgUserLookup {
    type Record = User;
    const ENTITY: &'static str = "User";

    async fn lookup(&self, id: DbId) -> Result<Lookup<User>, CoreError> {
        classify(
            UserRepo::find_by_id_include_deleted(&self.pool, id).await,
            |u| u.deleted_at,
        )
    }
}
