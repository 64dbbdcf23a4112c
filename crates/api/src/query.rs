//! Shared query parameter types for API handlers.

use cinegrade_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use serde::Deserialize;

/// List parameters (`?limit=&offset=&deleted=&withActors=`).
///
/// `deleted=true` includes tombstoned rows. `withActors` only applies to
/// the movie list.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub deleted: bool,
    pub with_actors: bool,
}

impl ListParams {
    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        clamp_offset(self.offset)
    }
}
