//! Concurrent existence resolution for identifier sets.
//!
//! Every identifier gets its own lookup, run on a bounded stream of
//! futures. All lookups finish before a verdict is reached: failures are
//! aggregated, never short-circuited, and successes come back in the
//! caller's input order regardless of completion order.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use futures::FutureExt;

use crate::error::CoreError;
use crate::types::DbId;
use crate::validation::rules::parse_id;
use crate::validation::FieldErrors;

/// Outcome of a single existence lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<R> {
    Live(R),
    Tombstoned,
    Missing,
}

/// Point lookup of one entity by id, including tombstoned rows.
///
/// Implementations must be cheap to share across concurrent futures; the
/// PostgreSQL ones hold a pool handle so each lookup checks out its own
/// connection.
#[async_trait]
pub trait ExistenceLookup: Send + Sync {
    type Record: Send;

    /// Entity name used in error reports.
    const ENTITY: &'static str;

    async fn lookup(&self, id: DbId) -> Result<Lookup<Self::Record>, CoreError>;
}

/// A live record together with its position in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<R> {
    pub index: usize,
    pub id: DbId,
    pub record: R,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolveFailure {
    Malformed { index: usize, raw: String },
    NotFound { index: usize, id: DbId },
    Tombstoned { index: usize, id: DbId },
    /// The lookup itself failed (storage unreachable, query error).
    Unavailable { index: usize, id: DbId, reason: String },
}

impl ResolveFailure {
    pub fn index(&self) -> usize {
        match self {
            ResolveFailure::Malformed { index, .. }
            | ResolveFailure::NotFound { index, .. }
            | ResolveFailure::Tombstoned { index, .. }
            | ResolveFailure::Unavailable { index, .. } => *index,
        }
    }

    pub fn id(&self) -> Option<DbId> {
        match self {
            ResolveFailure::Malformed { .. } => None,
            ResolveFailure::NotFound { id, .. }
            | ResolveFailure::Tombstoned { id, .. }
            | ResolveFailure::Unavailable { id, .. } => Some(*id),
        }
    }

    fn message(&self, field: &str, entity: &str) -> String {
        match self {
            ResolveFailure::Malformed { index, raw } => {
                format!("The {field} entry {index} ({raw:?}) is not a valid identifier.")
            }
            ResolveFailure::NotFound { index, id } => {
                format!("The {field} entry {index} references {entity} {id}, which does not exist.")
            }
            ResolveFailure::Tombstoned { index, id } => {
                format!("The {field} entry {index} references {entity} {id}, which has been deleted.")
            }
            ResolveFailure::Unavailable { index, id, .. } => {
                format!("The {field} entry {index} ({entity} {id}) could not be checked.")
            }
        }
    }
}

/// Every failure from one resolution, ordered by input index.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveError {
    pub entity: &'static str,
    pub failures: Vec<ResolveFailure>,
}

impl ResolveError {
    /// True when at least one lookup failed for reasons other than the data.
    pub fn is_storage_failure(&self) -> bool {
        self.failures
            .iter()
            .any(|f| matches!(f, ResolveFailure::Unavailable { .. }))
    }

    /// Ids that parsed but are missing or tombstoned.
    pub fn missing_ids(&self) -> Vec<DbId> {
        self.failures
            .iter()
            .filter(|f| {
                matches!(
                    f,
                    ResolveFailure::NotFound { .. } | ResolveFailure::Tombstoned { .. }
                )
            })
            .filter_map(ResolveFailure::id)
            .collect()
    }

    /// Report every failure under `field`.
    pub fn record_into(&self, field: &str, errors: &mut FieldErrors) {
        for failure in &self.failures {
            errors.add(field, failure.message(field, self.entity));
        }
    }
}

impl From<ResolveError> for CoreError {
    fn from(err: ResolveError) -> Self {
        if let Some(ResolveFailure::Unavailable { reason, .. }) = err
            .failures
            .iter()
            .find(|f| matches!(f, ResolveFailure::Unavailable { .. }))
        {
            return CoreError::Internal(format!("{} lookup failed: {reason}", err.entity));
        }
        let ids = err.missing_ids();
        if ids.is_empty() {
            let mut errors = FieldErrors::new();
            err.record_into("ids", &mut errors);
            return CoreError::Validation(errors);
        }
        CoreError::MissingReferences {
            entity: err.entity,
            ids,
        }
    }
}

async fn lookup_one<L: ExistenceLookup>(
    lookup: &L,
    index: usize,
    id: DbId,
) -> Result<Resolved<L::Record>, ResolveFailure> {
    match lookup.lookup(id).await {
        Ok(Lookup::Live(record)) => Ok(Resolved { index, id, record }),
        Ok(Lookup::Tombstoned) => Err(ResolveFailure::Tombstoned { index, id }),
        Ok(Lookup::Missing) => Err(ResolveFailure::NotFound { index, id }),
        Err(e) => Err(ResolveFailure::Unavailable {
            index,
            id,
            reason: e.to_string(),
        }),
    }
}

fn settle<R>(
    entity: &'static str,
    outcomes: Vec<Result<Resolved<R>, ResolveFailure>>,
) -> Result<Vec<Resolved<R>>, ResolveError> {
    let mut resolved = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(r) => resolved.push(r),
            Err(f) => failures.push(f),
        }
    }

    if failures.is_empty() {
        resolved.sort_by_key(|r| r.index);
        Ok(resolved)
    } else {
        failures.sort_by_key(ResolveFailure::index);
        tracing::debug!(entity, failed = failures.len(), "existence resolution failed");
        Err(ResolveError { entity, failures })
    }
}

/// Resolve raw identifier strings; unparseable entries fail as `Malformed`
/// without issuing a lookup.
pub async fn resolve_all<L: ExistenceLookup>(
    lookup: &L,
    raw: &[String],
    max_concurrent: usize,
) -> Result<Vec<Resolved<L::Record>>, ResolveError> {
    tracing::debug!(entity = L::ENTITY, count = raw.len(), max_concurrent, "resolving identifiers");

    let outcomes: Vec<_> = stream::iter(raw.iter().enumerate())
        .map(|(index, value)| async move {
            match parse_id(value) {
                Some(id) => lookup_one(lookup, index, id).await,
                None => Err(ResolveFailure::Malformed {
                    index,
                    raw: value.clone(),
                }),
            }
        })
        .buffer_unordered(max_concurrent.max(1))
        .collect::<Vec<_>>()
        .boxed()
        .await;

    settle(L::ENTITY, outcomes)
}

/// Resolve already-parsed identifiers.
pub async fn resolve_ids<L: ExistenceLookup>(
    lookup: &L,
    ids: &[DbId],
    max_concurrent: usize,
) -> Result<Vec<Resolved<L::Record>>, ResolveError> {
    let outcomes: Vec<_> = stream::iter(ids.iter().copied().enumerate())
        .map(|(index, id)| lookup_one(lookup, index, id))
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;

    settle(L::ENTITY, outcomes)
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    /// In-memory lookup whose answers arrive after a per-id delay.
    #[derive(Default)]
    pub struct FakeLookup {
        pub rows: HashMap<DbId, (bool, String)>,
        pub delays: HashMap<DbId, Duration>,
        pub broken: Vec<DbId>,
        pub calls: AtomicUsize,
    }

    impl FakeLookup {
        pub fn live(mut self, id: DbId, name: &str) -> Self {
            self.rows.insert(id, (true, name.to_string()));
            self
        }

        pub fn tombstoned(mut self, id: DbId) -> Self {
            self.rows.insert(id, (false, String::new()));
            self
        }

        pub fn delayed(mut self, id: DbId, millis: u64) -> Self {
            self.delays.insert(id, Duration::from_millis(millis));
            self
        }

        pub fn broken(mut self, id: DbId) -> Self {
            self.broken.push(id);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ExistenceLookup for FakeLookup {
        type Record = String;
        const ENTITY: &'static str = "Actor";

        async fn lookup(&self, id: DbId) -> Result<Lookup<String>, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(&id) {
                tokio::time::sleep(*delay).await;
            }
            if self.broken.contains(&id) {
                return Err(CoreError::Internal("connection reset".into()));
            }
            Ok(match self.rows.get(&id) {
                Some((true, name)) => Lookup::Live(name.clone()),
                Some((false, _)) => Lookup::Tombstoned,
                None => Lookup::Missing,
            })
        }
    }
}
