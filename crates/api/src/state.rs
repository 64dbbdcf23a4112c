use std::sync::Arc;

use cinegrade_core::validation::gateway::ValidationGateway;
use cinegrade_db::lookup::{PgActorLookup, PgUserLookup};

use crate::config::ServerConfig;

/// The request validation gateway backed by the connection pool.
pub type Gateway = ValidationGateway<PgUserLookup, PgActorLookup>;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: cinegrade_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(pool: cinegrade_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }

    /// A validation gateway whose lookups each borrow their own pool connection.
    pub fn gateway(&self) -> Gateway {
        ValidationGateway::new(
            PgUserLookup::new(self.pool.clone()),
            PgActorLookup::new(self.pool.clone()),
            self.config.lookup_concurrency,
        )
    }
}
