//! SQLite persistence via Diesel.
//!
//! One [`Store`] wraps an r2d2 pool; repo impl blocks live in the
//! sibling modules, grouped by table family. Writes that cross a
//! logical boundary (an event with its bucket rows, a risk-check
//! bundle, a position close with its PnL credit) commit inside a
//! single transaction.

mod config_repo;
mod db;
mod forecast_repo;
mod market_repo;
mod models;
mod order_repo;
mod position_repo;
mod risk_repo;
mod run_repo;
pub mod schema;
mod signal_repo;
mod state_repo;

pub use db::{create_pool, run_migrations, DbPool, MIGRATIONS};
pub use models::*;

use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::SqliteConnection;

use crate::error::Result;

pub(crate) type PooledConn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Handle to the engine database.
#[derive(Clone)]
pub struct Store {
    pool: DbPool,
}

impl Store {
    /// Open (or create) the database at `database_url` and run any
    /// pending migrations.
    pub fn open(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url)?;
        run_migrations(&pool)?;
        Ok(Self { pool })
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    pub(crate) fn conn(&self) -> Result<PooledConn> {
        let mut conn = self.pool.get()?;
        db::configure_connection(&mut conn)?;
        Ok(conn)
    }

    /// The underlying pool, for callers that manage their own
    /// connections.
    #[must_use]
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}
