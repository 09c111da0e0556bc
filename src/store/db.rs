//! Database connection management.
//!
//! Opens SQLite in WAL mode with a busy timeout, and embeds the
//! migration set so every start (and every test) runs the schema
//! forward idempotently.

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::error::{Error, Result};

/// Embedded database migrations compiled from the migrations/ directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Type alias for a SQLite connection pool.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Create a connection pool for the given database URL.
///
/// An `:memory:` database gets a single-connection pool; every pooled
/// connection would otherwise open its own empty database.
pub fn create_pool(database_url: &str) -> Result<DbPool> {
    let max_size = if database_url.contains(":memory:") { 1 } else { 5 };
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| Error::Connection(e.to_string()))
}

/// Run all pending database migrations.
pub fn run_migrations(pool: &DbPool) -> Result<()> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::Connection(e.to_string()))?;
    Ok(())
}

/// Per-connection pragmas: WAL journal, foreign keys, busy timeout.
pub(crate) fn configure_connection(conn: &mut SqliteConnection) -> Result<()> {
    for pragma in [
        "PRAGMA journal_mode=WAL",
        "PRAGMA foreign_keys=ON",
        "PRAGMA busy_timeout=5000",
    ] {
        diesel::sql_query(pragma)
            .execute(conn)
            .map_err(|e| Error::Database(e.to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_pool_with_memory_db() {
        assert!(create_pool(":memory:").is_ok());
    }

    #[test]
    fn run_migrations_creates_tables() {
        let pool = create_pool(":memory:").unwrap();
        run_migrations(&pool).unwrap();

        let mut conn = pool.get().unwrap();
        let tables: Vec<String> = diesel::sql_query(
            "SELECT name FROM sqlite_master WHERE type='table' \
             AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '__diesel%' ORDER BY name",
        )
        .load::<TableName>(&mut conn)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();

        for expected in [
            "market_events",
            "bucket_markets",
            "forecast_snapshots",
            "edge_results",
            "risk_checks",
            "order_intents",
            "order_results",
            "positions",
            "daily_pnl",
            "config_snapshots",
            "system_state",
            "operator_commands",
            "runs",
        ] {
            assert!(tables.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[derive(diesel::QueryableByName)]
    struct TableName {
        #[diesel(sql_type = diesel::sql_types::Text)]
        name: String,
    }

    #[test]
    fn run_migrations_is_idempotent() {
        let pool = create_pool(":memory:").unwrap();
        run_migrations(&pool).unwrap();
        run_migrations(&pool).unwrap();
        run_migrations(&pool).unwrap();

        let mut conn = pool.get().unwrap();
        let count: Vec<TableCount> = diesel::sql_query(
            "SELECT COUNT(*) as count FROM sqlite_master WHERE type='table' AND name='runs'",
        )
        .load(&mut conn)
        .unwrap();
        assert_eq!(count[0].count, 1);
    }

    #[derive(diesel::QueryableByName)]
    struct TableCount {
        #[diesel(sql_type = diesel::sql_types::BigInt)]
        count: i64,
    }

    #[test]
    fn default_system_state_is_seeded() {
        let pool = create_pool(":memory:").unwrap();
        run_migrations(&pool).unwrap();

        let mut conn = pool.get().unwrap();
        let rows: Vec<TableCount> = diesel::sql_query(
            "SELECT COUNT(*) as count FROM system_state WHERE key IN ('mode', 'paused', 'kill_switch')",
        )
        .load(&mut conn)
        .unwrap();
        assert_eq!(rows[0].count, 3);
    }
}
