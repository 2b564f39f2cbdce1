//! Explicit schema registry.
//!
//! Schema is never materialized through a hidden module-level singleton: the
//! set of tables to create travels as a [`SchemaRegistry`] value that callers
//! hand to the initialization functions. The registry knows how to apply its
//! migrations on each compiled backend.

use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

#[cfg(feature = "mysql")]
use diesel::MysqlConnection;
#[cfg(feature = "postgres")]
use diesel::PgConnection;

use super::{AnyPool, Engine};
use crate::error::{Error, Result};

const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/sqlite");
#[cfg(feature = "postgres")]
const POSTGRES_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/postgres");
#[cfg(feature = "mysql")]
const MYSQL_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/mysql");

type Applier<C> = fn(&mut C) -> Result<()>;

/// A set of schema objects together with the knowledge of how to create
/// them on each backend.
#[derive(Debug, Clone, Copy)]
pub struct SchemaRegistry {
    sqlite: Applier<SqliteConnection>,
    #[cfg(feature = "postgres")]
    postgres: Applier<PgConnection>,
    #[cfg(feature = "mysql")]
    mysql: Applier<MysqlConnection>,
}

impl SchemaRegistry {
    /// The registry for the crate's own tables (`project_files`,
    /// `generic_files`).
    pub fn core() -> Self {
        Self {
            sqlite: apply_core_sqlite,
            #[cfg(feature = "postgres")]
            postgres: apply_core_postgres,
            #[cfg(feature = "mysql")]
            mysql: apply_core_mysql,
        }
    }

    /// Create all declared schema objects on the engine's backend, if not
    /// already present. Idempotent; failures propagate.
    pub fn create_all(&self, engine: &Engine) -> Result<()> {
        match engine.pool() {
            AnyPool::Sqlite(pool) => {
                let mut conn = pool.get().map_err(|e| Error::Pool(e.to_string()))?;
                (self.sqlite)(&mut conn)
            }
            #[cfg(feature = "postgres")]
            AnyPool::Postgres(pool) => {
                let mut conn = pool.get().map_err(|e| Error::Pool(e.to_string()))?;
                (self.postgres)(&mut conn)
            }
            #[cfg(feature = "mysql")]
            AnyPool::Mysql(pool) => {
                let mut conn = pool.get().map_err(|e| Error::Pool(e.to_string()))?;
                (self.mysql)(&mut conn)
            }
        }
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::core()
    }
}

fn apply_core_sqlite(conn: &mut SqliteConnection) -> Result<()> {
    conn.run_pending_migrations(SQLITE_MIGRATIONS)
        .map_err(|e| Error::Schema(e.to_string()))?;
    Ok(())
}

#[cfg(feature = "postgres")]
fn apply_core_postgres(conn: &mut PgConnection) -> Result<()> {
    conn.run_pending_migrations(POSTGRES_MIGRATIONS)
        .map_err(|e| Error::Schema(e.to_string()))?;
    Ok(())
}

#[cfg(feature = "mysql")]
fn apply_core_mysql(conn: &mut MysqlConnection) -> Result<()> {
    conn.run_pending_migrations(MYSQL_MIGRATIONS)
        .map_err(|e| Error::Schema(e.to_string()))?;
    Ok(())
}
