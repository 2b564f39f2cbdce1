//! Database layer: connection URLs, engines, schema creation and sessions,
//! built on Diesel with r2d2 pooling.

pub mod bootstrap;
pub mod registry;
pub mod schema;
pub mod session;
pub mod url;

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::SqliteConnection;

#[cfg(feature = "mysql")]
use diesel::MysqlConnection;
#[cfg(feature = "postgres")]
use diesel::PgConnection;

use crate::error::{Error, Result};

pub use bootstrap::{
    create_session, delete_sqlite_database, initialize_database, initialize_mysql,
    initialize_postgresql, initialize_sqlite_file, initialize_sqlite_memory,
};
pub use registry::SchemaRegistry;
pub use session::Session;
pub use url::{ConnectionUrl, NetworkUrl};

/// Connection pool type aliases.
pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;
#[cfg(feature = "postgres")]
pub type PgPool = Pool<ConnectionManager<PgConnection>>;
#[cfg(feature = "mysql")]
pub type MysqlPool = Pool<ConnectionManager<MysqlConnection>>;

const POOL_SIZE: u32 = 5;

/// A pool over whichever backend the connection URL selected.
#[derive(Clone)]
pub enum AnyPool {
    Sqlite(SqlitePool),
    #[cfg(feature = "postgres")]
    Postgres(PgPool),
    #[cfg(feature = "mysql")]
    Mysql(MysqlPool),
}

/// A connection pool bound to one database.
///
/// For the in-memory SQLite backend the engine owns the single live
/// connection that IS the store: every session must reuse the engine, and
/// dropping the engine (and all sessions cloned from it) discards the data.
pub struct Engine {
    url: ConnectionUrl,
    pool: AnyPool,
}

impl Engine {
    /// Build an engine for the given connection URL.
    ///
    /// # Errors
    /// Fails if the pool cannot be created (bad path, unreachable host) or
    /// if the URL selects a backend whose cargo feature is not enabled.
    pub fn from_url(url: &ConnectionUrl) -> Result<Self> {
        let pool = match url {
            ConnectionUrl::SqliteMemory => {
                let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
                // Exactly one connection, established eagerly and never
                // recycled: recycling would silently replace the store with
                // a fresh empty database.
                let pool = Pool::builder()
                    .max_size(1)
                    .min_idle(Some(1))
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connection_customizer(Box::new(SqlitePragmas))
                    .build(manager)
                    .map_err(|e| Error::Pool(e.to_string()))?;
                AnyPool::Sqlite(pool)
            }
            ConnectionUrl::SqliteFile(path) => {
                let manager =
                    ConnectionManager::<SqliteConnection>::new(path.to_string_lossy());
                let pool = Pool::builder()
                    .max_size(POOL_SIZE)
                    .connection_customizer(Box::new(SqlitePragmas))
                    .build(manager)
                    .map_err(|e| Error::Pool(e.to_string()))?;
                AnyPool::Sqlite(pool)
            }
            ConnectionUrl::Postgresql(_) => {
                #[cfg(feature = "postgres")]
                {
                    let manager = ConnectionManager::<PgConnection>::new(url.to_string());
                    let pool = Pool::builder()
                        .max_size(POOL_SIZE)
                        .build(manager)
                        .map_err(|e| Error::Pool(e.to_string()))?;
                    AnyPool::Postgres(pool)
                }
                #[cfg(not(feature = "postgres"))]
                {
                    return Err(Error::BackendDisabled {
                        backend: "postgresql",
                        feature: "postgres",
                    });
                }
            }
            ConnectionUrl::Mysql(_) => {
                #[cfg(feature = "mysql")]
                {
                    let manager = ConnectionManager::<MysqlConnection>::new(url.to_string());
                    let pool = Pool::builder()
                        .max_size(POOL_SIZE)
                        .build(manager)
                        .map_err(|e| Error::Pool(e.to_string()))?;
                    AnyPool::Mysql(pool)
                }
                #[cfg(not(feature = "mysql"))]
                {
                    return Err(Error::BackendDisabled {
                        backend: "mysql",
                        feature: "mysql",
                    });
                }
            }
        };

        Ok(Self {
            url: url.clone(),
            pool,
        })
    }

    pub fn url(&self) -> &ConnectionUrl {
        &self.url
    }

    pub(crate) fn pool(&self) -> &AnyPool {
        &self.pool
    }
}

/// Per-connection SQLite pragmas: enforce foreign keys (cascading deletes
/// depend on it) and wait out short-lived writer locks.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(
        &self,
        conn: &mut SqliteConnection,
    ) -> std::result::Result<(), diesel::r2d2::Error> {
        for pragma in ["PRAGMA foreign_keys = ON", "PRAGMA busy_timeout = 5000"] {
            diesel::sql_query(pragma)
                .execute(conn)
                .map_err(diesel::r2d2::Error::QueryError)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_for_memory_url() {
        let engine = Engine::from_url(&ConnectionUrl::SqliteMemory).unwrap();
        assert_eq!(engine.url(), &ConnectionUrl::SqliteMemory);
    }

    #[cfg(not(feature = "postgres"))]
    #[test]
    fn disabled_backend_is_a_typed_error() {
        let url = ConnectionUrl::Postgresql(NetworkUrl::new("u", "h", "d"));
        let err = match Engine::from_url(&url) {
            Ok(_) => panic!("expected a backend-disabled error"),
            Err(e) => e,
        };
        assert!(matches!(
            err,
            Error::BackendDisabled {
                backend: "postgresql",
                ..
            }
        ));
    }
}
