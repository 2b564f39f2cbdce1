//! Stateless database bootstrap helpers.
//!
//! The usual flow: pick a backend, call the matching `initialize_*` function
//! to get a [`ConnectionUrl`] (and, for the in-memory backend, the live
//! [`Engine`]), then open sessions with [`create_session`].

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use super::registry::SchemaRegistry;
use super::session::Session;
use super::url::{ConnectionUrl, NetworkUrl};
use super::Engine;
use crate::error::Result;

/// Delete a SQLite database file.
///
/// A missing file is reported as a diagnostic and treated as success; the
/// desired end state (no file at `path`) already holds. Other I/O errors
/// propagate.
pub fn delete_sqlite_database<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "no database at this location to delete");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Create all schema objects declared in `registry` on the database behind
/// `url`, if not already present. Returns the elapsed wall-clock time.
///
/// # Errors
/// Engine construction and schema creation failures propagate untranslated;
/// nothing is retried and no partial-schema cleanup is attempted.
pub fn initialize_database(url: &ConnectionUrl, registry: &SchemaRegistry) -> Result<Duration> {
    let engine = Engine::from_url(url)?;
    create_all_timed(&engine, registry)
}

/// Initialize an ephemeral in-memory SQLite database and create schema.
///
/// Returns the connection URL and the engine holding the store. Sessions
/// must be created from this engine; a session built from the URL alone
/// would see a fresh, empty database.
pub fn initialize_sqlite_memory(
    registry: &SchemaRegistry,
    report_timing: bool,
) -> Result<(ConnectionUrl, Engine)> {
    let url = ConnectionUrl::SqliteMemory;
    let engine = Engine::from_url(&url)?;
    let elapsed = create_all_timed(&engine, registry)?;
    report(&url, elapsed, report_timing);
    Ok((url, engine))
}

/// Initialize a file-backed SQLite database and create schema.
///
/// Returns the connection URL; sessions opened against it each build their
/// own engine.
pub fn initialize_sqlite_file<P: Into<PathBuf>>(
    path: P,
    registry: &SchemaRegistry,
    report_timing: bool,
) -> Result<ConnectionUrl> {
    initialize_with_url(ConnectionUrl::SqliteFile(path.into()), registry, report_timing)
}

/// Initialize a PostgreSQL database and create schema.
///
/// Requires the `postgres` cargo feature.
pub fn initialize_postgresql(
    params: NetworkUrl,
    registry: &SchemaRegistry,
    report_timing: bool,
) -> Result<ConnectionUrl> {
    initialize_with_url(ConnectionUrl::Postgresql(params), registry, report_timing)
}

/// Initialize a MySQL database and create schema.
///
/// Requires the `mysql` cargo feature.
pub fn initialize_mysql(
    params: NetworkUrl,
    registry: &SchemaRegistry,
    report_timing: bool,
) -> Result<ConnectionUrl> {
    initialize_with_url(ConnectionUrl::Mysql(params), registry, report_timing)
}

fn initialize_with_url(
    url: ConnectionUrl,
    registry: &SchemaRegistry,
    report_timing: bool,
) -> Result<ConnectionUrl> {
    let elapsed = initialize_database(&url, registry)?;
    report(&url, elapsed, report_timing);
    Ok(url)
}

fn create_all_timed(engine: &Engine, registry: &SchemaRegistry) -> Result<Duration> {
    let start = Instant::now();
    registry.create_all(engine)?;
    Ok(start.elapsed())
}

fn report(url: &ConnectionUrl, elapsed: Duration, report_timing: bool) {
    if report_timing {
        info!(
            backend = url.backend_name(),
            elapsed_secs = elapsed.as_secs_f64(),
            "schema created"
        );
    }
}

/// Open a session against `url`.
///
/// When `engine` is given the session shares its pool (required for the
/// in-memory backend); otherwise a fresh engine is built from the URL.
/// Every call yields an independent session.
pub fn create_session(url: &ConnectionUrl, engine: Option<&Engine>) -> Result<Session> {
    match engine {
        Some(engine) => Ok(Session::from_engine(engine)),
        None => {
            let engine = Engine::from_url(url)?;
            Ok(Session::from_engine(&engine))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deleting_a_missing_database_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.db");
        delete_sqlite_database(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn deleting_an_existing_database_removes_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.db");
        std::fs::write(&path, b"stub").unwrap();
        delete_sqlite_database(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn initialize_database_reports_elapsed_time() {
        let dir = tempfile::tempdir().unwrap();
        let url = ConnectionUrl::SqliteFile(dir.path().join("model.db"));
        let elapsed = initialize_database(&url, &SchemaRegistry::core()).unwrap();
        assert!(elapsed.as_secs() < 60);
    }
}
