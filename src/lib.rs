//! hydrodb - verbatim persistence for hydrologic model files.
//!
//! This crate stores model input/output files that have no dedicated parser
//! as opaque rows in a relational database, and provides bootstrap helpers
//! for the supported backends: SQLite (file or in-memory) out of the box,
//! PostgreSQL and MySQL behind the `postgres` and `mysql` cargo features.
//!
//! # Modules
//!
//! - [`db`] - Connection URLs, engines, schema registry, bootstrap helpers
//!   and sessions
//! - [`record`] - The `FileBacked` capability and the generic file record
//! - [`config`] - Backend selection from TOML files or `DATABASE_URL`
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use hydrodb::db::{create_session, initialize_sqlite_memory, SchemaRegistry};
//! use hydrodb::record::{FileBacked, FileMeta, GenericFileRecord};
//!
//! # fn main() -> hydrodb::Result<()> {
//! let registry = SchemaRegistry::core();
//! let (url, engine) = initialize_sqlite_memory(&registry, false)?;
//! let session = create_session(&url, Some(&engine))?;
//!
//! let record = GenericFileRecord::read_path("precip.gag", FileMeta::new("precip", "gag"))?;
//! session.insert_generic_file(&record)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod record;

pub use error::{Error, Result};
