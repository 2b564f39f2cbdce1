//! Unit-of-work handle bound to one engine.

use diesel::prelude::*;

use super::schema::{generic_files, project_files};
use super::{AnyPool, Engine};
use crate::error::{Error, Result};
use crate::record::generic::{GenericFileRecord, NewProjectFileRecord, ProjectFileRecord};

/// Run `$body` with a pooled connection from whichever backend the session
/// is bound to. The query code is backend-generic; only the checkout is not.
macro_rules! with_conn {
    ($self:expr, $conn:ident => $body:expr) => {
        match &$self.pool {
            AnyPool::Sqlite(pool) => {
                let mut $conn = pool.get().map_err(|e| Error::Pool(e.to_string()))?;
                $body
            }
            #[cfg(feature = "postgres")]
            AnyPool::Postgres(pool) => {
                let mut $conn = pool.get().map_err(|e| Error::Pool(e.to_string()))?;
                $body
            }
            #[cfg(feature = "mysql")]
            AnyPool::Mysql(pool) => {
                let mut $conn = pool.get().map_err(|e| Error::Pool(e.to_string()))?;
                $body
            }
        }
    };
}

/// A session for querying and persisting file records.
///
/// Sessions share the pool of the engine they were created from, so sessions
/// cloned off the same in-memory engine observe the same store. No
/// transaction management beyond Diesel's per-statement behavior.
pub struct Session {
    pool: AnyPool,
}

impl Session {
    pub(crate) fn from_engine(engine: &Engine) -> Self {
        Self {
            pool: engine.pool().clone(),
        }
    }

    /// Cheap connectivity check.
    pub fn ping(&self) -> Result<()> {
        with_conn!(self, conn => {
            diesel::sql_query("SELECT 1").execute(&mut conn)?;
            Ok(())
        })
    }

    pub fn insert_project_file(&self, record: &NewProjectFileRecord) -> Result<usize> {
        with_conn!(self, conn => {
            Ok(diesel::insert_into(project_files::table)
                .values(record)
                .execute(&mut conn)?)
        })
    }

    pub fn project_files(&self) -> Result<Vec<ProjectFileRecord>> {
        with_conn!(self, conn => {
            Ok(project_files::table
                .select(ProjectFileRecord::as_select())
                .order(project_files::id.asc())
                .load(&mut conn)?)
        })
    }

    pub fn project_file_by_name(&self, name: &str) -> Result<Option<ProjectFileRecord>> {
        with_conn!(self, conn => {
            Ok(project_files::table
                .filter(project_files::name.eq(name))
                .select(ProjectFileRecord::as_select())
                .first(&mut conn)
                .optional()?)
        })
    }

    /// Delete a project file. Its generic files go with it (`ON DELETE
    /// CASCADE`).
    pub fn delete_project_file(&self, id: i32) -> Result<usize> {
        with_conn!(self, conn => {
            Ok(diesel::delete(project_files::table.find(id)).execute(&mut conn)?)
        })
    }

    pub fn insert_generic_file(&self, record: &GenericFileRecord) -> Result<usize> {
        with_conn!(self, conn => {
            Ok(diesel::insert_into(generic_files::table)
                .values(record)
                .execute(&mut conn)?)
        })
    }

    pub fn generic_files(&self) -> Result<Vec<GenericFileRecord>> {
        with_conn!(self, conn => {
            Ok(generic_files::table
                .select(GenericFileRecord::as_select())
                .order(generic_files::id.asc())
                .load(&mut conn)?)
        })
    }

    /// The generic files attached to one project file.
    pub fn generic_files_for(&self, project: &ProjectFileRecord) -> Result<Vec<GenericFileRecord>> {
        with_conn!(self, conn => {
            Ok(GenericFileRecord::belonging_to(project)
                .select(GenericFileRecord::as_select())
                .order(generic_files::id.asc())
                .load(&mut conn)?)
        })
    }

    pub fn generic_file_by_name(&self, name: &str) -> Result<Option<GenericFileRecord>> {
        with_conn!(self, conn => {
            Ok(generic_files::table
                .filter(generic_files::name.eq(name))
                .select(GenericFileRecord::as_select())
                .first(&mut conn)
                .optional()?)
        })
    }
}
