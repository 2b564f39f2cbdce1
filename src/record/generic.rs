//! Generic file records: verbatim storage for model files the toolkit does
//! not otherwise understand.

use std::io::{Read, Write};

use diesel::prelude::*;

use super::{FileBacked, FileMeta};
use crate::db::schema::{generic_files, project_files};
use crate::error::{Error, Result};

/// A project file row: the parent every stored file may attach to.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = project_files)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProjectFileRecord {
    pub id: i32,
    pub name: String,
}

/// Insertable form of a project file row.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = project_files)]
pub struct NewProjectFileRecord {
    pub name: String,
}

impl NewProjectFileRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A database row holding the entire text of one file, unparsed.
///
/// Reading a file assigns its full contents to `text`; writing dumps `text`
/// back out with no transformation, so a record survives a round trip
/// byte-for-byte. The `binary` column exists in the schema but is not
/// touched by the read/write path.
#[derive(
    Queryable, Selectable, Identifiable, Insertable, Associations, Debug, Clone, PartialEq, Eq,
)]
#[diesel(table_name = generic_files)]
#[diesel(belongs_to(ProjectFileRecord, foreign_key = project_file_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GenericFileRecord {
    /// `None` until the row is persisted; the database assigns the id.
    pub id: Option<i32>,
    pub project_file_id: Option<i32>,
    pub text: Option<String>,
    pub binary: Option<Vec<u8>>,
    pub name: String,
    pub file_extension: String,
}

impl GenericFileRecord {
    /// An empty record carrying only its identity.
    pub fn new(meta: FileMeta) -> Self {
        Self {
            id: None,
            project_file_id: None,
            text: None,
            binary: None,
            name: meta.name,
            file_extension: meta.extension,
        }
    }

    /// Attach the record to a project file.
    pub fn with_project(mut self, project_id: i32) -> Self {
        self.project_file_id = Some(project_id);
        self
    }
}

impl FileBacked for GenericFileRecord {
    fn read_from<R: Read>(meta: FileMeta, mut input: R) -> Result<Self> {
        let mut text = String::new();
        input.read_to_string(&mut text)?;
        let mut record = Self::new(meta);
        record.text = Some(text);
        Ok(record)
    }

    fn write_to<W: Write>(&self, output: &mut W) -> Result<()> {
        let text = self.text.as_deref().ok_or_else(|| Error::MissingContent {
            name: self.name.clone(),
        })?;
        output.write_all(text.as_bytes())?;
        Ok(())
    }
}
