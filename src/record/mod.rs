//! File-backed record types.
//!
//! Entities that persist a file implement [`FileBacked`]: reading slurps the
//! raw input into the record, writing emits it again verbatim. There is no
//! shared mutable base object; each entity implements the capability for
//! itself.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::Result;

pub mod generic;

pub use generic::{GenericFileRecord, NewProjectFileRecord, ProjectFileRecord};

/// Extension used when a file has none.
pub const DEFAULT_EXTENSION: &str = "txt";

/// Identity of a stored file: the name and extension columns, independent of
/// the file's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    pub extension: String,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
        }
    }

    /// Derive name and extension from a path. A path without an extension
    /// falls back to [`DEFAULT_EXTENSION`].
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_stem()
            .unwrap_or_else(|| path.as_os_str())
            .to_string_lossy()
            .into_owned();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
        Self { name, extension }
    }
}

/// Round-trip a record through raw file content.
///
/// Implementations must preserve content byte-for-byte: whatever
/// `read_from` consumed, `write_to` emits unchanged.
pub trait FileBacked: Sized {
    /// Build a record from raw input, recording `meta` as its identity.
    fn read_from<R: Read>(meta: FileMeta, input: R) -> Result<Self>;

    /// Emit the record's content verbatim.
    fn write_to<W: Write>(&self, output: &mut W) -> Result<()>;

    /// Read an existing file on disk. Fails if the file is missing or
    /// unreadable; the whole file is read in one pass.
    fn read_path<P: AsRef<Path>>(path: P, meta: FileMeta) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::read_from(meta, BufReader::new(file))
    }

    /// Write the record's content to a file, creating or truncating it.
    fn write_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
