use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hydrodb::db::{
    create_session, delete_sqlite_database, initialize_database, ConnectionUrl, SchemaRegistry,
};
use hydrodb::record::{FileBacked, FileMeta, GenericFileRecord, NewProjectFileRecord};

#[derive(Parser)]
#[command(
    name = "hydrodb",
    version,
    about = "Store model input files verbatim in a relational database"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a SQLite database file and its schema
    Init {
        /// Path of the database file to create
        path: PathBuf,
    },
    /// Delete a SQLite database file
    Drop {
        path: PathBuf,
    },
    /// Read a text file into the database verbatim
    Store {
        /// SQLite database file
        #[arg(long)]
        database: PathBuf,
        /// File to store
        file: PathBuf,
        /// Override the stored name (defaults to the file stem)
        #[arg(long)]
        name: Option<String>,
        /// Override the stored extension (defaults to the file's, or "txt")
        #[arg(long)]
        extension: Option<String>,
        /// Attach the record to this project file, creating it if needed
        #[arg(long)]
        project: Option<String>,
    },
    /// Write a stored file back out byte-for-byte
    Export {
        #[arg(long)]
        database: PathBuf,
        /// Stored name to look up
        name: String,
        /// Output path
        output: PathBuf,
    },
    /// List stored generic files
    Ls {
        #[arg(long)]
        database: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let registry = SchemaRegistry::core();

    match cli.command {
        Command::Init { path } => {
            let url = ConnectionUrl::SqliteFile(path);
            let elapsed = initialize_database(&url, &registry)?;
            println!("initialized {url} in {elapsed:?}");
        }
        Command::Drop { path } => {
            delete_sqlite_database(path)?;
        }
        Command::Store {
            database,
            file,
            name,
            extension,
            project,
        } => {
            let url = ConnectionUrl::SqliteFile(database);
            let session = create_session(&url, None)?;

            let default_meta = FileMeta::from_path(&file);
            let meta = FileMeta::new(
                name.unwrap_or(default_meta.name),
                extension.unwrap_or(default_meta.extension),
            );
            let mut record = GenericFileRecord::read_path(&file, meta)
                .with_context(|| format!("failed to read {}", file.display()))?;

            if let Some(project_name) = project {
                let existing = session.project_file_by_name(&project_name)?;
                let parent = match existing {
                    Some(parent) => parent,
                    None => {
                        session
                            .insert_project_file(&NewProjectFileRecord::new(project_name.as_str()))?;
                        session
                            .project_file_by_name(&project_name)?
                            .context("project file missing after insert")?
                    }
                };
                record.project_file_id = Some(parent.id);
            }

            session.insert_generic_file(&record)?;
            let bytes = record.text.as_deref().map_or(0, str::len);
            println!("stored '{}' ({bytes} bytes)", record.name);
        }
        Command::Export {
            database,
            name,
            output,
        } => {
            let url = ConnectionUrl::SqliteFile(database);
            let session = create_session(&url, None)?;
            let record = session
                .generic_file_by_name(&name)?
                .with_context(|| format!("no stored file named '{name}'"))?;
            record.write_path(&output)?;
            println!("wrote {}", output.display());
        }
        Command::Ls { database } => {
            let url = ConnectionUrl::SqliteFile(database);
            let session = create_session(&url, None)?;
            for record in session.generic_files()? {
                let id = record.id.map_or_else(|| "-".to_string(), |id| id.to_string());
                match record.project_file_id {
                    Some(project_id) => println!(
                        "{id}\t{}.{}\tproject {project_id}",
                        record.name, record.file_extension
                    ),
                    None => println!("{id}\t{}.{}", record.name, record.file_extension),
                }
            }
        }
    }

    Ok(())
}
