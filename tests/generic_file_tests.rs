//! Tests for generic file records: verbatim round trips through the
//! database and the project-file relationship.

use hydrodb::db::{create_session, initialize_sqlite_memory, SchemaRegistry, Session};
use hydrodb::record::{FileBacked, FileMeta, GenericFileRecord, NewProjectFileRecord};

fn memory_session() -> (Session, hydrodb::db::Engine) {
    let registry = SchemaRegistry::core();
    let (url, engine) = initialize_sqlite_memory(&registry, false).unwrap();
    let session = create_session(&url, Some(&engine)).unwrap();
    (session, engine)
}

#[test]
fn file_round_trips_byte_for_byte_through_the_database() {
    // Mixed line endings, trailing whitespace, unicode, no newline at EOF.
    let content = "GRIDSIZE 30.0\r\nROWS 144\nCOLS 112\n\n  # café näive \t \nEND";

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("grid.ele");
    std::fs::write(&input, content).unwrap();

    let (session, _engine) = memory_session();
    let record = GenericFileRecord::read_path(&input, FileMeta::from_path(&input)).unwrap();
    session.insert_generic_file(&record).unwrap();

    let stored = session.generic_file_by_name("grid").unwrap().unwrap();
    assert!(stored.id.is_some());
    assert_eq!(stored.file_extension, "ele");

    let output = dir.path().join("grid-out.ele");
    stored.write_path(&output).unwrap();
    assert_eq!(std::fs::read(&output).unwrap(), content.as_bytes());
}

#[test]
fn stored_identity_matches_the_values_passed_in() {
    let (session, _engine) = memory_session();
    let record =
        GenericFileRecord::read_from(FileMeta::new("channel", "cif"), "XSEC 1 2 3\n".as_bytes())
            .unwrap();
    session.insert_generic_file(&record).unwrap();

    let stored = session.generic_file_by_name("channel").unwrap().unwrap();
    assert_eq!(stored.name, "channel");
    assert_eq!(stored.file_extension, "cif");
    assert_eq!(stored.text.as_deref(), Some("XSEC 1 2 3\n"));
    assert!(stored.binary.is_none());
}

#[test]
fn project_file_exposes_its_generic_files() {
    let (session, _engine) = memory_session();
    session
        .insert_project_file(&NewProjectFileRecord::new("run1"))
        .unwrap();
    let project = session.project_file_by_name("run1").unwrap().unwrap();

    for name in ["precip", "hmet"] {
        let record = GenericFileRecord::read_from(
            FileMeta::new(name, "txt"),
            format!("{name} data\n").as_bytes(),
        )
        .unwrap()
        .with_project(project.id);
        session.insert_generic_file(&record).unwrap();
    }

    // An unattached record does not show up under the project.
    let loose =
        GenericFileRecord::read_from(FileMeta::new("loose", "txt"), "x\n".as_bytes()).unwrap();
    session.insert_generic_file(&loose).unwrap();

    let attached = session.generic_files_for(&project).unwrap();
    assert_eq!(attached.len(), 2);
    assert!(attached.iter().all(|r| r.project_file_id == Some(project.id)));
    assert_eq!(session.generic_files().unwrap().len(), 3);
}

#[test]
fn deleting_a_project_file_cascades_to_its_generic_files() {
    let (session, _engine) = memory_session();
    session
        .insert_project_file(&NewProjectFileRecord::new("doomed"))
        .unwrap();
    let project = session.project_file_by_name("doomed").unwrap().unwrap();

    let record = GenericFileRecord::read_from(FileMeta::new("child", "txt"), "data\n".as_bytes())
        .unwrap()
        .with_project(project.id);
    session.insert_generic_file(&record).unwrap();

    let deleted = session.delete_project_file(project.id).unwrap();
    assert_eq!(deleted, 1);
    assert!(session.project_files().unwrap().is_empty());
    assert!(session.generic_files().unwrap().is_empty());
}

#[test]
fn reading_a_missing_file_is_fatal() {
    let err =
        GenericFileRecord::read_path("/no/such/file.gag", FileMeta::new("file", "gag")).unwrap_err();
    assert!(matches!(err, hydrodb::Error::Io(_)));
}
