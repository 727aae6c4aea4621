//! Store contract tests.
//!
//! Every local backend must behave the same way for the operations the
//! service relies on. Each test runs against the memory, file and `SQLite`
//! stores; the HTTP store has its own suite in `http_store.rs` because its
//! server assigns IDs on create.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::{TimeZone, Utc};
use tempfile::TempDir;
use test_case::test_case;
use tiir::models::timestamps;
use tiir::{
    Direction, Error, FileStore, MemoryStore, SqliteStore, StoreTimeouts, Text, TextId, TextStore,
};

#[derive(Debug, Clone, Copy)]
enum Backend {
    Memory,
    File,
    Sqlite,
}

/// A store plus the directory that must outlive it.
struct Fixture {
    store: Box<dyn TextStore>,
    _dir: Option<TempDir>,
}

fn open(backend: Backend) -> Fixture {
    match backend {
        Backend::Memory => Fixture {
            store: Box::new(MemoryStore::new()),
            _dir: None,
        },
        Backend::File => {
            let dir = TempDir::new().unwrap();
            let store = FileStore::open(dir.path().join("tir.json")).unwrap();
            Fixture {
                store: Box::new(store),
                _dir: Some(dir),
            }
        },
        Backend::Sqlite => {
            let dir = TempDir::new().unwrap();
            let store = SqliteStore::open(dir.path().join("tir.db"), StoreTimeouts::default())
                .unwrap();
            Fixture {
                store: Box::new(store),
                _dir: Some(dir),
            }
        },
    }
}

fn text(id: &str, hour: u32) -> Text {
    Text {
        title: format!("title {id}"),
        url: format!("https://example.com/{id}"),
        author: "A".to_string(),
        note: "n".to_string(),
        id: TextId::new(id),
        timestamp: Some(Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()),
        public: false,
    }
}

fn ids(texts: &[Text]) -> Vec<&str> {
    texts.iter().map(|t| t.id.as_str()).collect()
}

#[test_case(Backend::Memory; "memory")]
#[test_case(Backend::File; "file")]
#[test_case(Backend::Sqlite; "sqlite")]
fn test_read_missing_is_not_found(backend: Backend) {
    let fixture = open(backend);
    let err = fixture.store.read(&TextId::new("missing0")).unwrap_err();
    assert!(matches!(err, Error::NotFound(ref id) if id.as_str() == "missing0"));
}

#[test_case(Backend::Memory; "memory")]
#[test_case(Backend::File; "file")]
#[test_case(Backend::Sqlite; "sqlite")]
fn test_upsert_then_read(backend: Backend) {
    let fixture = open(backend);
    let stored = fixture.store.upsert(text("abc123de", 1)).unwrap();
    assert_eq!(stored, text("abc123de", 1));
    assert_eq!(fixture.store.read(&stored.id).unwrap(), stored);
}

#[test_case(Backend::Memory; "memory")]
#[test_case(Backend::File; "file")]
#[test_case(Backend::Sqlite; "sqlite")]
fn test_upsert_replaces_whole_record(backend: Backend) {
    let fixture = open(backend);
    fixture.store.upsert(text("abc123de", 1)).unwrap();

    let replacement = Text {
        title: "other".to_string(),
        note: String::new(),
        ..text("abc123de", 2)
    };
    fixture.store.upsert(replacement.clone()).unwrap();

    assert_eq!(fixture.store.read(&replacement.id).unwrap(), replacement);
    let all = fixture.store.list(timestamps, Direction::Ascending).unwrap();
    assert_eq!(all.len(), 1);
}

#[test_case(Backend::Memory; "memory")]
#[test_case(Backend::File; "file")]
#[test_case(Backend::Sqlite; "sqlite")]
fn test_stores_do_not_validate(backend: Backend) {
    let fixture = open(backend);
    let sparse = Text {
        id: TextId::new("sparse00"),
        ..Text::default()
    };
    assert_eq!(fixture.store.upsert(sparse.clone()).unwrap(), sparse);
    assert_eq!(fixture.store.read(&sparse.id).unwrap(), sparse);
}

#[test_case(Backend::Memory; "memory")]
#[test_case(Backend::File; "file")]
#[test_case(Backend::Sqlite; "sqlite")]
fn test_timestamp_precision_survives(backend: Backend) {
    let fixture = open(backend);
    let mut precise = text("abc123de", 1);
    precise.timestamp = Some(Utc.timestamp_opt(1_680_903_832, 123_456_789).unwrap());

    fixture.store.upsert(precise.clone()).unwrap();
    assert_eq!(
        fixture.store.read(&precise.id).unwrap().timestamp,
        precise.timestamp
    );
}

#[test_case(Backend::Memory; "memory")]
#[test_case(Backend::File; "file")]
#[test_case(Backend::Sqlite; "sqlite")]
fn test_delete_returns_record(backend: Backend) {
    let fixture = open(backend);
    fixture.store.upsert(text("abc123de", 1)).unwrap();
    fixture.store.upsert(text("0000beef", 2)).unwrap();

    let deleted = fixture.store.delete(&TextId::new("abc123de")).unwrap();
    assert_eq!(deleted, text("abc123de", 1));

    assert!(fixture.store.read(&deleted.id).unwrap_err().is_not_found());
    let rest = fixture.store.list(timestamps, Direction::Ascending).unwrap();
    assert_eq!(ids(&rest), ["0000beef"]);
}

#[test_case(Backend::Memory; "memory")]
#[test_case(Backend::File; "file")]
#[test_case(Backend::Sqlite; "sqlite")]
fn test_delete_missing_is_not_found(backend: Backend) {
    let fixture = open(backend);
    fixture.store.upsert(text("abc123de", 1)).unwrap();

    let err = fixture.store.delete(&TextId::new("missing0")).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        fixture
            .store
            .list(timestamps, Direction::Ascending)
            .unwrap()
            .len(),
        1
    );
}

#[test_case(Backend::Memory; "memory")]
#[test_case(Backend::File; "file")]
#[test_case(Backend::Sqlite; "sqlite")]
fn test_list_empty(backend: Backend) {
    let fixture = open(backend);
    assert!(
        fixture
            .store
            .list(timestamps, Direction::Descending)
            .unwrap()
            .is_empty()
    );
}

#[test_case(Backend::Memory, Direction::Ascending, &["0000000a", "0000000b", "0000000c"]; "memory ascending")]
#[test_case(Backend::Memory, Direction::Descending, &["0000000c", "0000000b", "0000000a"]; "memory descending")]
#[test_case(Backend::File, Direction::Ascending, &["0000000a", "0000000b", "0000000c"]; "file ascending")]
#[test_case(Backend::File, Direction::Descending, &["0000000c", "0000000b", "0000000a"]; "file descending")]
#[test_case(Backend::Sqlite, Direction::Ascending, &["0000000a", "0000000b", "0000000c"]; "sqlite ascending")]
#[test_case(Backend::Sqlite, Direction::Descending, &["0000000c", "0000000b", "0000000a"]; "sqlite descending")]
fn test_list_orders_by_timestamp(backend: Backend, direction: Direction, expected: &[&str]) {
    let fixture = open(backend);
    for (id, hour) in [("0000000b", 2), ("0000000c", 3), ("0000000a", 1)] {
        fixture.store.upsert(text(id, hour)).unwrap();
    }

    let listed = fixture.store.list(timestamps, direction).unwrap();
    assert_eq!(ids(&listed), expected);
}

#[test_case(Backend::Memory; "memory")]
#[test_case(Backend::File; "file")]
#[test_case(Backend::Sqlite; "sqlite")]
fn test_concurrent_upserts_are_all_kept(backend: Backend) {
    let fixture = open(backend);
    let store = fixture.store.as_ref();

    std::thread::scope(|scope| {
        for worker in 0..8_u32 {
            scope.spawn(move || {
                for n in 0..5_u32 {
                    let id = format!("{worker:04x}{n:04x}");
                    store.upsert(text(&id, n)).unwrap();
                }
            });
        }
    });

    let all = store.list(timestamps, Direction::Ascending).unwrap();
    assert_eq!(all.len(), 40);
}

#[test_case(Backend::Memory; "memory")]
#[test_case(Backend::File; "file")]
#[test_case(Backend::Sqlite; "sqlite")]
fn test_close(backend: Backend) {
    let fixture = open(backend);
    fixture.store.upsert(text("abc123de", 1)).unwrap();
    fixture.store.close().unwrap();
}

#[test]
fn test_file_store_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tir.json");

    let store = FileStore::open(&path).unwrap();
    store.upsert(text("abc123de", 1)).unwrap();
    Box::new(store).close().unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(
        reopened.read(&TextId::new("abc123de")).unwrap(),
        text("abc123de", 1)
    );
}

#[test]
fn test_sqlite_store_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tir.db");

    let store = SqliteStore::open(&path, StoreTimeouts::default()).unwrap();
    store.upsert(text("abc123de", 1)).unwrap();
    Box::new(store).close().unwrap();

    let reopened = SqliteStore::open(&path, StoreTimeouts::default()).unwrap();
    assert_eq!(
        reopened.read(&TextId::new("abc123de")).unwrap(),
        text("abc123de", 1)
    );
}

#[test]
fn test_sqlite_store_drops_public_flag() {
    let store = SqliteStore::in_memory(StoreTimeouts::default()).unwrap();
    let mut public = text("abc123de", 1);
    public.public = true;

    store.upsert(public).unwrap();
    assert!(!store.read(&TextId::new("abc123de")).unwrap().public);
}

#[test_case(Backend::File; "file")]
#[test_case(Backend::Sqlite; "sqlite")]
fn test_unwritable_timestamp_leaves_store_readable(backend: Backend) {
    let fixture = open(backend);
    fixture.store.upsert(text("abc123de", 1)).unwrap();

    let mut far = text("deadbeef", 1);
    far.timestamp = Some(Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap());
    let err = fixture.store.upsert(far).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)), "{err}");

    assert_eq!(
        fixture.store.read(&TextId::new("abc123de")).unwrap(),
        text("abc123de", 1)
    );
    assert!(matches!(
        fixture.store.read(&TextId::new("deadbeef")),
        Err(Error::NotFound(_))
    ));
    let all = fixture.store.list(timestamps, Direction::Ascending).unwrap();
    assert_eq!(ids(&all), ["abc123de"]);
}
