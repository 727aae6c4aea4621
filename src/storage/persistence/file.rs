//! JSON file text store.
//!
//! The whole collection is one JSON object mapping ID to text, written with
//! tab indentation and sorted keys:
//!
//! ```json
//! {
//! 	"35bb8126": {
//! 		"title": "Visualizing IP data",
//! 		...
//! 	}
//! }
//! ```
//!
//! # Concurrency
//!
//! Every operation runs under one `Mutex` around the file handle and
//! re-reads the file from the start. Mutations then apply their change to
//! the loaded map, truncate the file, and write the whole map back. Callers
//! within one process are serialized.
//!
//! Two processes sharing a file each hold their own lock and can overwrite
//! each other's writes. This store does not guard against that.

use crate::models::{Comparator, Direction, Text, TextId, sort, timestamp};
use crate::storage::metrics::{record_operation_metrics, status_of};
use crate::storage::traits::TextStore;
use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;
use tracing::instrument;

type Collection = BTreeMap<TextId, Text>;

/// Text store backed by a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileStore {
    /// Opens (or creates) the store file at `path`.
    ///
    /// A missing or empty file is treated as an empty collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or holds something other
    /// than a JSON object of texts.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// use tiir::FileStore;
    ///
    /// let store = FileStore::open("/home/me/.tir.json")?;
    /// # Ok::<(), tiir::Error>(())
    /// ```
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::OperationFailed {
                operation: "create_store_dir".to_string(),
                cause: format!("{}: {e}", parent.display()),
            })?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| Error::OperationFailed {
                operation: "open_store_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        let store = Self {
            path,
            file: Mutex::new(file),
        };

        // Fail early on a corrupt file rather than on first use.
        let count = {
            let mut file = store.lock()?;
            load(&mut file)?.len()
        };
        tracing::debug!(path = %store.path.display(), texts = count, "Opened file store");

        Ok(store)
    }

    /// Returns the path of the store file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, File>> {
        self.file.lock().map_err(|_| Error::OperationFailed {
            operation: "file_store_lock".to_string(),
            cause: "Lock poisoned".to_string(),
        })
    }

    /// Loads the collection and runs `f` against it without writing back.
    fn view<T>(&self, f: impl FnOnce(Collection) -> Result<T>) -> Result<T> {
        let mut file = self.lock()?;
        f(load(&mut file)?)
    }

    /// Loads the collection, applies `f`, and writes the result back.
    ///
    /// Nothing is written if `f` fails.
    fn mutate<T>(&self, f: impl FnOnce(&mut Collection) -> Result<T>) -> Result<T> {
        let mut file = self.lock()?;
        let mut texts = load(&mut file)?;
        let out = f(&mut texts)?;
        commit(&mut file, &texts)?;
        Ok(out)
    }
}

/// Reads the whole file from the start.
fn load(file: &mut File) -> Result<Collection> {
    let mut bytes = Vec::new();
    file.seek(SeekFrom::Start(0))
        .and_then(|_| file.read_to_end(&mut bytes))
        .map_err(|e| Error::OperationFailed {
            operation: "read_store_file".to_string(),
            cause: e.to_string(),
        })?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Collection::new());
    }

    serde_json::from_slice(&bytes).map_err(|e| Error::OperationFailed {
        operation: "parse_store_file".to_string(),
        cause: e.to_string(),
    })
}

/// Replaces the file's contents with `texts`.
fn commit(file: &mut File, texts: &Collection) -> Result<()> {
    let mut bytes = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
    texts
        .serialize(&mut serializer)
        .map_err(|e| Error::OperationFailed {
            operation: "serialize_store_file".to_string(),
            cause: e.to_string(),
        })?;

    file.set_len(0)
        .and_then(|()| file.seek(SeekFrom::Start(0)))
        .and_then(|_| file.write_all(&bytes))
        .and_then(|()| file.flush())
        .map_err(|e| Error::OperationFailed {
            operation: "write_store_file".to_string(),
            cause: e.to_string(),
        })
}

impl TextStore for FileStore {
    #[instrument(skip(self), fields(operation = "read", backend = "file", text.id = %id))]
    fn read(&self, id: &TextId) -> Result<Text> {
        let start = Instant::now();
        let result = self.view(|mut texts| {
            texts
                .remove(id)
                .ok_or_else(|| Error::NotFound(id.clone()))
        });

        record_operation_metrics("file", "read", start, status_of(&result));
        result
    }

    #[instrument(skip(self, text), fields(operation = "upsert", backend = "file", text.id = %text.id))]
    fn upsert(&self, text: Text) -> Result<Text> {
        let start = Instant::now();
        let result = self.mutate(|texts| {
            if let Some(ts) = &text.timestamp {
                timestamp::check(ts)?;
            }
            texts.insert(text.id.clone(), text.clone());
            Ok(text)
        });

        if result.is_ok() {
            tracing::debug!("Wrote text to file store");
        }
        record_operation_metrics("file", "upsert", start, status_of(&result));
        result
    }

    #[instrument(skip(self), fields(operation = "delete", backend = "file", text.id = %id))]
    fn delete(&self, id: &TextId) -> Result<Text> {
        let start = Instant::now();
        let result = self.mutate(|texts| {
            texts
                .remove(id)
                .ok_or_else(|| Error::NotFound(id.clone()))
        });

        record_operation_metrics("file", "delete", start, status_of(&result));
        result
    }

    #[instrument(skip(self, comparator), fields(operation = "list", backend = "file"))]
    fn list(&self, comparator: Comparator, direction: Direction) -> Result<Vec<Text>> {
        let start = Instant::now();
        let result = self.view(|texts| {
            let mut texts: Vec<Text> = texts.into_values().collect();
            sort(&mut texts, comparator, direction);
            Ok(texts)
        });

        record_operation_metrics("file", "list", start, status_of(&result));
        result
    }

    fn close(self: Box<Self>) -> Result<()> {
        let file = self.file.into_inner().map_err(|_| Error::OperationFailed {
            operation: "file_store_lock".to_string(),
            cause: "Lock poisoned".to_string(),
        })?;
        file.sync_all().map_err(|e| Error::OperationFailed {
            operation: "sync_store_file".to_string(),
            cause: e.to_string(),
        })
    }
}
