//! Record store abstractions and the JSON file implementation.
//!
//! # Responsibility
//! - Define the store contract used by the record service.
//! - Keep file-format details inside the persistence boundary.
//!
//! # Invariants
//! - Every stored record is keyed by `Kind.id` and the key is unique.
//! - I/O and decode failures surface as `StoreError`, never as panics.

use crate::model::record::{Record, StoreKey};
use crate::model::schema::RecordKind;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod json_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Fatal store error for load/persist and registration.
#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    MissingIdentifier(RecordKind),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "store I/O failed on `{}`: {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "store file `{}` is not valid JSON: {source}", path.display())
            }
            Self::MissingIdentifier(kind) => {
                write!(f, "cannot register {kind} record without an id")
            }
            Self::InvalidData(message) => write!(f, "invalid stored record data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::MissingIdentifier(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

/// Record taken out of a store, with the insertion position it held.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedRecord {
    pub record: Record,
    pub position: u64,
}

/// Store interface for the authoritative in-memory record set and its
/// durable mirror.
pub trait RecordStore {
    /// Iterates every live record in insertion order.
    fn all(&self) -> Box<dyn Iterator<Item = &Record> + '_>;
    fn get(&self, key: &StoreKey) -> Option<&Record>;
    fn get_mut(&mut self, key: &StoreKey) -> Option<&mut Record>;
    /// Inserts or overwrites the entry for the record's key.
    fn register(&mut self, record: Record) -> StoreResult<()>;
    fn remove(&mut self, key: &StoreKey) -> Option<RemovedRecord>;
    /// Puts a removed record back at the position it held.
    fn restore(&mut self, removed: RemovedRecord) -> StoreResult<()>;
    /// Writes the whole record set to the backing medium.
    fn persist(&self) -> StoreResult<()>;
    /// Replaces the in-memory set with the backing medium's content.
    fn load(&mut self) -> StoreResult<()>;
}

impl<S: RecordStore + ?Sized> RecordStore for &mut S {
    fn all(&self) -> Box<dyn Iterator<Item = &Record> + '_> {
        (**self).all()
    }

    fn get(&self, key: &StoreKey) -> Option<&Record> {
        (**self).get(key)
    }

    fn get_mut(&mut self, key: &StoreKey) -> Option<&mut Record> {
        (**self).get_mut(key)
    }

    fn register(&mut self, record: Record) -> StoreResult<()> {
        (**self).register(record)
    }

    fn remove(&mut self, key: &StoreKey) -> Option<RemovedRecord> {
        (**self).remove(key)
    }

    fn restore(&mut self, removed: RemovedRecord) -> StoreResult<()> {
        (**self).restore(removed)
    }

    fn persist(&self) -> StoreResult<()> {
        (**self).persist()
    }

    fn load(&mut self) -> StoreResult<()> {
        (**self).load()
    }
}
