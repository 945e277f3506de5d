//! JSON file-backed record store.
//!
//! # Responsibility
//! - Hold every live record in memory, in insertion order.
//! - Mirror the full record set to one JSON object on disk.
//!
//! # Invariants
//! - `persist` rewrites the whole file through a sibling temp file and a
//!   rename, so readers never see a half-written document.
//! - `load` replaces the in-memory set only after the whole file decoded.
//! - Entries whose `__class__` names no recognized kind are dropped on load.

use super::{RecordStore, RemovedRecord, StoreError, StoreResult};
use crate::model::record::{Record, RecordDocument, StoreKey, CLASS_ATTRIBUTE};
use crate::model::schema::RecordKind;
use log::{debug, error, info};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Record store persisted as a single JSON document.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: BTreeMap<u64, Record>,
    slots: HashMap<StoreKey, u64>,
    next_slot: u64,
}

impl JsonFileStore {
    /// Creates an empty store bound to `path` without touching the disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: BTreeMap::new(),
            slots: HashMap::new(),
            next_slot: 0,
        }
    }

    /// Creates a store bound to `path` and loads the file if it exists.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let mut store = Self::new(path);
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Counts records of exactly `kind`.
    pub fn count_of(&self, kind: RecordKind) -> usize {
        self.records.values().filter(|record| record.kind == kind).count()
    }

    /// Re-reads the backing file, discarding in-memory state.
    pub fn reload(&mut self) -> StoreResult<()> {
        self.load()
    }

    fn temp_path(&self) -> StoreResult<PathBuf> {
        let file_name = self.path.file_name().ok_or_else(|| {
            StoreError::InvalidData(format!(
                "store path `{}` has no file name",
                self.path.display()
            ))
        })?;
        let mut temp_name = std::ffi::OsString::from(".");
        temp_name.push(file_name);
        temp_name.push(".tmp");
        Ok(self.path.with_file_name(temp_name))
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn read_document(&self) -> StoreResult<Option<Map<String, Value>>> {
        if !self.path.is_file() {
            return Ok(None);
        }

        let text = fs::read_to_string(&self.path).map_err(|err| self.io_error(&self.path, err))?;
        if text.trim().is_empty() {
            return Ok(Some(Map::new()));
        }

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })
    }

    fn decode(document: Map<String, Value>) -> StoreResult<Vec<Record>> {
        let mut records = Vec::with_capacity(document.len());
        for (key, value) in document {
            let class = value.get(CLASS_ATTRIBUTE).and_then(Value::as_str);
            let Some(kind) = class.and_then(RecordKind::from_name) else {
                debug!(
                    "event=store_load module=store status=skip reason=unknown_class key={}",
                    key
                );
                continue;
            };

            let document: RecordDocument = serde_json::from_value(value)
                .map_err(|err| StoreError::InvalidData(format!("entry `{key}`: {err}")))?;
            debug_assert_eq!(document.class(), kind.name());
            let record = Record::from_document(kind, document)
                .map_err(|message| StoreError::InvalidData(format!("entry `{key}`: {message}")))?;
            if record.id.is_empty() {
                return Err(StoreError::InvalidData(format!("entry `{key}`: empty id")));
            }
            records.push(record);
        }
        Ok(records)
    }

    fn replace_all(&mut self, records: Vec<Record>) -> StoreResult<()> {
        self.records.clear();
        self.slots.clear();
        self.next_slot = 0;
        for record in records {
            self.register(record)?;
        }
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn all(&self) -> Box<dyn Iterator<Item = &Record> + '_> {
        Box::new(self.records.values())
    }

    fn get(&self, key: &StoreKey) -> Option<&Record> {
        self.slots.get(key).and_then(|slot| self.records.get(slot))
    }

    fn get_mut(&mut self, key: &StoreKey) -> Option<&mut Record> {
        let slot = self.slots.get(key)?;
        self.records.get_mut(slot)
    }

    fn register(&mut self, record: Record) -> StoreResult<()> {
        if record.id.is_empty() {
            return Err(StoreError::MissingIdentifier(record.kind));
        }

        let key = record.key();
        let slot = match self.slots.get(&key) {
            Some(slot) => *slot,
            None => {
                let slot = self.next_slot;
                self.next_slot += 1;
                self.slots.insert(key, slot);
                slot
            }
        };
        self.records.insert(slot, record);
        Ok(())
    }

    fn remove(&mut self, key: &StoreKey) -> Option<RemovedRecord> {
        let slot = self.slots.remove(key)?;
        self.records.remove(&slot).map(|record| RemovedRecord {
            record,
            position: slot,
        })
    }

    fn restore(&mut self, removed: RemovedRecord) -> StoreResult<()> {
        let RemovedRecord { record, position } = removed;
        let key = record.key();
        if record.id.is_empty() {
            return Err(StoreError::MissingIdentifier(record.kind));
        }
        if self.slots.contains_key(&key) || self.records.contains_key(&position) {
            return self.register(record);
        }

        self.slots.insert(key, position);
        self.records.insert(position, record);
        self.next_slot = self.next_slot.max(position + 1);
        Ok(())
    }

    fn persist(&self) -> StoreResult<()> {
        let started_at = Instant::now();

        let mut document = Map::new();
        for record in self.records.values() {
            let value = serde_json::to_value(record.to_document()).map_err(|source| {
                StoreError::Json {
                    path: self.path.clone(),
                    source,
                }
            })?;
            document.insert(record.key().to_string(), value);
        }
        let text = serde_json::to_string(&document).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        let temp_path = self.temp_path()?;
        let result = fs::write(&temp_path, text)
            .map_err(|err| self.io_error(&temp_path, err))
            .and_then(|()| {
                fs::rename(&temp_path, &self.path).map_err(|err| self.io_error(&self.path, err))
            });

        match result {
            Ok(()) => {
                debug!(
                    "event=store_persist module=store status=ok records={} duration_ms={}",
                    self.records.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                let _ = fs::remove_file(&temp_path);
                error!(
                    "event=store_persist module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn load(&mut self) -> StoreResult<()> {
        let started_at = Instant::now();

        let decoded = self
            .read_document()
            .and_then(|document| Self::decode(document.unwrap_or_default()));
        let records = match decoded {
            Ok(records) => records,
            Err(err) => {
                error!(
                    "event=store_load module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err);
            }
        };

        self.replace_all(records)?;
        info!(
            "event=store_load module=store status=ok records={} duration_ms={}",
            self.records.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}
