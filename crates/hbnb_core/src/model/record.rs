//! Record domain model.
//!
//! # Responsibility
//! - Define the canonical record: identity, timestamps and an open
//!   attribute bag.
//! - Project records to and from the backing-file attribute dictionary.
//! - Apply attribute updates with per-field type coercion.
//!
//! # Invariants
//! - `id` is assigned at construction and never changes afterwards.
//! - `created_at` is set once; `updated_at` only moves on `touch()`.
//! - Protected attribute names never enter `attributes`.
//! - Timestamps carry microsecond precision so file round-trips are exact.

use super::render::write_mapping;
use super::schema::{FieldType, RecordKind};
use chrono::{DateTime, Local, NaiveDateTime, SubsecRound};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Record identifier as written in store keys and the backing file.
pub type RecordId = String;

/// Open attribute bag, kept in insertion order.
pub type Attributes = Map<String, Value>;

pub const ID_ATTRIBUTE: &str = "id";
pub const CREATED_AT_ATTRIBUTE: &str = "created_at";
pub const UPDATED_AT_ATTRIBUTE: &str = "updated_at";
/// Discriminator key naming the record kind in the backing file.
pub const CLASS_ATTRIBUTE: &str = "__class__";

const PROTECTED_ATTRIBUTES: &[&str] = &[
    ID_ATTRIBUTE,
    CREATED_AT_ATTRIBUTE,
    UPDATED_AT_ATTRIBUTE,
    CLASS_ATTRIBUTE,
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Returns whether `name` is an identity or bookkeeping attribute that
/// updates must leave untouched.
pub fn is_protected_attribute(name: &str) -> bool {
    PROTECTED_ATTRIBUTES.contains(&name)
}

/// Unique store key: record kind plus id, written as `Kind.id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey {
    pub kind: RecordKind,
    pub id: RecordId,
}

impl StoreKey {
    pub fn new(kind: RecordKind, id: impl Into<RecordId>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.kind, self.id)
    }
}

/// Incoming value for an attribute update.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeInput {
    /// Untyped command text, parsed against the attribute's type tag.
    Raw(String),
    /// Already typed literal from an inline dictionary.
    Literal(Value),
}

/// Canonical persisted entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: RecordId,
    pub kind: RecordKind,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub attributes: Attributes,
}

/// Backing-file attribute dictionary of one record.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct RecordDocument {
    id: String,
    created_at: String,
    updated_at: String,
    #[serde(flatten)]
    attributes: Attributes,
    #[serde(rename = "__class__")]
    class: String,
}

impl Record {
    /// Creates a record with a fresh UUID and both timestamps set to now.
    ///
    /// Declared fields are not materialized until assigned.
    pub fn new(kind: RecordKind) -> Self {
        let now = now_timestamp();
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            created_at: now,
            updated_at: now,
            attributes: Attributes::new(),
        }
    }

    /// Returns this record's store key.
    pub fn key(&self) -> StoreKey {
        StoreKey::new(self.kind, self.id.clone())
    }

    /// Refreshes `updated_at` to the current time.
    pub fn touch(&mut self) {
        self.updated_at = now_timestamp();
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Sets one attribute, coercing the input to the attribute's type.
    ///
    /// The target type is the declared field type when the kind declares
    /// `name`, else the type of the value already stored under `name`, else
    /// text. Raw text that does not parse as the target type is stored as
    /// text. Returns `false` without changing anything when `name` is
    /// protected.
    pub fn set_attribute(&mut self, name: &str, input: AttributeInput) -> bool {
        if is_protected_attribute(name) {
            return false;
        }

        let declared = self.kind.field_type(name);
        let value = match input {
            AttributeInput::Raw(raw) => {
                let target = declared
                    .or_else(|| self.attributes.get(name).and_then(FieldType::of_value))
                    .unwrap_or(FieldType::Text);
                match target.parse_raw(&raw) {
                    Some(value) => value,
                    None => {
                        warn!(
                            "event=attribute_coerce module=model status=fallback \
                             kind={} attribute={} target={:?}",
                            self.kind,
                            name,
                            target
                        );
                        Value::String(raw)
                    }
                }
            }
            AttributeInput::Literal(value) => match declared {
                Some(field_type) => field_type.coerce_literal(value),
                None => value,
            },
        };

        self.attributes.insert(name.to_string(), value);
        true
    }

    pub(crate) fn to_document(&self) -> RecordDocument {
        RecordDocument {
            id: self.id.clone(),
            created_at: format_timestamp(&self.created_at),
            updated_at: format_timestamp(&self.updated_at),
            attributes: self
                .attributes
                .iter()
                .filter(|(key, _)| !is_protected_attribute(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            class: self.kind.name().to_string(),
        }
    }

    /// Rebuilds a record of `kind` from its backing-file dictionary.
    pub(crate) fn from_document(
        kind: RecordKind,
        document: RecordDocument,
    ) -> Result<Self, String> {
        let created_at = parse_timestamp(&document.created_at)
            .ok_or_else(|| format!("invalid created_at `{}`", document.created_at))?;
        let updated_at = parse_timestamp(&document.updated_at)
            .ok_or_else(|| format!("invalid updated_at `{}`", document.updated_at))?;

        Ok(Self {
            id: document.id,
            kind,
            created_at,
            updated_at,
            attributes: document.attributes,
        })
    }
}

impl Display for Record {
    /// `[Kind] (id) {'id': ..., 'created_at': ..., 'updated_at': ..., ...}`
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let id = Value::String(self.id.clone());
        let created_at = Value::String(format_timestamp(&self.created_at));
        let updated_at = Value::String(format_timestamp(&self.updated_at));

        let mut bag = String::new();
        write_mapping(
            &mut bag,
            [
                (ID_ATTRIBUTE, &id),
                (CREATED_AT_ATTRIBUTE, &created_at),
                (UPDATED_AT_ATTRIBUTE, &updated_at),
            ]
            .into_iter()
            .chain(self.attributes.iter().map(|(key, value)| (key.as_str(), value))),
        );

        write!(f, "[{}] ({}) {}", self.kind, self.id, bag)
    }
}

impl RecordDocument {
    pub(crate) fn class(&self) -> &str {
        &self.class
    }
}

/// Formats a timestamp as ISO-8601 with microseconds.
pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses an ISO-8601 timestamp with or without fractional seconds.
///
/// Offset-qualified values are converted to local time.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    value.parse::<NaiveDateTime>().ok().or_else(|| {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|parsed| parsed.with_timezone(&Local).naive_local())
    })
}

fn now_timestamp() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(6)
}
