//! Record kind registry and declared field schemas.
//!
//! # Responsibility
//! - Enumerate the closed set of recognized record kinds.
//! - Map kind names to their declared, typed fields.
//! - Convert raw command-line text into typed attribute values.
//!
//! # Invariants
//! - Kind names match exactly (case-sensitive, no prefix matching).
//! - `REGISTRY` is ordered like the `RecordKind` variants.

use crate::literal::parse_literal;
use serde_json::{Number, Value};
use std::fmt::{Display, Formatter};

/// Closed set of record kinds understood by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    BaseModel,
    User,
    State,
    City,
    Amenity,
    Place,
    Review,
}

/// Value type tag used to parse incoming attribute text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer,
    Float,
    Boolean,
    List,
}

/// One declared field of a record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
}

struct KindEntry {
    kind: RecordKind,
    name: &'static str,
    fields: &'static [FieldSpec],
}

const fn field(name: &'static str, field_type: FieldType) -> FieldSpec {
    FieldSpec { name, field_type }
}

const USER_FIELDS: &[FieldSpec] = &[
    field("email", FieldType::Text),
    field("password", FieldType::Text),
    field("first_name", FieldType::Text),
    field("last_name", FieldType::Text),
];

const STATE_FIELDS: &[FieldSpec] = &[field("name", FieldType::Text)];

const CITY_FIELDS: &[FieldSpec] = &[
    field("state_id", FieldType::Text),
    field("name", FieldType::Text),
];

const AMENITY_FIELDS: &[FieldSpec] = &[field("name", FieldType::Text)];

const PLACE_FIELDS: &[FieldSpec] = &[
    field("city_id", FieldType::Text),
    field("user_id", FieldType::Text),
    field("name", FieldType::Text),
    field("description", FieldType::Text),
    field("number_rooms", FieldType::Integer),
    field("number_bathrooms", FieldType::Integer),
    field("max_guest", FieldType::Integer),
    field("price_by_night", FieldType::Integer),
    field("latitude", FieldType::Float),
    field("longitude", FieldType::Float),
    field("amenity_ids", FieldType::List),
];

const REVIEW_FIELDS: &[FieldSpec] = &[
    field("place_id", FieldType::Text),
    field("user_id", FieldType::Text),
    field("text", FieldType::Text),
];

static REGISTRY: [KindEntry; 7] = [
    KindEntry {
        kind: RecordKind::BaseModel,
        name: "BaseModel",
        fields: &[],
    },
    KindEntry {
        kind: RecordKind::User,
        name: "User",
        fields: USER_FIELDS,
    },
    KindEntry {
        kind: RecordKind::State,
        name: "State",
        fields: STATE_FIELDS,
    },
    KindEntry {
        kind: RecordKind::City,
        name: "City",
        fields: CITY_FIELDS,
    },
    KindEntry {
        kind: RecordKind::Amenity,
        name: "Amenity",
        fields: AMENITY_FIELDS,
    },
    KindEntry {
        kind: RecordKind::Place,
        name: "Place",
        fields: PLACE_FIELDS,
    },
    KindEntry {
        kind: RecordKind::Review,
        name: "Review",
        fields: REVIEW_FIELDS,
    },
];

impl RecordKind {
    /// Every recognized kind, in registry order.
    pub const ALL: [RecordKind; 7] = [
        RecordKind::BaseModel,
        RecordKind::User,
        RecordKind::State,
        RecordKind::City,
        RecordKind::Amenity,
        RecordKind::Place,
        RecordKind::Review,
    ];

    /// Resolves an exact kind name.
    pub fn from_name(name: &str) -> Option<Self> {
        REGISTRY
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.kind)
    }

    /// Returns the canonical kind name used in keys and the discriminator.
    pub fn name(self) -> &'static str {
        self.entry().name
    }

    /// Returns the declared fields for this kind.
    pub fn fields(self) -> &'static [FieldSpec] {
        self.entry().fields
    }

    /// Returns the declared type of `name`, if this kind declares it.
    pub fn field_type(self, name: &str) -> Option<FieldType> {
        self.fields()
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| spec.field_type)
    }

    fn entry(self) -> &'static KindEntry {
        &REGISTRY[self as usize]
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FieldType {
    /// Infers the type tag of an already stored value.
    ///
    /// Returns `None` for null and nested objects, which are treated as text.
    pub fn of_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(_) => Some(Self::Text),
            Value::Number(number) if number.is_f64() => Some(Self::Float),
            Value::Number(_) => Some(Self::Integer),
            Value::Bool(_) => Some(Self::Boolean),
            Value::Array(_) => Some(Self::List),
            Value::Null | Value::Object(_) => None,
        }
    }

    /// Parses raw command text into a value of this type.
    ///
    /// Returns `None` when the text is not a valid value of this type.
    pub fn parse_raw(self, raw: &str) -> Option<Value> {
        let trimmed = raw.trim();
        match self {
            Self::Text => Some(Value::String(raw.to_string())),
            Self::Integer => trimmed.parse::<i64>().ok().map(Value::from),
            Self::Float => trimmed
                .parse::<f64>()
                .ok()
                .filter(|float| float.is_finite())
                .and_then(Number::from_f64)
                .map(Value::Number),
            Self::Boolean => match trimmed {
                "True" | "true" => Some(Value::Bool(true)),
                "False" | "false" => Some(Value::Bool(false)),
                _ => None,
            },
            Self::List if trimmed.starts_with('[') => {
                parse_literal(trimmed).ok().filter(Value::is_array)
            }
            Self::List => Some(Value::Array(vec![Value::String(raw.to_string())])),
        }
    }

    /// Adapts an already typed literal to this type.
    ///
    /// Strings are parsed like raw text and integers widen to floats; any
    /// other mismatch keeps the literal unchanged.
    pub fn coerce_literal(self, value: Value) -> Value {
        match (self, value) {
            (Self::Text, value) => value,
            (target, Value::String(text)) => {
                target.parse_raw(&text).unwrap_or(Value::String(text))
            }
            (Self::Float, Value::Number(number)) if !number.is_f64() => number
                .as_f64()
                .and_then(Number::from_f64)
                .map_or(Value::Number(number), Value::Number),
            (_, value) => value,
        }
    }
}
