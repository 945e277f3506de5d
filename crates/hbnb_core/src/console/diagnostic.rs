//! User-facing diagnostics.
//!
//! Every user-input problem maps to exactly one variant and one output
//! line. Diagnostics are values, not errors: the console prints them and
//! keeps going.

use std::fmt::{Display, Formatter};

/// One-line message printed for a rejected command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    MissingTypeName,
    UnknownType,
    MissingIdentifier,
    RecordNotFound,
    MissingAttributeName,
    MissingAttributeValue,
    /// Carries the trimmed input line.
    UnrecognizedCommand(String),
    /// Carries the requested help topic.
    NoHelp(String),
}

impl Diagnostic {
    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingTypeName => "missing_type_name",
            Self::UnknownType => "unknown_type",
            Self::MissingIdentifier => "missing_identifier",
            Self::RecordNotFound => "record_not_found",
            Self::MissingAttributeName => "missing_attribute_name",
            Self::MissingAttributeValue => "missing_attribute_value",
            Self::UnrecognizedCommand(_) => "unrecognized_command",
            Self::NoHelp(_) => "no_help",
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTypeName => write!(f, "** class name missing **"),
            Self::UnknownType => write!(f, "** class doesn't exist **"),
            Self::MissingIdentifier => write!(f, "** instance id missing **"),
            Self::RecordNotFound => write!(f, "** no instance found **"),
            Self::MissingAttributeName => write!(f, "** attribute name missing **"),
            Self::MissingAttributeValue => write!(f, "** value missing **"),
            Self::UnrecognizedCommand(line) => write!(f, "*** Unknown syntax: {line}"),
            Self::NoHelp(topic) => write!(f, "*** No help on {topic}"),
        }
    }
}
