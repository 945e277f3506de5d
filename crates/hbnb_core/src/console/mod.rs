//! Line-oriented command processor.
//!
//! # Responsibility
//! - Turn one input line into at most one observable action: a store
//!   mutation, one printed line, or an exit request.
//! - Convert every user-input problem into a printed `Diagnostic`.
//!
//! # Invariants
//! - Validation runs in a fixed order per verb and stops at the first
//!   failure, so the same line always yields the same diagnostic.
//! - Only store failures escape `execute`; they are fatal to the session.
//! - Lines are processed independently; no state is carried between them
//!   beyond the store itself.

pub mod command;
pub mod diagnostic;
pub mod dotted;
pub mod help;
pub mod tokenize;

pub use command::{Arg, CommandLine, Verb};
pub use diagnostic::Diagnostic;

use crate::model::record::AttributeInput;
use crate::model::render::render_list;
use crate::model::schema::RecordKind;
use crate::service::record_service::{AttributeChange, RecordService, UpdateOutcome};
use crate::store::{RecordStore, StoreError};
use log::{debug, error};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;

/// Whether the session should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Fatal console error. Ends the session.
#[derive(Debug)]
pub enum ConsoleError {
    /// Backing store could not be read or written.
    Store(StoreError),
    /// Output sink rejected a write.
    Output(std::io::Error),
}

impl Display for ConsoleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "store failure: {err}"),
            Self::Output(err) => write!(f, "failed to write output: {err}"),
        }
    }
}

impl Error for ConsoleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Output(err) => Some(err),
        }
    }
}

impl From<StoreError> for ConsoleError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<std::io::Error> for ConsoleError {
    fn from(value: std::io::Error) -> Self {
        Self::Output(value)
    }
}

/// Why a command stopped before producing its normal reply.
enum Failure {
    Rejected(Diagnostic),
    Store(StoreError),
}

impl From<Diagnostic> for Failure {
    fn from(value: Diagnostic) -> Self {
        Self::Rejected(value)
    }
}

impl From<StoreError> for Failure {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Normal result of one command.
enum Reply {
    Silent,
    Line(String),
    Text(String),
    Exit,
}

/// Command processor bound to one record store.
pub struct Console<S: RecordStore> {
    service: RecordService<S>,
}

impl<S: RecordStore> Console<S> {
    /// Creates a console over `store`.
    pub fn new(store: S) -> Self {
        Self {
            service: RecordService::new(store),
        }
    }

    pub fn service(&self) -> &RecordService<S> {
        &self.service
    }

    /// Runs one input line, writing any reply to `out`.
    ///
    /// # Errors
    /// - `ConsoleError::Store` when persisting a mutation fails.
    /// - `ConsoleError::Output` when `out` cannot be written.
    pub fn execute(&mut self, line: &str, out: &mut dyn Write) -> Result<Flow, ConsoleError> {
        let reply = match self.dispatch(line) {
            Ok(reply) => reply,
            Err(Failure::Rejected(diagnostic)) => {
                debug!(
                    "event=command_rejected module=console status=diagnostic code={}",
                    diagnostic.code()
                );
                Reply::Line(diagnostic.to_string())
            }
            Err(Failure::Store(err)) => {
                error!(
                    "event=command_failed module=console status=error error={}",
                    err
                );
                return Err(ConsoleError::Store(err));
            }
        };

        match reply {
            Reply::Silent => {}
            Reply::Line(text) => writeln!(out, "{text}")?,
            Reply::Text(text) => write!(out, "{text}")?,
            Reply::Exit => return Ok(Flow::Exit),
        }
        out.flush()?;
        Ok(Flow::Continue)
    }

    fn dispatch(&mut self, line: &str) -> Result<Reply, Failure> {
        let parsed = match dotted::rewrite_dotted(line) {
            Some(rewritten) => rewritten.map(Some)?,
            None => command::parse_verb_first(line)?,
        };
        let Some(CommandLine { verb, args }) = parsed else {
            return Ok(Reply::Silent);
        };

        debug!(
            "event=command_dispatch module=console verb={} args={}",
            verb.keyword(),
            args.len()
        );
        match verb {
            Verb::Create => self.create(&args),
            Verb::Show => self.show(&args),
            Verb::Destroy => self.destroy(&args),
            Verb::All => self.all(&args),
            Verb::Update => self.update(&args),
            Verb::Count => self.count(&args),
            Verb::Help => Ok(help_reply(&args)),
            Verb::Quit | Verb::EndOfInput => Ok(Reply::Exit),
        }
    }

    fn create(&mut self, args: &[Arg]) -> Result<Reply, Failure> {
        let kind = required_kind(args)?;
        let id = self.service.create(kind)?;
        Ok(Reply::Line(id))
    }

    fn show(&self, args: &[Arg]) -> Result<Reply, Failure> {
        let kind = required_kind(args)?;
        let id = required_id(args)?;
        let record = self
            .service
            .find(kind, id)
            .ok_or(Diagnostic::RecordNotFound)?;
        Ok(Reply::Line(record.to_string()))
    }

    fn destroy(&mut self, args: &[Arg]) -> Result<Reply, Failure> {
        let kind = required_kind(args)?;
        let id = required_id(args)?;
        if !self.service.destroy(kind, id)? {
            return Err(Diagnostic::RecordNotFound.into());
        }
        Ok(Reply::Silent)
    }

    fn all(&self, args: &[Arg]) -> Result<Reply, Failure> {
        let kind = match args.first() {
            Some(arg) => Some(known_kind(arg)?),
            None => None,
        };
        let lines = self
            .service
            .list(kind)
            .into_iter()
            .map(|record| record.to_string());
        Ok(Reply::Line(render_list(lines)))
    }

    fn count(&self, args: &[Arg]) -> Result<Reply, Failure> {
        let kind = required_kind(args)?;
        Ok(Reply::Line(self.service.count(kind).to_string()))
    }

    fn update(&mut self, args: &[Arg]) -> Result<Reply, Failure> {
        let kind = required_kind(args)?;
        let id = required_id(args)?;
        if self.service.find(kind, id).is_none() {
            return Err(Diagnostic::RecordNotFound.into());
        }

        let changes = match args.get(2) {
            Some(Arg::Map(entries)) => entries
                .iter()
                .map(|(name, value)| {
                    AttributeChange::new(name.as_str(), AttributeInput::Literal(value.clone()))
                })
                .collect(),
            Some(Arg::Text(name)) => {
                let input = match args.get(3) {
                    Some(Arg::Text(raw)) => AttributeInput::Raw(raw.clone()),
                    Some(Arg::Map(entries)) => {
                        AttributeInput::Literal(Value::Object(entries.clone()))
                    }
                    None => return Err(Diagnostic::MissingAttributeValue.into()),
                };
                vec![AttributeChange::new(name.as_str(), input)]
            }
            None => return Err(Diagnostic::MissingAttributeName.into()),
        };

        match self.service.update(kind, id, changes)? {
            UpdateOutcome::NotFound => Err(Diagnostic::RecordNotFound.into()),
            UpdateOutcome::Unchanged | UpdateOutcome::Updated { .. } => Ok(Reply::Silent),
        }
    }
}

/// First argument as a recognized kind.
fn required_kind(args: &[Arg]) -> Result<RecordKind, Diagnostic> {
    args.first()
        .ok_or(Diagnostic::MissingTypeName)
        .and_then(known_kind)
}

fn known_kind(arg: &Arg) -> Result<RecordKind, Diagnostic> {
    arg.as_text()
        .and_then(RecordKind::from_name)
        .ok_or(Diagnostic::UnknownType)
}

/// Second argument as a record id. A dictionary in this slot matches no
/// record.
fn required_id(args: &[Arg]) -> Result<&str, Diagnostic> {
    args.get(1)
        .map(|arg| arg.as_text().unwrap_or_default())
        .ok_or(Diagnostic::MissingIdentifier)
}

fn help_reply(args: &[Arg]) -> Reply {
    let topic = args
        .iter()
        .filter_map(Arg::as_text)
        .collect::<Vec<_>>()
        .join(" ");
    if topic.is_empty() {
        return Reply::Text(help::index());
    }
    match help::lookup(&topic) {
        Some(text) => Reply::Line(text.to_string()),
        None => Reply::Line(Diagnostic::NoHelp(topic).to_string()),
    }
}
