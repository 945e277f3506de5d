//! `Type.action(args)` call syntax.
//!
//! # Responsibility
//! - Recognize the dotted call shape and rewrite it into a verb-first
//!   `CommandLine` with the type name as the first argument.
//!
//! # Invariants
//! - Lines that are not of the call shape are left to the verb-first
//!   grammar (`None`), never rejected here.
//! - An unrecognized type name wins over every other problem on the line.
//! - Argument text is read by a bounded literal grammar; it is never
//!   evaluated.

use super::command::{Arg, CommandLine, Verb};
use super::diagnostic::Diagnostic;
use crate::literal::{LiteralError, LiteralParser, LiteralResult};
use crate::model::schema::RecordKind;
use once_cell::sync::Lazy;
use regex::Regex;

static DOTTED_CALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)\.(\w+)\((.*)\)$").expect("valid dotted call regex"));

/// Rewrites a dotted call into a verb-first command.
///
/// Returns `None` when `line` is not of the `Type.action(...)` shape.
pub fn rewrite_dotted(line: &str) -> Option<Result<CommandLine, Diagnostic>> {
    let trimmed = line.trim();
    let captures = DOTTED_CALL_RE.captures(trimmed)?;
    let (type_name, action, arg_text) = (&captures[1], &captures[2], &captures[3]);

    let Some(kind) = RecordKind::from_name(type_name) else {
        return Some(Err(Diagnostic::UnknownType));
    };
    let unrecognized = || Diagnostic::UnrecognizedCommand(trimmed.to_string());
    let Some(verb) = Verb::from_action(action) else {
        return Some(Err(unrecognized()));
    };

    let rewritten = parse_call_args(arg_text)
        .map(|call_args| {
            let mut args = Vec::with_capacity(call_args.len() + 1);
            args.push(Arg::Text(kind.name().to_string()));
            args.extend(call_args);
            CommandLine { verb, args }
        })
        .map_err(|_| unrecognized());
    Some(rewritten)
}

/// Splits the text between the call parentheses into arguments.
///
/// Quoted strings and bare words become `Arg::Text`; a brace dictionary
/// becomes `Arg::Map`. Arguments after the dictionary are checked for
/// syntax and then dropped. A trailing comma is accepted.
pub fn parse_call_args(text: &str) -> LiteralResult<Vec<Arg>> {
    let mut parser = LiteralParser::new(text);
    let mut args = Vec::new();
    let mut seen_map = false;

    while !parser.is_at_end() {
        let arg = match parser.peek() {
            Some('{') if seen_map => {
                return Err(LiteralError::InvalidValue("second dictionary".to_string()))
            }
            Some('{') => Arg::Map(parser.parse_dict()?),
            Some('"' | '\'') => Arg::Text(parser.parse_quoted()?),
            _ => Arg::Text(parser.parse_bare_word()?.to_string()),
        };

        if !seen_map {
            seen_map = matches!(arg, Arg::Map(_));
            args.push(arg);
        }

        if parser.is_at_end() {
            break;
        }
        parser.expect(',')?;
    }

    Ok(args)
}
