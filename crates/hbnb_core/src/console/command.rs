//! Parsed command shape shared by both surface grammars.

use super::diagnostic::Diagnostic;
use super::tokenize::split_words;
use crate::model::record::Attributes;

/// Console verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Create,
    Show,
    Destroy,
    All,
    Update,
    Count,
    Help,
    Quit,
    EndOfInput,
}

impl Verb {
    /// Every verb, in help-listing order.
    pub const ALL: [Verb; 9] = [
        Verb::EndOfInput,
        Verb::All,
        Verb::Count,
        Verb::Create,
        Verb::Destroy,
        Verb::Help,
        Verb::Quit,
        Verb::Show,
        Verb::Update,
    ];

    /// Resolves the leading word of a verb-first line.
    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|verb| verb.keyword() == word)
    }

    /// Resolves the action of a `Type.action(...)` call. Only record
    /// operations are callable this way.
    pub fn from_action(word: &str) -> Option<Self> {
        Self::from_keyword(word).filter(|verb| {
            matches!(
                verb,
                Self::Create | Self::Show | Self::Destroy | Self::All | Self::Update | Self::Count
            )
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Show => "show",
            Self::Destroy => "destroy",
            Self::All => "all",
            Self::Update => "update",
            Self::Count => "count",
            Self::Help => "help",
            Self::Quit => "quit",
            Self::EndOfInput => "EOF",
        }
    }
}

/// One positional argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Text(String),
    /// Inline dictionary from the dotted grammar, kept structured.
    Map(Attributes),
}

impl Arg {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Map(_) => None,
        }
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Verb plus positional arguments, ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandLine {
    pub verb: Verb,
    pub args: Vec<Arg>,
}

/// Parses a verb-first line.
///
/// Returns `Ok(None)` for blank input.
pub fn parse_verb_first(line: &str) -> Result<Option<CommandLine>, Diagnostic> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let unrecognized = || Diagnostic::UnrecognizedCommand(trimmed.to_string());
    let mut words = split_words(trimmed).map_err(|_| unrecognized())?.into_iter();
    let verb = words
        .next()
        .and_then(|word| Verb::from_keyword(&word))
        .ok_or_else(unrecognized)?;

    Ok(Some(CommandLine {
        verb,
        args: words.map(Arg::Text).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::{parse_verb_first, Arg, CommandLine, Verb};
    use crate::console::Diagnostic;

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(Verb::from_keyword("EOF"), Some(Verb::EndOfInput));
        assert_eq!(Verb::from_keyword("eof"), None);
        assert_eq!(Verb::from_keyword("Create"), None);
    }

    #[test]
    fn only_record_verbs_are_actions() {
        assert_eq!(Verb::from_action("count"), Some(Verb::Count));
        assert_eq!(Verb::from_action("quit"), None);
        assert_eq!(Verb::from_action("help"), None);
    }

    #[test]
    fn blank_lines_parse_to_nothing() {
        assert_eq!(parse_verb_first("  \t \n"), Ok(None));
    }

    #[test]
    fn quoted_arguments_are_single_words() {
        let parsed = parse_verb_first("update City 42 name \"San Francisco\"").expect("parses");
        assert_eq!(
            parsed,
            Some(CommandLine {
                verb: Verb::Update,
                args: vec![
                    Arg::from("City"),
                    Arg::from("42"),
                    Arg::from("name"),
                    Arg::from("San Francisco"),
                ],
            })
        );
    }

    #[test]
    fn unknown_verbs_and_bad_quotes_are_unrecognized() {
        assert_eq!(
            parse_verb_first("  ls  "),
            Err(Diagnostic::UnrecognizedCommand("ls".into()))
        );
        assert_eq!(
            parse_verb_first("show User \"open"),
            Err(Diagnostic::UnrecognizedCommand("show User \"open".into()))
        );
    }
}
