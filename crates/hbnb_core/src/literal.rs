//! Bounded literal grammar for inline values.
//!
//! # Responsibility
//! - Parse quoted strings, bare words, numbers, booleans, null, lists and
//!   brace-delimited dictionaries into `serde_json::Value`.
//! - Serve both dotted-call argument parsing and typed attribute coercion.
//!
//! # Invariants
//! - Parsing never evaluates input; only the constructs above are accepted.
//! - Bare words never contain whitespace, quotes, commas, colons, brackets,
//!   parentheses or braces.
//! - Lists and dictionaries nest at most `MAX_NESTING_DEPTH` levels, which
//!   keeps recursion shallow and every accepted value writable to the
//!   backing file.

use serde_json::{Map, Number, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type LiteralResult<T> = Result<T, LiteralError>;

/// Deepest accepted list/dictionary nesting.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Syntax error raised while reading a literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    UnexpectedEnd,
    UnexpectedChar { found: char, offset: usize },
    UnterminatedString { offset: usize },
    InvalidValue(String),
    TrailingInput { offset: usize },
    TooDeep { offset: usize },
}

impl Display for LiteralError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedEnd => write!(f, "unexpected end of input"),
            Self::UnexpectedChar { found, offset } => {
                write!(f, "unexpected character `{found}` at offset {offset}")
            }
            Self::UnterminatedString { offset } => {
                write!(f, "unterminated string starting at offset {offset}")
            }
            Self::InvalidValue(word) => write!(f, "invalid literal value `{word}`"),
            Self::TrailingInput { offset } => write!(f, "trailing input at offset {offset}"),
            Self::TooDeep { offset } => write!(
                f,
                "nesting deeper than {MAX_NESTING_DEPTH} levels at offset {offset}"
            ),
        }
    }
}

impl Error for LiteralError {}

/// Recursive-descent reader over a single input string.
pub struct LiteralParser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> LiteralParser<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
        }
    }

    /// Returns true when only whitespace remains.
    pub fn is_at_end(&mut self) -> bool {
        self.skip_whitespace();
        self.pos >= self.src.len()
    }

    /// Returns the next non-whitespace character without consuming it.
    pub fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.src[self.pos..].chars().next()
    }

    /// Consumes `expected` or fails with the character actually found.
    pub fn expect(&mut self, expected: char) -> LiteralResult<()> {
        match self.peek() {
            Some(found) if found == expected => {
                self.pos += found.len_utf8();
                Ok(())
            }
            Some(found) => Err(LiteralError::UnexpectedChar {
                found,
                offset: self.pos,
            }),
            None => Err(LiteralError::UnexpectedEnd),
        }
    }

    /// Consumes `expected` if it is next.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            return true;
        }
        false
    }

    /// Reads a single- or double-quoted string, resolving backslash escapes.
    pub fn parse_quoted(&mut self) -> LiteralResult<String> {
        let start = self.pos;
        let quote = match self.peek() {
            Some(ch @ ('"' | '\'')) => ch,
            Some(found) => {
                return Err(LiteralError::UnexpectedChar {
                    found,
                    offset: self.pos,
                })
            }
            None => return Err(LiteralError::UnexpectedEnd),
        };
        self.pos += 1;

        let mut out = String::new();
        let mut chars = self.src[self.pos..].char_indices();
        while let Some((offset, ch)) = chars.next() {
            match ch {
                '\\' => match chars.next() {
                    Some((_, escaped)) => out.push(unescape(escaped)),
                    None => break,
                },
                ch if ch == quote => {
                    self.pos += offset + ch.len_utf8();
                    return Ok(out);
                }
                ch => out.push(ch),
            }
        }

        Err(LiteralError::UnterminatedString { offset: start })
    }

    /// Reads a run of bare-word characters.
    pub fn parse_bare_word(&mut self) -> LiteralResult<&'a str> {
        self.skip_whitespace();
        let rest = &self.src[self.pos..];
        let len = rest
            .char_indices()
            .find(|(_, ch)| !is_bare_char(*ch))
            .map_or(rest.len(), |(offset, _)| offset);
        if len == 0 {
            return match rest.chars().next() {
                Some(found) => Err(LiteralError::UnexpectedChar {
                    found,
                    offset: self.pos,
                }),
                None => Err(LiteralError::UnexpectedEnd),
            };
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    /// Reads any literal value.
    pub fn parse_value(&mut self) -> LiteralResult<Value> {
        match self.peek() {
            Some('"' | '\'') => self.parse_quoted().map(Value::String),
            Some('[') => self.parse_list(),
            Some('{') => self.parse_dict().map(Value::Object),
            Some(_) => {
                let word = self.parse_bare_word()?;
                scalar_from_word(word).ok_or_else(|| LiteralError::InvalidValue(word.to_string()))
            }
            None => Err(LiteralError::UnexpectedEnd),
        }
    }

    /// Reads a `{key: value, ...}` dictionary. Keys are quoted strings or
    /// bare words; a trailing comma is accepted.
    pub fn parse_dict(&mut self) -> LiteralResult<Map<String, Value>> {
        self.nested(Self::parse_dict_entries)
    }

    fn parse_dict_entries(&mut self) -> LiteralResult<Map<String, Value>> {
        self.expect('{')?;
        let mut entries = Map::new();
        loop {
            if self.eat('}') {
                return Ok(entries);
            }
            let key = match self.peek() {
                Some('"' | '\'') => self.parse_quoted()?,
                Some(_) => self.parse_bare_word()?.to_string(),
                None => return Err(LiteralError::UnexpectedEnd),
            };
            self.expect(':')?;
            let value = self.parse_value()?;
            entries.insert(key, value);
            if !self.eat(',') {
                self.expect('}')?;
                return Ok(entries);
            }
        }
    }

    fn parse_list(&mut self) -> LiteralResult<Value> {
        self.nested(Self::parse_list_items)
    }

    fn parse_list_items(&mut self) -> LiteralResult<Value> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            if self.eat(']') {
                return Ok(Value::Array(items));
            }
            items.push(self.parse_value()?);
            if !self.eat(',') {
                self.expect(']')?;
                return Ok(Value::Array(items));
            }
        }
    }

    fn nested<T>(&mut self, parse: fn(&mut Self) -> LiteralResult<T>) -> LiteralResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(LiteralError::TooDeep { offset: self.pos });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.src[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }
}

/// Parses `input` as exactly one literal value.
pub fn parse_literal(input: &str) -> LiteralResult<Value> {
    let mut parser = LiteralParser::new(input);
    let value = parser.parse_value()?;
    if !parser.is_at_end() {
        return Err(LiteralError::TrailingInput { offset: parser.pos });
    }
    Ok(value)
}

/// Interprets a bare word as a keyword or number.
///
/// Returns `None` for words that are neither.
pub fn scalar_from_word(word: &str) -> Option<Value> {
    match word {
        "True" | "true" => return Some(Value::Bool(true)),
        "False" | "false" => return Some(Value::Bool(false)),
        "None" | "null" => return Some(Value::Null),
        _ => {}
    }
    if let Ok(int) = word.parse::<i64>() {
        return Some(Value::Number(int.into()));
    }
    word.parse::<f64>()
        .ok()
        .filter(|float| float.is_finite())
        .and_then(Number::from_f64)
        .map(Value::Number)
}

fn is_bare_char(ch: char) -> bool {
    !ch.is_whitespace() && !matches!(ch, '"' | '\'' | ',' | ':' | '(' | ')' | '[' | ']' | '{' | '}')
}

fn unescape(ch: char) -> char {
    match ch {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        other => other,
    }
}
