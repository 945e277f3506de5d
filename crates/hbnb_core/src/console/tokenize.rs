//! Whitespace tokenizer for verb-first lines.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Raised when a quote opened on the line is never closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnterminatedQuote {
    pub quote: char,
}

impl Display for UnterminatedQuote {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "no closing {} quotation", self.quote)
    }
}

impl Error for UnterminatedQuote {}

/// Splits `line` on whitespace, keeping quoted substrings together.
///
/// Double and single quotes group text and are stripped; a backslash
/// escapes the next character outside single quotes. Adjacent quoted and
/// bare segments join into one word (`a"b c"` is `ab c`).
pub fn split_words(line: &str) -> Result<Vec<String>, UnterminatedQuote> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some('\''), '\'') | (Some('"'), '"') => quote = None,
            (Some('"'), '\\') => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => return Err(UnterminatedQuote { quote: '"' }),
            },
            (Some(_), ch) => current.push(ch),
            (None, '"' | '\'') => {
                quote = Some(ch);
                in_word = true;
            }
            (None, '\\') => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
                in_word = true;
            }
            (None, ch) if ch.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, ch) => {
                current.push(ch);
                in_word = true;
            }
        }
    }

    if let Some(quote) = quote {
        return Err(UnterminatedQuote { quote });
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::{split_words, UnterminatedQuote};

    #[test]
    fn splits_on_any_whitespace() {
        assert_eq!(
            split_words("  show\tUser   42 ").unwrap(),
            vec!["show", "User", "42"]
        );
    }

    #[test]
    fn quotes_group_and_are_stripped() {
        assert_eq!(
            split_words(r#"create "Place" 'two words' "say \"hi\"""#).unwrap(),
            vec!["create", "Place", "two words", "say \"hi\""]
        );
    }

    #[test]
    fn empty_quotes_yield_empty_word() {
        assert_eq!(
            split_words(r#"update City 1 name """#).unwrap(),
            vec!["update", "City", "1", "name", ""]
        );
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        assert_eq!(
            split_words("show \"User"),
            Err(UnterminatedQuote { quote: '"' })
        );
        assert_eq!(
            split_words("show 'User"),
            Err(UnterminatedQuote { quote: '\'' })
        );
    }
}
