//! Single-line text rendering for records and record lists.

use serde_json::Value;

/// Appends a mapping-literal rendering of `value` to `out`.
///
/// Strings are single-quoted, booleans render as `True`/`False` and null as
/// `None`, so the output reads like the attribute dictionary it mirrors.
pub fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Number(number) => out.push_str(&number.to_string()),
        Value::String(text) => write_quoted(out, text, '\''),
        Value::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(entries) => {
            write_mapping(out, entries.iter().map(|(key, value)| (key.as_str(), value)));
        }
    }
}

/// Appends `{'k': v, ...}` for the given entries, in iteration order.
pub fn write_mapping<'a>(
    out: &mut String,
    entries: impl IntoIterator<Item = (&'a str, &'a Value)>,
) {
    out.push('{');
    for (index, (key, value)) in entries.into_iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        write_quoted(out, key, '\'');
        out.push_str(": ");
        write_value(out, value);
    }
    out.push('}');
}

/// Renders a list of already rendered lines as `["...", "..."]`.
pub fn render_list<I, T>(lines: I) -> String
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut out = String::from("[");
    for (index, line) in lines.into_iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        write_quoted(&mut out, line.as_ref(), '"');
    }
    out.push(']');
    out
}

fn write_quoted(out: &mut String, text: &str, quote: char) {
    out.push(quote);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch == quote => {
                out.push('\\');
                out.push(ch);
            }
            ch => out.push(ch),
        }
    }
    out.push(quote);
}

#[cfg(test)]
mod tests {
    use super::{render_list, write_value};
    use serde_json::json;

    fn render(value: serde_json::Value) -> String {
        let mut out = String::new();
        write_value(&mut out, &value);
        out
    }

    #[test]
    fn scalars_render_like_attribute_dictionaries() {
        assert_eq!(render(json!(null)), "None");
        assert_eq!(render(json!(true)), "True");
        assert_eq!(render(json!(3)), "3");
        assert_eq!(render(json!(0.0)), "0.0");
        assert_eq!(render(json!("it's")), r"'it\'s'");
    }

    #[test]
    fn nested_values_render_inline() {
        assert_eq!(
            render(json!({"ids": ["a", 1], "ok": false})),
            "{'ids': ['a', 1], 'ok': False}"
        );
    }

    #[test]
    fn lists_quote_each_line() {
        assert_eq!(render_list(Vec::<String>::new()), "[]");
        assert_eq!(
            render_list(["[User] (1) {'id': '1'}", "a \"b\""]),
            r#"["[User] (1) {'id': '1'}", "a \"b\""]"#
        );
    }
}
