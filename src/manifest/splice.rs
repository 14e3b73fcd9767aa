// ABOUTME: In-place replacement of one string scalar inside a YAML document's text.
// ABOUTME: Candidate spans are checked by re-parsing so only the intended value changes.

use serde_yaml::Value;

/// How a scalar is written in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Plain,
    SingleQuoted,
    DoubleQuoted,
}

/// Byte range of a scalar's contents, excluding any quotes.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
    style: Style,
}

/// Replace the scalar `old` with `new` in `text`.
///
/// `expected` is the parsed document with the replacement already applied.
/// A candidate is accepted only when the edited text parses to exactly that
/// document, so occurrences in comments, in other fields, or inside longer
/// values are never touched. Returns `None` when no span qualifies.
pub(crate) fn replace_scalar(
    text: &str,
    old: &str,
    new: &str,
    expected: &Value,
) -> Option<String> {
    candidates(text, old).into_iter().find_map(|span| {
        let edited = splice(text, span, new);
        match serde_yaml::from_str::<Value>(&edited) {
            Ok(doc) if &doc == expected => Some(edited),
            _ => None,
        }
    })
}

fn candidates(text: &str, old: &str) -> Vec<Span> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();

    if old.is_empty() {
        for quote in ["\"\"", "''"] {
            for (at, _) in text.match_indices(quote) {
                let style = if quote.starts_with('"') {
                    Style::DoubleQuoted
                } else {
                    Style::SingleQuoted
                };
                spans.push(Span {
                    start: at + 1,
                    end: at + 1,
                    style,
                });
            }
        }
        spans.sort_by_key(|s| s.start);
        return spans;
    }

    for (start, _) in text.match_indices(old) {
        let end = start + old.len();
        let before = start.checked_sub(1).map(|i| bytes[i]);
        let after = bytes.get(end).copied();
        let style = match (before, after) {
            (Some(b'"'), Some(b'"')) => Style::DoubleQuoted,
            (Some(b'\''), Some(b'\'')) => Style::SingleQuoted,
            _ => Style::Plain,
        };
        spans.push(Span { start, end, style });
    }
    spans
}

fn splice(text: &str, span: Span, new: &str) -> String {
    let rendered = match span.style {
        Style::Plain if is_plain_safe(new) => new.to_string(),
        Style::Plain => format!("\"{}\"", escape_double(new)),
        Style::DoubleQuoted => escape_double(new),
        Style::SingleQuoted => new.replace('\'', "''"),
    };

    let mut out = String::with_capacity(text.len() + rendered.len());
    out.push_str(&text[..span.start]);
    out.push_str(&rendered);
    out.push_str(&text[span.end..]);
    out
}

/// Words that YAML 1.1 readers such as kubectl resolve to booleans or null.
const RESERVED_WORDS: &[&str] = &[
    "y", "n", "yes", "no", "on", "off", "true", "false", "null",
];

/// Whether `value` reads back as the same string when written unquoted,
/// under both YAML 1.1 and 1.2 resolution rules.
fn is_plain_safe(value: &str) -> bool {
    let Some(first) = value.chars().next() else {
        return false;
    };
    // A leading digit is fine only when the value cannot be read as a number.
    let typed_as_string =
        first.is_ascii_alphabetic() || (first.is_ascii_digit() && value.contains('/'));
    typed_as_string
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '/' | ':' | '@' | '-'))
        && !value.ends_with(':')
        && !RESERVED_WORDS.contains(&value.to_ascii_lowercase().as_str())
}

fn escape_double(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed_with(text: &str, key: &str, value: &str) -> Value {
        let mut doc: Value = serde_yaml::from_str(text).unwrap();
        doc[key] = Value::String(value.to_string());
        doc
    }

    #[test]
    fn skips_occurrences_outside_the_target_value() {
        let text = "# image: api:v1\nname: api:v1-old\nimage: api:v1 # current\n";
        let expected = parsed_with(text, "image", "api:v2");

        let edited = replace_scalar(text, "api:v1", "api:v2", &expected).unwrap();
        assert_eq!(
            edited,
            "# image: api:v1\nname: api:v1-old\nimage: api:v2 # current\n"
        );
    }

    #[test]
    fn keeps_quote_style() {
        let text = "a: 'x'\nimage: \"old\"\n";
        let expected = parsed_with(text, "image", "new");
        assert_eq!(
            replace_scalar(text, "old", "new", &expected).unwrap(),
            "a: 'x'\nimage: \"new\"\n"
        );

        let text = "image: 'old'\n";
        let expected = parsed_with(text, "image", "it's");
        assert_eq!(
            replace_scalar(text, "old", "it's", &expected).unwrap(),
            "image: 'it''s'\n"
        );
    }

    #[test]
    fn quotes_plain_values_that_would_change_type() {
        for word in ["yes", "On", "123", "1:20", "-x", "a b", ""] {
            assert!(!is_plain_safe(word), "{word}");
        }
        assert!(is_plain_safe("123.dkr.ecr.eu-west-1.amazonaws.com/team/api:v3"));
        assert!(is_plain_safe("registry.example.com/team/api:v3"));

        let text = "image: old\n";
        let expected = parsed_with(text, "image", "yes");
        assert_eq!(
            replace_scalar(text, "old", "yes", &expected).unwrap(),
            "image: \"yes\"\n"
        );
    }

    #[test]
    fn fills_empty_quoted_value() {
        let text = "image: \"\"\n";
        let expected = parsed_with(text, "image", "api:v1");
        assert_eq!(
            replace_scalar(text, "", "api:v1", &expected).unwrap(),
            "image: \"api:v1\"\n"
        );
    }

    #[test]
    fn gives_up_when_no_span_matches() {
        let text = "image: &img api:v1\nother: *img\n";
        let expected = parsed_with(text, "image", "api:v2");
        assert!(replace_scalar(text, "api:v1", "api:v2", &expected).is_none());
    }
}
