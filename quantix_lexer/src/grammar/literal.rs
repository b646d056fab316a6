//! Quoted literal decoding
//!
//! Rule text quotes characters as `'x'` and strings as `"xyz"`. Inside either,
//! a backslash introduces one of six escapes: `\'` `\"` `\\` `\t` `\n` `\r`.
//! Anything else after a backslash is a defect in the rule text and is
//! reported as a [`RuleError`].

use crate::logging::codes::{self, Code};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("Invalid escape '\\{escape}' at position {position} of literal {text}")]
    MalformedEscape {
        escape: char,
        position: usize,
        text: String,
    },

    #[error("Malformed character literal {text}: expected one quoted character")]
    MalformedCharLiteral { text: String },

    #[error("Literal {text} ends inside an escape sequence")]
    UnterminatedEscape { text: String },

    #[error("Bracket expression at offset {offset} has no alternatives")]
    EmptyBracket { offset: usize },
}

impl RuleError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::MalformedEscape { .. } => codes::literal::MALFORMED_ESCAPE,
            Self::MalformedCharLiteral { .. } => codes::literal::MALFORMED_CHAR_LITERAL,
            Self::UnterminatedEscape { .. } => codes::literal::UNTERMINATED_ESCAPE,
            Self::EmptyBracket { .. } => codes::rules::EMPTY_BRACKET,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn severity(&self) -> codes::Severity {
        codes::get_severity(self.error_code().as_str())
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}

/// The character an escape letter stands for
pub fn unescape(c: char) -> Option<char> {
    match c {
        '\'' => Some('\''),
        '"' => Some('"'),
        '\\' => Some('\\'),
        't' => Some('\t'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        _ => None,
    }
}

/// Decode a raw character literal (`'a'` or `'\n'`, quotes included)
pub fn decode_char(literal: &[char]) -> Result<char, RuleError> {
    match literal {
        ['\'', '\\', escape, '\''] => unescape(*escape).ok_or_else(|| RuleError::MalformedEscape {
            escape: *escape,
            position: 1,
            text: literal.iter().collect(),
        }),
        ['\'', c, '\''] if *c != '\\' => Ok(*c),
        _ => Err(RuleError::MalformedCharLiteral {
            text: literal.iter().collect(),
        }),
    }
}

/// Replace every escape sequence in `literal` with the character it stands for
pub fn strip_escapes(literal: &[char]) -> Result<Vec<char>, RuleError> {
    let mut out = Vec::with_capacity(literal.len());
    let mut chars = literal.iter().enumerate();

    while let Some((position, &c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, &escape)) => {
                let decoded = unescape(escape).ok_or_else(|| RuleError::MalformedEscape {
                    escape,
                    position,
                    text: literal.iter().collect(),
                })?;
                out.push(decoded);
            }
            None => {
                return Err(RuleError::UnterminatedEscape {
                    text: literal.iter().collect(),
                })
            }
        }
    }

    Ok(out)
}

fn push_escaped(out: &mut String, c: char, quote: char) {
    match c {
        '\\' => out.push_str("\\\\"),
        '\t' => out.push_str("\\t"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        c => out.push(c),
    }
}

/// Raw char-literal text for `c`, e.g. `'\n'` for a newline
pub fn quote_char(c: char) -> String {
    let mut out = String::from("'");
    push_escaped(&mut out, c, '\'');
    out.push('\'');
    out
}

/// Raw string-literal text for `s`, e.g. `"a\"b"`
pub fn quote_str(s: &str) -> String {
    let mut out = String::from("\"");
    for c in s.chars() {
        push_escaped(&mut out, c, '"');
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test]
    fn test_decode_plain_and_escaped() {
        assert_eq!(decode_char(&chars("'a'")), Ok('a'));
        assert_eq!(decode_char(&chars(r"'\n'")), Ok('\n'));
        assert_eq!(decode_char(&chars(r"'\''")), Ok('\''));
        assert_eq!(decode_char(&chars(r"'\\'")), Ok('\\'));
        assert_eq!(decode_char(&chars(r#"'\"'"#)), Ok('"'));
        assert_eq!(decode_char(&chars("'é'")), Ok('é'));
    }

    #[test]
    fn test_decode_unknown_escape_is_error() {
        let err = decode_char(&chars(r"'\x'")).unwrap_err();
        assert_matches!(err, RuleError::MalformedEscape { escape: 'x', .. });
        assert_eq!(err.error_code(), codes::literal::MALFORMED_ESCAPE);
    }

    #[test]
    fn test_decode_rejects_bad_shapes() {
        for text in ["'ab'", "''", "a", r"'\'", "'a"] {
            assert_matches!(
                decode_char(&chars(text)),
                Err(RuleError::MalformedCharLiteral { .. }),
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_strip_escapes() {
        assert_eq!(
            strip_escapes(&chars(r#""tab\there\\""#)).unwrap(),
            chars("\"tab\there\\\"")
        );
        assert_matches!(
            strip_escapes(&chars(r"abc\")),
            Err(RuleError::UnterminatedEscape { .. })
        );
        assert_matches!(
            strip_escapes(&chars(r"a\zb")),
            Err(RuleError::MalformedEscape { escape: 'z', position: 1, .. })
        );
    }

    #[test]
    fn test_quote_helpers_decode_back() {
        for c in ['a', '\'', '"', '\\', '\t', '\n', '\r'] {
            assert_eq!(decode_char(&chars(&quote_char(c))), Ok(c));
        }
        assert_eq!(quote_str("a\"b\n"), r#""a\"b\n""#);
        assert_eq!(quote_char('"'), "'\"'");
    }
}
