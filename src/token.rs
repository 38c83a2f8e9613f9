//! Structural tokens.

use crate::Value;

/// One structural event of a JSON document, as produced by
/// [`JsonReader::next_token`](crate::JsonReader::next_token).
///
/// Separators (`,` and `:`) are validated against the structural stack and
/// skipped; they never surface as tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `{`
    ObjectOpen,
    /// `}`
    ObjectClose,
    /// `[`
    ArrayOpen,
    /// `]`
    ArrayClose,
    /// A property key inside an object, already unquoted.
    PropertyKey(String),
    /// A scalar value: null, boolean, number or string.
    Scalar(Value),
}

impl Token {
    fn as_str(&self) -> &'static str {
        use Token::*;
        match self {
            ObjectOpen => "{",
            ObjectClose => "}",
            ArrayOpen => "[",
            ArrayClose => "]",
            PropertyKey(_) => "property key",
            Scalar(_) => "value",
        }
    }
}

impl core::fmt::Display for Token {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        self.as_str().fmt(f)
    }
}
