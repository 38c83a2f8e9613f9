//! A lenient, JSON5-like dialect.
//!
//! On top of strict JSON, [`Json5`] accepts:
//!
//! * line (`// ...`) and block (`/* ... */`) comments between tokens,
//! * single-quoted strings,
//! * unquoted property names matching `[A-Za-z_$][A-Za-z0-9_$]*`,
//! * trailing and stray commas inside containers,
//! * hexadecimal integers (`0x1F`), `Infinity` and `NaN` (optionally
//!   signed), explicit leading `+`, and numbers with a leading or trailing
//!   decimal point.
//!
//! Nesting rules are not relaxed: brackets must match and property keys
//! still need their colon.

use std::io::{self, Read};

use crate::reader::{Dialect, JsonReader};
use crate::scan::{Encoding, Scanner};
use crate::stack::Frame;
use crate::value::{coerce_scalar, Number, Value};
use crate::{Error, Token};

/// A [`JsonReader`] using the lenient dialect.
pub type Json5Reader<R> = JsonReader<R, Json5>;

/// The lenient dialect.
pub struct Json5;

impl<R: Read> Json5Reader<R> {
    /// Create a lenient reader over a UTF-8 source.
    pub fn new(source: R) -> Self {
        Self::with_encoding(source, Encoding::default())
    }

    /// Create a lenient reader over a source with an explicit encoding.
    pub fn with_encoding(source: R, encoding: Encoding) -> Self {
        Self::build(source, encoding)
    }
}

impl Dialect for Json5 {
    fn next_token<R: Read>(reader: &mut JsonReader<R, Self>) -> Result<Token, Error> {
        let mut separated = false;
        loop {
            let c = reader.scan.next_non_whitespace()?;
            match c {
                ',' => {
                    let comma = reader.frames.stray_comma();
                    reader.check(comma)?;
                    separated = true;
                }
                ':' => {
                    let colon = reader.frames.colon();
                    reader.check(colon)?;
                }
                '/' => skip_comment(&mut reader.scan)?,
                // closes pass separated = false, so trailing commas pass
                '{' | '[' => return reader.structural(c, separated),
                '}' | ']' => return reader.structural(c, false),
                '"' | '\'' => return reader.string_token(c, separated),
                _ => {
                    if let Some(Frame::Object { .. }) = reader.frames.top() {
                        return identifier_key(reader, c, separated);
                    }
                    return reader.unquoted_token(c, separated, coerce_scalar_lenient);
                }
            }
        }
    }
}

/// Read an unquoted property name. The colon after it is left on the stream
/// and consumed like any other separator on the next call.
fn identifier_key<R: Read>(
    reader: &mut JsonReader<R, Json5>,
    first: char,
    separated: bool,
) -> Result<Token, Error> {
    let mut text = String::new();
    text.push(first);
    text.push_str(&reader.scan.read_up_to(false, None, &[':'])?);
    let name = text.trim_end();
    if !is_identifier(name) {
        return Err(Error::Structure {
            detail: format!("invalid unquoted property name {name:?}"),
            position: reader.chars_read(),
        });
    }
    let key = reader.frames.property_key(separated, false);
    reader.check(key)?;
    Ok(Token::PropertyKey(name.to_owned()))
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Skip a comment whose leading `/` was already consumed.
fn skip_comment<R: Read>(scan: &mut Scanner<io::BufReader<R>>) -> Result<(), Error> {
    match scan.next_char()? {
        '/' => scan.read_up_to(true, None, &['\n']).map(|_| ()),
        '*' => loop {
            scan.read_up_to(true, None, &['*'])?;
            if scan.next_char()? == '/' {
                return Ok(());
            }
            scan.push_back_current();
        },
        _ => Err(Error::Structure {
            detail: "unexpected '/'".into(),
            position: scan.chars_read(),
        }),
    }
}

/// Coerce raw unquoted token text under the lenient rules.
///
/// Everything the strict grammar accepts, plus hexadecimal integers, the
/// non-finite literals, an explicit `+` sign and a leading or trailing
/// decimal point.
pub(crate) fn coerce_scalar_lenient(text: &str) -> Option<Value> {
    if let Some(value) = coerce_scalar(text) {
        return Some(value);
    }
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    if body.eq_ignore_ascii_case("infinity") {
        let f = if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        return Some(Value::Number(Number::Float(f)));
    }
    if body.eq_ignore_ascii_case("nan") {
        return Some(Value::Number(Number::Float(f64::NAN)));
    }
    if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        let magnitude = i64::from_str_radix(hex, 16).ok()?;
        let signed = if negative { -magnitude } else { magnitude };
        return Some(Value::Number(Number::from_integral(signed)));
    }
    // a bare or dangling decimal point, as in `.5` or `5.`
    if body.contains('.') && body.bytes().any(|b| b.is_ascii_digit()) {
        let mut padded = String::with_capacity(body.len() + 2);
        if negative {
            padded.push('-');
        }
        if body.starts_with('.') {
            padded.push('0');
        }
        padded.push_str(body);
        if padded.ends_with('.') {
            padded.push('0');
        }
        return coerce_scalar(&padded);
    }
    None
}
