//! Pull-style JSON reading.
//!
//! A [`JsonReader`] offers three ways of consuming a document, freely
//! mixable within one read:
//!
//! * [`JsonReader::read`] materializes the whole document as a [`Value`],
//! * [`JsonReader::next_token`] walks the document one structural
//!   [`Token`] at a time without building anything,
//! * [`JsonReader::next_item`] streams the items of the current container,
//!   materializing each item (and only that item) as a [`Value`].
//!
//! The reader is parameterized by a [`Dialect`]; [`Strict`] is the default
//! and [`crate::json5::Json5`] accepts a JSON5-like superset.

use std::io::{self, Read};

use crate::scan::{Encoding, Scanner};
use crate::stack::{Frame, Structure, Violation};
use crate::value::{coerce_scalar, JsonArray, JsonObject, Value};
use crate::{Error, Token};

/// The token grammar of one JSON flavor.
///
/// A dialect decides what the characters between structural tokens mean:
/// which quotes delimit strings, which literals are valid scalars, whether
/// comments and stray commas are tolerated. The structural stack machine is
/// shared by all dialects, so nesting rules never vary.
pub trait Dialect {
    /// Lex and validate the next structural token.
    fn next_token<R: Read>(reader: &mut JsonReader<R, Self>) -> Result<Token, Error>
    where
        Self: Sized;
}

/// Standard JSON with strict separator enforcement.
///
/// Every comma and colon must be present exactly where the grammar puts it;
/// trailing and doubled commas are rejected. Unquoted literals are the
/// case-insensitive `null`, `true` and `false` and plain decimal numbers.
pub struct Strict;

impl Dialect for Strict {
    fn next_token<R: Read>(reader: &mut JsonReader<R, Self>) -> Result<Token, Error> {
        let mut c = reader.scan.next_non_whitespace()?;
        let mut separated = false;
        if c == ',' {
            let comma = reader.frames.comma();
            reader.check(comma)?;
            separated = true;
            c = reader.scan.next_non_whitespace()?;
            if c == ',' {
                return Err(Error::Structure {
                    detail: "unexpected ','".into(),
                    position: reader.position(),
                });
            }
        }
        if c == ':' {
            let colon = reader.frames.colon();
            reader.check(colon)?;
            c = reader.scan.next_non_whitespace()?;
        }
        match c {
            '{' | '}' | '[' | ']' => reader.structural(c, separated),
            '"' => reader.string_token('"', separated),
            _ => reader.unquoted_token(c, separated, coerce_scalar),
        }
    }
}

/// Streaming JSON reader over any [`std::io::Read`].
///
/// The reader owns its source, buffers it internally and keeps a cumulative
/// character count so that every error names an input offset. Reading never
/// recovers: after the first error the reader is in an unspecified state
/// and must be dropped.
pub struct JsonReader<R, D = Strict> {
    pub(crate) scan: Scanner<io::BufReader<R>>,
    pub(crate) frames: Structure,
    /// A close token that [`JsonReader::next_item`] already validated but
    /// has not surfaced through [`JsonReader::next_token`] yet.
    pub(crate) pending: Option<Token>,
    pub(crate) started: bool,
    dialect: core::marker::PhantomData<D>,
}

impl<R: Read> JsonReader<R> {
    /// Create a strict reader over a UTF-8 source.
    pub fn new(source: R) -> Self {
        Self::with_encoding(source, Encoding::default())
    }

    /// Create a strict reader over a source with an explicit encoding.
    pub fn with_encoding(source: R, encoding: Encoding) -> Self {
        Self::build(source, encoding)
    }
}

impl<R: Read, D: Dialect> JsonReader<R, D> {
    pub(crate) fn build(source: R, encoding: Encoding) -> Self {
        Self {
            scan: Scanner::with_encoding(io::BufReader::new(source), encoding),
            frames: Structure::new(),
            pending: None,
            started: false,
            dialect: core::marker::PhantomData,
        }
    }

    /// Cumulative number of characters consumed from the source.
    pub fn chars_read(&self) -> u64 {
        self.scan.chars_read()
    }

    fn position(&self) -> u64 {
        self.scan.chars_read()
    }

    /// Attach the current input offset to a structural violation.
    pub(crate) fn check<T>(&self, checked: Result<T, Violation>) -> Result<T, Error> {
        checked.map_err(|v| v.at(self.position()))
    }

    /// Read the whole document and materialize it as a [`Value`].
    ///
    /// The document root must be an object or an array. This is a
    /// single-shot operation: it fails once any part of the document has
    /// been consumed, through whichever read mode.
    pub fn read(&mut self) -> Result<Value, Error> {
        if self.started {
            return Err(Error::Structure {
                detail: "document already (partially) consumed".into(),
                position: self.position(),
            });
        }
        self.started = true;
        match D::next_token(self)? {
            Token::ObjectOpen => self.read_object_tree().map(Value::Object),
            Token::ArrayOpen => self.read_array_tree().map(Value::Array),
            other => Err(Error::Structure {
                detail: format!("expected an object or array at document root, got {other}"),
                position: self.position(),
            }),
        }
    }

    /// Lex, validate and return the next structural token.
    ///
    /// Separators never surface; they are validated and skipped. After the
    /// root container closed, another document may follow on the same
    /// stream and is read with further calls.
    pub fn next_token(&mut self) -> Result<Token, Error> {
        self.started = true;
        if let Some(token) = self.pending.take() {
            return Ok(token);
        }
        D::next_token(self)
    }

    /// Materialize the next item of the current container.
    ///
    /// Scalars come back directly, containers are read to completion as
    /// trees. At the end of the current container this returns `Ok(None)`,
    /// and keeps doing so until the close is consumed with
    /// [`JsonReader::next_token`]. Requesting an item where the document
    /// has a property key is an error; keys are only reachable through the
    /// token interface.
    pub fn next_item(&mut self) -> Result<Option<Value>, Error> {
        self.started = true;
        if self.pending.is_some() {
            return Ok(None);
        }
        match D::next_token(self)? {
            Token::ObjectOpen => self.read_object_tree().map(|o| Some(Value::Object(o))),
            Token::ArrayOpen => self.read_array_tree().map(|a| Some(Value::Array(a))),
            Token::Scalar(value) => Ok(Some(value)),
            token @ (Token::ObjectClose | Token::ArrayClose) => {
                self.pending = Some(token);
                Ok(None)
            }
            Token::PropertyKey(_) => Err(Error::Structure {
                detail: "property key where a value was requested".into(),
                position: self.position(),
            }),
        }
    }

    /// Read the remaining properties of the object being read, up to and
    /// including its close.
    ///
    /// Duplicate keys are promoted: the second value under a key turns the
    /// property into an array of both, later ones append.
    pub fn read_object_tree(&mut self) -> Result<JsonObject, Error> {
        let mut object = JsonObject::new();
        loop {
            match D::next_token(self)? {
                Token::ObjectClose => return Ok(object),
                Token::PropertyKey(key) => {
                    let value = match D::next_token(self)? {
                        Token::ObjectOpen => Value::Object(self.read_object_tree()?),
                        Token::ArrayOpen => Value::Array(self.read_array_tree()?),
                        Token::Scalar(value) => value,
                        other => {
                            return Err(Error::Structure {
                                detail: format!("expected a property value, got {other}"),
                                position: self.position(),
                            })
                        }
                    };
                    object.insert(key, value);
                }
                other => {
                    return Err(Error::Structure {
                        detail: format!("expected a property key, got {other}"),
                        position: self.position(),
                    })
                }
            }
        }
    }

    /// Read the remaining values of the array being read, up to and
    /// including its close.
    pub fn read_array_tree(&mut self) -> Result<JsonArray, Error> {
        let mut array = JsonArray::new();
        loop {
            match D::next_token(self)? {
                Token::ArrayClose => return Ok(array),
                Token::ObjectOpen => array.push(Value::Object(self.read_object_tree()?)),
                Token::ArrayOpen => array.push(Value::Array(self.read_array_tree()?)),
                Token::Scalar(value) => array.push(value),
                other => {
                    return Err(Error::Structure {
                        detail: format!("expected a value, got {other}"),
                        position: self.position(),
                    })
                }
            }
        }
    }

    /// Apply one of the four bracket characters to the stack machine.
    pub(crate) fn structural(&mut self, c: char, separated: bool) -> Result<Token, Error> {
        match c {
            '{' => {
                let open = self.frames.open_object(separated);
                self.check(open)?;
                Ok(Token::ObjectOpen)
            }
            '}' => {
                let close = self.frames.close_object(separated);
                self.check(close)?;
                Ok(Token::ObjectClose)
            }
            '[' => {
                let open = self.frames.open_array(separated);
                self.check(open)?;
                Ok(Token::ArrayOpen)
            }
            _ => {
                let close = self.frames.close_array(separated);
                self.check(close)?;
                Ok(Token::ArrayClose)
            }
        }
    }

    /// Read quoted text whose opening quote was already consumed; inside an
    /// object it is a property key, elsewhere a string value.
    pub(crate) fn string_token(&mut self, quote: char, separated: bool) -> Result<Token, Error> {
        let text = self.scan.read_quoted(quote, Some('\\'))?;
        if let Some(Frame::Object { .. }) = self.frames.top() {
            let key = self.frames.property_key(separated, false);
            self.check(key)?;
            Ok(Token::PropertyKey(text))
        } else {
            let scalar = self.frames.scalar(separated);
            self.check(scalar)?;
            Ok(Token::Scalar(Value::String(text)))
        }
    }

    /// Read unquoted literal text starting at `first` and coerce it.
    pub(crate) fn unquoted_token(
        &mut self,
        first: char,
        separated: bool,
        coerce: impl Fn(&str) -> Option<Value>,
    ) -> Result<Token, Error> {
        // judge the placement before consuming the literal, so a bare root
        // scalar fails structurally instead of running into end of input
        if self.frames.is_empty() {
            let scalar = self.frames.scalar(separated);
            self.check(scalar)?;
        }
        // the literal runs until the separator or close of its container
        let closer = match self.frames.top() {
            Some(Frame::Property { .. }) => '}',
            _ => ']',
        };
        let mut text = String::new();
        text.push(first);
        text.push_str(&self.scan.read_up_to(false, None, &[',', closer])?);
        let text = text.trim();
        let value = coerce(text).ok_or_else(|| Error::InvalidScalar {
            text: text.to_owned(),
            position: self.position(),
        })?;
        let scalar = self.frames.scalar(separated);
        self.check(scalar)?;
        Ok(Token::Scalar(value))
    }
}
