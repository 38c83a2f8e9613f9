//! Character-level input primitives.
//!
//! The [`Scanner`] turns a blocking byte stream into a stream of characters
//! with a single-slot pushback, whitespace skipping, quoted-text extraction
//! and delimited reads. It keeps a cumulative character count so that every
//! error can point at the exact offset in the input.

use std::io::{self, Read};

use crate::Error;

/// Text encoding of a byte stream.
///
/// UTF-8 is the default; Latin-1 maps every input byte to the code point of
/// the same value. Byte order marks are not interpreted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// UTF-8, decoded incrementally.
    #[default]
    Utf8,
    /// ISO 8859-1, one byte per character.
    Latin1,
}

/// Streaming character source over any [`std::io::Read`].
///
/// A scanner owns its stream exclusively and reads strictly forward; the
/// only way back is [`Scanner::push_back_current`], which rewinds exactly
/// one character.
pub struct Scanner<R> {
    source: R,
    encoding: Encoding,
    /// The character most recently handed out, kept for pushback.
    current: char,
    reuse: Option<char>,
    chars_read: u64,
}

impl<R: Read> Scanner<R> {
    /// Create a UTF-8 scanner over `source`.
    pub fn new(source: R) -> Self {
        Self::with_encoding(source, Encoding::default())
    }

    /// Create a scanner over `source` with an explicit encoding.
    pub fn with_encoding(source: R, encoding: Encoding) -> Self {
        Self {
            source,
            encoding,
            current: '\0',
            reuse: None,
            chars_read: 0,
        }
    }

    /// Cumulative number of characters consumed so far.
    ///
    /// Pushing a character back decrements the count again, so the value
    /// always names the position right after the last visible character.
    pub fn chars_read(&self) -> u64 {
        self.chars_read
    }

    /// Rewind exactly one character.
    ///
    /// The next [`Scanner::next_char`] returns the most recently consumed
    /// character again. Only one character can be pending at a time; a
    /// second pushback before the next read overwrites the first. Before
    /// the first read there is nothing to rewind and this does nothing.
    pub fn push_back_current(&mut self) {
        if self.chars_read > 0 {
            self.reuse = Some(self.current);
            self.chars_read -= 1;
        }
    }

    fn next_byte(&mut self) -> Result<Option<u8>, Error> {
        let mut buf = [0u8; 1];
        loop {
            match self.source.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Io(e)),
            }
        }
    }

    /// Decode one character from the stream, `None` at a clean end of input.
    fn decode_char(&mut self) -> Result<Option<char>, Error> {
        let b0 = match self.next_byte()? {
            Some(b) => b,
            None => return Ok(None),
        };
        match self.encoding {
            Encoding::Latin1 => Ok(Some(char::from(b0))),
            Encoding::Utf8 => {
                if b0 < 0x80 {
                    return Ok(Some(char::from(b0)));
                }
                let (len, init, min) = if b0 & 0xE0 == 0xC0 {
                    (2, u32::from(b0 & 0x1F), 0x80)
                } else if b0 & 0xF0 == 0xE0 {
                    (3, u32::from(b0 & 0x0F), 0x800)
                } else if b0 & 0xF8 == 0xF0 {
                    (4, u32::from(b0 & 0x07), 0x10000)
                } else {
                    return Err(self.encoding_error());
                };
                let mut code = init;
                for _ in 1..len {
                    let b = self.next_byte()?.ok_or_else(|| self.encoding_error())?;
                    if b & 0xC0 != 0x80 {
                        return Err(self.encoding_error());
                    }
                    code = (code << 6) | u32::from(b & 0x3F);
                }
                // reject overlong forms: the code point must need this length
                if code < min {
                    return Err(self.encoding_error());
                }
                char::from_u32(code)
                    .map(Some)
                    .ok_or_else(|| self.encoding_error())
            }
        }
    }

    fn encoding_error(&self) -> Error {
        Error::Encoding {
            position: self.chars_read,
        }
    }

    /// Read the next raw character, consuming a pending pushback first.
    ///
    /// Fails with [`Error::PrematureEnd`] when the stream is exhausted.
    pub fn next_char(&mut self) -> Result<char, Error> {
        if let Some(c) = self.reuse.take() {
            self.current = c;
            self.chars_read += 1;
            return Ok(c);
        }
        match self.decode_char()? {
            Some(c) => {
                self.current = c;
                self.chars_read += 1;
                Ok(c)
            }
            None => Err(Error::PrematureEnd {
                position: self.chars_read,
            }),
        }
    }

    /// Read characters until the first that is not whitespace.
    pub fn next_non_whitespace(&mut self) -> Result<char, Error> {
        loop {
            let c = self.next_char()?;
            if !c.is_whitespace() {
                return Ok(c);
            }
        }
    }

    /// Accumulate characters until one of `delims` is seen outside an
    /// escape.
    ///
    /// With `include_delims` the delimiter ends up in the result; otherwise
    /// it is pushed back so the next read sees it again. An escaped
    /// delimiter, escaped escape character or escaped line terminator is
    /// unescaped in the result; every other escape sequence is passed
    /// through literally.
    pub fn read_up_to(
        &mut self,
        include_delims: bool,
        escape: Option<char>,
        delims: &[char],
    ) -> Result<String, Error> {
        debug_assert!(!delims.is_empty());
        debug_assert!(escape.map_or(true, |e| !delims.contains(&e)));

        let mut out = String::new();
        let mut escaped = false;
        loop {
            let c = self.next_char()?;
            if escaped {
                if Some(c) == escape || c == '\n' || c == '\r' || delims.contains(&c) {
                    out.push(c);
                } else {
                    // unknown escape sequence, keep it as written
                    if let Some(e) = escape {
                        out.push(e);
                    }
                    out.push(c);
                }
                escaped = false;
            } else if Some(c) == escape {
                escaped = true;
            } else if delims.contains(&c) {
                if include_delims {
                    out.push(c);
                } else {
                    self.push_back_current();
                }
                return Ok(out);
            } else {
                out.push(c);
            }
        }
    }

    /// Read quoted text whose opening quote was already consumed, up to the
    /// matching unescaped quote.
    pub fn read_quoted(&mut self, quote: char, escape: Option<char>) -> Result<String, Error> {
        let mut text = self.read_up_to(true, escape, &[quote])?;
        text.pop();
        Ok(text)
    }
}
