//! Push-style JSON writing.
//!
//! A [`JsonWriter`] emits a document from explicit open/value/close calls
//! and validates every call against the same structural stack machine the
//! reader uses, so it cannot be talked into producing malformed output.
//! Separators, line breaks and indentation are inserted automatically.

use std::io::{self, Write};

use crate::scan::Encoding;
use crate::stack::{Slot, Structure, Violation};
use crate::value::{quote, Value};
use crate::Error;

/// Streaming JSON writer over any [`std::io::Write`].
///
/// By default the output is pretty-printed with one tab per nesting level
/// and `\n` line breaks; [`JsonWriter::set_compact`] switches to the
/// minimal single-line form. The output is buffered internally; call
/// [`JsonWriter::close`] (or [`JsonWriter::flush`]) to make it reach the
/// sink.
///
/// ~~~
/// let mut out = Vec::new();
/// let mut writer = jsonpull::JsonWriter::new(&mut out);
/// writer.set_compact(true);
/// writer.open_object()?;
/// writer.open_property("greeting")?;
/// writer.value("hello")?;
/// writer.close_object()?;
/// writer.close()?;
/// assert_eq!(out, br#"{"greeting":"hello"}"#);
/// # Ok::<(), jsonpull::Error>(())
/// ~~~
pub struct JsonWriter<W: Write> {
    sink: io::BufWriter<W>,
    encoding: Encoding,
    frames: Structure,
    indent: String,
    separator: String,
    linebreak: String,
    compact: bool,
    /// A complete root item has been written; a second one is an error.
    root_done: bool,
    /// Characters emitted so far, for error positions.
    written: u64,
}

impl<W: Write> JsonWriter<W> {
    /// Create a pretty-printing writer with UTF-8 output.
    pub fn new(sink: W) -> Self {
        Self::with_encoding(sink, Encoding::default())
    }

    /// Create a writer with an explicit output encoding.
    ///
    /// With [`Encoding::Latin1`], characters beyond the Latin-1 range are
    /// written as `?`.
    pub fn with_encoding(sink: W, encoding: Encoding) -> Self {
        Self {
            sink: io::BufWriter::new(sink),
            encoding,
            frames: Structure::new(),
            indent: "\t".to_owned(),
            separator: " ".to_owned(),
            linebreak: "\n".to_owned(),
            compact: false,
            root_done: false,
            written: 0,
        }
    }

    /// Cumulative number of characters emitted so far.
    pub fn chars_written(&self) -> u64 {
        self.written
    }

    /// Set the per-level indentation string.
    pub fn set_indent(&mut self, indent: impl Into<String>) {
        self.indent = indent.into();
    }

    /// Set the padding between a property key's colon and a scalar value.
    ///
    /// The colon itself is always written; an empty separator still yields
    /// valid JSON.
    pub fn set_separator(&mut self, separator: impl Into<String>) {
        self.separator = separator.into();
    }

    /// Set the line break string.
    pub fn set_linebreak(&mut self, linebreak: impl Into<String>) {
        self.linebreak = linebreak.into();
    }

    /// Toggle the minimal single-line form: no line breaks, no indentation,
    /// no padding after property keys and no final line break.
    pub fn set_compact(&mut self, compact: bool) {
        self.compact = compact;
    }

    fn emit(&mut self, text: &str) -> Result<(), Error> {
        for c in text.chars() {
            match self.encoding {
                Encoding::Utf8 => {
                    let mut buf = [0u8; 4];
                    self.sink.write_all(c.encode_utf8(&mut buf).as_bytes())?;
                }
                Encoding::Latin1 => {
                    let byte = u8::try_from(u32::from(c)).unwrap_or(b'?');
                    self.sink.write_all(&[byte])?;
                }
            }
            self.written += 1;
        }
        Ok(())
    }

    fn newline_indent(&mut self, depth: usize) -> Result<(), Error> {
        let mut lead = self.linebreak.clone();
        for _ in 0..depth {
            lead.push_str(&self.indent);
        }
        self.emit(&lead)
    }

    fn check<T>(&self, checked: Result<T, Violation>) -> Result<T, Error> {
        checked.map_err(|v| v.at(self.written))
    }

    fn check_root(&self) -> Result<(), Error> {
        if self.frames.is_empty() && self.root_done {
            return Err(Error::Structure {
                detail: "only one root item allowed".into(),
                position: self.written,
            });
        }
        Ok(())
    }

    /// Everything leading up to a value in slot `slot` at nesting `depth`:
    /// the comma after a previous sibling and the fresh indented line.
    /// A value behind a property key continues its key's line.
    fn lead_value(&mut self, slot: Slot, depth: usize) -> Result<(), Error> {
        if slot == Slot::NextValue {
            self.emit(",")?;
        }
        if !self.compact && matches!(slot, Slot::FirstValue | Slot::NextValue) {
            self.newline_indent(depth)?;
        }
        Ok(())
    }

    /// Open an object here.
    pub fn open_object(&mut self) -> Result<(), Error> {
        self.open_container(true)
    }

    /// Open an array here.
    pub fn open_array(&mut self) -> Result<(), Error> {
        self.open_container(false)
    }

    fn open_container(&mut self, object: bool) -> Result<(), Error> {
        self.check_root()?;
        let depth = self.frames.depth();
        let slot = if object {
            let open = self.frames.open_object(true);
            self.check(open)?
        } else {
            let open = self.frames.open_array(true);
            self.check(open)?
        };
        if slot == Slot::PropertyValue && !self.compact {
            // a container value starts on its own line below its key
            self.newline_indent(depth)?;
        } else {
            self.lead_value(slot, depth)?;
        }
        self.emit(if object { "{" } else { "[" })
    }

    /// Start a property inside the open object: its quoted key and the
    /// colon. Exactly one value, container or scalar, must follow before
    /// the object may close.
    pub fn open_property(&mut self, name: &str) -> Result<(), Error> {
        let depth = self.frames.depth();
        let key = self.frames.property_key(true, true);
        let first = self.check(key)?;
        if !first {
            self.emit(",")?;
        }
        if !self.compact {
            self.newline_indent(depth)?;
        }
        let quoted = quote(name);
        self.emit(&quoted)?;
        self.emit(":")
    }

    /// Write a scalar value here.
    ///
    /// Containers are rejected; open them with [`JsonWriter::open_object`]
    /// and [`JsonWriter::open_array`], or write a whole tree with
    /// [`JsonWriter::write_value`].
    pub fn value(&mut self, value: impl Into<Value>) -> Result<(), Error> {
        let value = value.into();
        if let Value::Array(_) | Value::Object(_) = value {
            return Err(Error::Structure {
                detail: "containers must be opened, not passed as values".into(),
                position: self.written,
            });
        }
        self.scalar(&value)
    }

    fn scalar(&mut self, value: &Value) -> Result<(), Error> {
        let depth = self.frames.depth();
        let slot = self.frames.scalar(true);
        let slot = self.check(slot)?;
        // the separator pads between the key's colon and a scalar value
        if slot == Slot::PropertyValue && !self.compact {
            let separator = self.separator.clone();
            self.emit(&separator)?;
        }
        self.lead_value(slot, depth)?;
        let text = match value {
            Value::String(s) => quote(s),
            other => other.to_string(),
        };
        self.emit(&text)
    }

    /// Write a whole [`Value`] tree here, containers included.
    pub fn write_value(&mut self, value: &Value) -> Result<(), Error> {
        match value {
            Value::Object(object) => {
                self.open_object()?;
                for (key, item) in object.iter() {
                    self.open_property(key)?;
                    self.write_value(item)?;
                }
                self.close_object()
            }
            Value::Array(array) => {
                self.open_array()?;
                for item in array {
                    self.write_value(item)?;
                }
                self.close_array()
            }
            scalar => self.scalar(scalar),
        }
    }

    /// Close the open object.
    pub fn close_object(&mut self) -> Result<(), Error> {
        let depth = self.frames.depth();
        let close = self.frames.close_object(false);
        let nonempty = self.check(close)?;
        if nonempty && !self.compact {
            self.newline_indent(depth - 1)?;
        }
        self.emit("}")?;
        self.root_done |= self.frames.is_empty();
        Ok(())
    }

    /// Close the open array.
    pub fn close_array(&mut self) -> Result<(), Error> {
        let depth = self.frames.depth();
        let close = self.frames.close_array(false);
        let nonempty = self.check(close)?;
        if nonempty && !self.compact {
            self.newline_indent(depth - 1)?;
        }
        self.emit("]")?;
        self.root_done |= self.frames.is_empty();
        Ok(())
    }

    /// Close every open item, writing `null` for a property that is still
    /// missing its value.
    pub fn close_all_open(&mut self) -> Result<(), Error> {
        use crate::stack::Frame;
        while let Some(top) = self.frames.top().copied() {
            match top {
                Frame::Object { .. } => self.close_object()?,
                Frame::Array { .. } => self.close_array()?,
                Frame::Property { .. } => self.value(Value::Null)?,
            }
        }
        Ok(())
    }

    /// Flush the internal buffer to the sink.
    pub fn flush(&mut self) -> Result<(), Error> {
        Ok(self.sink.flush()?)
    }

    /// Finish the document: write the final line break, flush, and fail
    /// with [`Error::UnclosedItems`] if any item is still open.
    pub fn close(mut self) -> Result<(), Error> {
        if !self.compact {
            let linebreak = self.linebreak.clone();
            self.emit(&linebreak)?;
        }
        self.sink.flush()?;
        if !self.frames.is_empty() {
            return Err(Error::UnclosedItems {
                frames: self.frames.describe(),
            });
        }
        Ok(())
    }
}
