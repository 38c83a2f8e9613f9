//! Streaming JSON, pulled token by token.
//!
//! # Examples
//!
//! ## Reading a document into a value
//!
//! The simplest usage: hand the reader any `std::io::Read` and materialize
//! the whole document as a [`Value`]:
//!
//! ~~~
//! // our input JSON that we want to read
//! let json = br#"{"name": "ada", "scores": [1, 2.5, null]}"#;
//!
//! let mut reader = jsonpull::JsonReader::<_>::new(&json[..]);
//! let value = reader.read()?;
//!
//! // printing a value yields a compact representation with minimal spaces
//! assert_eq!(value.to_string(), r#"{"name":"ada","scores":[1,2.5,null]}"#);
//! # Ok::<(), jsonpull::Error>(())
//! ~~~
//!
//! Duplicate keys are not lost: a repeated key promotes the property to an
//! array holding every value in order.
//!
//! ~~~
//! let json = br#"{"tag": "a", "tag": "b"}"#;
//! let value = jsonpull::JsonReader::<_>::new(&json[..]).read()?;
//! assert_eq!(value.to_string(), r#"{"tag":["a","b"]}"#);
//! # Ok::<(), jsonpull::Error>(())
//! ~~~
//!
//! ## Operating on tokens
//!
//! For large inputs it is often better to walk the token stream directly,
//! which needs only constant memory. The following counts the values in a
//! document without building it:
//!
//! ~~~
//! use jsonpull::{JsonReader, Token};
//!
//! let json = br#"[null, true, {"x": 1, "y": [2, 3]}]"#;
//! let mut reader = JsonReader::<_>::new(&json[..]);
//!
//! let mut depth = 0;
//! let mut values = 0;
//! loop {
//!     match reader.next_token()? {
//!         Token::ObjectOpen | Token::ArrayOpen => {
//!             depth += 1;
//!             values += 1;
//!         }
//!         Token::ObjectClose | Token::ArrayClose => depth -= 1,
//!         Token::Scalar(_) => values += 1,
//!         Token::PropertyKey(_) => (),
//!     }
//!     if depth == 0 {
//!         break;
//!     }
//! }
//! assert_eq!(values, 8);
//! # Ok::<(), jsonpull::Error>(())
//! ~~~
//!
//! ## Streaming the items of a container
//!
//! [`JsonReader::next_item`] sits between the two: it materializes one item
//! of the current container at a time, so a huge array can be processed
//! while holding only a single element.
//!
//! ~~~
//! let json = br#"[{"n": 1}, {"n": 2}, {"n": 3}]"#;
//! let mut reader = jsonpull::JsonReader::<_>::new(&json[..]);
//! assert_eq!(reader.next_token()?, jsonpull::Token::ArrayOpen);
//!
//! let mut total = 0;
//! while let Some(item) = reader.next_item()? {
//!     if let Some(jsonpull::Number::Int(n)) = item.as_object().unwrap().get("n").unwrap().as_number() {
//!         total += n;
//!     }
//! }
//! assert_eq!(total, 6);
//! # Ok::<(), jsonpull::Error>(())
//! ~~~
//!
//! ## Writing
//!
//! The [`JsonWriter`] validates every call against the same structural
//! rules as the reader and inserts separators and indentation itself:
//!
//! ~~~
//! let mut out = Vec::new();
//! let mut writer = jsonpull::JsonWriter::new(&mut out);
//! writer.open_object()?;
//! writer.open_property("a")?;
//! writer.value(1)?;
//! writer.close_object()?;
//! writer.close()?;
//! assert_eq!(std::str::from_utf8(&out).unwrap(), "{\n\t\"a\": 1\n}\n");
//! # Ok::<(), jsonpull::Error>(())
//! ~~~
//!
//! ## JSON5
//!
//! [`Json5Reader`] accepts a lenient superset: comments, single quotes,
//! unquoted keys, trailing commas, hexadecimal numbers and non-finite
//! literals. Structural nesting stays strict.
//!
//! ~~~
//! let json5 = b"{ // config
//!     retries: 0x10,
//!     name: 'box',
//! }";
//! let value = jsonpull::Json5Reader::new(&json5[..]).read()?;
//! assert_eq!(value.to_string(), r#"{"retries":16,"name":"box"}"#);
//! # Ok::<(), jsonpull::Error>(())
//! ~~~

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod stack;

pub mod json5;
pub mod reader;
pub mod scan;
pub mod token;
pub mod value;
pub mod writer;

#[cfg(feature = "serde")]
mod serde;

pub use error::Error;
pub use json5::{Json5, Json5Reader};
pub use reader::{Dialect, JsonReader, Strict};
pub use scan::{Encoding, Scanner};
pub use token::Token;
pub use value::{JsonArray, JsonObject, Number, Value};
pub use writer::JsonWriter;
