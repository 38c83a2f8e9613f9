//! The in-memory document model.

use core::fmt;

use indexmap::map::Entry;
use indexmap::IndexMap;

macro_rules! impl_from {
    ($from:ty, $to:ty, $proj:expr) => {
        impl From<$from> for $to {
            fn from(x: $from) -> Self {
                $proj(x)
            }
        }
    };
}

/// A JSON number.
///
/// The reader distinguishes three representations and the distinction is
/// part of the public contract: integers that fit a 32-bit signed range,
/// wider 64-bit integers, and floating-point values (anything written with
/// a decimal point or an exponent). Serialization preserves the variant, so
/// `42`, `9999999999` and `42.0` round-trip to distinct values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Integral value within the 32-bit signed range.
    Int(i32),
    /// Integral value beyond the 32-bit signed range.
    Long(i64),
    /// Floating-point value, including the infinities and NaN that the
    /// lenient dialect can produce.
    Float(f64),
}

impl Number {
    /// The numeric value widened to `f64`.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(i) => f64::from(i),
            Number::Long(l) => l as f64,
            Number::Float(f) => f,
        }
    }

    /// The integral value, if this number is integral.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::Int(i) => Some(i64::from(i)),
            Number::Long(l) => Some(l),
            Number::Float(_) => None,
        }
    }

    /// Classify an integral value as narrow or wide.
    pub fn from_integral(value: i64) -> Self {
        match i32::try_from(value) {
            Ok(narrow) => Number::Int(narrow),
            Err(_) => Number::Long(value),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Number::Int(i) => i.fmt(f),
            Number::Long(l) => l.fmt(f),
            Number::Float(x) if x.is_nan() => "NaN".fmt(f),
            Number::Float(x) if x == f64::INFINITY => "Infinity".fmt(f),
            Number::Float(x) if x == f64::NEG_INFINITY => "-Infinity".fmt(f),
            // `{:?}` keeps the trailing `.0` on whole floats, which the
            // narrow/wide/float round trip relies on
            Number::Float(x) => write!(f, "{x:?}"),
        }
    }
}

/// A JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `null`
    Null,
    /// `true` or `false`
    Bool(bool),
    /// a number, see [`Number`]
    Number(Number),
    /// a string, already unescaped
    String(String),
    /// an ordered sequence of values
    Array(JsonArray),
    /// an insertion-ordered mapping from keys to values
    Object(JsonObject),
}

impl Value {
    /// Return true if this is `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The boolean value, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The number, if this is a number.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// The string slice, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The array, if this is an array.
    pub fn as_array(&self) -> Option<&JsonArray> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// The object, if this is an object.
    pub fn as_object(&self) -> Option<&JsonObject> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl_from!(bool, Value, Value::Bool);
impl_from!(Number, Value, Value::Number);
impl_from!(String, Value, Value::String);
impl_from!(JsonArray, Value, Value::Array);
impl_from!(JsonObject, Value, Value::Object);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Number(Number::Int(i))
    }
}

impl From<i64> for Value {
    fn from(l: i64) -> Self {
        Value::Number(Number::from_integral(l))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(Number::Float(f))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

/// Quote and escape a string for output.
///
/// A single level of escaping: quotation marks and backslashes, matching
/// what the scanner unescapes when reading.
pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => "null".fmt(f),
            Value::Bool(b) => b.fmt(f),
            Value::Number(n) => n.fmt(f),
            Value::String(s) => quote(s).fmt(f),
            Value::Array(a) => a.fmt(f),
            Value::Object(o) => o.fmt(f),
        }
    }
}

/// An ordered sequence of JSON values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsonArray {
    items: Vec<Value>,
}

impl JsonArray {
    /// Create an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value at the end.
    pub fn push(&mut self, value: impl Into<Value>) {
        self.items.push(value.into());
    }

    /// The value at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Return true if the array holds no values.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the values in order.
    pub fn iter(&self) -> core::slice::Iter<'_, Value> {
        self.items.iter()
    }
}

impl From<Vec<Value>> for JsonArray {
    fn from(items: Vec<Value>) -> Self {
        Self { items }
    }
}

impl FromIterator<Value> for JsonArray {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for JsonArray {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a JsonArray {
    type Item = &'a Value;
    type IntoIter = core::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for JsonArray {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        "[".fmt(f)?;
        let mut iter = self.items.iter();
        iter.next().iter().try_for_each(|v| write!(f, "{v}"))?;
        iter.try_for_each(|v| write!(f, ",{v}"))?;
        "]".fmt(f)
    }
}

/// An insertion-ordered mapping from string keys to JSON values.
///
/// Inserting a second value under an existing key does not overwrite it:
/// the slot is promoted to an array holding both the prior and the new
/// value, and further insertions under that key append to the array. This
/// also applies when the existing value already is an array, so repeated
/// insertion never nests arrays-of-arrays, and it applies to nulls, which
/// become explicit null entries instead of being dropped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsonObject {
    properties: IndexMap<String, Value>,
}

impl JsonObject {
    /// Create an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value under `key`, promoting duplicate keys to an array.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let value = value.into();
        match self.properties.entry(key.into()) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::Array(existing) => existing.push(value),
                single => {
                    let prior = core::mem::replace(single, Value::Null);
                    *single = Value::Array(JsonArray::from(vec![prior, value]));
                }
            },
        }
    }

    /// The value under `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Remove and return the value under `key`, keeping insertion order of
    /// the remaining properties.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.properties.shift_remove(key)
    }

    /// Return true if a value exists under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Iterate over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Return true if the object holds no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterate over key/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for JsonObject {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut obj = Self::new();
        for (k, v) in iter {
            obj.insert(k, v);
        }
        obj
    }
}

impl fmt::Display for JsonObject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        "{".fmt(f)?;
        let mut iter = self.properties.iter();
        iter.next()
            .iter()
            .try_for_each(|(k, v)| write!(f, "{}:{v}", quote(k)))?;
        iter.try_for_each(|(k, v)| write!(f, ",{}:{v}", quote(k)))?;
        "}".fmt(f)
    }
}

/// Coerce raw unquoted token text under the strict grammar.
///
/// Case-insensitive `null`, `true` and `false`; otherwise the text must
/// fully match `[+-]? digits (.digits)? ([eE][+-]?digits)?`. A match with a
/// dot or exponent is a [`Number::Float`], anything else is integral and
/// split into narrow and wide by magnitude.
pub(crate) fn coerce_scalar(text: &str) -> Option<Value> {
    if text.eq_ignore_ascii_case("null") {
        return Some(Value::Null);
    }
    if text.eq_ignore_ascii_case("true") {
        return Some(Value::Bool(true));
    }
    if text.eq_ignore_ascii_case("false") {
        return Some(Value::Bool(false));
    }
    coerce_number(text).map(Value::Number)
}

fn coerce_number(text: &str) -> Option<Number> {
    let sign: &[char] = &['+', '-'];
    let unsigned = text.strip_prefix(sign).unwrap_or(text);
    let (mantissa, exponent) = match unsigned.split_once(&['e', 'E'][..]) {
        Some((m, e)) => (m, Some(e)),
        None => (unsigned, None),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (mantissa, None),
    };
    if !all_digits(int_part) || !frac_part.map_or(true, all_digits) {
        return None;
    }
    if let Some(exp) = exponent {
        if !all_digits(exp.strip_prefix(sign).unwrap_or(exp)) {
            return None;
        }
    }
    if frac_part.is_some() || exponent.is_some() {
        text.parse().ok().map(Number::Float)
    } else {
        text.parse().ok().map(Number::from_integral)
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
