use jsonpull::{
    Encoding, Error, Json5Reader, JsonReader, JsonWriter, Number, Token, Value,
};

fn int(i: i32) -> Value {
    Value::Number(Number::Int(i))
}

fn long(l: i64) -> Value {
    Value::Number(Number::Long(l))
}

fn float(f: f64) -> Value {
    Value::Number(Number::Float(f))
}

fn s(s: &str) -> Value {
    Value::String(s.to_owned())
}

fn arr<const N: usize>(v: [Value; N]) -> Value {
    Value::Array(v.into_iter().collect())
}

fn obj<const N: usize>(v: [(&str, Value); N]) -> Value {
    Value::Object(v.into_iter().map(|(k, v)| (k.to_owned(), v)).collect())
}

fn reads_to(json: &str, v: Value) -> Result<(), Error> {
    let parsed = JsonReader::<_>::new(json.as_bytes()).read()?;
    assert_eq!(parsed, v);
    Ok(())
}

fn json5_reads_to(json: &str, v: Value) -> Result<(), Error> {
    let parsed = Json5Reader::new(json.as_bytes()).read()?;
    assert_eq!(parsed, v);
    Ok(())
}

fn read_err(json: &str) -> Error {
    JsonReader::<_>::new(json.as_bytes()).read().unwrap_err()
}

fn json5_err(json: &str) -> Error {
    Json5Reader::new(json.as_bytes()).read().unwrap_err()
}

#[test]
fn basic() -> Result<(), Error> {
    reads_to("[null, true, false]", arr([Value::Null, Value::Bool(true), Value::Bool(false)]))?;
    // literals are matched case-insensitively
    reads_to("[NULL, True, FALSE]", arr([Value::Null, Value::Bool(true), Value::Bool(false)]))?;

    reads_to("[]", arr([]))?;
    reads_to("{}", obj([]))?;
    reads_to("[[]]", arr([arr([])]))?;
    reads_to(r#"{"a": 0}"#, obj([("a", int(0))]))?;
    reads_to(
        r#"{"a": {"b": [1, 2]}, "c": false}"#,
        obj([
            ("a", obj([("b", arr([int(1), int(2)]))])),
            ("c", Value::Bool(false)),
        ]),
    )?;

    assert!(matches!(read_err("[nul]"), Error::InvalidScalar { .. }));
    assert!(matches!(read_err("[tru e]"), Error::InvalidScalar { .. }));

    Ok(())
}

#[test]
fn numbers() -> Result<(), Error> {
    reads_to("[0, 42, -42, +7]", arr([int(0), int(42), int(-42), int(7)]))?;

    // integers are narrow up to 32 bits, wide up to 64
    reads_to("[2147483647]", arr([int(i32::MAX)]))?;
    reads_to("[-2147483648]", arr([int(i32::MIN)]))?;
    reads_to("[2147483648]", arr([long(2147483648)]))?;
    reads_to("[-2147483649]", arr([long(-2147483649)]))?;
    reads_to("[9223372036854775807]", arr([long(i64::MAX)]))?;
    assert!(matches!(
        read_err("[9223372036854775808]"),
        Error::InvalidScalar { .. }
    ));

    // a decimal point or exponent makes a number floating, even for x.0
    reads_to("[3.14, 42.0]", arr([float(3.14), float(42.0)]))?;
    reads_to("[299e6, -1.2e3, 5E-1]", arr([float(299e6), float(-1.2e3), float(0.5)]))?;

    assert!(matches!(read_err("[-]"), Error::InvalidScalar { .. }));
    assert!(matches!(read_err("[1.2.3]"), Error::InvalidScalar { .. }));
    assert!(matches!(read_err("[0x10]"), Error::InvalidScalar { .. }));

    Ok(())
}

#[test]
fn strings() -> Result<(), Error> {
    reads_to(r#"["Hello 日本"]"#, arr([s("Hello 日本")]))?;

    // quotation marks and backslashes are unescaped
    reads_to(r#"["a\"b"]"#, arr([s("a\"b")]))?;
    reads_to(r#"["a\\b"]"#, arr([s("a\\b")]))?;
    // any other escape sequence passes through as written
    reads_to(r#"["a\qb"]"#, arr([s("a\\qb")]))?;
    reads_to(r#"["a\nb"]"#, arr([s("a\\nb")]))?;
    // an escaped literal line terminator is kept without its backslash
    reads_to("[\"a\\\nb\"]", arr([s("a\nb")]))?;

    assert!(matches!(read_err(r#"["abcd"#), Error::PrematureEnd { .. }));

    Ok(())
}

#[test]
fn duplicate_keys() -> Result<(), Error> {
    // the second value promotes the property to an array, later ones append
    reads_to(
        r#"{"a": 1, "a": 2, "a": 3}"#,
        obj([("a", arr([int(1), int(2), int(3)]))]),
    )?;
    // nulls are kept, not dropped
    reads_to(
        r#"{"a": null, "a": null}"#,
        obj([("a", arr([Value::Null, Value::Null]))]),
    )?;

    let mut object = jsonpull::JsonObject::new();
    object.insert("a", 1);
    assert_eq!(object.get("a"), Some(&int(1)));
    object.insert("a", 2);
    assert_eq!(object.get("a"), Some(&arr([int(1), int(2)])));
    object.insert("a", 3);
    assert_eq!(object.get("a"), Some(&arr([int(1), int(2), int(3)])));

    // an array put there by hand is appended to as well
    object.insert("b", arr([int(1)]));
    object.insert("b", 2);
    assert_eq!(object.get("b"), Some(&arr([int(1), int(2)])));

    assert_eq!(object.keys().collect::<Vec<_>>(), ["a", "b"]);
    assert_eq!(object.remove("a"), Some(arr([int(1), int(2), int(3)])));
    assert!(!object.contains_key("a"));

    Ok(())
}

#[test]
fn separators() {
    assert!(matches!(read_err(r#"["a" "b"]"#), Error::Structure { .. }));
    // an unquoted literal swallows everything up to the next separator,
    // so a missing comma between numbers shows up as a bad literal
    assert!(matches!(read_err("[1 2]"), Error::InvalidScalar { .. }));
    assert!(matches!(read_err("[1,,2]"), Error::Structure { .. }));
    assert!(matches!(read_err("[1, 2,]"), Error::Structure { .. }));
    assert!(matches!(read_err("[,1]"), Error::Structure { .. }));
    assert!(matches!(read_err(r#"{"a": 1,}"#), Error::Structure { .. }));
    assert!(matches!(read_err(r#"{"a": "x" "b": 2}"#), Error::Structure { .. }));
    assert!(matches!(read_err(r#"{"a" 1}"#), Error::Structure { .. }));
    assert!(matches!(read_err(r#"{"a", 1}"#), Error::Structure { .. }));
    assert!(matches!(read_err(r#"{"a": ["x"}"#), Error::Structure { .. }));
    assert!(matches!(read_err(r#"{"a": "x"]"#), Error::Structure { .. }));
}

#[test]
fn document_root() {
    // only objects and arrays may form a document
    assert!(matches!(read_err(r#""hi""#), Error::Structure { .. }));
    // a bare literal is judged before it is consumed
    assert!(matches!(read_err("true"), Error::Structure { .. }));
    assert!(matches!(read_err("42"), Error::Structure { .. }));
    assert!(matches!(json5_err("NaN"), Error::Structure { .. }));

    let mut reader = JsonReader::<_>::new(&b"[1] [2]"[..]);
    reader.read().unwrap();
    // the document has been consumed, whole-document reads are single-shot
    assert!(matches!(reader.read(), Err(Error::Structure { .. })));
}

#[test]
fn error_positions() {
    match read_err("[1, x]") {
        Error::InvalidScalar { text, position } => {
            assert_eq!(text, "x");
            assert_eq!(position, 5);
        }
        other => panic!("unexpected error: {other}"),
    }
    match read_err("[1") {
        Error::PrematureEnd { position } => assert_eq!(position, 2),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn tokens() -> Result<(), Error> {
    let json = br#"{"a": [true, "x"], "b": 0}"#;
    let mut reader = JsonReader::<_>::new(&json[..]);
    let expected = [
        Token::ObjectOpen,
        Token::PropertyKey("a".to_owned()),
        Token::ArrayOpen,
        Token::Scalar(Value::Bool(true)),
        Token::Scalar(s("x")),
        Token::ArrayClose,
        Token::PropertyKey("b".to_owned()),
        Token::Scalar(int(0)),
        Token::ObjectClose,
    ];
    for token in expected {
        assert_eq!(reader.next_token()?, token);
    }
    Ok(())
}

#[test]
fn sequential_documents() -> Result<(), Error> {
    let mut reader = JsonReader::<_>::new(&b"[1] [2]"[..]);
    for n in [1, 2] {
        assert_eq!(reader.next_token()?, Token::ArrayOpen);
        assert_eq!(reader.next_token()?, Token::Scalar(int(n)));
        assert_eq!(reader.next_token()?, Token::ArrayClose);
    }
    assert!(matches!(reader.next_token(), Err(Error::PrematureEnd { .. })));
    Ok(())
}

#[test]
fn items() -> Result<(), Error> {
    let json = br#"[1, [2, 3], {"x": 4}]"#;
    let mut reader = JsonReader::<_>::new(&json[..]);
    assert_eq!(reader.next_token()?, Token::ArrayOpen);

    assert_eq!(reader.next_item()?, Some(int(1)));
    assert_eq!(reader.next_item()?, Some(arr([int(2), int(3)])));
    assert_eq!(reader.next_item()?, Some(obj([("x", int(4))])));

    // the end of the container is reported as often as asked for
    assert_eq!(reader.next_item()?, None);
    assert_eq!(reader.next_item()?, None);
    // and the close itself is still there for the token interface
    assert_eq!(reader.next_token()?, Token::ArrayClose);

    Ok(())
}

#[test]
fn items_need_values() -> Result<(), Error> {
    let mut reader = JsonReader::<_>::new(&br#"{"a": 1}"#[..]);
    assert_eq!(reader.next_token()?, Token::ObjectOpen);
    // property keys cannot be requested as items
    assert!(matches!(reader.next_item(), Err(Error::Structure { .. })));
    Ok(())
}

#[test]
fn mixing_modes() -> Result<(), Error> {
    let mut reader = JsonReader::<_>::new(&br#"{"a": [1, 2]}"#[..]);
    assert_eq!(reader.next_token()?, Token::ObjectOpen);
    assert_eq!(reader.next_token()?, Token::PropertyKey("a".to_owned()));
    assert_eq!(reader.next_token()?, Token::ArrayOpen);
    assert_eq!(reader.next_item()?, Some(int(1)));
    assert_eq!(reader.next_item()?, Some(int(2)));
    assert_eq!(reader.next_item()?, None);
    assert_eq!(reader.next_token()?, Token::ArrayClose);
    assert_eq!(reader.next_token()?, Token::ObjectClose);

    // a whole-document read is no longer possible on this reader
    let mut reader = JsonReader::<_>::new(&br#"{"a": 1}"#[..]);
    reader.next_token()?;
    assert!(matches!(reader.read(), Err(Error::Structure { .. })));
    Ok(())
}

#[test]
fn display() -> Result<(), Error> {
    let json = r#"{"a": [1, 2.5, null], "b": {"c": "d\"e"}}"#;
    let value = JsonReader::<_>::new(json.as_bytes()).read()?;
    assert_eq!(
        value.to_string(),
        r#"{"a":[1,2.5,null],"b":{"c":"d\"e"}}"#
    );
    Ok(())
}

#[test]
fn write_compact() -> Result<(), Error> {
    let mut out = Vec::new();
    let mut writer = JsonWriter::new(&mut out);
    writer.set_compact(true);
    writer.open_object()?;
    writer.open_property("a")?;
    writer.value(1)?;
    writer.open_property("b")?;
    writer.open_array()?;
    writer.value("x")?;
    writer.value(Value::Null)?;
    writer.close_array()?;
    writer.close_object()?;
    writer.close()?;
    assert_eq!(std::str::from_utf8(&out).unwrap(), r#"{"a":1,"b":["x",null]}"#);
    Ok(())
}

#[test]
fn write_pretty() -> Result<(), Error> {
    let mut out = Vec::new();
    let mut writer = JsonWriter::new(&mut out);
    writer.open_object()?;
    writer.open_property("a")?;
    writer.value(1)?;
    writer.close_object()?;
    writer.close()?;
    assert_eq!(std::str::from_utf8(&out).unwrap(), "{\n\t\"a\": 1\n}\n");

    let mut out = Vec::new();
    let mut writer = JsonWriter::new(&mut out);
    writer.open_object()?;
    writer.open_property("a")?;
    writer.open_object()?;
    writer.open_property("b")?;
    writer.value(1)?;
    writer.close_object()?;
    writer.close_object()?;
    writer.close()?;
    // a container value starts on its own line, directly after the colon
    assert_eq!(
        std::str::from_utf8(&out).unwrap(),
        "{\n\t\"a\":\n\t\t{\n\t\t\t\"b\": 1\n\t\t}\n}\n"
    );

    // empty containers close on the same line
    let mut out = Vec::new();
    let mut writer = JsonWriter::new(&mut out);
    writer.open_array()?;
    writer.open_object()?;
    writer.close_object()?;
    writer.close_array()?;
    writer.close()?;
    assert_eq!(std::str::from_utf8(&out).unwrap(), "[\n\t{}\n]\n");

    Ok(())
}

#[test]
fn write_configuration() -> Result<(), Error> {
    // the colon is always written; the separator only pads the value
    let mut out = Vec::new();
    let mut writer = JsonWriter::new(&mut out);
    writer.set_indent("  ");
    writer.set_separator("");
    writer.set_linebreak("\r\n");
    writer.open_object()?;
    writer.open_property("a")?;
    writer.value(true)?;
    writer.close_object()?;
    writer.close()?;
    assert_eq!(
        std::str::from_utf8(&out).unwrap(),
        "{\r\n  \"a\":true\r\n}\r\n"
    );

    // all three strings empty gives the compact form, still valid JSON
    let mut out = Vec::new();
    let mut writer = JsonWriter::new(&mut out);
    writer.set_indent("");
    writer.set_separator("");
    writer.set_linebreak("");
    writer.open_object()?;
    writer.open_property("a")?;
    writer.value(1)?;
    writer.open_property("b")?;
    writer.open_array()?;
    writer.value(2)?;
    writer.close_array()?;
    writer.close_object()?;
    writer.close()?;
    assert_eq!(std::str::from_utf8(&out).unwrap(), r#"{"a":1,"b":[2]}"#);
    assert_eq!(
        JsonReader::<_>::new(&out[..]).read()?,
        obj([("a", int(1)), ("b", arr([int(2)]))])
    );
    Ok(())
}

#[test]
fn write_structure() -> Result<(), Error> {
    let mut out = Vec::new();
    let mut writer = JsonWriter::new(&mut out);
    writer.set_compact(true);

    // scalars cannot form a document
    assert!(matches!(writer.value(1), Err(Error::Structure { .. })));
    writer.open_object()?;
    // a mismatched close leaves the writer usable
    assert!(matches!(writer.close_array(), Err(Error::Structure { .. })));
    // values need a property key first
    assert!(matches!(writer.value(1), Err(Error::Structure { .. })));
    writer.open_property("a")?;
    // containers go through open calls
    assert!(matches!(
        writer.value(Value::Array(jsonpull::JsonArray::new())),
        Err(Error::Structure { .. })
    ));
    writer.value(1)?;
    writer.close_object()?;
    // only one root item per document
    assert!(matches!(writer.open_array(), Err(Error::Structure { .. })));
    writer.close()?;
    assert_eq!(std::str::from_utf8(&out).unwrap(), r#"{"a":1}"#);
    Ok(())
}

#[test]
fn write_unclosed() -> Result<(), Error> {
    let mut out = Vec::new();
    let mut writer = JsonWriter::new(&mut out);
    writer.open_object()?;
    writer.open_property("a")?;
    writer.open_array()?;
    match writer.close() {
        Err(Error::UnclosedItems { frames }) => {
            assert_eq!(frames, "/object/property value/array");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let mut out = Vec::new();
    let mut writer = JsonWriter::new(&mut out);
    writer.set_compact(true);
    writer.open_object()?;
    writer.open_property("a")?;
    writer.open_array()?;
    writer.value(1)?;
    // close_all_open finishes every open item, writing null for a
    // property that never got its value
    writer.close_all_open()?;
    writer.close()?;
    assert_eq!(std::str::from_utf8(&out).unwrap(), r#"{"a":[1]}"#);
    Ok(())
}

#[test]
fn write_value_roundtrip() -> Result<(), Error> {
    let json = r#"{"a": [1, 2.5, null, {"b": "c"}], "d": {}, "e": [[]], "f": true}"#;
    let value = JsonReader::<_>::new(json.as_bytes()).read()?;

    let mut out = Vec::new();
    let mut writer = JsonWriter::new(&mut out);
    writer.set_compact(true);
    writer.write_value(&value)?;
    writer.close()?;

    // the compact writer output matches the display form
    assert_eq!(std::str::from_utf8(&out).unwrap(), value.to_string());
    // and reads back to the same value
    assert_eq!(JsonReader::<_>::new(&out[..]).read()?, value);

    // the pretty form reads back identically as well
    let mut out = Vec::new();
    let mut writer = JsonWriter::new(&mut out);
    writer.write_value(&value)?;
    writer.close()?;
    assert_eq!(JsonReader::<_>::new(&out[..]).read()?, value);
    Ok(())
}

#[test]
fn json5() -> Result<(), Error> {
    json5_reads_to(
        "{foo: 'bar', baz: 1,}",
        obj([("foo", s("bar")), ("baz", int(1))]),
    )?;
    json5_reads_to(
        "[1, /* two */ 2, // three\n 3]",
        arr([int(1), int(2), int(3)]),
    )?;
    json5_reads_to(
        "{ // all of it\n  _x$2: [0x1F, -0x10], }",
        obj([("_x$2", arr([int(31), int(-16)]))]),
    )?;
    json5_reads_to("['it\\'s']", arr([s("it's")]))?;
    json5_reads_to("[1, 2,]", arr([int(1), int(2)]))?;
    json5_reads_to("[1,,2]", arr([int(1), int(2)]))?;
    json5_reads_to("[+1, .5, 2., -.25]", arr([int(1), float(0.5), float(2.0), float(-0.25)]))?;

    let parsed = Json5Reader::new(&b"[Infinity, -Infinity, NaN]"[..]).read()?;
    let array = parsed.as_array().unwrap();
    assert_eq!(array.get(0), Some(&float(f64::INFINITY)));
    assert_eq!(array.get(1), Some(&float(f64::NEG_INFINITY)));
    match array.get(2).and_then(Value::as_number) {
        Some(Number::Float(f)) => assert!(f.is_nan()),
        other => panic!("unexpected value: {other:?}"),
    }

    Ok(())
}

#[test]
fn json5_structure() {
    // leniency covers separators and literals, not nesting
    assert!(matches!(json5_err("['a' 'b']"), Error::Structure { .. }));
    assert!(matches!(json5_err(r#"{"a" 1}"#), Error::Structure { .. }));
    assert!(matches!(json5_err("{'a': ['x'}"), Error::Structure { .. }));
    assert!(matches!(json5_err("{1x: 2}"), Error::Structure { .. }));
}

#[test]
fn strict_rejects_leniencies() {
    assert!(matches!(read_err("[1, 2,]"), Error::Structure { .. }));
    assert!(matches!(read_err("['a']"), Error::InvalidScalar { .. }));
    assert!(matches!(read_err("[// x\n1]"), Error::InvalidScalar { .. }));
    assert!(matches!(read_err("[Infinity]"), Error::InvalidScalar { .. }));
}

#[test]
fn constructors() -> Result<(), Error> {
    // every constructor works without naming the dialect parameter
    assert_eq!(JsonReader::<_>::new(&b"[]"[..]).read()?, arr([]));
    assert_eq!(
        JsonReader::<_>::with_encoding(&b"[]"[..], Encoding::Utf8).read()?,
        arr([])
    );
    assert_eq!(Json5Reader::new(&b"[]"[..]).read()?, arr([]));
    assert_eq!(
        Json5Reader::with_encoding(&b"['caf\xe9']"[..], Encoding::Latin1).read()?,
        arr([s("café")])
    );
    Ok(())
}

#[test]
fn scanner_pushback() -> Result<(), Error> {
    let mut scanner = jsonpull::Scanner::new(&b"ab"[..]);
    // rewinding before anything was read has no effect
    scanner.push_back_current();
    assert_eq!(scanner.chars_read(), 0);

    assert_eq!(scanner.next_char()?, 'a');
    assert_eq!(scanner.chars_read(), 1);
    scanner.push_back_current();
    assert_eq!(scanner.chars_read(), 0);
    assert_eq!(scanner.next_char()?, 'a');
    assert_eq!(scanner.next_char()?, 'b');
    assert_eq!(scanner.chars_read(), 2);
    Ok(())
}

#[test]
fn overlong_utf8() {
    // C0 80 is an overlong encoding of NUL
    let bytes = b"[\"\xc0\x80\"]";
    let result = JsonReader::<_>::new(&bytes[..]).read();
    assert!(matches!(result, Err(Error::Encoding { .. })));
    // E0 80 80, overlong for a three-byte sequence
    let bytes = b"[\"\xe0\x80\x80\"]";
    let result = JsonReader::<_>::new(&bytes[..]).read();
    assert!(matches!(result, Err(Error::Encoding { .. })));
    // F0 80 80 80, overlong for a four-byte sequence
    let bytes = b"[\"\xf0\x80\x80\x80\"]";
    let result = JsonReader::<_>::new(&bytes[..]).read();
    assert!(matches!(result, Err(Error::Encoding { .. })));
}

#[test]
fn latin1() -> Result<(), Error> {
    let bytes = b"[\"caf\xe9\"]";
    let parsed = JsonReader::<_>::with_encoding(&bytes[..], Encoding::Latin1).read()?;
    assert_eq!(parsed, arr([s("café")]));

    // the same bytes are not valid UTF-8
    let result = JsonReader::<_>::new(&bytes[..]).read();
    assert!(matches!(result, Err(Error::Encoding { .. })));

    // on output, characters beyond Latin-1 become '?'
    let mut out = Vec::new();
    let mut writer = JsonWriter::with_encoding(&mut out, Encoding::Latin1);
    writer.set_compact(true);
    writer.open_array()?;
    writer.value("héllo→")?;
    writer.close_array()?;
    writer.close()?;
    assert_eq!(out, b"[\"h\xe9llo?\"]");

    Ok(())
}
