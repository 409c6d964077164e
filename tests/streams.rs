//! End-to-end decoding tests over hand-built record streams.
//!
//! Each test constructs a raw byte stream the way the binary formatter lays it out
//! (header record first, `MessageEnd` last) and checks the projected value tree or
//! the reported error.

use std::collections::BTreeMap;

use nrbf::{deserialize, Error, Value};

/// `SerializedStreamHeader`: rootId=1, headerId=-1, version 1.0
fn header() -> Vec<u8> {
    let mut data = vec![0x00];
    push_u32(&mut data, 1);
    push_u32(&mut data, u32::MAX);
    push_u32(&mut data, 1);
    push_u32(&mut data, 0);
    data
}

fn push_u32(data: &mut Vec<u8>, value: u32) {
    data.extend_from_slice(&value.to_le_bytes());
}

fn push_i32(data: &mut Vec<u8>, value: i32) {
    data.extend_from_slice(&value.to_le_bytes());
}

/// Length-prefixed string; test strings stay under 128 bytes so the prefix is one byte
fn push_str(data: &mut Vec<u8>, value: &str) {
    assert!(value.len() < 0x80);
    data.push(u8::try_from(value.len()).unwrap());
    data.extend_from_slice(value.as_bytes());
}

/// `BinaryObjectString` record
fn push_string_object(data: &mut Vec<u8>, object_id: u32, value: &str) {
    data.push(0x06);
    push_u32(data, object_id);
    push_str(data, value);
}

fn object(members: Vec<(&str, Value)>) -> Value {
    Value::Object(
        members
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect::<BTreeMap<_, _>>(),
    )
}

#[test]
fn header_only_stream_has_no_root() {
    let mut data = header();
    data.push(0x0B);

    assert!(matches!(deserialize(&data), Err(Error::NoRoot)));
}

#[test]
fn string_root() {
    let mut data = header();
    push_string_object(&mut data, 2, "hello");
    data.push(0x0B);

    assert_eq!(deserialize(&data).unwrap(), Value::String("hello".to_string()));
}

#[test]
fn class_with_two_inline_primitives() {
    let mut data = header();
    // SystemClassWithMembersAndTypes: id=1 "Foo" { a: Int32, b: Boolean }
    data.push(0x04);
    push_u32(&mut data, 1);
    push_str(&mut data, "Foo");
    push_u32(&mut data, 2);
    push_str(&mut data, "a");
    push_str(&mut data, "b");
    data.extend_from_slice(&[0x00, 0x00]);
    data.extend_from_slice(&[0x08, 0x01]);
    push_i32(&mut data, 42);
    data.push(0x01);
    data.push(0x0B);

    assert_eq!(
        deserialize(&data).unwrap(),
        object(vec![("a", Value::Int32(42)), ("b", Value::Boolean(true))])
    );
}

#[test]
fn class_with_library() {
    let mut data = header();
    // BinaryLibrary: id=2 "MyLib"
    data.push(0x0C);
    push_u32(&mut data, 2);
    push_str(&mut data, "MyLib");
    // ClassWithMembersAndTypes: id=1 "Ns.Foo" { n: Int32 }, library 2
    data.push(0x05);
    push_u32(&mut data, 1);
    push_str(&mut data, "Ns.Foo");
    push_u32(&mut data, 1);
    push_str(&mut data, "n");
    data.extend_from_slice(&[0x00, 0x08]);
    push_u32(&mut data, 2);
    push_i32(&mut data, 5);
    data.push(0x0B);

    assert_eq!(deserialize(&data).unwrap(), object(vec![("n", Value::Int32(5))]));
}

#[test]
fn forward_reference_resolves_to_string() {
    let mut data = header();
    // Class id=1 "Foo" { s: String }, member arrives as a forward reference
    data.push(0x04);
    push_u32(&mut data, 1);
    push_str(&mut data, "Foo");
    push_u32(&mut data, 1);
    push_str(&mut data, "s");
    data.push(0x01);
    // MemberReference to id=10, defined below
    data.push(0x09);
    push_u32(&mut data, 10);
    push_string_object(&mut data, 10, "hi");
    push_string_object(&mut data, 11, "yo");
    data.push(0x0B);

    assert_eq!(
        deserialize(&data).unwrap(),
        object(vec![("s", Value::String("hi".to_string()))])
    );
}

#[test]
fn backward_reference_through_object_table() {
    use nrbf::records::{GraphBuilder, Slot};

    let mut data = header();
    push_string_object(&mut data, 10, "first");
    push_string_object(&mut data, 11, "second");
    // Class defined after the strings, pointing back at id=10
    data.push(0x04);
    push_u32(&mut data, 1);
    push_str(&mut data, "Foo");
    push_u32(&mut data, 1);
    push_str(&mut data, "s");
    data.push(0x01);
    data.push(0x09);
    push_u32(&mut data, 10);
    data.push(0x0B);

    let graph = GraphBuilder::new(&data).unwrap().run().unwrap();
    // The root is the first object the stream defined, not the class
    assert_eq!(graph.root(), Some(10));
    // The reference placeholder was rewritten to the resolved object id
    assert_eq!(graph.instance(1).unwrap().members[0], Slot::Object(10));
    assert_eq!(
        deserialize(&data).unwrap(),
        Value::String("first".to_string())
    );
}

#[test]
fn enum_box_collapses_to_payload() {
    let mut data = header();
    data.push(0x04);
    push_u32(&mut data, 1);
    push_str(&mut data, "Color");
    push_u32(&mut data, 1);
    push_str(&mut data, "value__");
    data.extend_from_slice(&[0x00, 0x08]);
    push_i32(&mut data, 7);
    data.push(0x0B);

    assert_eq!(deserialize(&data).unwrap(), Value::Int32(7));
}

#[test]
fn list_wrapper_collapses_to_items() {
    let mut data = header();
    // List wrapper: _items is a reference to a primitive array, _size is bookkeeping
    data.push(0x04);
    push_u32(&mut data, 1);
    push_str(&mut data, "List`1");
    push_u32(&mut data, 2);
    push_str(&mut data, "_items");
    push_str(&mut data, "_size");
    data.extend_from_slice(&[0x02, 0x00]);
    data.push(0x08);
    data.push(0x09);
    push_u32(&mut data, 2);
    push_i32(&mut data, 3);
    // ArraySinglePrimitive: id=2, three Int32 elements
    data.push(0x0F);
    push_u32(&mut data, 2);
    push_u32(&mut data, 3);
    data.push(0x08);
    push_i32(&mut data, 1);
    push_i32(&mut data, 2);
    push_i32(&mut data, 3);
    data.push(0x0B);

    assert_eq!(
        deserialize(&data).unwrap(),
        Value::Array(vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)])
    );
}

#[test]
fn string_array_through_reference() {
    let mut data = header();
    data.push(0x04);
    push_u32(&mut data, 1);
    push_str(&mut data, "Wrap");
    push_u32(&mut data, 1);
    push_str(&mut data, "arr");
    data.push(0x06);
    data.push(0x09);
    push_u32(&mut data, 5);
    // BinaryArray: id=5, single-dimensional, two String elements
    data.push(0x07);
    push_u32(&mut data, 5);
    data.push(0x00);
    push_u32(&mut data, 1);
    push_u32(&mut data, 2);
    data.push(0x01);
    push_string_object(&mut data, 20, "x");
    push_string_object(&mut data, 21, "y");
    data.push(0x0B);

    assert_eq!(
        deserialize(&data).unwrap(),
        object(vec![(
            "arr",
            Value::Array(vec![
                Value::String("x".to_string()),
                Value::String("y".to_string()),
            ])
        )])
    );
}

#[test]
fn object_array_with_null_runs() {
    let mut data = header();
    // BinaryArray as the first (root) object: four Object elements
    data.push(0x07);
    push_u32(&mut data, 1);
    data.push(0x00);
    push_u32(&mut data, 1);
    push_u32(&mut data, 4);
    data.push(0x02);
    // one null, a run of two nulls, then a string
    data.push(0x0A);
    data.extend_from_slice(&[0x0D, 0x02]);
    push_string_object(&mut data, 9, "x");
    data.push(0x0B);

    assert_eq!(
        deserialize(&data).unwrap(),
        Value::Array(vec![
            Value::Null,
            Value::Null,
            Value::Null,
            Value::String("x".to_string()),
        ])
    );
}

#[test]
fn rectangular_array_fills_sum_of_lengths() {
    let mut data = header();
    // Rank-2 rectangular array of Int32: lengths 2 and 3 give five inline slots
    data.push(0x07);
    push_u32(&mut data, 1);
    data.push(0x02);
    push_u32(&mut data, 2);
    push_u32(&mut data, 2);
    push_u32(&mut data, 3);
    data.extend_from_slice(&[0x00, 0x08]);
    for n in 1..=5 {
        push_i32(&mut data, n);
    }
    data.push(0x0B);

    assert_eq!(
        deserialize(&data).unwrap(),
        Value::Array(vec![
            Value::Int32(1),
            Value::Int32(2),
            Value::Int32(3),
            Value::Int32(4),
            Value::Int32(5),
        ])
    );
}

#[test]
fn projected_keys_match_member_names() {
    let mut data = header();
    data.push(0x04);
    push_u32(&mut data, 1);
    push_str(&mut data, "Point");
    push_u32(&mut data, 2);
    push_str(&mut data, "x");
    push_str(&mut data, "y");
    data.extend_from_slice(&[0x00, 0x00]);
    data.extend_from_slice(&[0x08, 0x08]);
    push_i32(&mut data, -1);
    push_i32(&mut data, 2);
    data.push(0x0B);

    let value = deserialize(&data).unwrap();
    let members = value.as_object().unwrap();
    assert_eq!(
        members.keys().cloned().collect::<Vec<_>>(),
        vec!["x".to_string(), "y".to_string()]
    );
}

#[test]
fn error_empty_input() {
    assert!(matches!(deserialize(&[]), Err(Error::Empty)));
}

#[test]
fn error_invalid_leading_byte() {
    assert!(matches!(
        deserialize(&[0x0B]),
        Err(Error::InvalidHeader(0x0B))
    ));
}

#[test]
fn error_unknown_record_tag() {
    let mut data = header();
    data.push(0x02);

    assert!(matches!(deserialize(&data), Err(Error::UnknownRecord(0x02))));
}

#[test]
fn error_unassigned_primitive_code() {
    let mut data = header();
    data.push(0x0F);
    push_u32(&mut data, 1);
    push_u32(&mut data, 0);
    data.push(0x04);
    data.push(0x0B);

    assert!(matches!(
        deserialize(&data),
        Err(Error::UnsupportedPrimitive(4))
    ));
}

#[test]
fn error_truncated_mid_record() {
    let mut data = header();
    data.extend_from_slice(&[0x06, 0x02, 0x00]);

    assert!(matches!(deserialize(&data), Err(Error::TruncatedInput)));
}

#[test]
fn error_dangling_reference() {
    let mut data = header();
    data.push(0x04);
    push_u32(&mut data, 1);
    push_str(&mut data, "Foo");
    push_u32(&mut data, 1);
    push_str(&mut data, "s");
    data.push(0x01);
    data.push(0x09);
    push_u32(&mut data, 99);
    data.push(0x0B);

    assert!(matches!(
        deserialize(&data),
        Err(Error::DanglingReference(99))
    ));
}

#[test]
fn error_string_length_past_end() {
    let mut data = header();
    data.push(0x06);
    push_u32(&mut data, 2);
    data.extend_from_slice(&[0x7F, b'a', b'b']);
    data.push(0x0B);

    assert!(matches!(deserialize(&data), Err(Error::MalformedLength)));
}
