use super::*;
use crate::shorthand::def;
use num_bigint::BigInt;
use pretty_assertions::assert_eq;

fn value(bytes: &[u8]) -> Value {
    Value::from_bytes(bytes, Encoding::default())
}

#[test]
fn test_parse_value_state() {
    let definition = def("value", 1);
    let parsed = ParseValue::new("value", definition.clone(), value(&[1])).unwrap();
    assert_eq!(parsed.name(), "value");
    assert_eq!(parsed.definition(), &definition);
    assert_eq!(parsed.value().slice().offset(), 0);
    assert_eq!(parsed.value().as_bytes(), &[1]);
}

#[test]
fn test_matching() {
    let definition = def("value", 1);
    let parsed = ParseValue::new("value", definition.clone(), value(&[1])).unwrap();
    assert!(parsed.matches_name("value"));
    assert!(!parsed.matches_name("lue"));
    assert!(!parsed.matches_name(".value"));
    assert!(parsed.matches_definition(&definition));
    // same structure, different token
    assert!(!parsed.matches_definition(&def("value", 1)));
}

#[test]
fn test_display() {
    let definition = def("value", 1);
    let small = ParseValue::new("value", definition.clone(), value(&[1])).unwrap();
    assert_eq!(small.to_string(), "pval(value:0x01)");
    let large = ParseValue::new("largerValue", definition, value(&[0, 1, 2, 3, 4])).unwrap();
    assert_eq!(large.to_string(), "pval(largerValue:0x00010203...)");
}

#[test]
fn test_empty_name() {
    let result = ParseValue::new("", def("value", 1), value(&[1]));
    assert_eq!(result.unwrap_err(), EngineError::EmptyName);
    assert_eq!(EngineError::EmptyName.to_string(), "Argument name may not be empty.");
}

#[test]
fn test_numeric_interpretation() {
    assert_eq!(value(&[0xff]).as_numeric(), BigInt::from(255));
    let signed = Value::from_bytes(vec![0xff], Encoding::signed());
    assert_eq!(signed.as_numeric(), BigInt::from(-1));
    let little = Value::from_bytes(vec![0x01, 0x02], Encoding::little_endian());
    assert_eq!(little.as_numeric(), BigInt::from(0x0201));
    assert_eq!(value(&[]).as_numeric(), BigInt::from(0));
}

#[test]
fn test_from_numeric_is_minimal() {
    let cases: [(i64, &[u8], Sign); 5] = [
        (0, &[0x00], Sign::Unsigned),
        (127, &[0x7f], Sign::Unsigned),
        (128, &[0x80], Sign::Unsigned),
        (256, &[0x01, 0x00], Sign::Unsigned),
        (-1, &[0xff], Sign::Signed),
    ];
    for (number, bytes, sign) in cases {
        let encoded = Value::from_numeric(&BigInt::from(number), Encoding::default());
        assert_eq!(encoded.as_bytes(), bytes, "{number}");
        assert_eq!(encoded.encoding().sign, sign, "{number}");
        assert_eq!(encoded.as_numeric(), BigInt::from(number));
    }
}

#[test]
fn test_from_numeric_signed_keeps_sign_byte() {
    let encoded = Value::from_numeric(&BigInt::from(128), Encoding::signed());
    assert_eq!(encoded.as_bytes(), &[0x00, 0x80]);
    assert_eq!(encoded.as_numeric(), BigInt::from(128));
}

#[test]
fn test_strings() {
    let text = Value::from_string("Hello", Encoding::default());
    assert_eq!(text.as_bytes(), b"Hello");
    assert_eq!(text.as_string(), "Hello");
    let utf8 = Encoding::default().with_charset(crate::data::Charset::Utf8);
    assert_eq!(Value::from_string("é", utf8).len(), 2);
    assert_eq!(Value::from_string("é", Encoding::default()).as_bytes(), &[0xe9]);
}
