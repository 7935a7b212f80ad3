//! Integration tests for the NUMBER codec and `PackedNumber`.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use oracle_marshal_rs::protocol::codec::{decode_number, decode_oracle_number, encode_number};
use oracle_marshal_rs::{Error, PackedNumber};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Known encodings, length byte first.
const VECTORS: &[(&str, &[u8])] = &[
    ("0", &[1, 128]),
    ("1", &[2, 193, 2]),
    ("-1", &[3, 62, 100, 102]),
    ("100", &[2, 194, 2]),
    ("0.5", &[2, 192, 51]),
    ("-0.5", &[3, 63, 51, 102]),
    ("0.01", &[2, 192, 2]),
    ("12.3", &[3, 193, 13, 31]),
    ("123.456", &[5, 194, 2, 24, 46, 61]),
    ("-123.456", &[6, 61, 100, 78, 56, 41, 102]),
    ("-3.14", &[4, 62, 98, 87, 102]),
    ("20800", &[3, 195, 3, 9]),
    ("-4000", &[3, 61, 61, 102]),
    ("0.0001234", &[4, 191, 2, 24, 41]),
    ("9223372036854775807", &[11, 202, 10, 23, 34, 73, 4, 69, 55, 78, 59, 8]),
    (
        "-9223372036854775808",
        &[12, 53, 92, 79, 68, 29, 98, 33, 47, 24, 43, 93, 102],
    ),
    (
        "99999999999999999999999999999999999999",
        &[
            20, 211, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100,
            100, 100, 100, 100,
        ],
    ),
    // Twenty mantissa bytes leave no room for the negative terminator.
    (
        "1234567890123456789012345678901234567890",
        &[
            21, 212, 13, 35, 57, 79, 91, 13, 35, 57, 79, 91, 13, 35, 57, 79, 91, 13, 35, 57, 79,
            91,
        ],
    ),
    (
        "-1234567890123456789012345678901234567890",
        &[
            21, 43, 89, 67, 45, 23, 11, 89, 67, 45, 23, 11, 89, 67, 45, 23, 11, 89, 67, 45, 23, 11,
        ],
    ),
];

fn used(bytes: &[u8; 22]) -> &[u8] {
    &bytes[..=bytes[0] as usize]
}

/// Canonical decimal text for significant `digits` with the point `point`
/// places after the first digit (negative: leading zeros).
fn canonical(negative: bool, digits: &str, point: i32) -> String {
    let n = digits.len() as i32;
    let body = if point <= 0 {
        format!("0.{}{}", "0".repeat(-point as usize), digits)
    } else if point >= n {
        format!("{}{}", digits, "0".repeat((point - n) as usize))
    } else {
        format!("{}.{}", &digits[..point as usize], &digits[point as usize..])
    };
    if negative {
        format!("-{}", body)
    } else {
        body
    }
}

#[test]
fn test_known_encodings() {
    for (text, expected) in VECTORS {
        let encoded = encode_number(text).unwrap();
        assert_eq!(used(&encoded), *expected, "encoding {}", text);
        assert_eq!(
            decode_number(&encoded).unwrap().as_deref(),
            Some(*text),
            "decoding {:?}",
            expected
        );
    }
}

#[test]
fn test_encoding_normalizes_text() {
    for (input, canonical) in [
        ("+5", "5"),
        ("007", "7"),
        ("1.500", "1.5"),
        (".25", "0.25"),
        ("5.", "5"),
        ("-0", "0"),
        ("-0.000", "0"),
    ] {
        let n = PackedNumber::parse(input).unwrap();
        assert_eq!(n.to_string(), canonical, "normalizing {}", input);
    }
}

#[test]
fn test_encode_is_idempotent() {
    for (text, _) in VECTORS {
        let once = PackedNumber::parse(text).unwrap();
        let twice = PackedNumber::parse(&once.to_string()).unwrap();
        assert_eq!(once, twice);
    }
}

#[test]
fn test_rejects_bad_literals() {
    for bad in ["", "-", ".", "abc", "1e5", "1.2.3", "12a", " 1"] {
        assert!(
            matches!(encode_number(bad), Err(Error::InvalidNumber { .. })),
            "accepted {:?}",
            bad
        );
    }
    let too_many = "1".repeat(41);
    assert!(matches!(encode_number(&too_many), Err(Error::InvalidNumber { .. })));
}

#[test]
fn test_range_limits() {
    let largest = format!("1{}", "0".repeat(125));
    assert_eq!(used(&encode_number(&largest).unwrap()), &[2, 255, 11]);

    let overflow = format!("1{}", "0".repeat(126));
    assert!(matches!(encode_number(&overflow), Err(Error::InvalidNumber { .. })));

    let underflow = format!("0.{}1", "0".repeat(140));
    assert_eq!(used(&encode_number(&underflow).unwrap()), &[1, 128]);
}

#[test]
fn test_null_and_unused_buffers() {
    let mut null = [0u8; 22];
    null[0] = 0xFF;
    assert_eq!(decode_number(&null).unwrap(), None);
    assert_eq!(decode_number(&[0u8; 22]).unwrap(), None);
    assert!(PackedNumber::from_bytes(&null).is_null());
    assert_eq!(PackedNumber::NULL.to_decimal().unwrap(), None);
}

#[test]
fn test_wire_form() {
    assert_eq!(decode_oracle_number(&[193, 4, 15]).unwrap(), "3.14");
    assert_eq!(decode_oracle_number(&[61, 61, 102]).unwrap(), "-4000");
    assert_eq!(decode_oracle_number(&[128]).unwrap(), "0");
    // An exponent byte with no mantissa on the negative side is -1e126.
    assert_eq!(decode_oracle_number(&[0]).unwrap(), format!("-1{}", "0".repeat(126)));
    for lone in [0x01, 0x3E, 0x7F] {
        assert!(
            matches!(decode_oracle_number(&[lone]), Err(Error::NativeDecode { .. })),
            "accepted lone exponent {:#04x}",
            lone
        );
    }
    let mut truncated = [0u8; 22];
    truncated[..2].copy_from_slice(&[1, 0x3E]);
    assert!(matches!(decode_number(&truncated), Err(Error::NativeDecode { .. })));

    let n = PackedNumber::from_wire(&[193, 4, 15]).unwrap();
    assert_eq!(n.wire(), &[193, 4, 15]);
    assert_eq!(n.to_f64().unwrap(), Some(3.14));
}

#[test]
fn test_bad_mantissa_byte() {
    assert!(matches!(
        decode_oracle_number(&[193, 0]),
        Err(Error::NativeDecode { .. })
    ));
    assert!(matches!(
        decode_oracle_number(&[193, 150]),
        Err(Error::NativeDecode { .. })
    ));
}

#[test]
fn test_integer_accessors() {
    let n: PackedNumber = "-12.7".parse().unwrap();
    assert_eq!(n.integer_value().unwrap(), None);
    assert_eq!(n.trunc_i64().unwrap(), Some(-12));
    assert_eq!(n.scale().unwrap(), Some(1));
    assert_eq!(n.unscaled().unwrap(), Some(-127));

    let big = PackedNumber::parse("99999999999999999999999999999999999999").unwrap();
    assert_eq!(big.integer_value().unwrap(), None);
    assert_eq!(
        big.integer_value_i128().unwrap(),
        Some(99_999_999_999_999_999_999_999_999_999_999_999_999)
    );
    assert!(matches!(big.trunc_i64(), Err(Error::TypeConversion { .. })));
}

#[test]
fn test_decimal_conversions() {
    let d = Decimal::new(-123_456, 3);
    let n = PackedNumber::try_from(&d).unwrap();
    assert_eq!(n.to_string(), "-123.456");
    assert_eq!(n.to_decimal().unwrap(), Some(d));

    // Outside Decimal's 96-bit range.
    let wide = PackedNumber::parse(&format!("1{}", "0".repeat(30))).unwrap();
    assert_eq!(wide.to_decimal().unwrap(), None);
    assert_eq!(wide.to_big_integer().unwrap(), Some(BigInt::from(10u8).pow(30)));

    let text = "-1234567890123456789012345678.9012345678";
    let scaled = PackedNumber::parse(text).unwrap();
    assert_eq!(scaled.to_decimal().unwrap(), None);
    assert_eq!(scaled.to_big_integer().unwrap(), None);
    assert_eq!(scaled.to_big_decimal().unwrap(), Some(text.parse::<BigDecimal>().unwrap()));
    assert_eq!(PackedNumber::NULL.to_big_decimal().unwrap(), None);
}

#[test]
fn test_float_conversions() {
    assert_eq!(PackedNumber::from_f64(0.1).unwrap().to_string(), "0.1");
    assert_eq!(PackedNumber::from_f32(-2.5).unwrap().to_string(), "-2.5");
    assert!(PackedNumber::from_f64(f64::NAN).is_err());
    assert!(PackedNumber::from_f64(f64::INFINITY).is_err());
}

proptest! {
    #[test]
    fn prop_i64_round_trip(v in any::<i64>()) {
        let n = PackedNumber::from_i64(v);
        prop_assert_eq!(n.integer_value().unwrap(), Some(v));
        prop_assert_eq!(n.to_string(), v.to_string());
    }

    #[test]
    fn prop_decimal_text_round_trip(mantissa in any::<i64>(), scale in 0u32..=18) {
        let text = Decimal::new(mantissa, scale).normalize().to_string();
        let n = PackedNumber::parse(&text).unwrap();
        prop_assert_eq!(n.to_string(), text);
    }

    #[test]
    fn prop_wide_text_round_trip(
        negative in any::<bool>(),
        digits in "[1-9]([0-9]{0,36}[1-9])?",
        point in -60i32..80,
    ) {
        let text = canonical(negative, &digits, point);
        let encoded = encode_number(&text).unwrap();
        let decoded = decode_number(&encoded).unwrap();
        prop_assert_eq!(decoded.as_deref(), Some(text.as_str()));
        prop_assert_eq!(encode_number(decoded.as_deref().unwrap()).unwrap(), encoded);

        let n = PackedNumber::from_bytes(&encoded);
        prop_assert_eq!(n.to_big_decimal().unwrap(), Some(text.parse::<BigDecimal>().unwrap()));
    }

    #[test]
    fn prop_decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..22)) {
        let _ = decode_oracle_number(&bytes);
    }
}
