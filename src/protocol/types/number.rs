//! Fixed-size packed NUMBER value.

use crate::error::{Error, Result};
use crate::protocol::codec::number::{encode_number, encode_parsed, unpack_number, Digits};
use crate::protocol::constants::{NUMBER_NULL_SENTINEL, NUMBER_SIZE};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// An Oracle NUMBER in its 22-byte native form.
///
/// Byte 0 holds the count of bytes that follow. A value of `0xFF` marks
/// NULL; an all-zero buffer was never set and is treated like NULL.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedNumber([u8; NUMBER_SIZE]);

impl PackedNumber {
    /// The NULL NUMBER.
    pub const NULL: Self = {
        let mut bytes = [0u8; NUMBER_SIZE];
        bytes[0] = NUMBER_NULL_SENTINEL;
        Self(bytes)
    };

    /// The NUMBER zero.
    pub const ZERO: Self = {
        let mut bytes = [0u8; NUMBER_SIZE];
        bytes[0] = 1;
        bytes[1] = 0x80;
        Self(bytes)
    };

    /// Copy up to 22 bytes of native storage.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut bytes = [0u8; NUMBER_SIZE];
        let n = data.len().min(NUMBER_SIZE);
        bytes[..n].copy_from_slice(&data[..n]);
        Self(bytes)
    }

    /// Build from the length-less wire form (exponent byte first).
    ///
    /// # Errors
    /// Returns `Error::NativeDecode` if the value is longer than 21 bytes.
    pub fn from_wire(wire: &[u8]) -> Result<Self> {
        if wire.len() >= NUMBER_SIZE {
            return Err(Error::native_decode(
                crate::protocol::constants::NATIVE_ERR_LENGTH,
                format!("NUMBER wire value has {} bytes", wire.len()),
            ));
        }
        if wire.is_empty() {
            return Ok(Self::NULL);
        }
        let mut bytes = [0u8; NUMBER_SIZE];
        bytes[0] = wire.len() as u8;
        bytes[1..=wire.len()].copy_from_slice(wire);
        Ok(Self(bytes))
    }

    /// Encode decimal text.
    pub fn parse(text: &str) -> Result<Self> {
        encode_number(text).map(Self)
    }

    /// Encode an i64 exactly.
    pub fn from_i64(value: i64) -> Self {
        Self::from_integer(value as i128)
    }

    /// Encode a u64 exactly.
    pub fn from_u64(value: u64) -> Self {
        Self::from_integer(value as i128)
    }

    fn from_integer(value: i128) -> Self {
        // At most 20 digits, always inside the NUMBER range.
        match encode_number(&value.to_string()) {
            Ok(bytes) => Self(bytes),
            Err(_) => Self::NULL,
        }
    }

    /// Encode an f64 through its shortest round-trip decimal text.
    ///
    /// # Errors
    /// Returns `Error::InvalidNumber` for NaN and infinities, and for values
    /// outside the NUMBER range.
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::invalid_number(value.to_string(), "not a finite number"));
        }
        Self::parse(&value.to_string())
    }

    /// Encode an f32 through its shortest round-trip decimal text.
    pub fn from_f32(value: f32) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::invalid_number(value.to_string(), "not a finite number"));
        }
        Self::parse(&value.to_string())
    }

    /// Encode a decimal exactly.
    pub fn from_decimal(value: &Decimal) -> Result<Self> {
        Self::parse(&value.normalize().to_string())
    }

    /// The native bytes.
    pub fn as_bytes(&self) -> &[u8; NUMBER_SIZE] {
        &self.0
    }

    /// The wire form without the length byte; empty for NULL.
    pub fn wire(&self) -> &[u8] {
        if self.is_null() {
            return &[];
        }
        let len = (self.0[0] as usize).min(NUMBER_SIZE - 1);
        &self.0[1..=len]
    }

    /// Whether the value is NULL or was never set.
    pub fn is_null(&self) -> bool {
        self.0[0] == NUMBER_NULL_SENTINEL || self.0[0] == 0
    }

    /// Whether the value holds a number.
    pub fn is_valid(&self) -> bool {
        !self.is_null()
    }

    fn digits(&self) -> Result<Option<Digits>> {
        unpack_number(&self.0)
    }

    /// Decode to canonical decimal text, `None` for NULL.
    pub fn to_text(&self) -> Result<Option<String>> {
        Ok(self.digits()?.map(|d| d.render()))
    }

    /// The exact value as an i64, if it is an integer that fits.
    ///
    /// Works from the mantissa directly, no text is produced.
    pub fn integer_value(&self) -> Result<Option<i64>> {
        Ok(self
            .digits()?
            .and_then(|d| d.integer())
            .and_then(|v| i64::try_from(v).ok()))
    }

    /// The exact value as an i128, if it is an integer that fits.
    pub fn integer_value_i128(&self) -> Result<Option<i128>> {
        Ok(self.digits()?.and_then(|d| d.integer()))
    }

    /// The integer part truncated toward zero.
    ///
    /// # Errors
    /// Returns `Error::TypeConversion` if the integer part does not fit an
    /// i64.
    pub fn trunc_i64(&self) -> Result<Option<i64>> {
        let Some(digits) = self.digits()? else {
            return Ok(None);
        };
        digits
            .integer_part()
            .and_then(|v| i64::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| {
                Error::type_conversion(format!("NUMBER {} does not fit i64", digits.render()))
            })
    }

    /// The nearest f64.
    pub fn to_f64(&self) -> Result<Option<f64>> {
        let Some(digits) = self.digits()? else {
            return Ok(None);
        };
        let text = digits.render();
        text.parse::<f64>()
            .map(Some)
            .map_err(|e| Error::type_conversion(format!("NUMBER {} as f64: {}", text, e)))
    }

    /// The exact value as a `Decimal`, if it fits its 96-bit mantissa and
    /// 28 digit scale.
    pub fn to_decimal(&self) -> Result<Option<Decimal>> {
        let Some(digits) = self.digits()? else {
            return Ok(None);
        };
        let Some(mut unscaled) = digits.unscaled() else {
            return Ok(None);
        };
        let mut scale = digits.scale();
        while scale < 0 {
            let Some(v) = unscaled.checked_mul(10) else {
                return Ok(None);
            };
            unscaled = v;
            scale += 1;
        }
        Ok(Decimal::try_from_i128_with_scale(unscaled, scale as u32).ok())
    }

    /// The exact value as an unbounded integer; `None` for NULL or when
    /// the value has a fractional part.
    pub fn to_big_integer(&self) -> Result<Option<BigInt>> {
        let Some(digits) = self.digits()? else {
            return Ok(None);
        };
        if digits.scale() > 0 {
            return Ok(None);
        }
        let text = digits.render();
        text.parse::<BigInt>()
            .map(Some)
            .map_err(|e| Error::type_conversion(format!("NUMBER {} as BigInt: {}", text, e)))
    }

    /// The exact value with unbounded precision.
    pub fn to_big_decimal(&self) -> Result<Option<BigDecimal>> {
        let Some(digits) = self.digits()? else {
            return Ok(None);
        };
        let text = digits.render();
        text.parse::<BigDecimal>()
            .map(Some)
            .map_err(|e| Error::type_conversion(format!("NUMBER {} as BigDecimal: {}", text, e)))
    }

    /// The digits as an unscaled integer, if they fit an i128.
    ///
    /// `unscaled() / 10^scale()` is the value.
    pub fn unscaled(&self) -> Result<Option<i128>> {
        Ok(self.digits()?.and_then(|d| d.unscaled()))
    }

    /// Digits after the decimal point; negative when the value is a
    /// multiple of a power of ten.
    pub fn scale(&self) -> Result<Option<i32>> {
        Ok(self.digits()?.map(|d| d.scale()))
    }

    /// Re-encode the decoded value. Normalizes hand-built buffers.
    pub fn normalized(&self) -> Result<Self> {
        match self.digits()? {
            Some(digits) => encode_parsed(&digits).map(Self),
            None => Ok(Self::NULL),
        }
    }
}

impl fmt::Debug for PackedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = if self.is_null() { 1 } else { self.wire().len() + 1 };
        f.debug_tuple("PackedNumber")
            .field(&format_args!("{}", self))
            .field(&&self.0[..len])
            .finish()
    }
}

impl fmt::Display for PackedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Ok(Some(text)) => f.write_str(&text),
            Ok(None) => Ok(()),
            Err(_) => write!(f, "<invalid NUMBER {:?}>", self.wire()),
        }
    }
}

impl FromStr for PackedNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<i64> for PackedNumber {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl From<u64> for PackedNumber {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl TryFrom<&Decimal> for PackedNumber {
    type Error = Error;

    fn try_from(value: &Decimal) -> Result<Self> {
        Self::from_decimal(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_and_unused() {
        assert!(PackedNumber::NULL.is_null());
        assert!(PackedNumber::default().is_null());
        assert_eq!(PackedNumber::NULL.to_text().unwrap(), None);
        assert_eq!(PackedNumber::NULL.to_string(), "");
        assert!(PackedNumber::ZERO.is_valid());
        assert_eq!(PackedNumber::ZERO.to_string(), "0");
    }

    #[test]
    fn test_from_integers() {
        assert_eq!(PackedNumber::from_i64(-4000).wire(), &[61, 61, 102]);
        assert_eq!(PackedNumber::from_i64(i64::MIN).integer_value().unwrap(), Some(i64::MIN));
        assert_eq!(PackedNumber::from_u64(u64::MAX).to_string(), u64::MAX.to_string());
        assert_eq!(PackedNumber::from_u64(u64::MAX).integer_value().unwrap(), None);
    }

    #[test]
    fn test_from_floats() {
        assert_eq!(PackedNumber::from_f64(3.14).unwrap().wire(), &[193, 4, 15]);
        assert_eq!(PackedNumber::from_f32(0.1).unwrap().to_string(), "0.1");
        assert_eq!(PackedNumber::from_f64(1e21).unwrap().to_string(), "1000000000000000000000");
        assert!(PackedNumber::from_f64(f64::NAN).is_err());
        assert!(PackedNumber::from_f64(f64::INFINITY).is_err());
    }

    #[test]
    fn test_wire_round_trip() {
        let n = PackedNumber::from_wire(&[0xC0, 0x33]).unwrap();
        assert_eq!(n.to_string(), "0.5");
        assert_eq!(n.wire(), &[0xC0, 0x33]);
        assert!(PackedNumber::from_wire(&[]).unwrap().is_null());
        assert!(PackedNumber::from_wire(&[1u8; 22]).is_err());
    }

    #[test]
    fn test_integer_value_fast_path() {
        assert_eq!("123".parse::<PackedNumber>().unwrap().integer_value().unwrap(), Some(123));
        assert_eq!("20800".parse::<PackedNumber>().unwrap().integer_value().unwrap(), Some(20800));
        assert_eq!("1.5".parse::<PackedNumber>().unwrap().integer_value().unwrap(), None);
        assert_eq!(PackedNumber::NULL.integer_value().unwrap(), None);
    }

    #[test]
    fn test_trunc_i64() {
        assert_eq!("-12.9".parse::<PackedNumber>().unwrap().trunc_i64().unwrap(), Some(-12));
        assert_eq!("0.9".parse::<PackedNumber>().unwrap().trunc_i64().unwrap(), Some(0));
        assert!("1e30".parse::<PackedNumber>().is_err());
        let huge: PackedNumber = format!("1{}", "0".repeat(30)).parse().unwrap();
        assert!(huge.trunc_i64().is_err());
    }

    #[test]
    fn test_unscaled_and_scale() {
        let n: PackedNumber = "-1.23".parse().unwrap();
        assert_eq!(n.unscaled().unwrap(), Some(-123));
        assert_eq!(n.scale().unwrap(), Some(2));
        let n: PackedNumber = "4000".parse().unwrap();
        assert_eq!(n.unscaled().unwrap(), Some(4));
        assert_eq!(n.scale().unwrap(), Some(-3));
    }

    #[test]
    fn test_decimal_conversions() {
        let d = Decimal::from_str("-12.3400").unwrap();
        let n = PackedNumber::from_decimal(&d).unwrap();
        assert_eq!(n.to_string(), "-12.34");
        assert_eq!(n.to_decimal().unwrap(), Some(Decimal::from_str("-12.34").unwrap()));
        assert_eq!(
            "4000".parse::<PackedNumber>().unwrap().to_decimal().unwrap(),
            Some(Decimal::from(4000))
        );
        let too_wide: PackedNumber = "0.3333333333333333333333333333333333333333".parse().unwrap();
        assert_eq!(too_wide.to_decimal().unwrap(), None);
    }

    #[test]
    fn test_to_f64() {
        let n: PackedNumber = "-3.14".parse().unwrap();
        assert_eq!(n.to_f64().unwrap(), Some(-3.14));
    }

    #[test]
    fn test_normalized() {
        // Trailing zero mantissa byte is dropped on re-encode.
        let n = PackedNumber::from_bytes(&[3, 193, 2, 1]);
        assert_eq!(n.to_string(), "1");
        assert_eq!(n.normalized().unwrap().wire(), &[193, 2]);
    }

    #[test]
    fn test_display_invalid() {
        let n = PackedNumber::from_bytes(&[2, 193, 0]);
        assert!(n.to_string().starts_with("<invalid NUMBER"));
    }
}
