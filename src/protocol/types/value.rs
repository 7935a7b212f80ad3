//! Host values exchanged with the binder and the fetcher.

use super::handle::Handle;
use super::number::PackedNumber;
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta};
use num_bigint::BigInt;
use rust_decimal::Decimal;
use std::fmt;

/// A NUMBER wider than the i64 fast path, kept exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BigNumber {
    /// Integer column value.
    Integer(BigInt),
    /// Scaled column value.
    Decimal(BigDecimal),
}

impl fmt::Display for BigNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BigNumber::Integer(v) => write!(f, "{}", v),
            BigNumber::Decimal(v) => write!(f, "{}", v),
        }
    }
}

/// A NUMBER column value fetched without a concrete destination type.
///
/// `text` is always present. `integer` is set when the column is an
/// integer column of at most 19 digits, `big` when wider values were
/// requested.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedNumber {
    pub text: String,
    pub integer: Option<i64>,
    pub big: Option<BigNumber>,
}

impl FetchedNumber {
    /// A number known only by its text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            integer: None,
            big: None,
        }
    }
}

impl fmt::Display for FetchedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A host value bound as a parameter or produced by a fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    /// Untyped NULL. Produced by fetches; cannot be bound.
    Null,
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Int16Array(Vec<i16>),
    UInt16Array(Vec<u16>),
    Int32Array(Vec<i32>),
    UInt32Array(Vec<u32>),
    Int64Array(Vec<i64>),
    UInt64Array(Vec<u64>),
    Float32(f32),
    Float64(f64),
    Float32Array(Vec<f32>),
    Float64Array(Vec<f64>),
    NullableInt64(Option<i64>),
    NullableFloat64(Option<f64>),
    NullableFloat64Array(Vec<Option<f64>>),
    NullableTime(Option<NaiveDateTime>),
    Text(String),
    TextArray(Vec<String>),
    Bytes(Vec<u8>),
    BytesArray(Vec<Vec<u8>>),
    Number(PackedNumber),
    NumberArray(Vec<PackedNumber>),
    Decimal(Decimal),
    Date(NaiveDateTime),
    DateArray(Vec<NaiveDateTime>),
    Timestamp(DateTime<FixedOffset>),
    TimestampArray(Vec<DateTime<FixedOffset>>),
    Duration(TimeDelta),
    DurationArray(Vec<TimeDelta>),
    Handle(Handle),
    HandleArray(Vec<Handle>),
    /// Dynamically typed NUMBER fetch result.
    Numeric(FetchedNumber),
}

/// The destination shape requested from the fetcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostKind {
    /// Pick the host type from the column type.
    Any,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    NullableInt64,
    NullableFloat64,
    NullableTime,
    Text,
    Bytes,
    Number,
    Decimal,
    Date,
    Timestamp,
    Duration,
    Handle,
}

impl HostKind {
    /// The value a NULL column produces for this kind.
    pub fn null_value(&self) -> BoundValue {
        match self {
            HostKind::Any | HostKind::Handle => BoundValue::Null,
            HostKind::Int16 => BoundValue::Int16(0),
            HostKind::UInt16 => BoundValue::UInt16(0),
            HostKind::Int32 => BoundValue::Int32(0),
            HostKind::UInt32 => BoundValue::UInt32(0),
            HostKind::Int64 => BoundValue::Int64(0),
            HostKind::UInt64 => BoundValue::UInt64(0),
            HostKind::Float32 => BoundValue::Float32(0.0),
            HostKind::Float64 => BoundValue::Float64(0.0),
            HostKind::NullableInt64 => BoundValue::NullableInt64(None),
            HostKind::NullableFloat64 => BoundValue::NullableFloat64(None),
            HostKind::NullableTime => BoundValue::NullableTime(None),
            HostKind::Text => BoundValue::Text(String::new()),
            HostKind::Bytes => BoundValue::Bytes(Vec::new()),
            HostKind::Number => BoundValue::Number(PackedNumber::NULL),
            HostKind::Decimal => BoundValue::Decimal(Decimal::ZERO),
            HostKind::Date => BoundValue::Date(NaiveDateTime::default()),
            HostKind::Timestamp => BoundValue::Timestamp(DateTime::<FixedOffset>::default()),
            HostKind::Duration => BoundValue::Duration(TimeDelta::zero()),
        }
    }
}

impl BoundValue {
    /// Host type name used in error messages and logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            BoundValue::Null => "null",
            BoundValue::Int16(_) => "i16",
            BoundValue::UInt16(_) => "u16",
            BoundValue::Int32(_) => "i32",
            BoundValue::UInt32(_) => "u32",
            BoundValue::Int64(_) => "i64",
            BoundValue::UInt64(_) => "u64",
            BoundValue::Int16Array(_) => "Vec<i16>",
            BoundValue::UInt16Array(_) => "Vec<u16>",
            BoundValue::Int32Array(_) => "Vec<i32>",
            BoundValue::UInt32Array(_) => "Vec<u32>",
            BoundValue::Int64Array(_) => "Vec<i64>",
            BoundValue::UInt64Array(_) => "Vec<u64>",
            BoundValue::Float32(_) => "f32",
            BoundValue::Float64(_) => "f64",
            BoundValue::Float32Array(_) => "Vec<f32>",
            BoundValue::Float64Array(_) => "Vec<f64>",
            BoundValue::NullableInt64(_) => "Option<i64>",
            BoundValue::NullableFloat64(_) => "Option<f64>",
            BoundValue::NullableFloat64Array(_) => "Vec<Option<f64>>",
            BoundValue::NullableTime(_) => "Option<NaiveDateTime>",
            BoundValue::Text(_) => "String",
            BoundValue::TextArray(_) => "Vec<String>",
            BoundValue::Bytes(_) => "Vec<u8>",
            BoundValue::BytesArray(_) => "Vec<Vec<u8>>",
            BoundValue::Number(_) => "PackedNumber",
            BoundValue::NumberArray(_) => "Vec<PackedNumber>",
            BoundValue::Decimal(_) => "Decimal",
            BoundValue::Date(_) => "NaiveDateTime",
            BoundValue::DateArray(_) => "Vec<NaiveDateTime>",
            BoundValue::Timestamp(_) => "DateTime<FixedOffset>",
            BoundValue::TimestampArray(_) => "Vec<DateTime<FixedOffset>>",
            BoundValue::Duration(_) => "TimeDelta",
            BoundValue::DurationArray(_) => "Vec<TimeDelta>",
            BoundValue::Handle(_) => "Handle",
            BoundValue::HandleArray(_) => "Vec<Handle>",
            BoundValue::Numeric(_) => "FetchedNumber",
        }
    }

    /// The fetch destination matching a scalar value, `None` for arrays.
    pub fn host_kind(&self) -> Option<HostKind> {
        let kind = match self {
            BoundValue::Null | BoundValue::Numeric(_) => HostKind::Any,
            BoundValue::Int16(_) => HostKind::Int16,
            BoundValue::UInt16(_) => HostKind::UInt16,
            BoundValue::Int32(_) => HostKind::Int32,
            BoundValue::UInt32(_) => HostKind::UInt32,
            BoundValue::Int64(_) => HostKind::Int64,
            BoundValue::UInt64(_) => HostKind::UInt64,
            BoundValue::Float32(_) => HostKind::Float32,
            BoundValue::Float64(_) => HostKind::Float64,
            BoundValue::NullableInt64(_) => HostKind::NullableInt64,
            BoundValue::NullableFloat64(_) => HostKind::NullableFloat64,
            BoundValue::NullableTime(_) => HostKind::NullableTime,
            BoundValue::Text(_) => HostKind::Text,
            BoundValue::Bytes(_) => HostKind::Bytes,
            BoundValue::Number(_) => HostKind::Number,
            BoundValue::Decimal(_) => HostKind::Decimal,
            BoundValue::Date(_) => HostKind::Date,
            BoundValue::Timestamp(_) => HostKind::Timestamp,
            BoundValue::Duration(_) => HostKind::Duration,
            BoundValue::Handle(_) => HostKind::Handle,
            _ => return None,
        };
        Some(kind)
    }

    /// Check if the value is NULL.
    pub fn is_null(&self) -> bool {
        match self {
            BoundValue::Null
            | BoundValue::NullableInt64(None)
            | BoundValue::NullableFloat64(None)
            | BoundValue::NullableTime(None) => true,
            BoundValue::Number(n) => n.is_null(),
            BoundValue::Handle(h) => h.is_null(),
            _ => false,
        }
    }

    /// Try to get the value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            BoundValue::Text(s) => Some(s),
            BoundValue::Numeric(n) => Some(&n.text),
            _ => None,
        }
    }

    /// Try to convert to i64.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            BoundValue::Int16(v) => Some(*v as i64),
            BoundValue::UInt16(v) => Some(*v as i64),
            BoundValue::Int32(v) => Some(*v as i64),
            BoundValue::UInt32(v) => Some(*v as i64),
            BoundValue::Int64(v) | BoundValue::NullableInt64(Some(v)) => Some(*v),
            BoundValue::UInt64(v) => i64::try_from(*v).ok(),
            BoundValue::Numeric(n) => n.integer.or_else(|| n.text.parse().ok()),
            BoundValue::Number(n) => n.integer_value().ok().flatten(),
            _ => None,
        }
    }

    /// Try to convert to f64.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            BoundValue::Float32(v) => Some(*v as f64),
            BoundValue::Float64(v) | BoundValue::NullableFloat64(Some(v)) => Some(*v),
            BoundValue::Numeric(n) => n.text.parse().ok(),
            BoundValue::Number(n) => n.to_f64().ok().flatten(),
            other => other.to_i64().map(|v| v as f64),
        }
    }

    /// Try to get the value as a date/time without zone.
    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            BoundValue::Date(dt) | BoundValue::NullableTime(Some(dt)) => Some(*dt),
            BoundValue::Timestamp(ts) => Some(ts.naive_local()),
            _ => None,
        }
    }

    /// Try to get the value as a handle.
    pub fn as_handle(&self) -> Option<&Handle> {
        match self {
            BoundValue::Handle(h) => Some(h),
            _ => None,
        }
    }
}

impl fmt::Display for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundValue::Null
            | BoundValue::NullableInt64(None)
            | BoundValue::NullableFloat64(None)
            | BoundValue::NullableTime(None) => write!(f, "NULL"),
            BoundValue::Int16(v) => write!(f, "{}", v),
            BoundValue::UInt16(v) => write!(f, "{}", v),
            BoundValue::Int32(v) => write!(f, "{}", v),
            BoundValue::UInt32(v) => write!(f, "{}", v),
            BoundValue::Int64(v) | BoundValue::NullableInt64(Some(v)) => write!(f, "{}", v),
            BoundValue::UInt64(v) => write!(f, "{}", v),
            BoundValue::Float32(v) => write!(f, "{}", v),
            BoundValue::Float64(v) | BoundValue::NullableFloat64(Some(v)) => write!(f, "{}", v),
            BoundValue::Text(s) => write!(f, "{}", s),
            BoundValue::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            BoundValue::Number(n) => write!(f, "{}", n),
            BoundValue::Decimal(d) => write!(f, "{}", d),
            BoundValue::Date(dt) | BoundValue::NullableTime(Some(dt)) => {
                write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))
            }
            BoundValue::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.f %:z")),
            BoundValue::Duration(d) => write!(f, "{}", d),
            BoundValue::Handle(h) => write!(f, "<{} handle>", h.kind()),
            BoundValue::Numeric(n) => write!(f, "{}", n),
            array => write!(f, "<{}>", array.type_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_null_values() {
        assert_eq!(HostKind::Any.null_value(), BoundValue::Null);
        assert_eq!(HostKind::Int32.null_value(), BoundValue::Int32(0));
        assert_eq!(HostKind::NullableInt64.null_value(), BoundValue::NullableInt64(None));
        assert!(HostKind::Number.null_value().is_null());
        assert!(!HostKind::Text.null_value().is_null());
    }

    #[test]
    fn test_host_kind_round_trip() {
        for kind in [HostKind::Int16, HostKind::Float64, HostKind::Text, HostKind::Duration] {
            assert_eq!(kind.null_value().host_kind(), Some(kind));
        }
        assert_eq!(BoundValue::Int64Array(vec![1]).host_kind(), None);
    }

    #[test]
    fn test_conversions() {
        let n = BoundValue::Numeric(FetchedNumber::from_text("42"));
        assert_eq!(n.to_i64(), Some(42));
        assert_eq!(n.to_f64(), Some(42.0));
        assert_eq!(n.as_str(), Some("42"));
        assert_eq!(BoundValue::UInt64(u64::MAX).to_i64(), None);

        let dt = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(10, 30, 0).unwrap();
        assert_eq!(BoundValue::NullableTime(Some(dt)).as_date(), Some(dt));
        assert_eq!(BoundValue::Date(dt).to_string(), "2024-01-15 10:30:00");
    }

    #[test]
    fn test_type_names() {
        assert_eq!(BoundValue::Null.type_name(), "null");
        assert_eq!(BoundValue::NullableFloat64Array(vec![]).type_name(), "Vec<Option<f64>>");
        assert_eq!(BoundValue::TextArray(vec![]).to_string(), "<Vec<String>>");
    }
}
