//! Native storage types exchanged with a bind target or read from a fetched
//! column.

use super::handle::HandleKind;
use crate::protocol::constants::*;
use std::fmt;

/// Layout of a bound or fetched native value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeType {
    /// Native-endian i16.
    Short,
    /// Native-endian u16.
    UShort,
    /// Native-endian i32.
    Int,
    /// Native-endian u32.
    UInt,
    /// Native-endian i64.
    BigInt,
    /// Native-endian u64.
    BigUInt,
    /// Native-endian f32.
    Float,
    /// Native-endian f64.
    Double,
    /// 22-byte packed NUMBER.
    Number,
    /// Character data; arrays reserve a NUL terminator per element.
    Text,
    /// Binary data.
    Raw,
    /// 7-byte DATE.
    Date,
    /// 13-byte TIMESTAMP WITH TIME ZONE (11-byte TIMESTAMP when fetched).
    Timestamp,
    /// 5-byte INTERVAL YEAR TO MONTH.
    IntervalYm,
    /// 11-byte INTERVAL DAY TO SECOND.
    IntervalDs,
    /// Handle types.
    Long,
    Lob,
    File,
    Object,
    Collection,
    Reference,
    Statement,
}

impl NativeType {
    /// Byte width of one element, `None` for variable-length types.
    pub fn width(&self) -> Option<usize> {
        match self {
            NativeType::Short | NativeType::UShort => Some(2),
            NativeType::Int | NativeType::UInt | NativeType::Float => Some(4),
            NativeType::BigInt | NativeType::BigUInt | NativeType::Double => Some(8),
            NativeType::Number => Some(NUMBER_SIZE),
            NativeType::Date => Some(DATE_LENGTH),
            NativeType::Timestamp => Some(TIMESTAMP_TZ_LENGTH),
            NativeType::IntervalYm => Some(INTERVAL_YM_LENGTH),
            NativeType::IntervalDs => Some(INTERVAL_DS_LENGTH),
            _ => None,
        }
    }

    /// Whether this is one of the numeric subtypes.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            NativeType::Short
                | NativeType::UShort
                | NativeType::Int
                | NativeType::UInt
                | NativeType::BigInt
                | NativeType::BigUInt
                | NativeType::Float
                | NativeType::Double
                | NativeType::Number
        )
    }
}

impl From<HandleKind> for NativeType {
    fn from(kind: HandleKind) -> Self {
        match kind {
            HandleKind::Lob => NativeType::Lob,
            HandleKind::File => NativeType::File,
            HandleKind::Object => NativeType::Object,
            HandleKind::Collection => NativeType::Collection,
            HandleKind::Reference => NativeType::Reference,
            HandleKind::Statement => NativeType::Statement,
            HandleKind::Long => NativeType::Long,
        }
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths() {
        assert_eq!(NativeType::Short.width(), Some(2));
        assert_eq!(NativeType::Double.width(), Some(8));
        assert_eq!(NativeType::Number.width(), Some(22));
        assert_eq!(NativeType::Timestamp.width(), Some(13));
        assert_eq!(NativeType::Text.width(), None);
        assert!(NativeType::Number.is_numeric());
        assert!(!NativeType::Date.is_numeric());
        assert_eq!(NativeType::from(HandleKind::Statement), NativeType::Statement);
    }
}
