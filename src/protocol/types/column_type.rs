//! Column type tags.
//!
//! Oracle type numbers collapse into the groups the fetcher dispatches on.
//! Precision, scale and size live on the `ColumnDescriptor`, not the tag.

use crate::protocol::constants::*;
use std::fmt;

/// Type tag of a result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// NUMBER, BINARY_INTEGER, BINARY_FLOAT, BINARY_DOUBLE.
    Numeric,
    /// DATE.
    Date,
    /// VARCHAR2, CHAR, ROWID.
    Text,
    /// LONG.
    Long,
    /// REF CURSOR (nested statement).
    Cursor,
    /// CLOB, BLOB.
    Lob,
    /// BFILE.
    File,
    /// TIMESTAMP, TIMESTAMP WITH (LOCAL) TIME ZONE.
    Timestamp,
    /// INTERVAL YEAR TO MONTH, INTERVAL DAY TO SECOND.
    Interval,
    /// RAW, LONG RAW.
    Raw,
    /// Named object type.
    Object,
    /// VARRAY or nested table.
    Collection,
    /// REF.
    Reference,
    /// Any other type number.
    Unknown(u8),
}

impl ColumnType {
    /// Map an Oracle type number.
    pub fn from_type_num(type_num: u8) -> Self {
        match type_num as u16 {
            ORA_TYPE_NUM_NUMBER
            | ORA_TYPE_NUM_BINARY_INTEGER
            | ORA_TYPE_NUM_BINARY_FLOAT
            | ORA_TYPE_NUM_BINARY_DOUBLE => ColumnType::Numeric,
            ORA_TYPE_NUM_DATE => ColumnType::Date,
            ORA_TYPE_NUM_VARCHAR | ORA_TYPE_NUM_CHAR | ORA_TYPE_NUM_ROWID | ORA_TYPE_NUM_UROWID => {
                ColumnType::Text
            }
            ORA_TYPE_NUM_LONG => ColumnType::Long,
            ORA_TYPE_NUM_CURSOR => ColumnType::Cursor,
            ORA_TYPE_NUM_CLOB | ORA_TYPE_NUM_BLOB => ColumnType::Lob,
            ORA_TYPE_NUM_BFILE => ColumnType::File,
            ORA_TYPE_NUM_TIMESTAMP | ORA_TYPE_NUM_TIMESTAMP_TZ | ORA_TYPE_NUM_TIMESTAMP_LTZ => {
                ColumnType::Timestamp
            }
            ORA_TYPE_NUM_INTERVAL_YM | ORA_TYPE_NUM_INTERVAL_DS => ColumnType::Interval,
            ORA_TYPE_NUM_RAW | ORA_TYPE_NUM_LONG_RAW => ColumnType::Raw,
            ORA_TYPE_NUM_OBJECT => ColumnType::Object,
            ORA_TYPE_NUM_COLLECTION => ColumnType::Collection,
            ORA_TYPE_NUM_REF => ColumnType::Reference,
            _ => ColumnType::Unknown(type_num),
        }
    }

    /// Whether values of this type arrive as opaque handles.
    pub fn is_handle(&self) -> bool {
        matches!(
            self,
            ColumnType::Cursor
                | ColumnType::Lob
                | ColumnType::File
                | ColumnType::Object
                | ColumnType::Collection
                | ColumnType::Reference
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Numeric => write!(f, "NUMBER"),
            ColumnType::Date => write!(f, "DATE"),
            ColumnType::Text => write!(f, "VARCHAR2"),
            ColumnType::Long => write!(f, "LONG"),
            ColumnType::Cursor => write!(f, "REF CURSOR"),
            ColumnType::Lob => write!(f, "LOB"),
            ColumnType::File => write!(f, "BFILE"),
            ColumnType::Timestamp => write!(f, "TIMESTAMP"),
            ColumnType::Interval => write!(f, "INTERVAL"),
            ColumnType::Raw => write!(f, "RAW"),
            ColumnType::Object => write!(f, "OBJECT"),
            ColumnType::Collection => write!(f, "COLLECTION"),
            ColumnType::Reference => write!(f, "REF"),
            ColumnType::Unknown(n) => write!(f, "UNKNOWN({})", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_type_num() {
        assert_eq!(ColumnType::from_type_num(2), ColumnType::Numeric);
        assert_eq!(ColumnType::from_type_num(101), ColumnType::Numeric);
        assert_eq!(ColumnType::from_type_num(1), ColumnType::Text);
        assert_eq!(ColumnType::from_type_num(12), ColumnType::Date);
        assert_eq!(ColumnType::from_type_num(181), ColumnType::Timestamp);
        assert_eq!(ColumnType::from_type_num(182), ColumnType::Interval);
        assert_eq!(ColumnType::from_type_num(183), ColumnType::Interval);
        assert_eq!(ColumnType::from_type_num(113), ColumnType::Lob);
        assert_eq!(ColumnType::from_type_num(24), ColumnType::Raw);
        assert_eq!(ColumnType::from_type_num(250), ColumnType::Unknown(250));
    }

    #[test]
    fn test_handle_types() {
        assert!(ColumnType::Cursor.is_handle());
        assert!(ColumnType::Reference.is_handle());
        assert!(!ColumnType::Long.is_handle());
        assert!(!ColumnType::Raw.is_handle());
    }

    #[test]
    fn test_display() {
        assert_eq!(ColumnType::Interval.to_string(), "INTERVAL");
        assert_eq!(ColumnType::Unknown(7).to_string(), "UNKNOWN(7)");
    }
}
