//! Native storage constants.
//!
//! Oracle type numbers follow the values used on the wire by the TNS
//! protocol; the NUMBER, DATE, TIMESTAMP and INTERVAL layout constants
//! describe the fixed-size native representations bound and fetched by
//! this crate.

// Oracle data type numbers
pub const ORA_TYPE_NUM_VARCHAR: u16 = 1;
pub const ORA_TYPE_NUM_NUMBER: u16 = 2;
pub const ORA_TYPE_NUM_BINARY_INTEGER: u16 = 3;
pub const ORA_TYPE_NUM_LONG: u16 = 8;
pub const ORA_TYPE_NUM_ROWID: u16 = 11;
pub const ORA_TYPE_NUM_DATE: u16 = 12;
pub const ORA_TYPE_NUM_RAW: u16 = 23;
pub const ORA_TYPE_NUM_LONG_RAW: u16 = 24;
pub const ORA_TYPE_NUM_CHAR: u16 = 96;
pub const ORA_TYPE_NUM_BINARY_FLOAT: u16 = 100;
pub const ORA_TYPE_NUM_BINARY_DOUBLE: u16 = 101;
pub const ORA_TYPE_NUM_CURSOR: u16 = 102;
pub const ORA_TYPE_NUM_OBJECT: u16 = 109;
pub const ORA_TYPE_NUM_REF: u16 = 111;
pub const ORA_TYPE_NUM_CLOB: u16 = 112;
pub const ORA_TYPE_NUM_BLOB: u16 = 113;
pub const ORA_TYPE_NUM_BFILE: u16 = 114;
pub const ORA_TYPE_NUM_COLLECTION: u16 = 122;
pub const ORA_TYPE_NUM_TIMESTAMP: u16 = 180;
pub const ORA_TYPE_NUM_TIMESTAMP_TZ: u16 = 181;
pub const ORA_TYPE_NUM_INTERVAL_YM: u16 = 182;
pub const ORA_TYPE_NUM_INTERVAL_DS: u16 = 183;
pub const ORA_TYPE_NUM_UROWID: u16 = 208;
pub const ORA_TYPE_NUM_TIMESTAMP_LTZ: u16 = 231;

// NUMBER layout
pub const NUMBER_SIZE: usize = 22;
pub const NUMBER_MAX_MANTISSA_BYTES: usize = 20;
pub const NUMBER_MAX_DIGITS: usize = NUMBER_MAX_MANTISSA_BYTES * 2;
pub const NUMBER_MAX_PRECISION: u8 = 38;
pub const NUMBER_NULL_SENTINEL: u8 = 0xff;
pub const NUMBER_POSITIVE_FLAG: u8 = 0x80;
pub const NUMBER_EXPONENT_MASK: u8 = 0x7f;
pub const NUMBER_EXPONENT_BIAS: i16 = 65;
pub const NUMBER_MIN_EXPONENT: i16 = -65;
pub const NUMBER_MAX_EXPONENT: i16 = 62;
pub const NUMBER_NEGATIVE_TERMINATOR: u8 = 102;
pub const NUMBER_ZERO_EXPONENT: u8 = 0x80;

/// Largest precision whose values always fit an i64.
pub const FAST_PATH_MAX_PRECISION: u8 = 19;

// DATE / TIMESTAMP layout
pub const DATE_LENGTH: usize = 7;
pub const TIMESTAMP_LENGTH: usize = 11;
pub const TIMESTAMP_TZ_LENGTH: usize = 13;
pub const TZ_HOUR_OFFSET: i32 = 20;
pub const TZ_MINUTE_OFFSET: i32 = 60;
pub const TZ_REGION_FLAG: u8 = 0x80;

// INTERVAL layout
pub const INTERVAL_YM_LENGTH: usize = 5;
pub const INTERVAL_DS_LENGTH: usize = 11;
pub const DURATION_MID: u32 = 0x8000_0000;
pub const DURATION_OFFSET: i32 = 60;

// Bind defaults
pub const DEFAULT_ARRAY_STRIDE: usize = 32767;
pub const DEFAULT_MAX_STRING_LEN: usize = 32767;
pub const DEFAULT_BIND_ARRAY_SIZE: u32 = 1000;

// Native decode error codes
pub const NATIVE_ERR_LENGTH: u32 = 1;
pub const NATIVE_ERR_DATE_FIELD: u32 = 2;
pub const NATIVE_ERR_TIME_FIELD: u32 = 3;
pub const NATIVE_ERR_TIME_ZONE: u32 = 4;
pub const NATIVE_ERR_INTERVAL_FIELD: u32 = 5;
pub const NATIVE_ERR_NUMBER_DIGIT: u32 = 6;
