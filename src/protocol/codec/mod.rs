//! Native storage codecs.
//!
//! Each fixed-layout datatype has its own module with encode and decode
//! functions.
//!
//! | Oracle Type | Module |
//! |-------------|--------|
//! | NUMBER      | `number` |
//! | DATE        | `date` |
//! | TIMESTAMP, TIMESTAMP WITH TIME ZONE | `timestamp` |
//! | INTERVAL YEAR TO MONTH, INTERVAL DAY TO SECOND | `interval` |
//!
//! String and raw types are copied as-is and don't require dedicated codecs.

pub mod date;
pub mod interval;
pub mod number;
pub mod timestamp;

pub use date::{decode_oracle_date, encode_oracle_date};
pub use interval::{
    decode_interval_ds, decode_interval_ym, decode_interval_ym_delta, encode_interval_ds,
    encode_interval_ym, DurationParts,
};
pub use number::{decode_number, decode_oracle_number, encode_number};
pub use timestamp::{
    decode_oracle_timestamp, decode_oracle_timestamp_tz, encode_oracle_timestamp,
    encode_oracle_timestamp_tz,
};
