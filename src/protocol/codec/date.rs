//! Oracle DATE codec.
//!
//! Oracle DATE is encoded as 7 bytes:
//! - byte[0]: century + 100
//! - byte[1]: year (in century) + 100
//! - byte[2]: month (1-12)
//! - byte[3]: day (1-31)
//! - byte[4]: hour + 1 (0-23)
//! - byte[5]: minute + 1 (0-59)
//! - byte[6]: second + 1 (0-59)
//!
//! Years before the common era store a negative century and year, so both
//! bytes fall below 100.

use crate::error::{Error, Result};
use crate::protocol::constants::{
    DATE_LENGTH, NATIVE_ERR_DATE_FIELD, NATIVE_ERR_LENGTH, NATIVE_ERR_TIME_FIELD,
};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const MIN_YEAR: i32 = -4712;
const MAX_YEAR: i32 = 9999;

/// Encode a date/time into the 7-byte DATE form. Sub-second precision is
/// dropped.
///
/// # Errors
/// Returns `Error::NativeDecode` if the year is outside -4712..=9999.
pub fn encode_oracle_date(value: &NaiveDateTime) -> Result<[u8; DATE_LENGTH]> {
    let year = value.year();
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(Error::native_decode(
            NATIVE_ERR_DATE_FIELD,
            format!("year {} outside the DATE range", year),
        ));
    }
    Ok([
        (year / 100 + 100) as u8,
        (year % 100 + 100) as u8,
        value.month() as u8,
        value.day() as u8,
        value.hour() as u8 + 1,
        value.minute() as u8 + 1,
        value.second() as u8 + 1,
    ])
}

/// Decode an Oracle DATE from 7 bytes.
///
/// # Errors
/// Returns `Error::NativeDecode` if data is not exactly 7 bytes or contains
/// invalid field values.
///
/// # Example
/// ```ignore
/// let date = decode_oracle_date(&[0x78, 0x7C, 0x0A, 0x15, 0x0D, 0x25, 0x06])?;
/// // Returns: 2024-10-21 12:36:05
/// ```
pub fn decode_oracle_date(data: &[u8]) -> Result<NaiveDateTime> {
    if data.len() != DATE_LENGTH {
        return Err(Error::native_decode(
            NATIVE_ERR_LENGTH,
            format!("DATE value must be exactly 7 bytes, got {}", data.len()),
        ));
    }
    decode_date_fields(data, 0)
}

/// Decode the leading 7 DATE bytes shared by DATE and the TIMESTAMP family.
pub(crate) fn decode_date_fields(data: &[u8], nanosecond: u32) -> Result<NaiveDateTime> {
    let year = (data[0] as i32 - 100) * 100 + (data[1] as i32 - 100);
    let month = data[2] as u32;
    let day = data[3] as u32;
    let hour = (data[4] as u32).wrapping_sub(1);
    let minute = (data[5] as u32).wrapping_sub(1);
    let second = (data[6] as u32).wrapping_sub(1);

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        Error::native_decode(
            NATIVE_ERR_DATE_FIELD,
            format!("Invalid DATE: year={}, month={}, day={}", year, month, day),
        )
    })?;
    let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanosecond).ok_or_else(|| {
        Error::native_decode(
            NATIVE_ERR_TIME_FIELD,
            format!(
                "Invalid TIME: hour={}, minute={}, second={}, nanosecond={}",
                hour, minute, second, nanosecond
            ),
        )
    })?;
    Ok(NaiveDateTime::new(date, time))
}
