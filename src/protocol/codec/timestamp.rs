//! Oracle TIMESTAMP codec.
//!
//! TIMESTAMP extends the 7 DATE bytes:
//! - byte[7..11]: fractional seconds in nanoseconds (big-endian u32)
//!
//! TIMESTAMP WITH TIME ZONE adds:
//! - byte[11]: time zone hour offset + 20
//! - byte[12]: time zone minute offset + 60
//!
//! The calendar fields hold the local time of the offset. Region-based zones
//! (high bit of byte[11] set) are not supported.

use super::date::{decode_date_fields, encode_oracle_date};
use crate::error::{Error, Result};
use crate::protocol::buffer::{ReadBuffer, WriteBuffer};
use crate::protocol::constants::*;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Timelike};

/// Encode a timestamp without time zone into 11 bytes.
pub fn encode_oracle_timestamp(value: &NaiveDateTime) -> Result<[u8; TIMESTAMP_LENGTH]> {
    let mut buf = WriteBuffer::with_capacity(TIMESTAMP_LENGTH);
    buf.write_bytes(&encode_oracle_date(value)?);
    buf.write_u32_be(value.nanosecond() % 1_000_000_000);
    let mut out = [0u8; TIMESTAMP_LENGTH];
    out.copy_from_slice(&buf.freeze());
    Ok(out)
}

/// Encode a timestamp with a fixed offset into 13 bytes.
///
/// # Errors
/// Returns `Error::NativeDecode` if the year is outside the DATE range.
pub fn encode_oracle_timestamp_tz(
    value: &DateTime<FixedOffset>,
) -> Result<[u8; TIMESTAMP_TZ_LENGTH]> {
    let local = value.naive_local();
    let offset_minutes = value.offset().local_minus_utc() / 60;
    let tz_hour = offset_minutes / 60;
    let tz_minute = offset_minutes % 60;

    let mut out = [0u8; TIMESTAMP_TZ_LENGTH];
    out[..TIMESTAMP_LENGTH].copy_from_slice(&encode_oracle_timestamp(&local)?);
    out[11] = (tz_hour + TZ_HOUR_OFFSET) as u8;
    out[12] = (tz_minute + TZ_MINUTE_OFFSET) as u8;
    Ok(out)
}

/// Decode a TIMESTAMP or DATE (7 or 11 bytes) without zone.
///
/// 13-byte values are accepted and their zone bytes ignored.
pub fn decode_oracle_timestamp(data: &[u8]) -> Result<NaiveDateTime> {
    let nanosecond = match data.len() {
        DATE_LENGTH => 0,
        TIMESTAMP_LENGTH | TIMESTAMP_TZ_LENGTH => {
            let mut buf = ReadBuffer::new(&data[DATE_LENGTH..]);
            buf.read_u32_be()?
        }
        n => {
            return Err(Error::native_decode(
                NATIVE_ERR_LENGTH,
                format!("TIMESTAMP value must be 7, 11 or 13 bytes, got {}", n),
            ))
        }
    };
    decode_date_fields(data, nanosecond)
}

/// Decode a TIMESTAMP WITH TIME ZONE.
///
/// 7 and 11 byte values carry no zone and decode with offset +00:00.
///
/// # Errors
/// Returns `Error::NativeDecode` for region-based zones or offsets out of
/// range.
pub fn decode_oracle_timestamp_tz(data: &[u8]) -> Result<DateTime<FixedOffset>> {
    let local = decode_oracle_timestamp(data)?;
    let offset_seconds = if data.len() == TIMESTAMP_TZ_LENGTH {
        if data[11] & TZ_REGION_FLAG != 0 {
            return Err(Error::native_decode(
                NATIVE_ERR_TIME_ZONE,
                "region-based time zones are not supported",
            ));
        }
        let tz_hour = data[11] as i32 - TZ_HOUR_OFFSET;
        let tz_minute = data[12] as i32 - TZ_MINUTE_OFFSET;
        (tz_hour * 60 + tz_minute) * 60
    } else {
        0
    };
    let offset = FixedOffset::east_opt(offset_seconds).ok_or_else(|| {
        Error::native_decode(
            NATIVE_ERR_TIME_ZONE,
            format!("time zone offset {}s out of range", offset_seconds),
        )
    })?;
    local
        .and_local_timezone(offset)
        .single()
        .ok_or_else(|| Error::native_decode(NATIVE_ERR_TIME_ZONE, "ambiguous local time"))
}
