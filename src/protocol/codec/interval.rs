//! Oracle INTERVAL codecs.
//!
//! INTERVAL YEAR TO MONTH is encoded as 5 bytes:
//! - byte[0..4]: years + 0x80000000 (big-endian u32)
//! - byte[4]: months + 60
//!
//! INTERVAL DAY TO SECOND is encoded as 11 bytes:
//! - byte[0..4]: days + 0x80000000 (big-endian u32)
//! - byte[4]: hours + 60
//! - byte[5]: minutes + 60
//! - byte[6]: seconds + 60
//! - byte[7..11]: nanoseconds + 0x80000000 (big-endian u32)
//!
//! All fields of one interval share its sign.

use crate::error::{Error, Result};
use crate::protocol::buffer::{ReadBuffer, WriteBuffer};
use crate::protocol::constants::*;
use chrono::TimeDelta;

const DAYS_PER_YEAR: i64 = 365;
const DAYS_PER_MONTH: i64 = 30;
const SECONDS_PER_DAY: i64 = 86_400;

/// A duration split into day-to-second fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DurationParts {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub milliseconds: i64,
}

impl DurationParts {
    /// Split a duration by integer division, truncating below milliseconds.
    pub fn from_delta(delta: &TimeDelta) -> Self {
        let total = delta.num_milliseconds();
        Self {
            days: total / (SECONDS_PER_DAY * 1000),
            hours: total / 3_600_000 % 24,
            minutes: total / 60_000 % 60,
            seconds: total / 1000 % 60,
            milliseconds: total % 1000,
        }
    }
}

fn offset_u32(value: i64) -> u32 {
    (value + DURATION_MID as i64) as u32
}

fn field_byte(value: i64) -> u8 {
    (value + DURATION_OFFSET as i64) as u8
}

/// Encode a duration as INTERVAL DAY TO SECOND.
///
/// # Errors
/// Returns `Error::NativeDecode` if the day count does not fit the field.
pub fn encode_interval_ds(delta: &TimeDelta) -> Result<[u8; INTERVAL_DS_LENGTH]> {
    let parts = DurationParts::from_delta(delta);
    if i32::try_from(parts.days).is_err() {
        return Err(Error::native_decode(
            NATIVE_ERR_INTERVAL_FIELD,
            format!("{} days do not fit INTERVAL DAY TO SECOND", parts.days),
        ));
    }
    let mut buf = WriteBuffer::with_capacity(INTERVAL_DS_LENGTH);
    buf.write_u32_be(offset_u32(parts.days));
    buf.write_u8(field_byte(parts.hours));
    buf.write_u8(field_byte(parts.minutes));
    buf.write_u8(field_byte(parts.seconds));
    buf.write_u32_be(offset_u32(parts.milliseconds * 1_000_000));
    let mut out = [0u8; INTERVAL_DS_LENGTH];
    out.copy_from_slice(&buf.freeze());
    Ok(out)
}

/// Decode INTERVAL DAY TO SECOND into an exact duration.
pub fn decode_interval_ds(data: &[u8]) -> Result<TimeDelta> {
    if data.len() != INTERVAL_DS_LENGTH {
        return Err(Error::native_decode(
            NATIVE_ERR_LENGTH,
            format!("INTERVAL DAY TO SECOND must be 11 bytes, got {}", data.len()),
        ));
    }
    let mut buf = ReadBuffer::new(data);
    let days = buf.read_u32_be()? as i64 - DURATION_MID as i64;
    let hours = buf.read_u8()? as i64 - DURATION_OFFSET as i64;
    let minutes = buf.read_u8()? as i64 - DURATION_OFFSET as i64;
    let seconds = buf.read_u8()? as i64 - DURATION_OFFSET as i64;
    let nanos = buf.read_u32_be()? as i64 - DURATION_MID as i64;
    if hours.abs() > 23
        || minutes.abs() > 59
        || seconds.abs() > 59
        || nanos.abs() >= 1_000_000_000
    {
        return Err(Error::native_decode(
            NATIVE_ERR_INTERVAL_FIELD,
            format!(
                "Invalid INTERVAL DAY TO SECOND: hours={}, minutes={}, seconds={}, nanos={}",
                hours, minutes, seconds, nanos
            ),
        ));
    }

    let total = days * SECONDS_PER_DAY + hours * 3600 + minutes * 60 + seconds;
    let whole = TimeDelta::try_seconds(total).ok_or_else(|| {
        Error::native_decode(NATIVE_ERR_INTERVAL_FIELD, format!("{} seconds out of range", total))
    })?;
    Ok(whole + TimeDelta::nanoseconds(nanos))
}

/// Encode years and months as INTERVAL YEAR TO MONTH.
///
/// Months beyond a year carry into the year field.
pub fn encode_interval_ym(years: i32, months: i32) -> [u8; INTERVAL_YM_LENGTH] {
    let total = years as i64 * 12 + months as i64;
    let mut buf = WriteBuffer::with_capacity(INTERVAL_YM_LENGTH);
    buf.write_u32_be(offset_u32(total / 12));
    buf.write_u8(field_byte(total % 12));
    let mut out = [0u8; INTERVAL_YM_LENGTH];
    out.copy_from_slice(&buf.freeze());
    out
}

/// Decode INTERVAL YEAR TO MONTH into (years, months).
pub fn decode_interval_ym(data: &[u8]) -> Result<(i32, i32)> {
    if data.len() != INTERVAL_YM_LENGTH {
        return Err(Error::native_decode(
            NATIVE_ERR_LENGTH,
            format!("INTERVAL YEAR TO MONTH must be 5 bytes, got {}", data.len()),
        ));
    }
    let mut buf = ReadBuffer::new(data);
    let years = buf.read_u32_be()? as i64 - DURATION_MID as i64;
    let months = buf.read_u8()? as i32 - DURATION_OFFSET;
    if months.abs() > 11 {
        return Err(Error::native_decode(
            NATIVE_ERR_INTERVAL_FIELD,
            format!("Invalid INTERVAL YEAR TO MONTH: months={}", months),
        ));
    }
    Ok((years as i32, months))
}

/// Decode INTERVAL YEAR TO MONTH as a duration, counting 365 days per year
/// and 30 days per month.
pub fn decode_interval_ym_delta(data: &[u8]) -> Result<TimeDelta> {
    let (years, months) = decode_interval_ym(data)?;
    let days = years as i64 * DAYS_PER_YEAR + months as i64 * DAYS_PER_MONTH;
    TimeDelta::try_days(days).ok_or_else(|| {
        Error::native_decode(NATIVE_ERR_INTERVAL_FIELD, format!("{} days out of range", days))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompose_90000_seconds() {
        let parts = DurationParts::from_delta(&TimeDelta::seconds(90_000));
        assert_eq!(
            parts,
            DurationParts {
                days: 1,
                hours: 1,
                minutes: 0,
                seconds: 0,
                milliseconds: 0,
            }
        );
    }

    #[test]
    fn test_decompose_negative() {
        let delta = -(TimeDelta::hours(26) + TimeDelta::milliseconds(1500));
        let parts = DurationParts::from_delta(&delta);
        assert_eq!(
            (parts.days, parts.hours, parts.seconds, parts.milliseconds),
            (-1, -2, -1, -500)
        );
    }

    #[test]
    fn test_encode_interval_ds() {
        let delta = TimeDelta::seconds(90_061) + TimeDelta::milliseconds(250);
        let bytes = encode_interval_ds(&delta).unwrap();
        assert_eq!(bytes, [0x80, 0, 0, 1, 61, 61, 61, 0x8E, 0xE6, 0xB2, 0x80]);
        assert_eq!(decode_interval_ds(&bytes).unwrap(), delta);
    }

    #[test]
    fn test_interval_ds_negative_round_trip() {
        let delta = -TimeDelta::milliseconds(3_723_004);
        let bytes = encode_interval_ds(&delta).unwrap();
        assert_eq!(decode_interval_ds(&bytes).unwrap(), delta);
    }

    #[test]
    fn test_decode_interval_ds_invalid() {
        let mut bytes = encode_interval_ds(&TimeDelta::zero()).unwrap();
        bytes[4] = 60 + 24;
        assert!(matches!(
            decode_interval_ds(&bytes),
            Err(Error::NativeDecode { code: NATIVE_ERR_INTERVAL_FIELD, .. })
        ));
        assert!(decode_interval_ds(&bytes[..5]).is_err());
    }

    #[test]
    fn test_interval_ym() {
        let bytes = encode_interval_ym(2, 14);
        assert_eq!(bytes, [0x80, 0, 0, 3, 62]);
        assert_eq!(decode_interval_ym(&bytes).unwrap(), (3, 2));
        assert_eq!(decode_interval_ym_delta(&bytes).unwrap(), TimeDelta::days(3 * 365 + 2 * 30));
    }

    #[test]
    fn test_interval_ym_negative() {
        let bytes = encode_interval_ym(-1, -6);
        assert_eq!(decode_interval_ym(&bytes).unwrap(), (-1, -6));
        assert_eq!(decode_interval_ym_delta(&bytes).unwrap(), TimeDelta::days(-545));
    }
}
