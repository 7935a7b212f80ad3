//! Oracle NUMBER codec.
//!
//! A NUMBER is held in a 22-byte buffer:
//! - byte[0]: count of bytes that follow (exponent + mantissa + terminator),
//!   `0xFF` for NULL, `0x00` for a buffer that was never set
//! - byte[1]: exponent; high bit set for positive numbers, low 7 bits are a
//!   base-100 exponent with an offset of 65 (all bits inverted when negative)
//! - byte[2..]: up to 20 base-100 mantissa digits, `digit + 1` when positive
//!   and `101 - digit` when negative; negative numbers end with a `102`
//!   terminator unless all 20 mantissa bytes are used
//!
//! Only 19 mantissa bytes are guaranteed accurate, which gives the 38 digit
//! NUMBER precision.

use crate::error::{Error, Result};
use crate::protocol::constants::*;
use tracing::trace;

/// Decimal digits of a NUMBER with the decimal point position.
///
/// `point` counts digits left of the decimal point and may be negative or
/// larger than the digit count. Digits never carry leading or trailing zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digits {
    negative: bool,
    digits: [u8; NUMBER_MAX_DIGITS],
    len: usize,
    point: i32,
}

impl Digits {
    fn zero() -> Self {
        Self {
            negative: false,
            digits: [0; NUMBER_MAX_DIGITS],
            len: 0,
            point: 0,
        }
    }

    /// Whether the value is negative.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Whether the value is zero.
    pub fn is_zero(&self) -> bool {
        self.len == 0
    }

    /// Significant decimal digits.
    pub fn digits(&self) -> &[u8] {
        &self.digits[..self.len]
    }

    /// Position of the decimal point relative to the first digit.
    pub fn point(&self) -> i32 {
        self.point
    }

    /// Number of digits after the decimal point (negative for integers
    /// with trailing zeros that are not stored).
    pub fn scale(&self) -> i32 {
        self.len as i32 - self.point
    }

    /// Whether the value has no fractional part.
    pub fn is_integer(&self) -> bool {
        self.scale() <= 0
    }

    fn push(&mut self, digit: u8) {
        self.digits[self.len] = digit;
        self.len += 1;
    }

    fn trim(&mut self) {
        let lead = self.digits().iter().take_while(|d| **d == 0).count();
        if lead > 0 {
            self.digits.copy_within(lead..self.len, 0);
            self.len -= lead;
            self.point -= lead as i32;
        }
        while self.len > 0 && self.digits[self.len - 1] == 0 {
            self.len -= 1;
        }
        if self.len == 0 {
            *self = Self::zero();
        }
    }

    /// The unscaled integer formed by all digits, if it fits an i128.
    pub fn unscaled(&self) -> Option<i128> {
        let mut acc: i128 = 0;
        for &d in self.digits() {
            acc = acc.checked_mul(10)?;
            acc = if self.negative {
                acc.checked_sub(d as i128)?
            } else {
                acc.checked_add(d as i128)?
            };
        }
        Some(acc)
    }

    /// The exact integer value, if there is no fraction and it fits an i128.
    pub fn integer(&self) -> Option<i128> {
        if !self.is_integer() {
            return None;
        }
        let mut acc = self.unscaled()?;
        for _ in 0..(-self.scale()) {
            acc = acc.checked_mul(10)?;
        }
        Some(acc)
    }

    /// The integer part (truncated toward zero), if it fits an i128.
    pub fn integer_part(&self) -> Option<i128> {
        let mut acc: i128 = 0;
        for i in 0..self.point.max(0) as usize {
            let d = self.digits().get(i).copied().unwrap_or(0) as i128;
            acc = acc.checked_mul(10)?;
            acc = if self.negative {
                acc.checked_sub(d)?
            } else {
                acc.checked_add(d)?
            };
        }
        Some(acc)
    }

    /// Render as canonical decimal text.
    pub fn render(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        let digits = self.digits();
        let mut result =
            String::with_capacity(digits.len() + self.point.unsigned_abs() as usize + 3);
        if self.negative {
            result.push('-');
        }
        let point = self.point;
        if point <= 0 {
            result.push_str("0.");
            for _ in point..0 {
                result.push('0');
            }
            result.extend(digits.iter().map(|d| (b'0' + d) as char));
        } else if point as usize >= digits.len() {
            result.extend(digits.iter().map(|d| (b'0' + d) as char));
            for _ in digits.len()..point as usize {
                result.push('0');
            }
        } else {
            for (i, d) in digits.iter().enumerate() {
                if i == point as usize {
                    result.push('.');
                }
                result.push((b'0' + d) as char);
            }
        }
        result
    }
}

/// Parse a decimal literal into normalized digits.
///
/// Accepts an optional sign, digits and at most one decimal point with at
/// least one digit overall. Exponent notation is not accepted.
pub fn parse_decimal(text: &str) -> Result<Digits> {
    let (negative, body) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(Error::invalid_number(text, "no digits"));
    }
    if let Some(c) = int_part
        .chars()
        .chain(frac_part.chars())
        .find(|c| !c.is_ascii_digit())
    {
        return Err(Error::invalid_number(
            text,
            format!("unexpected character {:?}", c),
        ));
    }

    // Leading and trailing zeros never reach the digit array.
    let significant = int_part.trim_start_matches('0');
    let mut point = significant.len() as i32;
    let mut frac = frac_part;
    if significant.is_empty() {
        let lead = frac.len() - frac.trim_start_matches('0').len();
        point = -(lead as i32);
        frac = &frac[lead..];
    }
    let all = significant.bytes().chain(frac.bytes());
    let total = significant.len() + frac.len();
    let trailing = significant
        .bytes()
        .chain(frac.bytes())
        .rev()
        .take_while(|b| *b == b'0')
        .count();
    let keep = total - trailing;
    if keep > NUMBER_MAX_DIGITS {
        return Err(Error::invalid_number(
            text,
            format!("more than {} significant digits", NUMBER_MAX_DIGITS),
        ));
    }

    let mut parsed = Digits::zero();
    for b in all.take(keep) {
        parsed.push(b - b'0');
    }
    if parsed.len == 0 {
        return Ok(parsed);
    }
    parsed.negative = negative;
    parsed.point = point;
    Ok(parsed)
}

/// Encode decimal text into a 22-byte NUMBER buffer.
///
/// # Errors
/// Returns `Error::InvalidNumber` if the text is not a decimal literal, has
/// more significant digits than 20 mantissa bytes hold, or exceeds the
/// NUMBER range. Magnitudes below the range encode as zero.
pub fn encode_number(text: &str) -> Result<[u8; NUMBER_SIZE]> {
    let parsed = parse_decimal(text)?;
    encode_digits(&parsed, text)
}

fn encode_digits(parsed: &Digits, literal: &str) -> Result<[u8; NUMBER_SIZE]> {
    let mut out = [0u8; NUMBER_SIZE];
    if parsed.is_zero() {
        out[0] = 1;
        out[1] = NUMBER_ZERO_EXPONENT;
        return Ok(out);
    }

    // Align the digits so that the decimal point falls between two pairs.
    let mut digits = [0u8; NUMBER_MAX_DIGITS + 2];
    let mut len = 0;
    let mut point = parsed.point;
    if point.rem_euclid(2) == 1 {
        digits[0] = 0;
        len = 1;
        point += 1;
    }
    for &d in parsed.digits() {
        digits[len] = d;
        len += 1;
    }
    if len % 2 == 1 {
        digits[len] = 0;
        len += 1;
    }

    let pairs = len / 2;
    if pairs > NUMBER_MAX_MANTISSA_BYTES {
        return Err(Error::invalid_number(
            literal,
            format!("needs {} mantissa bytes", pairs),
        ));
    }
    let exponent = (point / 2 - 1) as i16;
    if exponent > NUMBER_MAX_EXPONENT {
        return Err(Error::invalid_number(literal, "exponent overflow"));
    }
    if exponent < NUMBER_MIN_EXPONENT {
        trace!(literal, exponent, "NUMBER underflow, encoding zero");
        out[0] = 1;
        out[1] = NUMBER_ZERO_EXPONENT;
        return Ok(out);
    }

    let exp_byte = (exponent + NUMBER_EXPONENT_BIAS) as u8 | NUMBER_POSITIVE_FLAG;
    let mut j = 1;
    if parsed.negative {
        out[j] = !exp_byte;
        for pair in digits[..len].chunks(2) {
            j += 1;
            out[j] = 101 - (pair[0] * 10 + pair[1]);
        }
        if pairs < NUMBER_MAX_MANTISSA_BYTES {
            j += 1;
            out[j] = NUMBER_NEGATIVE_TERMINATOR;
        }
    } else {
        out[j] = exp_byte;
        for pair in digits[..len].chunks(2) {
            j += 1;
            out[j] = pair[0] * 10 + pair[1] + 1;
        }
    }
    out[0] = j as u8;
    trace!(literal, bytes = ?&out[..=j], "encoded NUMBER");
    Ok(out)
}

/// Encode already-normalized digits.
pub fn encode_parsed(parsed: &Digits) -> Result<[u8; NUMBER_SIZE]> {
    encode_digits(parsed, &parsed.render())
}

/// Unpack a 22-byte NUMBER buffer into digits.
///
/// Returns `Ok(None)` for the NULL sentinel and for an unused buffer.
///
/// # Errors
/// Returns `Error::NativeDecode` if a mantissa byte is outside the digit
/// range.
pub fn unpack_number(bytes: &[u8]) -> Result<Option<Digits>> {
    let len = match bytes.first() {
        None | Some(&NUMBER_NULL_SENTINEL) | Some(&0) => return Ok(None),
        Some(&len) => (len as usize).min(NUMBER_SIZE - 1),
    };
    if bytes.len() < len + 1 {
        return Err(Error::native_decode(
            NATIVE_ERR_LENGTH,
            format!("NUMBER claims {} bytes, buffer has {}", len, bytes.len() - 1),
        ));
    }
    unpack_wire(&bytes[1..=len]).map(Some)
}

/// Unpack the length-less wire form (exponent byte first).
pub fn unpack_wire(wire: &[u8]) -> Result<Digits> {
    let Some((&exp_byte, mut mantissa)) = wire.split_first() else {
        return Ok(Digits::zero());
    };
    let positive = exp_byte & NUMBER_POSITIVE_FLAG != 0;
    let field = if positive {
        exp_byte & NUMBER_EXPONENT_MASK
    } else {
        !exp_byte & NUMBER_EXPONENT_MASK
    };
    let exponent = field as i32 - NUMBER_EXPONENT_BIAS as i32;

    let mut unpacked = Digits::zero();
    if mantissa.is_empty() {
        if !positive {
            // Only 0x00 stands alone on the negative side: -1e126.
            if exp_byte != 0 {
                return Err(Error::native_decode(
                    NATIVE_ERR_NUMBER_DIGIT,
                    format!("negative NUMBER exponent byte {:#04x} has no mantissa", exp_byte),
                ));
            }
            unpacked.negative = true;
            unpacked.push(1);
            unpacked.point = 127;
        }
        return Ok(unpacked);
    }

    if !positive && mantissa.last() == Some(&NUMBER_NEGATIVE_TERMINATOR) {
        mantissa = &mantissa[..mantissa.len() - 1];
    }
    for &byte in mantissa.iter().take(NUMBER_MAX_MANTISSA_BYTES) {
        let pair = if positive {
            byte.wrapping_sub(1)
        } else {
            101u8.wrapping_sub(byte)
        };
        if pair > 99 {
            return Err(Error::native_decode(
                NATIVE_ERR_NUMBER_DIGIT,
                format!("invalid NUMBER mantissa byte {}", byte),
            ));
        }
        unpacked.push(pair / 10);
        unpacked.push(pair % 10);
    }
    unpacked.negative = !positive;
    unpacked.point = 2 * (exponent + 1);
    unpacked.trim();
    Ok(unpacked)
}

/// Decode a 22-byte NUMBER buffer to canonical decimal text.
///
/// Returns `Ok(None)` for the NULL sentinel.
pub fn decode_number(bytes: &[u8]) -> Result<Option<String>> {
    Ok(unpack_number(bytes)?.map(|d| d.render()))
}

/// Decode the wire form of a NUMBER (exponent byte first, no length byte).
pub fn decode_oracle_number(wire: &[u8]) -> Result<String> {
    Ok(unpack_wire(wire)?.render())
}
