//! Parameter binding.
//!
//! The `Binder` turns a `BoundValue` into owned native storage and hands it
//! to a `BindTarget`, the statement-side collaborator that owns the native
//! bind resources. Every buffer is built before the target is called, so a
//! failing array element leaves nothing of that array behind.

pub mod recorder;

use crate::error::{Error, Result};
use crate::options::BindOptions;
use crate::protocol::buffer::StrideBuffer;
use crate::protocol::codec::{encode_interval_ds, encode_oracle_date, encode_oracle_timestamp_tz};
use crate::protocol::constants::NUMBER_SIZE;
use crate::protocol::types::{BoundValue, Handle, NativeType, PackedNumber, TypeDescriptor};
use bytes::Bytes;
use chrono::NaiveDateTime;
use std::fmt;
use tracing::debug;

/// Where a parameter is bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindPosition {
    /// 1-based position, bound by the name `:n`.
    Ordinal(usize),
    /// Placeholder name including its leading colon.
    Name(String),
}

impl BindPosition {
    /// The placeholder name passed to the target.
    pub fn name(&self) -> String {
        match self {
            BindPosition::Ordinal(n) => format!(":{}", n),
            BindPosition::Name(name) => name.clone(),
        }
    }
}

impl fmt::Display for BindPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl From<usize> for BindPosition {
    fn from(ordinal: usize) -> Self {
        BindPosition::Ordinal(ordinal)
    }
}

impl From<&str> for BindPosition {
    fn from(name: &str) -> Self {
        BindPosition::Name(name.to_string())
    }
}

/// Identifies a bind inside its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindHandle(pub usize);

/// Data flow direction of a bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindDirection {
    In,
    Out,
    InOut,
}

/// Result of a bind call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    /// The value was attached to the target.
    Bound(BindHandle),
    /// Nothing to bind (an empty handle array).
    Skipped,
}

impl BindOutcome {
    /// The handle, if anything was bound.
    pub fn handle(&self) -> Option<BindHandle> {
        match self {
            BindOutcome::Bound(handle) => Some(*handle),
            BindOutcome::Skipped => None,
        }
    }
}

/// Owned native storage for one bind.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeBind {
    /// One fixed or variable width value.
    Scalar { native_type: NativeType, data: Bytes },
    /// Contiguous fixed-stride elements.
    Array {
        native_type: NativeType,
        data: StrideBuffer,
    },
    /// One opaque handle.
    Handle(Handle),
    /// Handles sharing the type of the first one.
    HandleArray {
        handles: Vec<Handle>,
        type_desc: TypeDescriptor,
    },
}

impl NativeBind {
    /// Native storage type of the bound elements.
    pub fn native_type(&self) -> NativeType {
        match self {
            NativeBind::Scalar { native_type, .. } | NativeBind::Array { native_type, .. } => {
                *native_type
            }
            NativeBind::Handle(h) => NativeType::from(h.kind()),
            NativeBind::HandleArray { handles, .. } => handles
                .first()
                .map(|h| NativeType::from(h.kind()))
                .unwrap_or(NativeType::Object),
        }
    }

    /// Number of bound elements.
    pub fn count(&self) -> usize {
        match self {
            NativeBind::Scalar { .. } | NativeBind::Handle(_) => 1,
            NativeBind::Array { data, .. } => data.count(),
            NativeBind::HandleArray { handles, .. } => handles.len(),
        }
    }

    /// Element width in bytes, 0 for handles.
    pub fn stride(&self) -> usize {
        match self {
            NativeBind::Scalar { data, .. } => data.len(),
            NativeBind::Array { data, .. } => data.stride(),
            _ => 0,
        }
    }
}

/// The statement-side owner of native bind resources.
///
/// Null positions passed to `set_null_at` are 1-based.
pub trait BindTarget {
    /// Set the number of rows bound by array binds.
    fn set_array_size(&mut self, size: u32) -> Result<()>;

    /// Attach native storage under a placeholder name.
    fn bind(&mut self, name: &str, value: NativeBind) -> Result<BindHandle>;

    /// Mark a scalar bind NULL.
    fn set_null(&mut self, handle: BindHandle) -> Result<()>;

    /// Mark one element of an array bind NULL.
    fn set_null_at(&mut self, handle: BindHandle, position: usize) -> Result<()>;

    /// Set the data flow direction.
    fn set_direction(&mut self, handle: BindHandle, direction: BindDirection) -> Result<()>;
}

#[derive(Debug, Default, PartialEq)]
enum Nulls {
    #[default]
    None,
    Scalar,
    Positions(Vec<usize>),
}

struct Prepared {
    bind: NativeBind,
    nulls: Nulls,
}

impl Prepared {
    fn new(bind: NativeBind) -> Self {
        Self {
            bind,
            nulls: Nulls::None,
        }
    }

    fn null_if(mut self, null: bool) -> Self {
        if null {
            self.nulls = Nulls::Scalar;
        }
        self
    }

    fn nulls_at(mut self, positions: Vec<usize>) -> Self {
        if !positions.is_empty() {
            self.nulls = Nulls::Positions(positions);
        }
        self
    }
}

fn scalar(native_type: NativeType, data: &[u8]) -> NativeBind {
    NativeBind::Scalar {
        native_type,
        data: Bytes::copy_from_slice(data),
    }
}

fn fixed_array<const N: usize>(native_type: NativeType, items: &[[u8; N]]) -> NativeBind {
    NativeBind::Array {
        native_type,
        data: StrideBuffer::pack_with_stride(items.iter().map(|b| b.as_slice()), N),
    }
}

fn number_array(numbers: &[PackedNumber]) -> Prepared {
    let nulls = numbers
        .iter()
        .enumerate()
        .filter(|(_, n)| n.is_null())
        .map(|(i, _)| i + 1)
        .collect();
    Prepared::new(NativeBind::Array {
        native_type: NativeType::Number,
        data: StrideBuffer::pack_with_stride(
            numbers.iter().map(|n| n.as_bytes().as_slice()),
            NUMBER_SIZE,
        ),
    })
    .nulls_at(nulls)
}

/// Cut text to at most `max` bytes on a character boundary.
fn truncate_text(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Binds host values to a `BindTarget`.
#[derive(Debug, Clone, Default)]
pub struct Binder {
    options: BindOptions,
}

impl Binder {
    /// Create a binder.
    pub fn new(options: BindOptions) -> Self {
        Self { options }
    }

    /// The options in effect.
    pub fn options(&self) -> &BindOptions {
        &self.options
    }

    /// Bind a value as an IN parameter.
    ///
    /// # Errors
    /// Returns `Error::UnsupportedBindType` for `BoundValue::Null`, codec
    /// errors for values that cannot be encoded, and target errors.
    pub fn bind_in<T: BindTarget + ?Sized>(
        &self,
        target: &mut T,
        position: &BindPosition,
        value: &BoundValue,
    ) -> Result<BindOutcome> {
        let outcome = self.bind(target, position, value)?;
        if let BindOutcome::Bound(handle) = outcome {
            target.set_direction(handle, BindDirection::In)?;
        }
        Ok(outcome)
    }

    /// Bind a value whose slot is read back after execution.
    ///
    /// The target's direction is left as it is (IN/OUT).
    pub fn bind_in_out<T: BindTarget + ?Sized>(
        &self,
        target: &mut T,
        position: &BindPosition,
        value: &BoundValue,
    ) -> Result<BindOutcome> {
        self.bind(target, position, value)
    }

    /// Bind values as IN parameters `:1..:n` after setting the bind array
    /// size.
    pub fn bind_all<T: BindTarget + ?Sized>(
        &self,
        target: &mut T,
        values: &[BoundValue],
    ) -> Result<Vec<BindOutcome>> {
        target.set_array_size(self.options.array_size)?;
        values
            .iter()
            .enumerate()
            .map(|(i, value)| self.bind_in(target, &BindPosition::Ordinal(i + 1), value))
            .collect()
    }

    /// Bind named IN parameters after setting the bind array size.
    pub fn bind_named<T: BindTarget + ?Sized>(
        &self,
        target: &mut T,
        values: &[(&str, BoundValue)],
    ) -> Result<Vec<BindOutcome>> {
        target.set_array_size(self.options.array_size)?;
        values
            .iter()
            .map(|(name, value)| self.bind_in(target, &BindPosition::from(*name), value))
            .collect()
    }

    fn bind<T: BindTarget + ?Sized>(
        &self,
        target: &mut T,
        position: &BindPosition,
        value: &BoundValue,
    ) -> Result<BindOutcome> {
        let name = position.name();
        let Some(prepared) = self.prepare(&name, value)? else {
            debug!(
                name = %name,
                host_type = value.type_name(),
                "empty handle array, nothing bound"
            );
            return Ok(BindOutcome::Skipped);
        };

        debug!(
            name = %name,
            host_type = value.type_name(),
            native_type = %prepared.bind.native_type(),
            count = prepared.bind.count(),
            stride = prepared.bind.stride(),
            "bind"
        );
        let handle = target.bind(&name, prepared.bind)?;
        match prepared.nulls {
            Nulls::None => {}
            Nulls::Scalar => target.set_null(handle)?,
            Nulls::Positions(positions) => {
                for position in positions {
                    target.set_null_at(handle, position)?;
                }
            }
        }
        Ok(BindOutcome::Bound(handle))
    }

    /// Build the native storage for a value. `None` means nothing to bind.
    fn prepare(&self, name: &str, value: &BoundValue) -> Result<Option<Prepared>> {
        let prepared = match value {
            BoundValue::Null => {
                return Err(Error::UnsupportedBindType {
                    type_name: value.type_name(),
                    parameter: name.to_string(),
                })
            }

            BoundValue::Int16(v) => Prepared::new(scalar(NativeType::Short, &v.to_ne_bytes())),
            BoundValue::UInt16(v) => Prepared::new(scalar(NativeType::UShort, &v.to_ne_bytes())),
            BoundValue::Int32(v) => Prepared::new(scalar(NativeType::Int, &v.to_ne_bytes())),
            BoundValue::UInt32(v) => Prepared::new(scalar(NativeType::UInt, &v.to_ne_bytes())),
            BoundValue::Int64(v) => Prepared::new(scalar(NativeType::BigInt, &v.to_ne_bytes())),
            BoundValue::UInt64(v) => Prepared::new(scalar(NativeType::BigUInt, &v.to_ne_bytes())),
            BoundValue::Float32(v) => Prepared::new(scalar(NativeType::Float, &v.to_ne_bytes())),
            BoundValue::Float64(v) => Prepared::new(scalar(NativeType::Double, &v.to_ne_bytes())),

            BoundValue::Int16Array(xs) => {
                let items: Vec<_> = xs.iter().map(|v| v.to_ne_bytes()).collect();
                Prepared::new(fixed_array(NativeType::Short, &items))
            }
            BoundValue::UInt16Array(xs) => {
                let items: Vec<_> = xs.iter().map(|v| v.to_ne_bytes()).collect();
                Prepared::new(fixed_array(NativeType::UShort, &items))
            }
            BoundValue::Int32Array(xs) => {
                let items: Vec<_> = xs.iter().map(|v| v.to_ne_bytes()).collect();
                Prepared::new(fixed_array(NativeType::Int, &items))
            }
            BoundValue::UInt32Array(xs) => {
                let items: Vec<_> = xs.iter().map(|v| v.to_ne_bytes()).collect();
                Prepared::new(fixed_array(NativeType::UInt, &items))
            }
            BoundValue::Int64Array(xs) => {
                let items: Vec<_> = xs.iter().map(|v| v.to_ne_bytes()).collect();
                Prepared::new(fixed_array(NativeType::BigInt, &items))
            }
            BoundValue::UInt64Array(xs) => {
                let items: Vec<_> = xs.iter().map(|v| v.to_ne_bytes()).collect();
                Prepared::new(fixed_array(NativeType::BigUInt, &items))
            }

            // No native float array: elements go through the NUMBER codec.
            BoundValue::Float32Array(xs) => {
                let numbers = xs
                    .iter()
                    .map(|f| PackedNumber::from_f32(*f))
                    .collect::<Result<Vec<_>>>()?;
                number_array(&numbers)
            }
            BoundValue::Float64Array(xs) => {
                let numbers = xs
                    .iter()
                    .map(|f| PackedNumber::from_f64(*f))
                    .collect::<Result<Vec<_>>>()?;
                number_array(&numbers)
            }
            BoundValue::NullableFloat64Array(xs) => {
                let numbers = xs
                    .iter()
                    .map(|f| f.map_or(Ok(PackedNumber::NULL), PackedNumber::from_f64))
                    .collect::<Result<Vec<_>>>()?;
                number_array(&numbers)
            }

            BoundValue::NullableInt64(v) => {
                let bytes = v.unwrap_or(0).to_ne_bytes();
                Prepared::new(scalar(NativeType::BigInt, &bytes)).null_if(v.is_none())
            }
            BoundValue::NullableFloat64(v) => {
                let bytes = v.unwrap_or(0.0).to_ne_bytes();
                Prepared::new(scalar(NativeType::Double, &bytes)).null_if(v.is_none())
            }
            BoundValue::NullableTime(v) => {
                let date = encode_oracle_date(&v.unwrap_or_else(NaiveDateTime::default))?;
                Prepared::new(scalar(NativeType::Date, &date)).null_if(v.is_none())
            }

            BoundValue::Text(s) => {
                let text = truncate_text(s, self.options.max_string_len);
                Prepared::new(scalar(NativeType::Text, text.as_bytes())).null_if(text.is_empty())
            }
            BoundValue::TextArray(xs) => {
                let max = self.options.max_string_len;
                let data = StrideBuffer::pack(
                    xs.iter().map(|s| truncate_text(s, max).as_bytes()),
                    true,
                    self.options.default_stride,
                );
                Prepared::new(NativeBind::Array {
                    native_type: NativeType::Text,
                    data,
                })
            }
            BoundValue::Bytes(b) => Prepared::new(scalar(NativeType::Raw, b)).null_if(b.is_empty()),
            BoundValue::BytesArray(xs) => {
                let data = StrideBuffer::pack(
                    xs.iter().map(Vec::as_slice),
                    false,
                    self.options.default_stride,
                );
                Prepared::new(NativeBind::Array {
                    native_type: NativeType::Raw,
                    data,
                })
            }

            BoundValue::Number(n) => {
                Prepared::new(scalar(NativeType::Number, n.as_bytes())).null_if(n.is_null())
            }
            BoundValue::NumberArray(xs) => number_array(xs),
            BoundValue::Decimal(d) => {
                Prepared::new(scalar(NativeType::Number, PackedNumber::from_decimal(d)?.as_bytes()))
            }
            BoundValue::Numeric(n) => {
                Prepared::new(scalar(NativeType::Number, PackedNumber::parse(&n.text)?.as_bytes()))
            }

            BoundValue::Date(dt) => {
                Prepared::new(scalar(NativeType::Date, &encode_oracle_date(dt)?))
            }
            BoundValue::DateArray(xs) => {
                let items = xs.iter().map(encode_oracle_date).collect::<Result<Vec<_>>>()?;
                Prepared::new(fixed_array(NativeType::Date, &items))
            }
            BoundValue::Timestamp(ts) => {
                Prepared::new(scalar(NativeType::Timestamp, &encode_oracle_timestamp_tz(ts)?))
            }
            BoundValue::TimestampArray(xs) => {
                let items = xs.iter().map(encode_oracle_timestamp_tz).collect::<Result<Vec<_>>>()?;
                Prepared::new(fixed_array(NativeType::Timestamp, &items))
            }
            BoundValue::Duration(d) => {
                Prepared::new(scalar(NativeType::IntervalDs, &encode_interval_ds(d)?))
            }
            BoundValue::DurationArray(xs) => {
                let items = xs.iter().map(encode_interval_ds).collect::<Result<Vec<_>>>()?;
                Prepared::new(fixed_array(NativeType::IntervalDs, &items))
            }

            BoundValue::Handle(h) => {
                Prepared::new(NativeBind::Handle(h.clone())).null_if(h.is_null())
            }
            BoundValue::HandleArray(handles) => {
                let Some(first) = handles.first() else {
                    return Ok(None);
                };
                Prepared::new(NativeBind::HandleArray {
                    type_desc: first.type_descriptor(),
                    handles: handles.clone(),
                })
            }
        };
        Ok(Some(prepared))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_names() {
        assert_eq!(BindPosition::Ordinal(3).name(), ":3");
        assert_eq!(BindPosition::from(":id").to_string(), ":id");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello", 3), "hel");
        // 'é' is two bytes; never split it
        assert_eq!(truncate_text("aé", 2), "a");
    }

    #[test]
    fn test_prepare_null_is_unsupported() {
        let binder = Binder::default();
        match binder.prepare(":1", &BoundValue::Null) {
            Err(Error::UnsupportedBindType { type_name, parameter }) => {
                assert_eq!(type_name, "null");
                assert_eq!(parameter, ":1");
            }
            _ => panic!("Expected UnsupportedBindType"),
        }
    }

    #[test]
    fn test_prepare_nullable_float_array() {
        let binder = Binder::default();
        let prepared = binder
            .prepare(":1", &BoundValue::NullableFloat64Array(vec![Some(1.5), None, Some(-2.0)]))
            .unwrap()
            .unwrap();
        assert_eq!(prepared.nulls, Nulls::Positions(vec![2]));
        assert_eq!(prepared.bind.native_type(), NativeType::Number);
        assert_eq!(prepared.bind.count(), 3);
        assert_eq!(prepared.bind.stride(), NUMBER_SIZE);
    }

    #[test]
    fn test_prepare_empty_handle_array() {
        let binder = Binder::default();
        assert!(binder.prepare(":1", &BoundValue::HandleArray(vec![])).unwrap().is_none());
    }
}
