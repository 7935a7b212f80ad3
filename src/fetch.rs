//! Column fetching.
//!
//! The `Fetcher` converts native column storage into host values. A
//! concrete `HostKind` decodes straight into that shape; `HostKind::Any`
//! picks the host type from the column type, consulting the descriptor for
//! NUMBER columns whose precision and scale were not reported.

use crate::error::{Error, Result};
use crate::options::FetchOptions;
use crate::protocol::codec::{
    decode_interval_ds, decode_interval_ym_delta, decode_oracle_date, decode_oracle_timestamp,
    decode_oracle_timestamp_tz,
};
use crate::protocol::constants::{FAST_PATH_MAX_PRECISION, NATIVE_ERR_LENGTH, NUMBER_SIZE};
use crate::protocol::types::{
    BigNumber, BoundValue, ColumnDescriptor, ColumnSet, ColumnType, FetchedNumber, Handle,
    HandleKind, HostKind, NativeType, PackedNumber, TypeDescriptor,
};
use bytes::Bytes;
use tracing::{debug, warn};

/// Content of a fetched column.
#[derive(Debug, Clone, PartialEq)]
pub enum RawData {
    /// Native bytes laid out as the column's `NativeType`.
    Bytes(Bytes),
    /// Locator of a handle-typed column.
    Handle(Handle),
}

/// One column of a fetched row in native form.
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    native_type: NativeType,
    is_null: bool,
    data: RawData,
}

impl RawColumn {
    /// A non-NULL column with native bytes.
    pub fn new(native_type: NativeType, data: impl Into<Bytes>) -> Self {
        Self {
            native_type,
            is_null: false,
            data: RawData::Bytes(data.into()),
        }
    }

    /// A NULL column.
    pub fn null(native_type: NativeType) -> Self {
        Self {
            native_type,
            is_null: true,
            data: RawData::Bytes(Bytes::new()),
        }
    }

    /// A packed NUMBER column; the NULL sentinel makes a NULL column.
    pub fn number(value: PackedNumber) -> Self {
        let mut raw = Self::new(NativeType::Number, Bytes::copy_from_slice(value.as_bytes()));
        raw.is_null = value.is_null();
        raw
    }

    /// A character column.
    pub fn text(value: &str) -> Self {
        Self::new(NativeType::Text, Bytes::copy_from_slice(value.as_bytes()))
    }

    /// A handle-typed column.
    pub fn handle(handle: Handle) -> Self {
        Self {
            native_type: NativeType::from(handle.kind()),
            is_null: handle.is_null(),
            data: RawData::Handle(handle),
        }
    }

    /// The same column flagged NULL.
    pub fn into_null(mut self) -> Self {
        self.is_null = true;
        self
    }

    /// Native storage type.
    pub fn native_type(&self) -> NativeType {
        self.native_type
    }

    /// Whether the NULL flag is set.
    pub fn is_null(&self) -> bool {
        self.is_null
    }

    /// Native bytes; a handle's locator for handle columns.
    pub fn bytes(&self) -> &[u8] {
        match &self.data {
            RawData::Bytes(b) => b.as_ref(),
            RawData::Handle(h) => h.locator().as_ref(),
        }
    }

    /// The raw content.
    pub fn data(&self) -> &RawData {
        &self.data
    }
}

/// A numeric column value before conversion to its host type.
#[derive(Debug, Clone, Copy)]
enum NativeNumber {
    Integer(i128),
    Float(f64),
    Number(PackedNumber),
}

fn fixed<const N: usize>(raw: &RawColumn) -> Result<[u8; N]> {
    raw.bytes().try_into().map_err(|_| {
        Error::native_decode(
            NATIVE_ERR_LENGTH,
            format!("{} value must be {} bytes, got {}", raw.native_type, N, raw.bytes().len()),
        )
    })
}

fn native_number(raw: &RawColumn) -> Result<NativeNumber> {
    let value = match raw.native_type {
        NativeType::Short => NativeNumber::Integer(i16::from_ne_bytes(fixed(raw)?) as i128),
        NativeType::UShort => NativeNumber::Integer(u16::from_ne_bytes(fixed(raw)?) as i128),
        NativeType::Int => NativeNumber::Integer(i32::from_ne_bytes(fixed(raw)?) as i128),
        NativeType::UInt => NativeNumber::Integer(u32::from_ne_bytes(fixed(raw)?) as i128),
        NativeType::BigInt => NativeNumber::Integer(i64::from_ne_bytes(fixed(raw)?) as i128),
        NativeType::BigUInt => NativeNumber::Integer(u64::from_ne_bytes(fixed(raw)?) as i128),
        NativeType::Float => NativeNumber::Float(f32::from_ne_bytes(fixed(raw)?) as f64),
        NativeType::Double => NativeNumber::Float(f64::from_ne_bytes(fixed(raw)?)),
        NativeType::Number => {
            if raw.bytes().len() > NUMBER_SIZE {
                return Err(Error::native_decode(
                    NATIVE_ERR_LENGTH,
                    format!("NUMBER value has {} bytes", raw.bytes().len()),
                ));
            }
            NativeNumber::Number(PackedNumber::from_bytes(raw.bytes()))
        }
        NativeType::Text | NativeType::Long => {
            NativeNumber::Number(PackedNumber::parse(String::from_utf8_lossy(raw.bytes()).trim())?)
        }
        other => {
            return Err(Error::type_conversion(format!(
                "{} column is not numeric",
                other
            )))
        }
    };
    Ok(value)
}

fn packed(value: NativeNumber) -> Result<PackedNumber> {
    match value {
        NativeNumber::Integer(i) => PackedNumber::parse(&i.to_string()),
        NativeNumber::Float(f) => PackedNumber::from_f64(f),
        NativeNumber::Number(n) => Ok(n),
    }
}

/// Integer part of a numeric value.
fn integer(value: NativeNumber) -> Result<i128> {
    match value {
        NativeNumber::Integer(i) => Ok(i),
        NativeNumber::Float(f) if f.is_finite() => Ok(f.trunc() as i128),
        NativeNumber::Float(f) => Err(Error::type_conversion(format!("{} is not an integer", f))),
        NativeNumber::Number(n) => {
            Ok(n.trunc_i64()?.ok_or_else(|| Error::type_conversion("NULL NUMBER"))? as i128)
        }
    }
}

fn float(value: NativeNumber) -> Result<f64> {
    match value {
        NativeNumber::Integer(i) => Ok(i as f64),
        NativeNumber::Float(f) => Ok(f),
        NativeNumber::Number(n) => n.to_f64()?.ok_or_else(|| Error::type_conversion("NULL NUMBER")),
    }
}

fn narrow<T: TryFrom<i128>>(value: i128, type_name: &str) -> Result<T> {
    T::try_from(value)
        .map_err(|_| Error::type_conversion(format!("{} does not fit {}", value, type_name)))
}

fn lossy_text(raw: &RawColumn) -> String {
    String::from_utf8_lossy(raw.bytes()).into_owned()
}

/// Converts fetched columns into host values.
#[derive(Debug, Clone, Default)]
pub struct Fetcher {
    options: FetchOptions,
}

impl Fetcher {
    /// Create a fetcher.
    pub fn new(options: FetchOptions) -> Self {
        Self { options }
    }

    /// The options in effect.
    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Convert one column into the requested host shape.
    ///
    /// A NULL column yields the NULL value of `kind` without looking at the
    /// data.
    pub fn fetch_into(
        &self,
        kind: HostKind,
        desc: &mut ColumnDescriptor,
        raw: &RawColumn,
    ) -> Result<BoundValue> {
        if raw.is_null() {
            return Ok(kind.null_value());
        }
        match kind {
            HostKind::Any => self.fetch_dynamic(desc, raw),
            concrete => self.convert(concrete, raw),
        }
    }

    /// Fill a row, one destination slot per column in ordinal order.
    ///
    /// Each slot's current variant selects the host shape; `Null` and
    /// `Numeric` slots fetch dynamically.
    pub fn fetch_row(
        &self,
        columns: &mut ColumnSet,
        raws: &[RawColumn],
        dest: &mut [BoundValue],
    ) -> Result<()> {
        let count = columns.len();
        if raws.len() != count {
            return Err(Error::ColumnIndexOutOfBounds { index: raws.len(), count });
        }
        if dest.len() != count {
            return Err(Error::ColumnIndexOutOfBounds { index: dest.len(), count });
        }
        for (ordinal, (raw, slot)) in raws.iter().zip(dest.iter_mut()).enumerate() {
            let desc = columns.get_mut(ordinal + 1)?;
            let kind = slot.host_kind().unwrap_or(HostKind::Any);
            *slot = self.fetch_into(kind, desc, raw)?;
        }
        Ok(())
    }

    /// Update an IN/OUT slot with the value the statement wrote back.
    ///
    /// The slot keeps its variant; numeric subtypes convert into it.
    pub fn read_back(&self, slot: &mut BoundValue, raw: &RawColumn) -> Result<()> {
        let kind = slot.host_kind().ok_or_else(|| {
            Error::type_conversion(format!("cannot read back into {}", slot.type_name()))
        })?;
        debug!(
            host_type = slot.type_name(),
            native_type = %raw.native_type(),
            is_null = raw.is_null(),
            "read back"
        );
        *slot = if raw.is_null() {
            kind.null_value()
        } else if kind == HostKind::Any {
            self.native_value(raw)?
        } else {
            self.convert(kind, raw)?
        };
        Ok(())
    }

    /// Concrete destination kinds.
    fn convert(&self, kind: HostKind, raw: &RawColumn) -> Result<BoundValue> {
        let value = match kind {
            HostKind::Int16 => BoundValue::Int16(narrow(integer(native_number(raw)?)?, "i16")?),
            HostKind::UInt16 => BoundValue::UInt16(narrow(integer(native_number(raw)?)?, "u16")?),
            HostKind::Int32 => BoundValue::Int32(narrow(integer(native_number(raw)?)?, "i32")?),
            HostKind::UInt32 => BoundValue::UInt32(narrow(integer(native_number(raw)?)?, "u32")?),
            HostKind::Int64 => BoundValue::Int64(narrow(integer(native_number(raw)?)?, "i64")?),
            HostKind::UInt64 => BoundValue::UInt64(narrow(integer(native_number(raw)?)?, "u64")?),
            HostKind::NullableInt64 => {
                BoundValue::NullableInt64(Some(narrow(integer(native_number(raw)?)?, "i64")?))
            }
            HostKind::Float32 => BoundValue::Float32(float(native_number(raw)?)? as f32),
            HostKind::Float64 => BoundValue::Float64(float(native_number(raw)?)?),
            HostKind::NullableFloat64 => {
                BoundValue::NullableFloat64(Some(float(native_number(raw)?)?))
            }
            HostKind::Number => BoundValue::Number(packed(native_number(raw)?)?),
            HostKind::Decimal => {
                let n = packed(native_number(raw)?)?;
                let d = n.to_decimal()?.ok_or_else(|| {
                    Error::type_conversion(format!("NUMBER {} does not fit Decimal", n))
                })?;
                BoundValue::Decimal(d)
            }
            HostKind::Text => BoundValue::Text(self.text(raw)?),
            HostKind::Bytes => BoundValue::Bytes(raw.bytes().to_vec()),
            HostKind::Date => BoundValue::Date(self.date(raw)?),
            HostKind::NullableTime => BoundValue::NullableTime(Some(self.date(raw)?)),
            HostKind::Timestamp => BoundValue::Timestamp(decode_oracle_timestamp_tz(raw.bytes())?),
            HostKind::Duration => BoundValue::Duration(self.duration(raw)?),
            HostKind::Handle => match raw.data() {
                RawData::Handle(h) => BoundValue::Handle(h.clone()),
                RawData::Bytes(_) => {
                    return Err(Error::type_conversion(format!(
                        "{} column has no handle",
                        raw.native_type()
                    )))
                }
            },
            HostKind::Any => self.native_value(raw)?,
        };
        Ok(value)
    }

    /// Dispatch on the column type.
    fn fetch_dynamic(&self, desc: &mut ColumnDescriptor, raw: &RawColumn) -> Result<BoundValue> {
        let value = match desc.column_type {
            ColumnType::Numeric => match native_number(raw)? {
                NativeNumber::Float(f) if raw.native_type() == NativeType::Float => {
                    BoundValue::Float32(f as f32)
                }
                NativeNumber::Float(f) => BoundValue::Float64(f),
                other => self.numeric(desc, packed(other)?)?,
            },
            ColumnType::Date => BoundValue::Date(self.date(raw)?),
            ColumnType::Timestamp => {
                BoundValue::Timestamp(decode_oracle_timestamp_tz(raw.bytes())?)
            }
            ColumnType::Interval => BoundValue::Duration(self.duration(raw)?),
            ColumnType::Raw => BoundValue::Bytes(raw.bytes().to_vec()),
            ColumnType::Text => BoundValue::Text(lossy_text(raw)),
            ColumnType::Long => match raw.data() {
                RawData::Handle(h) => BoundValue::Handle(h.clone()),
                RawData::Bytes(_) => BoundValue::Text(lossy_text(raw)),
            },
            ColumnType::Cursor
            | ColumnType::Lob
            | ColumnType::File
            | ColumnType::Object
            | ColumnType::Collection
            | ColumnType::Reference => BoundValue::Handle(self.handle(desc, raw)),
            ColumnType::Unknown(type_num) => {
                warn!(
                    column = %desc.name,
                    type_num,
                    "unknown column type, returning text"
                );
                BoundValue::Text(lossy_text(raw))
            }
        };
        Ok(value)
    }

    /// NUMBER column fetched without a destination type.
    fn numeric(&self, desc: &mut ColumnDescriptor, number: PackedNumber) -> Result<BoundValue> {
        let Some(text) = number.to_text()? else {
            return Ok(BoundValue::Null);
        };
        let (precision, scale) = desc.resolve_numeric_shape(&text);

        let mut fetched = FetchedNumber::from_text(text);
        if scale == 0 && precision <= FAST_PATH_MAX_PRECISION {
            fetched.integer = number.integer_value()?;
        } else if precision > FAST_PATH_MAX_PRECISION && self.options.big_numbers {
            let integer = if scale == 0 { number.to_big_integer()? } else { None };
            fetched.big = match integer {
                Some(v) => Some(BigNumber::Integer(v)),
                None => number.to_big_decimal()?.map(BigNumber::Decimal),
            };
        }
        debug!(
            column = %desc.name,
            text = %fetched.text,
            precision,
            scale,
            integer = ?fetched.integer,
            big = fetched.big.is_some(),
            "fetched number"
        );
        Ok(BoundValue::Numeric(fetched))
    }

    /// Convert by native type alone, for slots without a type.
    fn native_value(&self, raw: &RawColumn) -> Result<BoundValue> {
        let value = match raw.native_type() {
            NativeType::Float => BoundValue::Float32(float(native_number(raw)?)? as f32),
            NativeType::Double => BoundValue::Float64(float(native_number(raw)?)?),
            t if t.is_numeric() => {
                let number = packed(native_number(raw)?)?;
                match number.to_text()? {
                    Some(text) => BoundValue::Numeric(FetchedNumber {
                        text,
                        integer: number.integer_value()?,
                        big: None,
                    }),
                    None => BoundValue::Null,
                }
            }
            NativeType::Date => BoundValue::Date(decode_oracle_date(raw.bytes())?),
            NativeType::Timestamp => {
                BoundValue::Timestamp(decode_oracle_timestamp_tz(raw.bytes())?)
            }
            NativeType::IntervalYm | NativeType::IntervalDs => {
                BoundValue::Duration(self.duration(raw)?)
            }
            NativeType::Raw => BoundValue::Bytes(raw.bytes().to_vec()),
            _ => match raw.data() {
                RawData::Handle(h) => BoundValue::Handle(h.clone()),
                RawData::Bytes(_) => BoundValue::Text(lossy_text(raw)),
            },
        };
        Ok(value)
    }

    fn text(&self, raw: &RawColumn) -> Result<String> {
        let text = match raw.native_type() {
            NativeType::Float | NativeType::Double => float(native_number(raw)?)?.to_string(),
            t if t.is_numeric() => packed(native_number(raw)?)?.to_string(),
            NativeType::Date => decode_oracle_date(raw.bytes())?
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            NativeType::Timestamp => decode_oracle_timestamp_tz(raw.bytes())?
                .format("%Y-%m-%d %H:%M:%S%.f %:z")
                .to_string(),
            NativeType::IntervalYm | NativeType::IntervalDs => self.duration(raw)?.to_string(),
            _ => lossy_text(raw),
        };
        Ok(text)
    }

    fn date(&self, raw: &RawColumn) -> Result<chrono::NaiveDateTime> {
        decode_oracle_timestamp(raw.bytes())
    }

    fn duration(&self, raw: &RawColumn) -> Result<chrono::TimeDelta> {
        match raw.native_type() {
            NativeType::IntervalYm => decode_interval_ym_delta(raw.bytes()),
            _ => decode_interval_ds(raw.bytes()),
        }
    }

    fn handle(&self, desc: &ColumnDescriptor, raw: &RawColumn) -> Handle {
        match raw.data() {
            RawData::Handle(h) => h.clone(),
            RawData::Bytes(b) => {
                let kind = match desc.column_type {
                    ColumnType::Cursor => HandleKind::Statement,
                    ColumnType::File => HandleKind::File,
                    ColumnType::Object => HandleKind::Object,
                    ColumnType::Collection => HandleKind::Collection,
                    ColumnType::Reference => HandleKind::Reference,
                    _ => HandleKind::Lob,
                };
                let handle = Handle::new(kind, b.clone());
                match kind {
                    HandleKind::Object | HandleKind::Collection => handle.with_type(
                        TypeDescriptor::new(desc.type_num as u16, desc.type_name.clone()),
                    ),
                    _ => handle,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number_column() -> ColumnDescriptor {
        ColumnDescriptor::new("N", 2)
    }

    #[test]
    fn test_null_column_yields_kind_default() {
        let fetcher = Fetcher::default();
        let mut desc = number_column();
        let raw = RawColumn::null(NativeType::Number);
        assert_eq!(fetcher.fetch_into(HostKind::Any, &mut desc, &raw).unwrap(), BoundValue::Null);
        assert_eq!(
            fetcher.fetch_into(HostKind::Int32, &mut desc, &raw).unwrap(),
            BoundValue::Int32(0)
        );
        assert!(!desc.shape_inferred());
    }

    #[test]
    fn test_native_number_widths() {
        let raw = RawColumn::new(NativeType::Short, Bytes::copy_from_slice(&(-7i16).to_ne_bytes()));
        assert!(matches!(native_number(&raw).unwrap(), NativeNumber::Integer(-7)));
        let bad = RawColumn::new(NativeType::Int, Bytes::from_static(&[1, 2]));
        assert!(matches!(native_number(&bad), Err(Error::NativeDecode { .. })));
    }

    #[test]
    fn test_narrowing_overflow() {
        let fetcher = Fetcher::default();
        let raw = RawColumn::number("70000".parse().unwrap());
        assert!(matches!(
            fetcher.convert(HostKind::Int16, &raw),
            Err(Error::TypeConversion { .. })
        ));
        assert_eq!(fetcher.convert(HostKind::Int32, &raw).unwrap(), BoundValue::Int32(70000));
    }
}
