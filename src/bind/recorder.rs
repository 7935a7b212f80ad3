//! In-process bind target.
//!
//! `RecordingTarget` keeps every bind in memory. It serves statement layers
//! that build their own execute payload from the recorded buffers, and it
//! lets OUT binds be read back through the fetcher.

use super::{BindDirection, BindHandle, BindTarget, NativeBind};
use crate::error::{Error, Result};
use crate::fetch::RawColumn;
use std::collections::HashSet;

/// One recorded bind.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedBind {
    /// Placeholder name.
    pub name: String,
    /// Native storage.
    pub value: NativeBind,
    /// Direction; IN/OUT until changed.
    pub direction: BindDirection,
    /// Scalar NULL flag.
    pub null: bool,
    /// 1-based NULL element positions of an array bind.
    pub null_positions: Vec<usize>,
}

/// A bind target that records binds in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingTarget {
    array_size: Option<u32>,
    binds: Vec<RecordedBind>,
    rejected: HashSet<String>,
}

impl RecordingTarget {
    /// Create an empty target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject binds under `name`, as a statement without that placeholder would.
    pub fn reject(mut self, name: impl Into<String>) -> Self {
        self.rejected.insert(name.into());
        self
    }

    /// The bind array size, if set.
    pub fn array_size(&self) -> Option<u32> {
        self.array_size
    }

    /// All binds in bind order.
    pub fn binds(&self) -> &[RecordedBind] {
        &self.binds
    }

    /// Get a bind by handle.
    pub fn get(&self, handle: BindHandle) -> Option<&RecordedBind> {
        self.binds.get(handle.0)
    }

    /// Find a bind by placeholder name.
    pub fn find(&self, name: &str) -> Option<&RecordedBind> {
        self.binds.iter().find(|b| b.name == name)
    }

    /// Replace the native storage of a bind, as execution does for OUT binds.
    pub fn set_output(&mut self, handle: BindHandle, value: NativeBind, null: bool) -> Result<()> {
        let bind = self.get_mut(handle)?;
        bind.value = value;
        bind.null = null;
        Ok(())
    }

    /// The current content of a scalar bind as a fetched column.
    pub fn raw_column(&self, handle: BindHandle) -> Result<RawColumn> {
        let bind = self.get(handle).ok_or_else(|| unknown_handle(handle))?;
        let raw = match &bind.value {
            NativeBind::Scalar { native_type, data } => RawColumn::new(*native_type, data.clone()),
            NativeBind::Handle(h) => RawColumn::handle(h.clone()),
            _ => {
                return Err(Error::type_conversion(format!(
                    "array bind {} cannot be read back as a column",
                    bind.name
                )))
            }
        };
        Ok(if bind.null { raw.into_null() } else { raw })
    }

    fn get_mut(&mut self, handle: BindHandle) -> Result<&mut RecordedBind> {
        self.binds.get_mut(handle.0).ok_or_else(|| unknown_handle(handle))
    }
}

fn unknown_handle(handle: BindHandle) -> Error {
    Error::bind_failed(format!("#{}", handle.0), "unknown bind handle")
}

impl BindTarget for RecordingTarget {
    fn set_array_size(&mut self, size: u32) -> Result<()> {
        self.array_size = Some(size);
        Ok(())
    }

    fn bind(&mut self, name: &str, value: NativeBind) -> Result<BindHandle> {
        if self.rejected.contains(name) {
            return Err(Error::bind_failed(name, "no such placeholder"));
        }
        let handle = BindHandle(self.binds.len());
        self.binds.push(RecordedBind {
            name: name.to_string(),
            value,
            direction: BindDirection::InOut,
            null: false,
            null_positions: Vec::new(),
        });
        Ok(handle)
    }

    fn set_null(&mut self, handle: BindHandle) -> Result<()> {
        self.get_mut(handle)?.null = true;
        Ok(())
    }

    fn set_null_at(&mut self, handle: BindHandle, position: usize) -> Result<()> {
        let bind = self.get_mut(handle)?;
        if position == 0 || position > bind.value.count() {
            return Err(Error::bind_failed(
                bind.name.clone(),
                format!("null position {} outside 1..={}", position, bind.value.count()),
            ));
        }
        bind.null_positions.push(position);
        Ok(())
    }

    fn set_direction(&mut self, handle: BindHandle, direction: BindDirection) -> Result<()> {
        self.get_mut(handle)?.direction = direction;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::types::NativeType;
    use bytes::Bytes;

    fn scalar() -> NativeBind {
        NativeBind::Scalar {
            native_type: NativeType::Int,
            data: Bytes::copy_from_slice(&7i32.to_ne_bytes()),
        }
    }

    #[test]
    fn test_record_and_find() {
        let mut target = RecordingTarget::new();
        let handle = target.bind(":1", scalar()).unwrap();
        assert_eq!(handle, BindHandle(0));
        assert_eq!(target.find(":1").unwrap().direction, BindDirection::InOut);
        target.set_direction(handle, BindDirection::In).unwrap();
        assert_eq!(target.get(handle).unwrap().direction, BindDirection::In);
    }

    #[test]
    fn test_reject_and_bounds() {
        let mut target = RecordingTarget::new().reject(":missing");
        assert!(matches!(
            target.bind(":missing", scalar()),
            Err(Error::BindFailed { .. })
        ));
        let handle = target.bind(":1", scalar()).unwrap();
        assert!(target.set_null_at(handle, 2).is_err());
        assert!(target.set_null(BindHandle(9)).is_err());
    }

    #[test]
    fn test_raw_column_carries_null() {
        let mut target = RecordingTarget::new();
        let handle = target.bind(":1", scalar()).unwrap();
        assert!(!target.raw_column(handle).unwrap().is_null());
        target.set_null(handle).unwrap();
        assert!(target.raw_column(handle).unwrap().is_null());
    }
}
