//! Buffer utilities for native field storage and fixed-stride arrays.

use crate::error::{Error, Result};
use bytes::{BufMut, Bytes, BytesMut};

/// A cursor over native field bytes.
pub struct ReadBuffer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ReadBuffer<'a> {
    /// Create a new read buffer over a slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Get the current position in the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get the remaining bytes in the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Check if the buffer has at least `n` bytes remaining.
    pub fn has_remaining(&self, n: usize) -> bool {
        self.remaining() >= n
    }

    /// Read a single byte.
    #[track_caller]
    pub fn read_u8(&mut self) -> Result<u8> {
        if !self.has_remaining(1) {
            return Err(Error::BufferTooSmall {
                needed: 1,
                available: self.remaining(),
                location: std::panic::Location::caller(),
            });
        }
        let val = self.data[self.pos];
        self.pos += 1;
        Ok(val)
    }

    /// Read a big-endian u32.
    #[track_caller]
    pub fn read_u32_be(&mut self) -> Result<u32> {
        if !self.has_remaining(4) {
            return Err(Error::BufferTooSmall {
                needed: 4,
                available: self.remaining(),
                location: std::panic::Location::caller(),
            });
        }
        let val = u32::from_be_bytes([
            self.data[self.pos],
            self.data[self.pos + 1],
            self.data[self.pos + 2],
            self.data[self.pos + 3],
        ]);
        self.pos += 4;
        Ok(val)
    }
}

/// A buffer for building native field bytes.
pub struct WriteBuffer {
    data: BytesMut,
}

impl WriteBuffer {
    /// Create a write buffer sized for one native value.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
        }
    }

    /// Get the current length.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write a single byte.
    pub fn write_u8(&mut self, val: u8) {
        self.data.put_u8(val);
    }

    /// Write a big-endian u32.
    pub fn write_u32_be(&mut self, val: u32) {
        self.data.put_u32(val);
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Freeze the buffer into immutable bytes.
    pub fn freeze(self) -> Bytes {
        self.data.freeze()
    }
}

/// A contiguous buffer of `count` elements, each `stride` bytes wide.
///
/// Elements are copied left-aligned and zero padded. Elements longer than
/// the stride are cut at the stride.
#[derive(Debug, Clone, PartialEq)]
pub struct StrideBuffer {
    data: Bytes,
    stride: usize,
    count: usize,
}

impl StrideBuffer {
    /// Pack the elements using the widest element as the stride.
    ///
    /// `terminator` reserves one extra byte per element for a trailing NUL.
    /// When every element is empty, `empty_stride` is used instead.
    pub fn pack<'a, I>(elements: I, terminator: bool, empty_stride: usize) -> Self
    where
        I: IntoIterator<Item = &'a [u8]>,
        I::IntoIter: Clone,
    {
        let elements = elements.into_iter();
        let widest = elements.clone().map(<[u8]>::len).max().unwrap_or(0);
        let stride = if widest == 0 {
            empty_stride
        } else if terminator {
            widest + 1
        } else {
            widest
        };
        Self::pack_with_stride(elements, stride)
    }

    /// Pack the elements with an explicit stride.
    pub fn pack_with_stride<'a, I>(elements: I, stride: usize) -> Self
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut data = BytesMut::new();
        let mut count = 0;
        for element in elements {
            let start = data.len();
            data.resize(start + stride, 0);
            let n = element.len().min(stride);
            data[start..start + n].copy_from_slice(&element[..n]);
            count += 1;
        }
        Self {
            data: data.freeze(),
            stride,
            count,
        }
    }

    /// Width of each element in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of elements.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Get element `index` including its padding.
    pub fn element(&self, index: usize) -> Option<&[u8]> {
        if index >= self.count {
            return None;
        }
        let start = index * self.stride;
        Some(&self.data[start..start + self.stride])
    }

    /// Consume the buffer and return the packed bytes.
    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_u32_be() {
        let mut buf = ReadBuffer::new(&[0x80, 0x00, 0x00, 0x01, 0x3c]);
        assert_eq!(buf.read_u32_be().unwrap(), 0x8000_0001);
        assert_eq!(buf.read_u8().unwrap(), 0x3c);
        assert_eq!(buf.position(), 5);
        assert!(buf.read_u8().is_err());
    }

    #[test]
    fn test_read_short_buffer() {
        let mut buf = ReadBuffer::new(&[0x01, 0x02]);
        match buf.read_u32_be() {
            Err(Error::BufferTooSmall {
                needed, available, ..
            }) => {
                assert_eq!(needed, 4);
                assert_eq!(available, 2);
            }
            other => panic!("Expected BufferTooSmall, got {:?}", other),
        }
    }

    #[test]
    fn test_stride_with_terminator() {
        let packed = StrideBuffer::pack([b"1".as_slice(), b"22".as_slice()], true, 32767);
        assert_eq!(packed.stride(), 3);
        assert_eq!(packed.count(), 2);
        assert_eq!(packed.element(0), Some(b"1\0\0".as_slice()));
        assert_eq!(packed.element(1), Some(b"22\0".as_slice()));
        assert_eq!(packed.into_bytes().len(), 6);
    }

    #[test]
    fn test_stride_all_empty() {
        let packed = StrideBuffer::pack([b"".as_slice(), b"".as_slice()], false, 32767);
        assert_eq!(packed.stride(), 32767);
        assert_eq!(packed.count(), 2);
        assert!(packed.element(1).unwrap().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_stride_truncates_long_elements() {
        let packed = StrideBuffer::pack_with_stride([b"abcdef".as_slice()], 4);
        assert_eq!(packed.element(0), Some(b"abcd".as_slice()));
        assert_eq!(packed.element(1), None);
    }

    #[test]
    fn test_write_buffer() {
        let mut buf = WriteBuffer::with_capacity(5);
        buf.write_u32_be(0x8000_0000);
        buf.write_u8(60);
        assert_eq!(buf.len(), 5);
        assert_eq!(&buf.freeze()[..], &[0x80, 0, 0, 0, 60]);
    }
}
