//! Native storage layouts for Oracle datatypes.

pub mod buffer;
pub mod codec;
pub mod constants;
pub mod types;

pub use buffer::{ReadBuffer, StrideBuffer, WriteBuffer};
pub use types::{
    BigNumber, BoundValue, ColumnDescriptor, ColumnSet, ColumnType, FetchedNumber, Handle,
    HandleKind, HostKind, NativeType, PackedNumber, TypeDescriptor,
};
