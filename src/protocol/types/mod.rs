//! Value, descriptor and handle types for binding and fetching.

mod column;
mod column_type;
mod descriptor;
mod handle;
mod native_type;
mod number;
mod value;

pub use column::ColumnSet;
pub use column_type::ColumnType;
pub use descriptor::ColumnDescriptor;
pub use handle::{Handle, HandleKind, TypeDescriptor};
pub use native_type::NativeType;
pub use number::PackedNumber;
pub use value::{BigNumber, BoundValue, FetchedNumber, HostKind};
