//! Oracle value marshalling for Rust
//!
//! Converts host values to the native storage an Oracle call interface binds,
//! and converts fetched native storage back to host values. NUMBER, DATE,
//! TIMESTAMP and INTERVAL values use the server's own byte layouts, so no
//! client library is needed to encode or decode them.
//!
//! # Example
//!
//! ```
//! use oracle_marshal_rs::{
//!     BindOptions, BindPosition, Binder, BoundValue, ColumnDescriptor, FetchOptions, Fetcher,
//!     HostKind, PackedNumber, RawColumn, RecordingTarget, Result,
//! };
//!
//! fn main() -> Result<()> {
//!     // Bind an array of texts
//!     let binder = Binder::new(BindOptions::default());
//!     let mut target = RecordingTarget::new();
//!     let names = BoundValue::TextArray(vec!["1".into(), "22".into()]);
//!     binder.bind_in(&mut target, &BindPosition::Ordinal(1), &names)?;
//!     assert_eq!(target.find(":1").map(|b| b.value.stride()), Some(3));
//!
//!     // Fetch a NUMBER column
//!     let fetcher = Fetcher::new(FetchOptions::default());
//!     let mut desc = ColumnDescriptor::new("AMOUNT", 2);
//!     let raw = RawColumn::number(PackedNumber::parse("-4000")?);
//!     let value = fetcher.fetch_into(HostKind::Any, &mut desc, &raw)?;
//!     assert_eq!(value.to_i64(), Some(-4000));
//!
//!     Ok(())
//! }
//! ```

pub mod bind;
pub mod error;
pub mod fetch;
pub mod options;
pub mod protocol;

// Re-export main types
pub use bind::recorder::{RecordedBind, RecordingTarget};
pub use bind::{
    BindDirection, BindHandle, BindOutcome, BindPosition, BindTarget, Binder, NativeBind,
};
pub use error::{Error, Result};
pub use fetch::{Fetcher, RawColumn, RawData};
pub use options::{BindOptions, FetchOptions};
pub use protocol::types::{
    BigNumber, BoundValue, ColumnDescriptor, ColumnSet, ColumnType, FetchedNumber, Handle,
    HandleKind, HostKind, NativeType, PackedNumber, TypeDescriptor,
};
