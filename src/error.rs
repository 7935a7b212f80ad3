//! Error types for the NUMBER codec and the bind/fetch layer.

use std::panic::Location;
use thiserror::Error;

/// Result type alias for marshaling operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for codec, bind and fetch operations.
#[derive(Error, Debug)]
pub enum Error {
    /// No bind arm exists for the host value.
    #[error("Cannot bind {parameter}: unsupported host type {type_name}")]
    UnsupportedBindType {
        type_name: &'static str,
        parameter: String,
    },

    /// Text is not a valid (optionally signed) decimal literal, or does not
    /// fit the NUMBER range.
    #[error("Invalid number literal {literal:?}: {reason}")]
    InvalidNumber { literal: String, reason: String },

    /// Date, timestamp or interval fields could not be extracted from
    /// native storage.
    #[error("Native decode error {code}: {message}")]
    NativeDecode { code: u32, message: String },

    /// The bind target rejected an operation.
    #[error("Bind of {parameter} failed: {message}")]
    BindFailed { parameter: String, message: String },

    /// Type conversion error.
    #[error("Type conversion error: {message}")]
    TypeConversion { message: String },

    /// Column index out of bounds.
    #[error("Column index {index} out of bounds (columns: {count})")]
    ColumnIndexOutOfBounds { index: usize, count: usize },

    /// Buffer too small.
    #[error("Buffer too small: need {needed} bytes, have {available} at {location}")]
    BufferTooSmall {
        needed: usize,
        available: usize,
        location: &'static Location<'static>,
    },

    /// Invalid option string.
    #[error("Invalid option: {message}")]
    InvalidOption { message: String },
}

impl Error {
    /// Create an invalid number error.
    pub fn invalid_number(literal: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNumber {
            literal: literal.into(),
            reason: reason.into(),
        }
    }

    /// Create a native decode error.
    pub fn native_decode(code: u32, message: impl Into<String>) -> Self {
        Self::NativeDecode {
            code,
            message: message.into(),
        }
    }

    /// Create a type conversion error.
    pub fn type_conversion(message: impl Into<String>) -> Self {
        Self::TypeConversion {
            message: message.into(),
        }
    }

    /// Create a bind failure error.
    pub fn bind_failed(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BindFailed {
            parameter: parameter.into(),
            message: message.into(),
        }
    }
}
