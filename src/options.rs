//! Bind and fetch options.
//!
//! Options are built with `with_*` methods, parsed from a
//! `key=value;key=value` string, or read from `ORACLE_MARSHAL_*`
//! environment variables.

use crate::error::{Error, Result};
use crate::protocol::constants::{
    DEFAULT_ARRAY_STRIDE, DEFAULT_BIND_ARRAY_SIZE, DEFAULT_MAX_STRING_LEN,
};

/// Options for the parameter binder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindOptions {
    /// Bind array size applied to the target before bulk binds.
    pub array_size: u32,
    /// Element stride used when every element of a text or byte array is empty.
    pub default_stride: usize,
    /// Text longer than this many bytes is truncated on bind.
    pub max_string_len: usize,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            array_size: DEFAULT_BIND_ARRAY_SIZE,
            default_stride: DEFAULT_ARRAY_STRIDE,
            max_string_len: DEFAULT_MAX_STRING_LEN,
        }
    }
}

impl BindOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bind array size.
    ///
    /// # Example
    ///
    /// ```
    /// use oracle_marshal_rs::BindOptions;
    ///
    /// let options = BindOptions::new().with_array_size(100);
    /// assert_eq!(options.array_size, 100);
    /// ```
    pub fn with_array_size(mut self, array_size: u32) -> Self {
        self.array_size = array_size;
        self
    }

    /// Set the stride used for all-empty arrays.
    pub fn with_default_stride(mut self, stride: usize) -> Self {
        self.default_stride = stride;
        self
    }

    /// Set the text truncation length.
    pub fn with_max_string_len(mut self, len: usize) -> Self {
        self.max_string_len = len;
        self
    }

    /// Parse options like "array_size=100;max_string_len=4000".
    ///
    /// Keys not recognized are rejected.
    pub fn parse(options: &str) -> Result<Self> {
        let mut parsed = Self::default();
        for (key, value) in pairs(options)? {
            match key {
                "array_size" => parsed.array_size = parse_value(key, value)?,
                "default_stride" => parsed.default_stride = parse_value(key, value)?,
                "max_string_len" => parsed.max_string_len = parse_value(key, value)?,
                _ => return Err(unknown_key(key)),
            }
        }
        parsed.validate()?;
        Ok(parsed)
    }

    /// Read `ORACLE_MARSHAL_ARRAY_SIZE`, `ORACLE_MARSHAL_DEFAULT_STRIDE` and
    /// `ORACLE_MARSHAL_MAX_STRING_LEN`, keeping defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut parsed = Self::default();
        if let Some(v) = lookup("ORACLE_MARSHAL_ARRAY_SIZE") {
            parsed.array_size = parse_value("ORACLE_MARSHAL_ARRAY_SIZE", &v)?;
        }
        if let Some(v) = lookup("ORACLE_MARSHAL_DEFAULT_STRIDE") {
            parsed.default_stride = parse_value("ORACLE_MARSHAL_DEFAULT_STRIDE", &v)?;
        }
        if let Some(v) = lookup("ORACLE_MARSHAL_MAX_STRING_LEN") {
            parsed.max_string_len = parse_value("ORACLE_MARSHAL_MAX_STRING_LEN", &v)?;
        }
        parsed.validate()?;
        Ok(parsed)
    }

    fn validate(&self) -> Result<()> {
        if self.array_size == 0 {
            return Err(Error::InvalidOption {
                message: "array_size must be positive".to_string(),
            });
        }
        if self.default_stride == 0 || self.max_string_len == 0 {
            return Err(Error::InvalidOption {
                message: "strides and string lengths must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Options for the column fetcher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Produce `BigNumber` values for NUMBER columns wider than 19 digits.
    pub big_numbers: bool,
}

impl FetchOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opt into arbitrary-precision numeric output.
    pub fn with_big_numbers(mut self, big_numbers: bool) -> Self {
        self.big_numbers = big_numbers;
        self
    }

    /// Parse options like "big_numbers=true".
    pub fn parse(options: &str) -> Result<Self> {
        let mut parsed = Self::default();
        for (key, value) in pairs(options)? {
            match key {
                "big_numbers" => parsed.big_numbers = parse_bool(key, value)?,
                _ => return Err(unknown_key(key)),
            }
        }
        Ok(parsed)
    }

    /// Read `ORACLE_MARSHAL_BIG_NUMBERS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut parsed = Self::default();
        if let Some(v) = lookup("ORACLE_MARSHAL_BIG_NUMBERS") {
            parsed.big_numbers = parse_bool("ORACLE_MARSHAL_BIG_NUMBERS", &v)?;
        }
        Ok(parsed)
    }
}

fn pairs(options: &str) -> Result<Vec<(&str, &str)>> {
    options
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.split_once('=')
                .map(|(k, v)| (k.trim(), v.trim()))
                .ok_or_else(|| Error::InvalidOption {
                    message: format!("Expected key=value, got {:?}", part),
                })
        })
        .collect()
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| Error::InvalidOption {
        message: format!("Invalid value for {}: {}", key, value),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidOption {
            message: format!("Invalid value for {}: {}", key, value),
        }),
    }
}

fn unknown_key(key: &str) -> Error {
    Error::InvalidOption {
        message: format!("Unknown option: {}", key),
    }
}
