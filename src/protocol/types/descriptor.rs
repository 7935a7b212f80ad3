//! Result column descriptors.
//!
//! A descriptor carries what the statement layer reported for a column.
//! Unconstrained NUMBER columns report precision and scale 0/0; the first
//! fetched value then fixes the shape used to pick a numeric host type.

use super::column_type::ColumnType;
use tracing::debug;

/// Metadata of one result column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,
    /// Raw Oracle type number.
    pub type_num: u8,
    /// Type tag derived from `type_num`.
    pub column_type: ColumnType,
    /// Database type name (object type names for objects and collections).
    pub type_name: String,
    /// Maximum size in bytes.
    pub size: u32,
    /// Numeric precision, 0 when unknown.
    pub precision: u8,
    /// Numeric scale.
    pub scale: i8,
    /// Whether NULL values are allowed.
    pub nullable: bool,
    shape_inferred: bool,
}

impl ColumnDescriptor {
    /// Create a descriptor with no precision, scale or size.
    pub fn new(name: impl Into<String>, type_num: u8) -> Self {
        let column_type = ColumnType::from_type_num(type_num);
        Self {
            name: name.into(),
            type_num,
            column_type,
            type_name: column_type.to_string(),
            size: 0,
            precision: 0,
            scale: 0,
            nullable: true,
            shape_inferred: false,
        }
    }

    /// Set precision and scale.
    pub fn with_precision(mut self, precision: u8, scale: i8) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }

    /// Set the maximum size.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Set nullability.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set the database type name.
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    /// Whether precision and scale came from an observed value.
    pub fn shape_inferred(&self) -> bool {
        self.shape_inferred
    }

    /// Resolve precision and scale, inferring them from `observed` when the
    /// column reported neither.
    ///
    /// Precision counts significant integer digits plus fraction digits
    /// (at least 1); scale counts fraction digits. The result is cached and
    /// later values do not change it.
    pub fn resolve_numeric_shape(&mut self, observed: &str) -> (u8, i8) {
        if self.precision == 0 && self.scale == 0 && !self.shape_inferred {
            let (precision, scale) = infer_shape(observed);
            self.precision = precision;
            self.scale = scale;
            self.shape_inferred = true;
            debug!(
                column = %self.name,
                observed,
                precision,
                scale,
                "inferred numeric shape"
            );
        }
        (self.precision, self.scale)
    }
}

fn infer_shape(text: &str) -> (u8, i8) {
    let unsigned = text.trim_start_matches(['-', '+']);
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let int_digits = int_part.trim_start_matches('0').len();
    let frac_digits = frac_part.len();
    let precision = (int_digits + frac_digits).clamp(1, u8::MAX as usize) as u8;
    let scale = frac_digits.min(i8::MAX as usize) as i8;
    (precision, scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_shape() {
        assert_eq!(infer_shape("12.3"), (3, 1));
        assert_eq!(infer_shape("-4000"), (4, 0));
        assert_eq!(infer_shape("0.05"), (2, 2));
        assert_eq!(infer_shape("0"), (1, 0));
        assert_eq!(infer_shape("-0.5"), (1, 1));
    }

    #[test]
    fn test_resolve_caches_first_value() {
        let mut desc = ColumnDescriptor::new("AMOUNT", 2);
        assert!(!desc.shape_inferred());
        assert_eq!(desc.resolve_numeric_shape("12.3"), (3, 1));
        assert!(desc.shape_inferred());
        assert_eq!(desc.resolve_numeric_shape("123456.789"), (3, 1));
    }

    #[test]
    fn test_resolve_keeps_reported_shape() {
        let mut desc = ColumnDescriptor::new("ID", 2).with_precision(10, 0);
        assert_eq!(desc.resolve_numeric_shape("1.5"), (10, 0));
        assert!(!desc.shape_inferred());
    }

    #[test]
    fn test_descriptor_defaults() {
        let desc = ColumnDescriptor::new("NAME", 1).with_size(100).with_nullable(false);
        assert_eq!(desc.column_type, ColumnType::Text);
        assert_eq!(desc.type_name, "VARCHAR2");
        assert_eq!(desc.size, 100);
        assert!(!desc.nullable);
    }
}
