//! The ordered columns of a result set.

use crate::error::{Error, Result};

use super::descriptor::ColumnDescriptor;

/// Column descriptors shared by all rows of a result set.
///
/// Ordinals are 1-based, as in SQL.
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    columns: Vec<ColumnDescriptor>,
}

impl ColumnSet {
    /// Create a column set.
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self { columns }
    }

    /// Get column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Get the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get a column by 1-based ordinal.
    pub fn get(&self, ordinal: usize) -> Result<&ColumnDescriptor> {
        let count = self.columns.len();
        ordinal
            .checked_sub(1)
            .and_then(|i| self.columns.get(i))
            .ok_or(Error::ColumnIndexOutOfBounds { index: ordinal, count })
    }

    /// Get a mutable column by 1-based ordinal.
    pub fn get_mut(&mut self, ordinal: usize) -> Result<&mut ColumnDescriptor> {
        let count = self.columns.len();
        ordinal
            .checked_sub(1)
            .and_then(|i| self.columns.get_mut(i))
            .ok_or(Error::ColumnIndexOutOfBounds { index: ordinal, count })
    }

    /// Iterate over the descriptors mutably, in ordinal order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ColumnDescriptor> {
        self.columns.iter_mut()
    }

    /// Iterate over the descriptors in ordinal order.
    pub fn iter(&self) -> std::slice::Iter<'_, ColumnDescriptor> {
        self.columns.iter()
    }

    /// Find the 1-based ordinal of a column by name (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        let name_upper = name.to_uppercase();
        self.columns
            .iter()
            .position(|c| c.name.to_uppercase() == name_upper)
            .map(|i| i + 1)
    }
}
