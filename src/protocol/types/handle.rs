//! Opaque handles for LOB, BFILE, object, collection, REF, nested cursor and
//! LONG values.
//!
//! The marshaling layer never looks inside a handle. It forwards the
//! locator bytes to the bind target and wraps locators coming back from a
//! fetch. Object-typed handles carry the database type they belong to.

use crate::protocol::constants::*;
use bytes::Bytes;
use std::fmt;

/// What a handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// CLOB or BLOB locator.
    Lob,
    /// BFILE locator.
    File,
    /// Instance of a named object type.
    Object,
    /// VARRAY or nested table instance.
    Collection,
    /// REF to an object.
    Reference,
    /// Nested statement (REF CURSOR).
    Statement,
    /// LONG value bound with an explicit length.
    Long,
}

impl HandleKind {
    /// The Oracle type number bound for this kind.
    pub fn type_num(&self) -> u16 {
        match self {
            HandleKind::Lob => ORA_TYPE_NUM_BLOB,
            HandleKind::File => ORA_TYPE_NUM_BFILE,
            HandleKind::Object => ORA_TYPE_NUM_OBJECT,
            HandleKind::Collection => ORA_TYPE_NUM_COLLECTION,
            HandleKind::Reference => ORA_TYPE_NUM_REF,
            HandleKind::Statement => ORA_TYPE_NUM_CURSOR,
            HandleKind::Long => ORA_TYPE_NUM_LONG,
        }
    }
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HandleKind::Lob => "LOB",
            HandleKind::File => "BFILE",
            HandleKind::Object => "OBJECT",
            HandleKind::Collection => "COLLECTION",
            HandleKind::Reference => "REF",
            HandleKind::Statement => "REF CURSOR",
            HandleKind::Long => "LONG",
        };
        f.write_str(name)
    }
}

/// The database type a handle belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    /// Oracle type number.
    pub type_num: u16,
    /// Type name, schema-qualified for object types.
    pub name: String,
}

impl TypeDescriptor {
    /// Create a type descriptor.
    pub fn new(type_num: u16, name: impl Into<String>) -> Self {
        Self {
            type_num,
            name: name.into(),
        }
    }
}

/// An opaque handle.
#[derive(Debug, Clone, PartialEq)]
pub struct Handle {
    kind: HandleKind,
    locator: Bytes,
    size: u64,
    type_desc: Option<TypeDescriptor>,
}

impl Handle {
    /// Create a handle over raw locator bytes.
    pub fn new(kind: HandleKind, locator: impl Into<Bytes>) -> Self {
        Self {
            kind,
            locator: locator.into(),
            size: 0,
            type_desc: None,
        }
    }

    /// A LOB locator with the LOB's size in characters or bytes.
    pub fn lob(locator: impl Into<Bytes>, size: u64) -> Self {
        Self::new(HandleKind::Lob, locator).with_size(size)
    }

    /// An object instance of the named type.
    pub fn object(locator: impl Into<Bytes>, type_name: impl Into<String>) -> Self {
        Self::new(HandleKind::Object, locator)
            .with_type(TypeDescriptor::new(ORA_TYPE_NUM_OBJECT, type_name))
    }

    /// A collection instance of the named type.
    pub fn collection(locator: impl Into<Bytes>, type_name: impl Into<String>) -> Self {
        Self::new(HandleKind::Collection, locator)
            .with_type(TypeDescriptor::new(ORA_TYPE_NUM_COLLECTION, type_name))
    }

    /// A LONG value; the size is the data length.
    pub fn long(data: impl Into<Bytes>) -> Self {
        let data: Bytes = data.into();
        let size = data.len() as u64;
        Self::new(HandleKind::Long, data).with_size(size)
    }

    /// Set the size.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Set the database type.
    pub fn with_type(mut self, type_desc: TypeDescriptor) -> Self {
        self.type_desc = Some(type_desc);
        self
    }

    /// What the handle refers to.
    pub fn kind(&self) -> HandleKind {
        self.kind
    }

    /// Raw locator bytes.
    pub fn locator(&self) -> &Bytes {
        &self.locator
    }

    /// Size in characters or bytes, 0 when unknown.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Check if the handle is NULL (no locator data).
    pub fn is_null(&self) -> bool {
        self.locator.is_empty()
    }

    /// The database type, falling back to the generic type of the kind.
    pub fn type_descriptor(&self) -> TypeDescriptor {
        match &self.type_desc {
            Some(desc) => desc.clone(),
            None => TypeDescriptor::new(self.kind.type_num(), self.kind.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_type_descriptor() {
        let h = Handle::object(vec![1, 2, 3], "HR.ADDRESS_T");
        assert_eq!(h.kind(), HandleKind::Object);
        assert_eq!(h.type_descriptor(), TypeDescriptor::new(109, "HR.ADDRESS_T"));
    }

    #[test]
    fn test_generic_type_descriptor() {
        let h = Handle::lob(vec![0u8; 40], 1024);
        assert_eq!(h.size(), 1024);
        assert_eq!(h.type_descriptor(), TypeDescriptor::new(113, "LOB"));
        assert_eq!(HandleKind::Statement.to_string(), "REF CURSOR");
    }

    #[test]
    fn test_long_handle() {
        let h = Handle::long(b"long text".to_vec());
        assert_eq!(h.size(), 9);
        assert_eq!(&h.locator()[..], b"long text");
        assert!(!h.is_null());
        assert!(Handle::new(HandleKind::File, Bytes::new()).is_null());
    }
}
