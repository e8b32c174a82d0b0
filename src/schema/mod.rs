//! Minimal schema types. The join executor only ever needs a field handle
//! and a term's raw bytes; it never interprets a term's original type, so
//! this module carries none of the richer `Value`/`FieldValue`/facet
//! machinery a full schema would have.

use std::fmt;
use std::str;

/// A field handle, stable for the lifetime of one schema. Distinct fields
/// compare unequal even if they share a name; name resolution happens once,
/// at query-construction time, in the caller's schema.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Field(u32);

impl Field {
    pub fn from_ord(ord: u32) -> Field {
        Field(ord)
    }

    pub fn ord(&self) -> u32 {
        self.0
    }
}

/// An immutable `(field, term bytes)` pair. Terms within a field are
/// totally ordered by lexicographic byte comparison (spec §3).
#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Term {
    field: Field,
    bytes: Vec<u8>,
}

impl Term {
    pub fn new(field: Field, bytes: Vec<u8>) -> Term {
        Term { field, bytes }
    }

    pub fn from_field_text(field: Field, text: &str) -> Term {
        Term::new(field, text.as_bytes().to_vec())
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn value_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match str::from_utf8(&self.bytes) {
            Ok(s) => write!(f, "Term({:?}, {:?})", self.field, s),
            Err(_) => write!(f, "Term({:?}, {:?})", self.field, self.bytes),
        }
    }
}
