//! Runtime values.
//!
//! A `Value` is owned by exactly one apartment. Scalars are stored inline;
//! aggregates only hold apartment ids, so copying a `Value` copies the
//! references, never the referenced apartments.

use std::fmt;

use smallvec::SmallVec;

use crate::ApartmentId;

/// Direct children of one apartment. Most values reference at most a few.
pub type Children = SmallVec<[ApartmentId; 4]>;

/// Kind tag of a runtime value.
///
/// The discriminant is the code `get_type` reports.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum ValueKind {
    Null = 0,
    Numerical = 1,
    Character = 2,
    Collection = 3,
    StructInstance = 4,
}

impl ValueKind {
    #[inline]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Numerical => "numerical",
            Self::Character => "character",
            Self::Collection => "collection",
            Self::StructInstance => "struct instance",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A runtime datum.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Numerical(f64),
    Character(char),
    /// Head of a chain of element apartments linked through `next`.
    Collection(CollectionValue),
    /// Named field apartments of a struct instance.
    StructInstance(StructInstance),
}

/// Payload of a collection: the first element apartment, if any.
///
/// The length is not cached; it is the length of the chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct CollectionValue {
    pub first: Option<ApartmentId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructField {
    pub name: String,
    pub apartment: ApartmentId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructInstance {
    pub type_name: String,
    pub fields: SmallVec<[StructField; 4]>,
}

impl StructInstance {
    pub fn field(&self, name: &str) -> Option<ApartmentId> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.apartment)
    }

    pub(crate) fn field_mut(&mut self, name: &str) -> Option<&mut StructField> {
        self.fields.iter_mut().find(|field| field.name == name)
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Numerical(_) => ValueKind::Numerical,
            Value::Character(_) => ValueKind::Character,
            Value::Collection(_) => ValueKind::Collection,
            Value::StructInstance(_) => ValueKind::StructInstance,
        }
    }

    /// Apartments this payload references (one level only).
    pub fn children(&self) -> Children {
        match self {
            Value::Null | Value::Numerical(_) | Value::Character(_) => Children::new(),
            Value::Collection(collection) => collection.first.into_iter().collect(),
            Value::StructInstance(instance) => {
                instance.fields.iter().map(|field| field.apartment).collect()
            }
        }
    }

    pub fn as_numerical(&self) -> Option<f64> {
        match self {
            Value::Numerical(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_character(&self) -> Option<char> {
        match self {
            Value::Character(c) => Some(*c),
            _ => None,
        }
    }
}
