//! Reference apartments: the unit of shared ownership for runtime values.
//!
//! An apartment owns one `Value`, an optional chain successor (`next`, used
//! for collection elements), and a reference count. Apartments live in the
//! collector's arena and are addressed by `ApartmentId`; the id is what
//! bindings, struct fields, and chain links store, so two owners naming the
//! same id share the same apartment.

use std::fmt;

use crate::value::Children;
use crate::Value;

/// Index of an apartment slot in the collector's arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ApartmentId(u32);

impl ApartmentId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ApartmentId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ApartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApartmentId({})", self.0)
    }
}

/// One reference-counted heap cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Apartment {
    pub(crate) value: Value,
    pub(crate) next: Option<ApartmentId>,
    pub(crate) references: u32,
}

impl Apartment {
    /// A fresh apartment: no references, no successor.
    pub fn new(value: Value) -> Self {
        Apartment {
            value,
            next: None,
            references: 0,
        }
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[inline]
    pub fn next(&self) -> Option<ApartmentId> {
        self.next
    }

    #[inline]
    pub fn references(&self) -> u32 {
        self.references
    }

    /// No owner holds this apartment any more.
    #[inline]
    pub fn can_delete(&self) -> bool {
        self.references == 0
    }

    /// Direct children: the chain successor, then whatever the value
    /// references. Grandchildren are not included.
    pub fn children(&self) -> Children {
        let mut children = Children::new();
        children.extend(self.next);
        children.extend(self.value.children());
        children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::CollectionValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_apartment_is_unreferenced() {
        let apartment = Apartment::new(Value::Numerical(2.0));
        assert_eq!(apartment.references(), 0);
        assert!(apartment.can_delete());
        assert_eq!(apartment.next(), None);
    }

    #[test]
    fn test_children_are_one_level() {
        let mut apartment = Apartment::new(Value::Collection(CollectionValue {
            first: Some(ApartmentId::new(9)),
        }));
        apartment.next = Some(ApartmentId::new(2));
        assert_eq!(
            apartment.children().to_vec(),
            vec![ApartmentId::new(2), ApartmentId::new(9)]
        );
    }
}
