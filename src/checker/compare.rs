//! This module contains the structural comparison of detailed types that
//! decides how two storage fields relate to each other.

use std::collections::HashMap;

use crate::{
    diff::Substitution,
    resolver::{
        arena::{DetailedMembers, TypeRef},
        DetailedLayout,
        StorageField,
    },
};

/// Compares fields of the `original` layout against fields of the `updated`
/// layout.
///
/// The comparator remembers the outcome of every pair of types that it has
/// compared, so shared types are only ever compared once.
#[derive(Debug)]
pub struct LayoutComparator<'a> {
    original: &'a DetailedLayout,
    updated:  &'a DetailedLayout,
    cache:    HashMap<(TypeRef, TypeRef), bool>,
}

impl<'a> LayoutComparator<'a> {
    /// Creates a comparator for fields taken from `original` and `updated`.
    #[must_use]
    pub fn new(original: &'a DetailedLayout, updated: &'a DetailedLayout) -> Self {
        let cache = HashMap::new();
        Self {
            original,
            updated,
            cache,
        }
    }

    /// Classifies the relationship of the `original` field to the `updated`
    /// field, by whether their names and their types are equal.
    pub fn classify(&mut self, original: &StorageField, updated: &StorageField) -> Substitution {
        let same_name = original.label == updated.label;
        let same_type = self.is_equal(original.typ, updated.typ);
        Substitution::from_equalities(same_name, same_type)
    }

    /// Checks whether the type `original` from the original layout is
    /// structurally equal to the type `updated` from the updated layout.
    ///
    /// Two types are equal when they share a head and a label, when their
    /// arguments and return types are pairwise equal, and when their members
    /// are equal. Struct members must agree on their names and, recursively,
    /// on their types.
    pub fn is_equal(&mut self, original: TypeRef, updated: TypeRef) -> bool {
        if let Some(&equal) = self.cache.get(&(original, updated)) {
            return equal;
        }

        let equal = self.compare(original, updated);
        self.cache.insert((original, updated), equal);
        equal
    }

    fn compare(&mut self, original: TypeRef, updated: TypeRef) -> bool {
        let (original_layout, updated_layout) = (self.original, self.updated);
        let o = &original_layout.arena()[original];
        let u = &updated_layout.arena()[updated];

        if o.head != u.head || o.item.label != u.item.label {
            return false;
        }

        if !self.all_equal(o.args.as_deref(), u.args.as_deref())
            || !self.all_equal(o.rets.as_deref(), u.rets.as_deref())
        {
            return false;
        }

        match (&o.item.members, &u.item.members) {
            (None, None) => true,
            (Some(DetailedMembers::Enum(o)), Some(DetailedMembers::Enum(u))) => o == u,
            (Some(DetailedMembers::Struct(o)), Some(DetailedMembers::Struct(u))) => {
                o.len() == u.len()
                    && o.iter()
                        .zip(u)
                        .all(|(o, u)| o.label == u.label && self.is_equal(o.typ, u.typ))
            }
            _ => false,
        }
    }

    /// Checks that two optional lists of types are both absent, or have the
    /// same length and pairwise equal elements.
    fn all_equal(&mut self, original: Option<&[TypeRef]>, updated: Option<&[TypeRef]>) -> bool {
        match (original, updated) {
            (None, None) => true,
            (Some(o), Some(u)) => {
                o.len() == u.len() && o.iter().zip(u).all(|(o, u)| self.is_equal(*o, *u))
            }
            _ => false,
        }
    }
}
