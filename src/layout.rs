//! This module contains the definitions for the storage layout representation
//! types.
//!
//! A [`StorageLayout`] is what the [`crate::extractor`] produces for a single
//! version of a contract. It is serializable so that it can be persisted as
//! the baseline against which later builds of the contract are checked.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The storage variables of a contract in declaration order, along with the
/// definitions of every type that they reference.
///
/// # Invariants
///
/// Every type identifier referenced by a storage item, or by a member of any
/// type in the layout, has an entry in the layout's types. The extractor
/// guarantees this for the layouts that it produces.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct StorageLayout {
    storage: Vec<StorageItem>,
    types:   BTreeMap<String, TypeItem>,
}

impl StorageLayout {
    /// Creates a new, empty, storage layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the provided `item` after all items already in the layout.
    pub fn add_item(&mut self, item: StorageItem) {
        self.storage.push(item);
    }

    /// Records the definition `item` for the type identified by `id`, unless
    /// a definition for that type is already present.
    ///
    /// Returns `true` if the definition was recorded.
    pub fn add_type(&mut self, id: impl Into<String>, item: TypeItem) -> bool {
        let id = id.into();
        if self.types.contains_key(&id) {
            return false;
        }
        self.types.insert(id, item);
        true
    }

    /// Gets the storage items that make up this layout, in declaration order.
    #[must_use]
    pub fn items(&self) -> &[StorageItem] {
        &self.storage
    }

    /// Gets the definitions of the types referenced by this layout.
    #[must_use]
    pub fn types(&self) -> &BTreeMap<String, TypeItem> {
        &self.types
    }

    /// Gets the definition of the type identified by `id`, if present.
    #[must_use]
    pub fn get_type(&self, id: &str) -> Option<&TypeItem> {
        self.types.get(id)
    }

    /// Checks if the layout has a definition for the type identified by `id`.
    #[must_use]
    pub fn has_type(&self, id: &str) -> bool {
        self.types.contains_key(id)
    }

    /// Gets the number of storage items in the layout.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.storage.len()
    }

    /// Checks if the storage layout is empty (has no storage items).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Serializes the layout to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a layout previously written by [`Self::to_json`].
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if `json` is not a valid serialized layout.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// A single non-constant, non-immutable state variable.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct StorageItem {
    /// The name of the contract that declares the variable.
    pub contract: String,

    /// The name of the variable.
    pub label: String,

    /// The normalized type identifier of the variable.
    #[serde(rename = "type")]
    pub typ: String,

    /// The decoded source location of the declaration.
    pub src: String,
}

impl StorageItem {
    /// Constructs a new storage item for the variable `label` declared in
    /// `contract` with the type identified by `typ`.
    #[must_use]
    pub fn new(
        contract: impl Into<String>,
        label: impl Into<String>,
        typ: impl Into<String>,
        src: impl Into<String>,
    ) -> Self {
        Self {
            contract: contract.into(),
            label:    label.into(),
            typ:      typ.into(),
            src:      src.into(),
        }
    }
}

/// The definition of a type referenced from a storage layout.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct TypeItem {
    /// The human-readable name of the type, as the compiler prints it.
    pub label: String,

    /// The declared members of the type, present only for structs and enums.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<TypeMembers>,
}

impl TypeItem {
    /// Constructs a type with no members.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            label,
            members: None,
        }
    }

    /// Constructs a struct type with the provided `members`.
    #[must_use]
    pub fn new_struct(label: impl Into<String>, members: Vec<StructMember>) -> Self {
        let label = label.into();
        let members = Some(TypeMembers::Struct(members));
        Self { label, members }
    }

    /// Constructs an enum type with the provided member names.
    #[must_use]
    pub fn new_enum(label: impl Into<String>, members: Vec<String>) -> Self {
        let label = label.into();
        let members = Some(TypeMembers::Enum(members));
        Self { label, members }
    }
}

/// The one-level member list of a user-defined type.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypeMembers {
    /// The fields of a struct, in declaration order.
    Struct(Vec<StructMember>),

    /// The names of the members of an enum, in declaration order.
    Enum(Vec<String>),
}

/// A field of a struct, whose type is referenced but not expanded.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct StructMember {
    /// The name of the field.
    pub label: String,

    /// The normalized type identifier of the field.
    #[serde(rename = "type")]
    pub typ: String,
}

impl StructMember {
    /// Constructs a new struct member `label` of the type identified by `typ`.
    #[must_use]
    pub fn new(label: impl Into<String>, typ: impl Into<String>) -> Self {
        let label = label.into();
        let typ = typ.into();
        Self { label, typ }
    }
}
