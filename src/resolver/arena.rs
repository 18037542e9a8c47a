//! This module contains the arena in which detailed types are stored.
//!
//! Detailed types refer to each other through [`TypeRef`] indices into a
//! [`TypeArena`] rather than by ownership. A type that is referenced from many
//! places is stored once and shared.

use std::ops::Index;

/// A reference to a detailed type stored in a [`TypeArena`].
///
/// References are only created by the arena that they index into, and must
/// not be used with any other arena.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TypeRef {
    index: usize,
}

impl TypeRef {
    /// Gets the position of the referenced type in its arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.index
    }
}

/// A type with all of its arguments, return types and members resolved to
/// other detailed types.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DetailedType {
    /// The normalized type identifier.
    pub id: String,

    /// The category tag of the type.
    pub head: String,

    /// The resolved type arguments: array elements, mapping keys and values,
    /// and function parameters.
    pub args: Option<Vec<TypeRef>>,

    /// The resolved return types of a function type.
    pub rets: Option<Vec<TypeRef>>,

    /// The definition of the type with its members resolved.
    pub item: DetailedItem,
}

/// The definition of a detailed type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DetailedItem {
    /// The human-readable name of the type.
    pub label: String,

    /// The resolved members of a struct or enum.
    pub members: Option<DetailedMembers>,
}

/// The resolved members of a user-defined type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DetailedMembers {
    /// The fields of a struct with their types resolved.
    Struct(Vec<DetailedMember>),

    /// The names of the members of an enum.
    Enum(Vec<String>),
}

/// A struct field whose type has been resolved.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DetailedMember {
    pub label: String,
    pub typ:   TypeRef,
}

/// The storage for the detailed types of a layout.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TypeArena {
    nodes: Vec<DetailedType>,
}

impl TypeArena {
    /// Creates a new, empty, arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `node` in the arena, returning a reference to it.
    ///
    /// Nodes are immutable once stored, so every reference held by `node` must
    /// already point to a stored node.
    pub fn push(&mut self, node: DetailedType) -> TypeRef {
        let index = self.nodes.len();
        self.nodes.push(node);
        TypeRef { index }
    }

    /// Gets the type referenced by `typ`.
    ///
    /// # Panics
    ///
    /// If `typ` was not created by this arena.
    #[must_use]
    pub fn get(&self, typ: TypeRef) -> &DetailedType {
        &self.nodes[typ.index]
    }

    /// Gets the number of types stored in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Checks if the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Index<TypeRef> for TypeArena {
    type Output = DetailedType;

    fn index(&self, index: TypeRef) -> &Self::Output {
        self.get(index)
    }
}
