//! This module contains the resolution of a [`StorageLayout`] into its detailed
//! form, where each storage item carries a fully-expanded type.
//!
//! # Cyclic Types
//!
//! The types of a layout may refer to each other, and a struct can contain
//! itself through its fields. The resolver keeps track of the identifiers
//! along the current resolution path, and reports a
//! [`Error::RecursionDetected`] as soon as it would have to resolve an
//! identifier that is still being resolved further up that path. A type that
//! appears on independent branches is resolved once and shared.

pub mod arena;

use std::collections::{HashMap, HashSet};

use derivative::Derivative;
use tracing::{debug, trace};

use crate::{
    error::resolution::{Error, Result},
    identifier,
    layout::{StorageLayout, TypeMembers},
    resolver::arena::{DetailedItem, DetailedMember, DetailedMembers, DetailedType, TypeArena, TypeRef},
};

/// A storage layout whose items have detailed types.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DetailedLayout {
    arena: TypeArena,
    items: Vec<StorageField>,
}

impl DetailedLayout {
    /// Gets the storage fields of the layout, in declaration order.
    #[must_use]
    pub fn items(&self) -> &[StorageField] {
        &self.items
    }

    /// Gets the arena that holds the detailed types of the fields.
    #[must_use]
    pub fn arena(&self) -> &TypeArena {
        &self.arena
    }

    /// Gets the detailed type of `field`.
    ///
    /// # Panics
    ///
    /// If `field` does not belong to this layout.
    #[must_use]
    pub fn type_of(&self, field: &StorageField) -> &DetailedType {
        self.arena.get(field.typ)
    }
}

/// A storage item paired with its detailed type.
///
/// Fields compare equal regardless of the arena reference that they hold, as
/// references from different layouts are unrelated.
#[derive(Clone, Debug, Derivative)]
#[derivative(Eq, Hash, PartialEq)]
pub struct StorageField {
    /// The name of the contract that declares the variable.
    pub contract: String,

    /// The name of the variable.
    pub label: String,

    /// The normalized type identifier of the variable.
    pub type_id: String,

    /// The human-readable name of the variable's type.
    pub type_label: String,

    /// The decoded source location of the declaration.
    pub src: String,

    /// The detailed type of the variable.
    #[derivative(Hash = "ignore", PartialEq = "ignore")]
    pub typ: TypeRef,
}

/// Resolves every storage item of `layout` into a detailed type.
///
/// # Errors
///
/// Returns [`Err`] if the types of the layout are cyclic, if a referenced type
/// has no entry in the layout's types, or if a type identifier is malformed.
pub fn resolve(layout: &StorageLayout) -> Result<DetailedLayout> {
    let mut resolver = Resolver::new(layout);
    let mut items = Vec::with_capacity(layout.item_count());

    for item in layout.items() {
        let typ = resolver.resolve_id(&item.typ)?;
        items.push(StorageField {
            contract: item.contract.clone(),
            label: item.label.clone(),
            type_id: item.typ.clone(),
            type_label: resolver.arena.get(typ).item.label.clone(),
            src: item.src.clone(),
            typ,
        });
    }

    debug!(
        items = items.len(),
        types = resolver.arena.len(),
        "Resolved detailed layout"
    );

    let arena = resolver.arena;
    Ok(DetailedLayout { arena, items })
}

/// The state of a single resolution of a layout.
struct Resolver<'a> {
    layout: &'a StorageLayout,

    /// The detailed types resolved so far.
    arena: TypeArena,

    /// The types that have been completely resolved, by identifier.
    resolved: HashMap<String, TypeRef>,

    /// The identifiers being resolved along the current path, outermost first.
    path: Vec<String>,

    /// The same identifiers as `path`, for quick membership checks.
    on_path: HashSet<String>,
}

impl<'a> Resolver<'a> {
    fn new(layout: &'a StorageLayout) -> Self {
        Self {
            layout,
            arena: TypeArena::new(),
            resolved: HashMap::new(),
            path: Vec::new(),
            on_path: HashSet::new(),
        }
    }

    /// Resolves the type identified by `id`, reusing a previous resolution if
    /// one exists.
    fn resolve_id(&mut self, id: &str) -> Result<TypeRef> {
        if self.on_path.contains(id) {
            let mut chain = self.path.clone();
            chain.push(id.to_string());
            return Err(Error::RecursionDetected { chain });
        }
        if let Some(typ) = self.resolved.get(id) {
            return Ok(*typ);
        }

        trace!(%id, depth = self.path.len(), "Resolving type");
        self.path.push(id.to_string());
        self.on_path.insert(id.to_string());
        let result = self.build(id);
        self.on_path.remove(id);
        self.path.pop();

        let typ = result?;
        self.resolved.insert(id.to_string(), typ);
        Ok(typ)
    }

    /// Builds the detailed type for `id` by resolving everything it refers to.
    fn build(&mut self, id: &str) -> Result<TypeRef> {
        let parsed = identifier::parse(id)?;
        let layout = self.layout;
        let item = layout.get_type(&parsed.id).ok_or_else(|| Error::UnknownType {
            id: parsed.id.clone(),
        })?;

        let args = match &parsed.args {
            Some(args) => Some(self.resolve_all(args.iter().map(|a| a.id.as_str()))?),
            None => None,
        };
        let rets = match &parsed.rets {
            Some(rets) => Some(self.resolve_all(rets.iter().map(|r| r.id.as_str()))?),
            None => None,
        };

        let members = match &item.members {
            Some(TypeMembers::Struct(members)) => {
                let mut resolved = Vec::with_capacity(members.len());
                for member in members {
                    resolved.push(DetailedMember {
                        label: member.label.clone(),
                        typ:   self.resolve_id(&member.typ)?,
                    });
                }
                Some(DetailedMembers::Struct(resolved))
            }
            Some(TypeMembers::Enum(members)) => Some(DetailedMembers::Enum(members.clone())),
            None => None,
        };

        let node = DetailedType {
            id: parsed.id,
            head: parsed.head,
            args,
            rets,
            item: DetailedItem {
                label: item.label.clone(),
                members,
            },
        };
        Ok(self.arena.push(node))
    }

    fn resolve_all<'i>(&mut self, ids: impl Iterator<Item = &'i str>) -> Result<Vec<TypeRef>> {
        ids.map(|id| self.resolve_id(id)).collect()
    }
}
