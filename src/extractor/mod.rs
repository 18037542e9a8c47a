//! This module contains the extraction of a [`StorageLayout`] from a single
//! contract's declarations.
//!
//! The extractor only looks at the variables declared directly on the contract
//! it is given. Combining the layouts of an inheritance chain into one linear
//! layout is left to the caller.

pub mod contract;
pub mod source;

use std::collections::{HashSet, VecDeque};

use tracing::{debug, trace};

use crate::{
    constant::{ENUM_HEAD, STRUCT_HEAD},
    error::extraction::{Error, Result},
    extractor::{
        contract::{ContractDefinition, TypeName, VariableDeclaration},
        source::{Definition, DefinitionKind, Dereference, SourceDecoder},
    },
    identifier::codec,
    layout::{StorageItem, StorageLayout, StructMember, TypeItem},
};

/// Extracts the storage layout of the provided `contract`.
///
/// Every variable of `contract` that is neither `constant` nor `immutable`
/// becomes a storage item, in declaration order. Every type reachable from
/// those variables is recorded once in the layout's types, with the one-level
/// member list of any struct or enum that `dereference` resolves.
///
/// # Errors
///
/// Returns [`Err`] if the syntax tree lacks type information that the compiler
/// always provides, if a referenced struct or enum cannot be dereferenced, or
/// if a type identifier is malformed.
pub fn extract_storage_layout(
    contract: &ContractDefinition,
    decoder: &impl SourceDecoder,
    dereference: &impl Dereference,
) -> Result<StorageLayout> {
    let mut layout = StorageLayout::new();

    for variable in contract.variables().filter(|v| v.is_stored()) {
        let typ = codec::normalize(type_identifier(variable)?)?;
        let src = decoder.decode(variable);
        layout.add_item(StorageItem::new(&contract.name, &variable.name, typ, src));

        load_types(variable, &mut layout, dereference)?;
    }

    debug!(
        contract = %contract.name,
        items = layout.item_count(),
        types = layout.types().len(),
        "Extracted storage layout"
    );

    Ok(layout)
}

/// Records the definitions of every type involved in the declaration of
/// `variable` into `layout`.
///
/// Types are visited from a work queue, so that types referencing each other
/// (or themselves) are each only visited once.
fn load_types<'a>(
    variable: &'a VariableDeclaration,
    layout: &mut StorageLayout,
    dereference: &'a impl Dereference,
) -> Result<()> {
    let root = type_name(variable)?;
    let mut queue: VecDeque<(&'a str, &'a TypeName)> = VecDeque::new();
    let mut queued: HashSet<&'a str> = HashSet::new();

    enqueue(&variable.name, root, &mut queue, &mut queued)?;

    while let Some((owner, name)) = queue.pop_front() {
        let descriptions = name.type_descriptions();
        let raw = descriptions.type_identifier.as_deref().ok_or_else(|| {
            Error::MissingTypeIdentifier {
                variable: owner.to_string(),
            }
        })?;
        let id = codec::normalize(raw)?;
        if layout.has_type(&id) {
            continue;
        }

        let label = descriptions
            .type_string
            .clone()
            .ok_or_else(|| Error::MissingTypeString {
                variable: owner.to_string(),
            })?;

        let item = match name.referenced_declaration() {
            Some(reference) if is_struct_or_enum(&id) => {
                let kinds = [DefinitionKind::Struct, DefinitionKind::Enum];
                let definition = dereference.dereference(&kinds, reference).ok_or_else(|| {
                    Error::UnresolvedReference {
                        variable: owner.to_string(),
                        id:       reference,
                        expected: "struct or enum definition".into(),
                    }
                })?;

                match definition {
                    Definition::Struct(definition) => {
                        let mut members = Vec::with_capacity(definition.members.len());
                        for member in &definition.members {
                            let typ = codec::normalize(type_identifier(member)?)?;
                            members.push(StructMember::new(&member.name, typ));
                            enqueue(&member.name, type_name(member)?, &mut queue, &mut queued)?;
                        }
                        TypeItem::new_struct(label, members)
                    }
                    Definition::Enum(definition) => {
                        let members = definition.members.iter().map(|m| m.name.clone()).collect();
                        TypeItem::new_enum(label, members)
                    }
                }
            }
            // Contracts and other user-defined types have no members of their own.
            _ => TypeItem::new(label),
        };

        trace!(%id, "Recorded type");
        layout.add_type(id, item);
    }

    Ok(())
}

/// Adds every type name within `root` that has not been queued before to the
/// `queue`, attributing it to the declaration `owner`.
fn enqueue<'a>(
    owner: &'a str,
    root: &'a TypeName,
    queue: &mut VecDeque<(&'a str, &'a TypeName)>,
    queued: &mut HashSet<&'a str>,
) -> Result<()> {
    for name in root.descendants() {
        let raw = name
            .type_descriptions()
            .type_identifier
            .as_deref()
            .ok_or_else(|| Error::MissingTypeIdentifier {
                variable: owner.to_string(),
            })?;
        if queued.insert(raw) {
            queue.push_back((owner, name));
        }
    }
    Ok(())
}

/// Gets the escaped type identifier of `variable`.
fn type_identifier(variable: &VariableDeclaration) -> Result<&str> {
    variable
        .type_descriptions
        .type_identifier
        .as_deref()
        .ok_or_else(|| Error::MissingTypeIdentifier {
            variable: variable.name.clone(),
        })
}

/// Gets the declared type name of `variable`.
fn type_name(variable: &VariableDeclaration) -> Result<&TypeName> {
    variable
        .type_name
        .as_ref()
        .ok_or_else(|| Error::MissingTypeName {
            variable: variable.name.clone(),
        })
}

/// Checks whether the normalized identifier `id` denotes a struct or an enum.
fn is_struct_or_enum(id: &str) -> bool {
    [STRUCT_HEAD, ENUM_HEAD]
        .iter()
        .any(|head| id.strip_prefix(head).is_some_and(|rest| rest.starts_with('(')))
}
