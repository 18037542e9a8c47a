//! This module contains the interfaces through which the extractor consults
//! the compiler front-end: decoding source locations, and dereferencing the
//! declarations that user-defined type names refer to.

use std::collections::HashMap;

use crate::extractor::contract::{
    ContractDefinition,
    ContractNode,
    EnumDefinition,
    SourceUnit,
    SourceUnitNode,
    StructDefinition,
    VariableDeclaration,
};

/// The interface to an object that can turn the source range of a declaration
/// into a location string for use in diagnostics.
pub trait SourceDecoder {
    /// Gets the location of the declaration of `variable`.
    #[must_use]
    fn decode(&self, variable: &VariableDeclaration) -> String;
}

/// Any function from a declaration to a location can be used as a decoder.
impl<F> SourceDecoder for F
where
    F: Fn(&VariableDeclaration) -> String,
{
    fn decode(&self, variable: &VariableDeclaration) -> String {
        self(variable)
    }
}

/// A decoder that uses the raw `start:length:file` source range as the
/// location.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RawSrc;

impl SourceDecoder for RawSrc {
    fn decode(&self, variable: &VariableDeclaration) -> String {
        variable.src.clone()
    }
}

/// A decoder that turns source ranges into `path:line` locations using the
/// contents of the compiled source files.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LineDecoder {
    /// The path and contents of each source file, indexed by the file index
    /// used in source ranges.
    sources: Vec<(String, String)>,
}

impl LineDecoder {
    /// Creates a decoder with no known source files.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the source file at `path` with `contents` as the next file
    /// index.
    #[must_use]
    pub fn with_source(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.sources.push((path.into(), contents.into()));
        self
    }
}

impl SourceDecoder for LineDecoder {
    /// Falls back to the raw source range if it cannot be mapped onto one of
    /// the registered files.
    fn decode(&self, variable: &VariableDeclaration) -> String {
        let mut parts = variable.src.split(':').map(str::parse::<usize>);
        let (Some(Ok(start)), Some(Ok(_)), Some(Ok(file))) = (parts.next(), parts.next(), parts.next())
        else {
            return variable.src.clone();
        };

        match self.sources.get(file) {
            Some((path, contents)) if start <= contents.len() => {
                let line = contents.as_bytes()[..start]
                    .iter()
                    .filter(|b| **b == b'\n')
                    .count()
                    + 1;
                format!("{path}:{line}")
            }
            _ => variable.src.clone(),
        }
    }
}

/// The kinds of user-defined type definitions that can be dereferenced.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum DefinitionKind {
    Struct,
    Enum,
}

/// A dereferenced user-defined type definition.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Definition {
    Struct(StructDefinition),
    Enum(EnumDefinition),
}

impl Definition {
    /// Gets the kind of this definition.
    #[must_use]
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Self::Struct(_) => DefinitionKind::Struct,
            Self::Enum(_) => DefinitionKind::Enum,
        }
    }

    /// Gets the AST id of this definition.
    #[must_use]
    pub fn id(&self) -> i64 {
        match self {
            Self::Struct(s) => s.id,
            Self::Enum(e) => e.id,
        }
    }
}

/// The interface to an object that resolves the declarations referred to by
/// user-defined type names.
pub trait Dereference {
    /// Gets the definition with AST id `id`, provided that it is one of the
    /// requested `kinds`.
    #[must_use]
    fn dereference(&self, kinds: &[DefinitionKind], id: i64) -> Option<&Definition>;
}

/// An index over the struct and enum definitions and contracts in a set of
/// source units.
#[derive(Clone, Debug, Default)]
pub struct AstIndex {
    definitions: HashMap<i64, Definition>,
    contracts:   HashMap<String, ContractDefinition>,
}

impl AstIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an index over everything defined in the provided `units`.
    #[must_use]
    pub fn from_source_units<'a>(units: impl IntoIterator<Item = &'a SourceUnit>) -> Self {
        let mut index = Self::new();
        for unit in units {
            index.add_source_unit(unit);
        }
        index
    }

    /// Indexes the file-level and contract-level definitions in `unit`.
    pub fn add_source_unit(&mut self, unit: &SourceUnit) {
        for node in &unit.nodes {
            match node {
                SourceUnitNode::ContractDefinition(contract) => self.add_contract(contract),
                SourceUnitNode::StructDefinition(s) => self.add(Definition::Struct(s.clone())),
                SourceUnitNode::EnumDefinition(e) => self.add(Definition::Enum(e.clone())),
                SourceUnitNode::Other => (),
            }
        }
    }

    /// Indexes `contract` and the definitions declared inside it.
    pub fn add_contract(&mut self, contract: &ContractDefinition) {
        for node in &contract.nodes {
            match node {
                ContractNode::StructDefinition(s) => self.add(Definition::Struct(s.clone())),
                ContractNode::EnumDefinition(e) => self.add(Definition::Enum(e.clone())),
                ContractNode::VariableDeclaration(_) | ContractNode::Other => (),
            }
        }
        self.contracts.insert(contract.name.clone(), contract.clone());
    }

    /// Indexes the provided `definition` under its AST id.
    pub fn add(&mut self, definition: Definition) {
        self.definitions.insert(definition.id(), definition);
    }

    /// Gets the indexed contract named `name`.
    #[must_use]
    pub fn contract(&self, name: &str) -> Option<&ContractDefinition> {
        self.contracts.get(name)
    }
}

impl Dereference for AstIndex {
    fn dereference(&self, kinds: &[DefinitionKind], id: i64) -> Option<&Definition> {
        self.definitions
            .get(&id)
            .filter(|definition| kinds.contains(&definition.kind()))
    }
}
