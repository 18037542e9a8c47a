//! This module contains the representation of the compiler's abstract syntax
//! tree that the extractor consumes.
//!
//! Only the parts of the tree that matter for storage layouts are modelled.
//! The types deserialize from the compiler's compact JSON output, with any
//! other node kinds and fields ignored.

use serde::{Deserialize, Serialize};

/// A single source file as output by the compiler.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceUnit {
    /// The AST id of the source unit.
    pub id: i64,

    /// The path of the source file.
    #[serde(default)]
    pub absolute_path: String,

    /// The top-level declarations in the file.
    pub nodes: Vec<SourceUnitNode>,
}

impl SourceUnit {
    /// Parses a source unit from the compiler's JSON output.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if `json` is not a valid source unit.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Gets the contracts defined in this source unit.
    pub fn contracts(&self) -> impl Iterator<Item = &ContractDefinition> {
        self.nodes.iter().filter_map(|node| match node {
            SourceUnitNode::ContractDefinition(contract) => Some(contract),
            _ => None,
        })
    }
}

/// The declarations that can appear at the top level of a source unit.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "nodeType")]
pub enum SourceUnitNode {
    ContractDefinition(ContractDefinition),
    StructDefinition(StructDefinition),
    EnumDefinition(EnumDefinition),
    #[serde(other)]
    Other,
}

/// The definition of a contract, interface or library.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDefinition {
    pub id:    i64,
    pub name:  String,
    pub nodes: Vec<ContractNode>,
}

impl ContractDefinition {
    /// Creates a contract definition named `name` with the provided `nodes`.
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>, nodes: Vec<ContractNode>) -> Self {
        let name = name.into();
        Self { id, name, nodes }
    }

    /// Gets the variables declared directly in the contract, in declaration
    /// order.
    pub fn variables(&self) -> impl Iterator<Item = &VariableDeclaration> {
        self.nodes.iter().filter_map(|node| match node {
            ContractNode::VariableDeclaration(variable) => Some(variable),
            _ => None,
        })
    }
}

/// The declarations that can appear inside a contract.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "nodeType")]
pub enum ContractNode {
    VariableDeclaration(VariableDeclaration),
    StructDefinition(StructDefinition),
    EnumDefinition(EnumDefinition),
    #[serde(other)]
    Other,
}

/// The declaration of a variable.
///
/// This covers state variables, struct fields and the parameters of function
/// types.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDeclaration {
    pub id:   i64,
    pub name: String,

    /// Whether the variable is declared `constant`.
    #[serde(default)]
    pub constant: bool,

    /// The mutability of the variable, not emitted by older compilers.
    #[serde(default)]
    pub mutability: Option<Mutability>,

    /// The encoded source range of the declaration.
    #[serde(default)]
    pub src: String,

    /// The declared type, as written in the source.
    #[serde(default)]
    pub type_name: Option<TypeName>,

    #[serde(default)]
    pub type_descriptions: TypeDescriptions,
}

impl VariableDeclaration {
    /// Checks whether the variable occupies storage, being neither `constant`
    /// nor `immutable`.
    #[must_use]
    pub fn is_stored(&self) -> bool {
        !self.constant
            && !matches!(
                self.mutability,
                Some(Mutability::Constant | Mutability::Immutable)
            )
    }
}

/// The mutability of a variable.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mutability {
    Mutable,
    Immutable,
    Constant,
}

/// The compiler's description of the type of a node.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptions {
    /// The escaped type identifier.
    pub type_identifier: Option<String>,

    /// The human-readable name of the type.
    pub type_string: Option<String>,
}

impl TypeDescriptions {
    /// Constructs a description for the type with the escaped identifier `id`
    /// and human-readable name `string`.
    #[must_use]
    pub fn new(id: impl Into<String>, string: impl Into<String>) -> Self {
        Self {
            type_identifier: Some(id.into()),
            type_string:     Some(string.into()),
        }
    }
}

/// A type as written in the source.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "nodeType")]
pub enum TypeName {
    ElementaryTypeName(ElementaryTypeName),
    UserDefinedTypeName(UserDefinedTypeName),
    ArrayTypeName(ArrayTypeName),
    Mapping(Mapping),
    FunctionTypeName(FunctionTypeName),
}

impl TypeName {
    /// Gets the compiler's description of the type.
    #[must_use]
    pub fn type_descriptions(&self) -> &TypeDescriptions {
        match self {
            Self::ElementaryTypeName(t) => &t.type_descriptions,
            Self::UserDefinedTypeName(t) => &t.type_descriptions,
            Self::ArrayTypeName(t) => &t.type_descriptions,
            Self::Mapping(t) => &t.type_descriptions,
            Self::FunctionTypeName(t) => &t.type_descriptions,
        }
    }

    /// Gets the id of the declaration that a user-defined type name refers
    /// to.
    #[must_use]
    pub fn referenced_declaration(&self) -> Option<i64> {
        match self {
            Self::UserDefinedTypeName(t) => Some(t.referenced_declaration),
            _ => None,
        }
    }

    /// Gets the type names nested directly within this one.
    ///
    /// Function parameters without a type name are skipped, as the compiler
    /// always emits one.
    #[must_use]
    pub fn children(&self) -> Vec<&TypeName> {
        match self {
            Self::ElementaryTypeName(_) | Self::UserDefinedTypeName(_) => vec![],
            Self::ArrayTypeName(t) => vec![t.base_type.as_ref()],
            Self::Mapping(t) => vec![t.key_type.as_ref(), t.value_type.as_ref()],
            Self::FunctionTypeName(t) => t
                .parameter_types
                .parameters
                .iter()
                .chain(&t.return_parameter_types.parameters)
                .filter_map(|p| p.type_name.as_ref())
                .collect(),
        }
    }

    /// Gets this type name and all type names nested within it, in pre-order.
    #[must_use]
    pub fn descendants(&self) -> Vec<&TypeName> {
        let mut found = Vec::new();
        let mut stack = vec![self];
        while let Some(current) = stack.pop() {
            found.push(current);
            stack.extend(current.children().into_iter().rev());
        }
        found
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementaryTypeName {
    pub type_descriptions: TypeDescriptions,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDefinedTypeName {
    pub referenced_declaration: i64,
    pub type_descriptions:      TypeDescriptions,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayTypeName {
    pub base_type:         Box<TypeName>,
    pub type_descriptions: TypeDescriptions,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    pub key_type:          Box<TypeName>,
    pub value_type:        Box<TypeName>,
    pub type_descriptions: TypeDescriptions,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionTypeName {
    pub parameter_types:        ParameterList,
    pub return_parameter_types: ParameterList,
    pub type_descriptions:      TypeDescriptions,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ParameterList {
    pub parameters: Vec<VariableDeclaration>,
}

/// The definition of a struct.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructDefinition {
    pub id:      i64,
    pub name:    String,
    pub members: Vec<VariableDeclaration>,
}

/// The definition of an enum.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDefinition {
    pub id:      i64,
    pub name:    String,
    pub members: Vec<EnumValue>,
}

/// A member of an enum.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EnumValue {
    pub name: String,
}
