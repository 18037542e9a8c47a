//! This module contains common utilities for simplifying the writing of
//! integration tests for this library.

#![cfg(test)]

use std::fs;

use storage_layout_checker::{
    extract_storage_layout,
    extractor::{
        contract::SourceUnit,
        source::{AstIndex, RawSrc},
    },
    layout::{StorageItem, StorageLayout, StructMember, TypeItem},
};

/// Reads the compiler output for a single source file from the test assets.
#[allow(unused)] // It is actually
pub fn load_source_unit(name: &str) -> anyhow::Result<SourceUnit> {
    let path = format!("{}/tests/asset/{name}", env!("CARGO_MANIFEST_DIR"));
    let json = fs::read_to_string(path)?;
    Ok(SourceUnit::from_json(&json)?)
}

/// Extracts the layout of the contract named `contract` from the source unit
/// in the test asset `name`.
#[allow(unused)] // It is actually
pub fn extract_from_asset(name: &str, contract: &str) -> anyhow::Result<StorageLayout> {
    let unit = load_source_unit(name)?;
    let index = AstIndex::from_source_units([&unit]);
    let definition = index
        .contract(contract)
        .ok_or_else(|| anyhow::anyhow!("No contract named {contract} in {name}"))?;
    Ok(extract_storage_layout(definition, &RawSrc, &index)?)
}

/// A builder for storage layouts of a single contract, for tests that do not
/// need to go through the syntax tree.
#[derive(Clone, Debug)]
pub struct LayoutBuilder {
    contract: String,
    layout:   StorageLayout,
}

#[allow(unused)] // It is actually
impl LayoutBuilder {
    /// Starts a layout for the contract `contract`, with the elementary types
    /// that most tests use already defined.
    pub fn new(contract: &str) -> Self {
        let mut layout = StorageLayout::new();
        for (id, label) in [
            ("t_uint256", "uint256"),
            ("t_uint128", "uint128"),
            ("t_uint8", "uint8"),
            ("t_address", "address"),
            ("t_bool", "bool"),
            ("t_string_storage", "string"),
        ] {
            layout.add_type(id, TypeItem::new(label));
        }
        let contract = contract.to_string();
        Self { contract, layout }
    }

    /// Declares the variable `label` of the type identified by `typ`.
    pub fn var(mut self, label: &str, typ: &str) -> Self {
        let src = format!("{}.sol:{}", self.contract, self.layout.item_count() + 1);
        self.layout
            .add_item(StorageItem::new(&self.contract, label, typ, src));
        self
    }

    /// Defines the struct type `id` named `label` with the provided members.
    pub fn struct_type(mut self, id: &str, label: &str, members: &[(&str, &str)]) -> Self {
        let members = members
            .iter()
            .map(|(name, typ)| StructMember::new(*name, *typ))
            .collect();
        self.layout.add_type(id, TypeItem::new_struct(label, members));
        self
    }

    /// Defines the enum type `id` named `label` with the provided members.
    pub fn enum_type(mut self, id: &str, label: &str, members: &[&str]) -> Self {
        let members = members.iter().map(ToString::to_string).collect();
        self.layout.add_type(id, TypeItem::new_enum(label, members));
        self
    }

    /// Defines a type `id` with no members.
    pub fn plain_type(mut self, id: &str, label: &str) -> Self {
        self.layout.add_type(id, TypeItem::new(label));
        self
    }

    pub fn build(self) -> StorageLayout {
        self.layout
    }
}
