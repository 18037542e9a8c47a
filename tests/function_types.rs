//! This module is an integration test that checks storage variables holding
//! internal function references, whose types carry parameter and return types.
#![cfg(test)]

use storage_layout_checker::{
    check,
    checker::Config,
    diff::Operation,
    resolver::{arena::TypeRef, resolve},
};

mod common;

const VALIDATOR_V1: &str = "t_function_internal_nonpayable(t_uint256)returns(t_bool)";
const VALIDATOR_V2: &str = "t_function_internal_nonpayable(t_uint256)returns(t_address)";

#[test]
fn extracts_function_typed_variables() -> anyhow::Result<()> {
    let layout = common::extract_from_asset("HooksV1.json", "Hooks")?;

    let items: Vec<_> = layout
        .items()
        .iter()
        .map(|i| (i.label.as_str(), i.typ.as_str()))
        .collect();
    assert_eq!(items, vec![("count", "t_uint256"), ("validator", VALIDATOR_V1)]);

    let ids: Vec<_> = layout.types().keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["t_bool", VALIDATOR_V1, "t_uint256"]);
    assert_eq!(
        layout.get_type(VALIDATOR_V1).map(|t| t.label.as_str()),
        Some("function (uint256) returns (bool)")
    );

    Ok(())
}

#[test]
fn resolves_parameter_and_return_types() -> anyhow::Result<()> {
    let layout = resolve(&common::extract_from_asset("HooksV1.json", "Hooks")?)?;
    let validator = layout.type_of(&layout.items()[1]);
    assert_eq!(validator.head, "t_function_internal_nonpayable");

    let ids = |refs: &Option<Vec<TypeRef>>| -> Vec<String> {
        refs.iter()
            .flatten()
            .map(|r| layout.arena()[*r].id.clone())
            .collect()
    };
    assert_eq!(ids(&validator.args), vec!["t_uint256"]);
    assert_eq!(ids(&validator.rets), vec!["t_bool"]);

    Ok(())
}

#[test]
fn return_type_changes_are_reported() -> anyhow::Result<()> {
    let original = common::extract_from_asset("HooksV1.json", "Hooks")?;
    let updated = common::extract_from_asset("HooksV2.json", "Hooks")?;
    assert_eq!(updated.items()[1].typ, VALIDATOR_V2);

    let ops = check(&original, &updated, Config::default())?;
    assert_eq!(ops.len(), 1);
    let Operation::TypeChange { original, updated } = &ops[0] else {
        anyhow::bail!("Expected a type change, found {:?}", ops[0]);
    };
    assert_eq!(original.label, "validator");
    assert_eq!(updated.type_label, "function (uint256) returns (address)");

    Ok(())
}
