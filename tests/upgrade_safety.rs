//! This module is an integration test that checks the upgrade safety of
//! storage layouts under the kinds of edits that developers make between
//! versions of a contract.
#![cfg(test)]

use common::LayoutBuilder;
use storage_layout_checker::{
    assert_safe,
    check,
    checker,
    checker::Config,
    diff::{Operation, OperationKind},
    error::Error,
    StorageLayout,
};

mod common;

fn kinds(layout_a: &StorageLayout, layout_b: &StorageLayout, config: Config) -> anyhow::Result<Vec<OperationKind>> {
    Ok(check(layout_a, layout_b, config)?.iter().map(Operation::kind).collect())
}

fn two_uints() -> StorageLayout {
    LayoutBuilder::new("Box")
        .var("x1", "t_uint256")
        .var("x2", "t_uint256")
        .build()
}

#[test]
fn layout_against_itself_is_all_equal() -> anyhow::Result<()> {
    let layout = common::extract_from_asset("VaultV1.json", "Vault")?;
    let checker = checker::new(layout.clone(), layout, Config::default()).check()?;

    assert_eq!(checker.operations().len(), 3);
    assert!(checker.operations().iter().all(|o| o.kind() == OperationKind::Equal));
    assert!(checker.is_safe());

    Ok(())
}

#[test]
fn appending_variables_is_safe() -> anyhow::Result<()> {
    let updated = LayoutBuilder::new("Box")
        .var("x1", "t_uint256")
        .var("x2", "t_uint256")
        .var("x3", "t_string_storage")
        .var("x4", "t_bool")
        .build();

    assert!(check(&two_uints(), &updated, Config::default())?.is_empty());
    assert_safe(&two_uints(), &updated, Config::default())?;

    Ok(())
}

#[test]
fn deleting_a_variable_is_reported() -> anyhow::Result<()> {
    let updated = LayoutBuilder::new("Box").var("x2", "t_uint256").build();

    let ops = check(&two_uints(), &updated, Config::default())?;
    assert_eq!(ops.len(), 1);
    let Operation::Delete { original } = &ops[0] else {
        anyhow::bail!("Expected a deletion, found {:?}", ops[0]);
    };
    assert_eq!(original.label, "x1");

    Ok(())
}

#[test]
fn replacing_a_variable_is_reported() -> anyhow::Result<()> {
    let updated = LayoutBuilder::new("Box")
        .var("x1", "t_uint256")
        .var("renamed", "t_string_storage")
        .build();

    assert_eq!(
        kinds(&two_uints(), &updated, Config::default())?,
        vec![OperationKind::Replace]
    );

    Ok(())
}

#[test]
fn renaming_a_variable_is_reported() -> anyhow::Result<()> {
    let updated = LayoutBuilder::new("Box")
        .var("x1", "t_uint256")
        .var("renamed", "t_uint256")
        .build();

    let ops = check(&two_uints(), &updated, Config::default())?;
    assert_eq!(ops.len(), 1);
    let Operation::Rename { original, updated } = &ops[0] else {
        anyhow::bail!("Expected a rename, found {:?}", ops[0]);
    };
    assert_eq!((original.label.as_str(), updated.label.as_str()), ("x2", "renamed"));

    Ok(())
}

#[test]
fn renaming_and_appending_reports_only_the_rename() -> anyhow::Result<()> {
    let updated = LayoutBuilder::new("Box")
        .var("x1", "t_uint256")
        .var("renamed", "t_uint256")
        .var("x3", "t_uint256")
        .build();

    let strict = check(&two_uints(), &updated, Config::default())?;
    assert_eq!(strict.len(), 1);
    let Operation::Rename { original, updated: renamed } = &strict[0] else {
        anyhow::bail!("Expected a rename, found {:?}", strict[0]);
    };
    assert_eq!((original.label.as_str(), renamed.label.as_str()), ("x2", "renamed"));

    let lenient = Config::default().with_allow_renames(true);
    assert!(check(&two_uints(), &updated, lenient.clone())?.is_empty());
    assert_safe(&two_uints(), &updated, lenient)?;

    Ok(())
}

#[test]
fn inserting_before_existing_variables_is_reported() -> anyhow::Result<()> {
    let updated = LayoutBuilder::new("Box")
        .var("x1", "t_uint256")
        .var("x1b", "t_address")
        .var("x2", "t_uint256")
        .build();

    assert_eq!(
        kinds(&two_uints(), &updated, Config::default())?,
        vec![OperationKind::Insert]
    );

    Ok(())
}

/// Builds a layout with `holder` using the struct `Inner`, whose only field
/// has type `field_type`.
fn with_inner(holder: (&str, &str), extra: (&str, &str), field_type: &str) -> StorageLayout {
    LayoutBuilder::new("Box")
        .var("x1", "t_uint256")
        .var(holder.0, holder.1)
        .plain_type(extra.0, extra.1)
        .struct_type("t_struct(Inner)2_storage", "struct Box.Inner", &[("a", field_type)])
        .build()
}

#[test]
fn type_changes_in_nested_structs_are_reported() -> anyhow::Result<()> {
    let outer = |field_type: &str| {
        LayoutBuilder::new("Box")
            .var("x1", "t_uint256")
            .var("outer", "t_struct(Outer)1_storage")
            .struct_type("t_struct(Outer)1_storage", "struct Box.Outer", &[
                ("flag", "t_bool"),
                ("inner", "t_struct(Inner)2_storage"),
            ])
            .struct_type("t_struct(Inner)2_storage", "struct Box.Inner", &[("a", field_type)])
            .build()
    };

    let ops = check(&outer("t_uint256"), &outer("t_uint128"), Config::default())?;
    assert_eq!(ops.len(), 1);
    let Operation::TypeChange { original, .. } = &ops[0] else {
        anyhow::bail!("Expected a type change, found {:?}", ops[0]);
    };
    assert_eq!(original.label, "outer");

    Ok(())
}

#[test]
fn type_changes_in_array_elements_are_reported() -> anyhow::Result<()> {
    let array = "t_array(t_struct(Inner)2_storage)dyn_storage";
    let original = with_inner(("items", array), (array, "struct Box.Inner[]"), "t_uint256");
    let updated = with_inner(("items", array), (array, "struct Box.Inner[]"), "t_address");

    assert_eq!(
        kinds(&original, &updated, Config::default())?,
        vec![OperationKind::TypeChange]
    );

    Ok(())
}

#[test]
fn type_changes_in_mapping_values_are_reported() -> anyhow::Result<()> {
    let mapping = "t_mapping(t_address,t_struct(Inner)2_storage)";
    let label = "mapping(address => struct Box.Inner)";
    let original = with_inner(("balances", mapping), (mapping, label), "t_uint256");
    let updated = with_inner(("balances", mapping), (mapping, label), "t_uint8");

    assert_eq!(
        kinds(&original, &updated, Config::default())?,
        vec![OperationKind::TypeChange]
    );

    Ok(())
}

#[test]
fn adding_enum_members_is_a_type_change() -> anyhow::Result<()> {
    let with_members = |members: &[&str]| {
        LayoutBuilder::new("Box")
            .var("status", "t_enum(Status)3")
            .enum_type("t_enum(Status)3", "enum Box.Status", members)
            .build()
    };

    assert_eq!(
        kinds(
            &with_members(&["Active", "Closed"]),
            &with_members(&["Active", "Paused", "Closed"]),
            Config::default()
        )?,
        vec![OperationKind::TypeChange]
    );

    Ok(())
}

#[test]
fn upgrading_the_vault_reports_the_changed_struct() -> anyhow::Result<()> {
    let original = common::extract_from_asset("VaultV1.json", "Vault")?;
    let updated = common::extract_from_asset("VaultV2.json", "Vault")?;

    let checker = checker::new(original.clone(), updated.clone(), Config::default()).check()?;
    let all: Vec<_> = checker.operations().iter().map(Operation::kind).collect();
    assert_eq!(
        all,
        vec![
            OperationKind::Equal,
            OperationKind::TypeChange,
            OperationKind::Equal,
            OperationKind::Append,
        ]
    );
    assert_eq!(checker.incompatibilities().len(), 1);

    let error = assert_safe(&original, &updated, Config::default()).unwrap_err();
    let Error::UpgradeIncompatible(errors) = &error else {
        anyhow::bail!("Expected an incompatibility, found {error:?}");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.payloads()[0].location, "241:38:0");
    assert!(error.to_string().contains("Encountered 1 errors"));
    assert!(error.to_string().contains("`Vault.positions`"));

    Ok(())
}

#[test]
fn custom_type_changes_are_skipped_when_allowed() -> anyhow::Result<()> {
    let original = common::extract_from_asset("VaultV1.json", "Vault")?;
    let updated = common::extract_from_asset("VaultV2.json", "Vault")?;
    let config = Config::default().with_allow_custom_type_churn(true);

    // `Lock.until` widens from uint64 to uint128 inside `positions`, which is a
    // real layout change that the option lets through.
    assert_eq!(
        kinds(&original, &updated, Config::default())?,
        vec![OperationKind::TypeChange]
    );
    assert!(check(&original, &updated, config.clone())?.is_empty());
    assert_safe(&original, &updated, config)?;

    Ok(())
}

#[test]
fn skipping_custom_type_changes_keeps_changes_of_type_name() -> anyhow::Result<()> {
    let original = LayoutBuilder::new("Box")
        .var("s", "t_struct(S)4_storage")
        .struct_type("t_struct(S)4_storage", "struct Box.S", &[("a", "t_uint256")])
        .build();
    let updated = LayoutBuilder::new("Box")
        .var("s", "t_struct(T)9_storage")
        .struct_type("t_struct(T)9_storage", "struct Box.T", &[("a", "t_uint256")])
        .build();
    let config = Config::default().with_allow_custom_type_churn(true);

    assert_eq!(kinds(&original, &updated, config)?, vec![OperationKind::TypeChange]);

    Ok(())
}

#[test]
fn renumbered_types_with_the_same_shape_are_equal() -> anyhow::Result<()> {
    let numbered = |id: &str| {
        LayoutBuilder::new("Box")
            .var("s", id)
            .struct_type(id, "struct Box.S", &[("a", "t_uint256")])
            .build()
    };

    assert!(check(
        &numbered("t_struct(S)4_storage"),
        &numbered("t_struct(S)17_storage"),
        Config::default()
    )?
    .is_empty());

    Ok(())
}

#[test]
fn every_incompatibility_is_kept_in_order() -> anyhow::Result<()> {
    let original = LayoutBuilder::new("Box")
        .var("a", "t_uint256")
        .var("b", "t_address")
        .var("c", "t_bool")
        .build();
    let updated = LayoutBuilder::new("Box")
        .var("a2", "t_uint256")
        .var("b", "t_address")
        .build();

    let error = assert_safe(&original, &updated, Config::default()).unwrap_err();
    let locations: Vec<_> = error
        .incompatibilities()
        .ok_or_else(|| anyhow::anyhow!("Expected incompatibilities"))?
        .iter()
        .map(|e| (e.payload.operation.kind(), e.location.as_str()))
        .collect();
    assert_eq!(
        locations,
        vec![
            (OperationKind::Rename, "Box.sol:1"),
            (OperationKind::Delete, "Box.sol:3"),
        ]
    );

    Ok(())
}
