//! This module contains the state tracking functionality for the checker.

use std::fmt::Debug;

use crate::{checker::StorageOperation, layout::StorageLayout, resolver::DetailedLayout};

/// A marker trait that says that the type implementing it is a checker state.
///
/// Checker states can be transitioned between as part of the
/// [`crate::checker::Checker`] state machine, and are intended to enforce that
/// correct state transitions take place.
pub trait State
where
    Self: Debug + Sized,
{
}

/// The initial state for the checker, holding the two layouts to compare.
#[derive(Debug)]
pub struct HasLayouts {
    /// The layout of the version of the contract that is deployed.
    pub original: StorageLayout,

    /// The layout of the version of the contract that would replace it.
    pub updated: StorageLayout,
}
impl State for HasLayouts {}

/// The state in which both layouts have had their types resolved.
#[derive(Debug)]
pub struct Resolved {
    pub original: DetailedLayout,
    pub updated:  DetailedLayout,
}
impl State for Resolved {}

/// The final state of the checker, once the layouts have been compared.
#[derive(Debug)]
pub struct Diffed {
    /// Every operation of the edit script, including the safe ones.
    pub operations: Vec<StorageOperation>,

    /// The operations that make the upgrade unsafe under the checker's
    /// configuration, in sequence order.
    pub incompatibilities: Vec<StorageOperation>,
}
impl State for Diffed {}
