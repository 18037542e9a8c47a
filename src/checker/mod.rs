//! This module contains the upgrade safety checker, which decides whether the
//! storage layout of an updated contract can replace that of the original
//! without corrupting the data already in storage.
//!
//! # How it Works
//!
//! Both layouts are first resolved so that every variable carries its
//! detailed type. The variables are then aligned with
//! [`crate::diff::levenshtein`], using a [`LayoutComparator`] to decide how
//! any two variables relate. Finally, the operations that do not move or
//! reinterpret existing storage are filtered out, and whatever remains is
//! reported as an incompatibility.

pub mod compare;
pub mod state;

use tracing::debug;

use crate::{
    checker::{compare::LayoutComparator, state::State},
    constant::{DEFAULT_ALLOW_CUSTOM_TYPE_CHURN, DEFAULT_ALLOW_RENAMES},
    diff::{levenshtein, Operation},
    error,
    error::{container::Locatable, upgrade},
    identifier::codec,
    layout::StorageLayout,
    resolver::{resolve, StorageField},
};

/// An operation of the edit script between two storage layouts.
pub type StorageOperation = Operation<StorageField>;

/// Creates a new checker comparing the `original` layout against the `updated`
/// layout under the provided `config`.
#[must_use]
pub fn new(original: StorageLayout, updated: StorageLayout, config: Config) -> InitialChecker {
    let state = state::HasLayouts { original, updated };
    Checker { config, state }
}

/// Checks whether the `updated` layout can safely replace the `original`
/// layout, returning the operations that make the replacement unsafe.
///
/// An empty result means that the upgrade is safe.
///
/// # Errors
///
/// Returns [`Err`] if either layout cannot be resolved.
pub fn check(
    original: &StorageLayout,
    updated: &StorageLayout,
    config: Config,
) -> error::Result<Vec<StorageOperation>> {
    let checker = new(original.clone(), updated.clone(), config).check()?;
    Ok(checker.state.incompatibilities)
}

/// Asserts that the `updated` layout can safely replace the `original` layout.
///
/// # Errors
///
/// Returns [`error::Error::UpgradeIncompatible`] carrying every incompatibility
/// if the upgrade is unsafe, and [`Err`] if either layout cannot be resolved.
pub fn assert_safe(original: &StorageLayout, updated: &StorageLayout, config: Config) -> error::Result<()> {
    new(original.clone(), updated.clone(), config).check()?.assert_safe()
}

/// The checker as it is before doing any work.
pub type InitialChecker = Checker<state::HasLayouts>;

/// The comparison of two storage layouts.
///
/// # Enforcing Valid State Transitions
///
/// The checker enforces that only correct state transitions can occur through
/// use of structs that implement the exact state required by it at any given
/// point. The [`Self::state`] function provides access to the data of
/// whichever state the checker is currently in.
#[derive(Debug)]
pub struct Checker<S: State> {
    /// The configuration of the checker.
    config: Config,

    /// The internal state of the checker.
    state: S,
}

/// The operations available in all states.
impl<S: State> Checker<S> {
    /// Gets the configuration of the checker.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gets an immutable reference to the current state of the checker.
    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Moves the checker into a `new_state`, keeping its configuration.
    fn transition<T: State>(self, new_state: T) -> Checker<T> {
        Checker {
            config: self.config,
            state:  new_state,
        }
    }
}

impl Checker<state::HasLayouts> {
    /// Resolves the detailed types of both layouts.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the types of either layout are cyclic, incomplete,
    /// or have malformed identifiers.
    pub fn resolve(self) -> error::Result<Checker<state::Resolved>> {
        let original = resolve(&self.state.original)?;
        let updated = resolve(&self.state.updated)?;
        Ok(self.transition(state::Resolved { original, updated }))
    }

    /// Runs the whole check, resolving and then comparing the layouts.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if either layout cannot be resolved.
    pub fn check(self) -> error::Result<Checker<state::Diffed>> {
        self.resolve()?.diff()
    }
}

impl Checker<state::Resolved> {
    /// Aligns the variables of the two layouts, and picks out the operations
    /// that make the upgrade unsafe.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the type identifiers of a changed variable cannot be
    /// stabilized.
    pub fn diff(self) -> error::Result<Checker<state::Diffed>> {
        let operations = {
            let state::Resolved { original, updated } = &self.state;
            let mut comparator = LayoutComparator::new(original, updated);
            levenshtein(original.items(), updated.items(), |o, u| comparator.classify(o, u))
        };

        let mut incompatibilities = Vec::new();
        for operation in &operations {
            if self.config.is_incompatible(operation)? {
                incompatibilities.push(operation.clone());
            }
        }

        debug!(
            operations = operations.len(),
            incompatibilities = incompatibilities.len(),
            "Compared storage layouts"
        );

        Ok(self.transition(state::Diffed {
            operations,
            incompatibilities,
        }))
    }
}

impl Checker<state::Diffed> {
    /// Gets every operation of the edit script, including the safe ones.
    #[must_use]
    pub fn operations(&self) -> &[StorageOperation] {
        &self.state.operations
    }

    /// Gets the operations that make the upgrade unsafe.
    #[must_use]
    pub fn incompatibilities(&self) -> &[StorageOperation] {
        &self.state.incompatibilities
    }

    /// Checks whether the upgrade is safe.
    #[must_use]
    pub fn is_safe(&self) -> bool {
        self.state.incompatibilities.is_empty()
    }

    /// Asserts that the upgrade is safe.
    ///
    /// # Errors
    ///
    /// Returns [`error::Error::UpgradeIncompatible`] carrying every
    /// incompatibility, located at the variable at fault, if there are any.
    pub fn assert_safe(self) -> error::Result<()> {
        if self.is_safe() {
            return Ok(());
        }

        let mut errors = upgrade::Errors::new();
        for operation in self.state.incompatibilities {
            let location = operation
                .updated()
                .or_else(|| operation.original())
                .map(|field| field.src.clone())
                .unwrap_or_default();
            errors.add(upgrade::Error::new(operation).locate(location));
        }

        Err(errors.into())
    }
}

/// The configuration for the checker.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Whether to skip type changes where the original and updated type
    /// identifiers are the same once the ids that the compiler assigns to
    /// user-defined types are removed.
    ///
    /// Renumbered types of the same shape already compare equal, so the type
    /// changes that this skips are changes to the members of a user-defined
    /// type that kept its name. These can break the layout, and are only
    /// skipped on request.
    ///
    /// Defaults to [`DEFAULT_ALLOW_CUSTOM_TYPE_CHURN`].
    pub allow_custom_type_churn: bool,

    /// Whether to tolerate variables that were renamed but kept their type.
    ///
    /// Defaults to [`DEFAULT_ALLOW_RENAMES`].
    pub allow_renames: bool,
}

impl Config {
    /// Sets the `allow_custom_type_churn` config parameter to `value`.
    #[must_use]
    pub fn with_allow_custom_type_churn(mut self, value: bool) -> Self {
        self.allow_custom_type_churn = value;
        self
    }

    /// Sets the `allow_renames` config parameter to `value`.
    #[must_use]
    pub fn with_allow_renames(mut self, value: bool) -> Self {
        self.allow_renames = value;
        self
    }

    /// Checks whether `operation` makes an upgrade unsafe under this
    /// configuration.
    fn is_incompatible(&self, operation: &StorageOperation) -> error::Result<bool> {
        let incompatible = match operation {
            Operation::Equal | Operation::Append { .. } => false,
            Operation::Rename { .. } => !self.allow_renames,
            Operation::TypeChange { original, updated } if self.allow_custom_type_churn => {
                codec::stabilize(&original.type_id)? != codec::stabilize(&updated.type_id)?
            }
            _ => true,
        };
        Ok(incompatible)
    }
}

impl Default for Config {
    fn default() -> Self {
        let allow_custom_type_churn = DEFAULT_ALLOW_CUSTOM_TYPE_CHURN;
        let allow_renames = DEFAULT_ALLOW_RENAMES;
        Self {
            allow_custom_type_churn,
            allow_renames,
        }
    }
}
