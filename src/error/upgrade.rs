//! This module contains the errors produced when an upgrade is found to be
//! incompatible with the storage layout it replaces.

use thiserror::Error;

use crate::{checker::StorageOperation, error::container, report};

/// A single storage incompatibility between two versions of a contract.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub struct Error {
    /// The operation that makes the upgrade unsafe.
    pub operation: StorageOperation,
}

impl Error {
    /// Wraps the provided `operation` as an incompatibility.
    #[must_use]
    pub fn new(operation: StorageOperation) -> Self {
        Self { operation }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", report::explain(&self.operation))
    }
}

/// Make it possible to attach locations to these errors.
impl container::Locatable for Error {
    type Located = LocatedError;

    fn locate(self, location: impl Into<String>) -> Self::Located {
        container::Located {
            location: location.into(),
            payload:  self,
        }
    }
}

/// An incompatibility with the source location of the variable at fault.
pub type LocatedError = container::Located<Error>;

/// The aggregate of every incompatibility found when comparing two layouts.
pub type Errors = container::Errors<LocatedError>;
