//! This module contains errors pertaining to the resolution of a storage layout
//! into its detailed form.

use itertools::Itertools;
use thiserror::Error;

use crate::error::identifier;

/// Errors that occur while resolving the detailed types of a storage layout.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("Recursion detected while resolving types: {}", chain.iter().join(" -> "))]
    RecursionDetected { chain: Vec<String> },

    #[error("Type {id:?} is referenced but has no entry in the layout's types")]
    UnknownType { id: String },

    #[error(transparent)]
    Identifier(#[from] identifier::Error),
}

/// The result type for methods that may have resolution errors.
pub type Result<T> = std::result::Result<T, Error>;
