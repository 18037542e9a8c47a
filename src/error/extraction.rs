//! This module contains errors pertaining to the extraction of a storage layout
//! from the compiler's abstract syntax tree.

use thiserror::Error;

use crate::error::identifier;

/// Errors that occur while extracting a storage layout.
///
/// Apart from the identifier errors, these all signal that the syntax tree
/// handed to the extractor is missing data that the compiler always provides,
/// and hence are violations of the extractor's preconditions.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("Variable `{variable}` has no type identifier in its type descriptions")]
    MissingTypeIdentifier { variable: String },

    #[error("Type name in `{variable}` has no type string in its type descriptions")]
    MissingTypeString { variable: String },

    #[error("Variable `{variable}` has no type name")]
    MissingTypeName { variable: String },

    #[error("Declaration {id} referenced by `{variable}` is not a {expected}")]
    UnresolvedReference {
        variable: String,
        id:       i64,
        expected: String,
    },

    #[error(transparent)]
    Identifier(#[from] identifier::Error),
}

/// The result type for methods that may have extraction errors.
pub type Result<T> = std::result::Result<T, Error>;
