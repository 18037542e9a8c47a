//! This module contains errors pertaining to the decoding and parsing of the
//! compiler's type identifiers.

use thiserror::Error;

/// Errors that occur when decoding or parsing a type identifier.
///
/// Type identifiers are generated by the compiler, so any of these errors
/// indicates corrupt or unsupported compiler output rather than a problem with
/// the contract being checked.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("Malformed escape sequence at offset {position} in type identifier {identifier:?}")]
    MalformedEscape { identifier: String, position: usize },

    #[error("Unbalanced parentheses in type identifier {identifier:?}")]
    UnbalancedParentheses { identifier: String },

    #[error("Unexpected trailing input {trailing:?} in type identifier {identifier:?}")]
    TrailingInput { identifier: String, trailing: String },
}

/// The result type for methods that may have identifier errors.
pub type Result<T> = std::result::Result<T, Error>;
