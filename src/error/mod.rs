//! This module contains the primary error type for the checker's interface.
//! It also re-exports the more specific error types that are
//! subsystem-specific.

pub mod container;
pub mod extraction;
pub mod identifier;
pub mod resolution;
pub mod upgrade;

use thiserror::Error;

/// The interface result type for the library.
///
/// # Usage
///
/// Any function considered to be part of the public interface of the library
/// should return this result type. Subsystems should return the more-specific
/// child error types as appropriate.
pub type Result<T> = std::result::Result<T, Error>;

/// The interface error type for the library.
///
/// All errors returned from the library interface (and hence encountered by the
/// clients of the library) should be members of this enum.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// Errors that come from decoding the compiler's type identifiers.
    #[error(transparent)]
    Identifier(#[from] identifier::Error),

    /// Errors that come from extracting a layout out of the syntax tree.
    #[error(transparent)]
    Extraction(#[from] extraction::Error),

    /// Errors that come from resolving the detailed types of a layout.
    #[error(transparent)]
    Resolution(#[from] resolution::Error),

    /// The upgrade changes the storage layout in an unsafe way.
    #[error("Storage layout is incompatible: {_0}")]
    UpgradeIncompatible(upgrade::Errors),
}

impl Error {
    /// Gets the incompatibilities carried by this error, if it is an
    /// [`Error::UpgradeIncompatible`].
    #[must_use]
    pub fn incompatibilities(&self) -> Option<&[upgrade::LocatedError]> {
        match self {
            Self::UpgradeIncompatible(errors) => Some(errors.payloads()),
            _ => None,
        }
    }
}

/// Allow simple conversions from the aggregated upgrade errors.
impl From<upgrade::Errors> for Error {
    fn from(value: upgrade::Errors) -> Self {
        Self::UpgradeIncompatible(value)
    }
}
