//! This module contains generic containers for errors that are associated with
//! a location in the contract source, and for aggregating many such errors.

use std::fmt::Formatter;

use thiserror::Error;

/// An error that is localised to a particular location in the contract source.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub struct Located<E>
where
    E: Clone,
{
    /// The decoded source location of the declaration that caused the error.
    pub location: String,

    /// The error data
    pub payload: E,
}

/// Displays the error prefixed by the source location at which it occurred.
impl<E> std::fmt::Display for Located<E>
where
    E: std::fmt::Display + Clone,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.payload)
    }
}

/// A trait for errors that can have a source location attached to them.
pub trait Locatable
where
    Self: Sized,
{
    /// The error with the source location attached.
    type Located;

    /// Attach the source `location` to the error.
    fn locate(self, location: impl Into<String>) -> Self::Located;
}

/// An error that is a collection of errors, kept in the order in which they
/// were added.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub struct Errors<E> {
    payloads: Vec<E>,
}

impl<E> Errors<E> {
    /// Creates a new container for errors.
    #[must_use]
    pub fn new() -> Self {
        let payloads = vec![];
        Self { payloads }
    }

    /// Gets the errors contained within this error.
    #[must_use]
    pub fn payloads(&self) -> &[E] {
        self.payloads.as_slice()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Adds the provided `error` after all errors already in the container.
    pub fn add(&mut self, error: E) {
        self.payloads.push(error);
    }
}

impl<E> Default for Errors<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints a header with the number of errors, and then one error per line.
impl<E> std::fmt::Display for Errors<E>
where
    E: std::fmt::Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.payloads.is_empty() {
            return write!(f, "Encountered no errors");
        }

        writeln!(f, "Encountered {} errors:", self.payloads.len())?;
        for error in &self.payloads {
            writeln!(f, "{error}")?;
        }
        Ok(())
    }
}
