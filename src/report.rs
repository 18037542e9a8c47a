//! This module contains the presentation of storage operations as diagnostics
//! that a human can act on.
//!
//! Nothing in here is needed to decide whether an upgrade is safe. It is a
//! projection of the checker's output into text.

use std::fmt::{Display, Formatter};

use crate::{checker::StorageOperation, diff::Operation, resolver::StorageField};

/// The hint given for variables inserted anywhere but at the end.
pub const INSERT_HINT: &str = "Only insert variables at the end of the most derived contract";

/// The hint given for variables that were removed.
pub const DELETE_HINT: &str = "Keep the variable even if unused";

/// The hint given for variables whose type changed.
pub const TYPE_CHANGE_HINT: &str = "Keep the original type, or declare a new variable at the end";

/// A human-readable description of a storage operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Explanation {
    /// What the operation does.
    pub message: String,

    /// How the user might avoid the operation, if there is a usual remedy.
    pub hint: Option<&'static str>,
}

impl Display for Explanation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(hint) = self.hint {
            write!(f, " ({hint})")?;
        }
        Ok(())
    }
}

/// Explains the provided `operation`.
#[must_use]
pub fn explain(operation: &StorageOperation) -> Explanation {
    let (message, hint) = match operation {
        Operation::Equal => ("Kept a variable unchanged".to_string(), None),
        Operation::Rename { original, updated } => (
            format!("Renamed {} to `{}`", describe(original), updated.label),
            None,
        ),
        Operation::TypeChange { original, updated } => (
            format!(
                "Changed the type of {} from `{}` to `{}`",
                describe(original),
                original.type_label,
                updated.type_label
            ),
            Some(TYPE_CHANGE_HINT),
        ),
        Operation::Replace { original, updated } => (
            format!(
                "Replaced {} with `{}` of incompatible type `{}`",
                describe(original),
                updated.label,
                updated.type_label
            ),
            None,
        ),
        Operation::Insert { updated } => (format!("Inserted {}", describe(updated)), Some(INSERT_HINT)),
        Operation::Delete { original } => (format!("Deleted {}", describe(original)), Some(DELETE_HINT)),
        Operation::Append { updated } => (format!("Appended {}", describe(updated)), None),
    };

    Explanation { message, hint }
}

/// Names `field` along with its contract.
fn describe(field: &StorageField) -> String {
    format!("`{}.{}`", field.contract, field.label)
}

impl Display for StorageOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", explain(self))
    }
}
