//! This module contains a generalised edit-distance algorithm over ordered
//! sequences, used to align the storage variables of two versions of a
//! contract.
//!
//! # How it Works
//!
//! The algorithm is a Levenshtein alignment where the cost of pairing two
//! items is decided by a classifier. Pairing items that the classifier deems
//! [`Substitution::Equal`] is free, while any other pairing costs
//! [`SUBSTITUTION_COST`]. Inserting and deleting items cost
//! [`INSERTION_COST`] and [`DELETION_COST`] respectively.
//!
//! Once the cost matrix is built, it is walked back from the end of both
//! sequences to recover the operations. At each step the walk prefers a
//! substitution, then an insertion, then a deletion. Insertions made once the
//! whole original sequence has been consumed are reported as
//! [`Operation::Append`], as growing a sequence at its tail does not move any
//! of the items that were already there. Such an append is preferred over a
//! substitution of the same cost.

use crate::constant::{DELETION_COST, INSERTION_COST, SUBSTITUTION_COST};

/// The relationship between two items that are aligned with each other.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Substitution {
    /// Same name and same type.
    Equal,

    /// Different name but same type.
    Rename,

    /// Same name but different type.
    TypeChange,

    /// Different name and different type.
    Replace,
}

impl Substitution {
    /// Classifies a pairing based on whether the items have the same name and
    /// whether they have the same type.
    #[must_use]
    pub fn from_equalities(same_name: bool, same_type: bool) -> Self {
        match (same_name, same_type) {
            (true, true) => Self::Equal,
            (false, true) => Self::Rename,
            (true, false) => Self::TypeChange,
            (false, false) => Self::Replace,
        }
    }

    /// Gets the cost of aligning two items related by this substitution.
    #[must_use]
    pub fn cost(self) -> usize {
        match self {
            Self::Equal => 0,
            Self::Rename | Self::TypeChange | Self::Replace => SUBSTITUTION_COST,
        }
    }
}

/// A step in the script that transforms the original sequence into the updated
/// one.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Operation<T> {
    /// An item that is unchanged.
    Equal,

    /// An item whose name changed but whose type did not.
    Rename { original: T, updated: T },

    /// An item whose type changed but whose name did not.
    TypeChange { original: T, updated: T },

    /// An item that was replaced by one with a different name and type.
    Replace { original: T, updated: T },

    /// An item inserted before some item of the original sequence.
    Insert { updated: T },

    /// An item of the original sequence that was removed.
    Delete { original: T },

    /// An item added after every item of the original sequence.
    Append { updated: T },
}

/// The kind of an [`Operation`], without its payload.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum OperationKind {
    Equal,
    Rename,
    TypeChange,
    Replace,
    Insert,
    Delete,
    Append,
}

impl<T> Operation<T> {
    /// Constructs the operation corresponding to aligning `original` with
    /// `updated` under the given `substitution`.
    #[must_use]
    pub fn substitute(substitution: Substitution, original: T, updated: T) -> Self {
        match substitution {
            Substitution::Equal => Self::Equal,
            Substitution::Rename => Self::Rename { original, updated },
            Substitution::TypeChange => Self::TypeChange { original, updated },
            Substitution::Replace => Self::Replace { original, updated },
        }
    }

    /// Gets the kind of this operation.
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Equal => OperationKind::Equal,
            Self::Rename { .. } => OperationKind::Rename,
            Self::TypeChange { .. } => OperationKind::TypeChange,
            Self::Replace { .. } => OperationKind::Replace,
            Self::Insert { .. } => OperationKind::Insert,
            Self::Delete { .. } => OperationKind::Delete,
            Self::Append { .. } => OperationKind::Append,
        }
    }

    /// Gets the item from the original sequence that this operation concerns,
    /// if any.
    #[must_use]
    pub fn original(&self) -> Option<&T> {
        match self {
            Self::Rename { original, .. }
            | Self::TypeChange { original, .. }
            | Self::Replace { original, .. }
            | Self::Delete { original } => Some(original),
            Self::Equal | Self::Insert { .. } | Self::Append { .. } => None,
        }
    }

    /// Gets the item from the updated sequence that this operation concerns,
    /// if any.
    #[must_use]
    pub fn updated(&self) -> Option<&T> {
        match self {
            Self::Rename { updated, .. }
            | Self::TypeChange { updated, .. }
            | Self::Replace { updated, .. }
            | Self::Insert { updated }
            | Self::Append { updated } => Some(updated),
            Self::Equal | Self::Delete { .. } => None,
        }
    }

    /// Checks whether the operation leaves every original item where it was.
    #[must_use]
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Equal | Self::Append { .. })
    }
}

/// Computes a minimum-cost script of operations that transforms `original`
/// into `updated`, where `classify` decides the relationship between any two
/// items that could be aligned.
///
/// The result contains one operation per aligned pair, deleted item and
/// inserted item, in sequence order.
#[must_use]
pub fn levenshtein<T, F>(original: &[T], updated: &[T], mut classify: F) -> Vec<Operation<T>>
where
    T: Clone,
    F: FnMut(&T, &T) -> Substitution,
{
    let matrix = CostMatrix::build(original, updated, &mut classify);
    matrix.walk(original, updated)
}

/// The costs of aligning every prefix of the original sequence with every
/// prefix of the updated one.
struct CostMatrix {
    /// The number of items in the original sequence.
    rows: usize,

    /// The number of items in the updated sequence.
    columns: usize,

    /// The cost of aligning the first `i` original items with the first `j`
    /// updated items, at `i * (columns + 1) + j`.
    costs: Vec<usize>,

    /// The classification of original item `i` against updated item `j`, at
    /// `i * columns + j`.
    substitutions: Vec<Substitution>,
}

impl CostMatrix {
    fn build<T>(
        original: &[T],
        updated: &[T],
        classify: &mut impl FnMut(&T, &T) -> Substitution,
    ) -> Self {
        let rows = original.len();
        let columns = updated.len();
        let substitutions = original
            .iter()
            .flat_map(|o| updated.iter().map(move |u| (o, u)))
            .map(|(o, u)| classify(o, u))
            .collect();

        let mut matrix = Self {
            rows,
            columns,
            costs: vec![0; (rows + 1) * (columns + 1)],
            substitutions,
        };

        for i in 0..=rows {
            for j in 0..=columns {
                let cost = match (i, j) {
                    (0, 0) => 0,
                    (0, _) => matrix.cost(0, j - 1) + INSERTION_COST,
                    (_, 0) => matrix.cost(i - 1, 0) + DELETION_COST,
                    _ => {
                        let substitution = matrix.cost(i - 1, j - 1) + matrix.substitution(i, j).cost();
                        let insertion = matrix.cost(i, j - 1) + INSERTION_COST;
                        let deletion = matrix.cost(i - 1, j) + DELETION_COST;
                        substitution.min(insertion).min(deletion)
                    }
                };
                let index = matrix.index(i, j);
                matrix.costs[index] = cost;
            }
        }

        matrix
    }

    /// Recovers the operations from the matrix, walking back from the
    /// alignment of both complete sequences.
    fn walk<T: Clone>(&self, original: &[T], updated: &[T]) -> Vec<Operation<T>> {
        let mut operations = Vec::with_capacity(self.rows.max(self.columns));
        let (mut i, mut j) = (self.rows, self.columns);

        while i > 0 || j > 0 {
            let cost = self.cost(i, j);
            let inserts = j > 0 && cost == self.cost(i, j - 1) + INSERTION_COST;
            let substitution = (i > 0 && j > 0)
                .then(|| self.substitution(i, j))
                .filter(|s| cost == self.cost(i - 1, j - 1) + s.cost());

            // Once the original sequence is consumed, an insertion is an append and
            // is taken over any substitution of equal cost.
            let appends = inserts && i == self.rows;

            if let (Some(substitution), false) = (substitution, appends) {
                operations.push(Operation::substitute(
                    substitution,
                    original[i - 1].clone(),
                    updated[j - 1].clone(),
                ));
                i -= 1;
                j -= 1;
                continue;
            }

            if inserts {
                let item = updated[j - 1].clone();
                operations.push(if appends {
                    Operation::Append { updated: item }
                } else {
                    Operation::Insert { updated: item }
                });
                j -= 1;
                continue;
            }

            // With no substitution or insertion accounting for the cost, `i > 0` and the
            // cost must come from a deletion.
            operations.push(Operation::Delete {
                original: original[i - 1].clone(),
            });
            i -= 1;
        }

        operations.reverse();
        operations
    }

    fn index(&self, i: usize, j: usize) -> usize {
        i * (self.columns + 1) + j
    }

    fn cost(&self, i: usize, j: usize) -> usize {
        self.costs[self.index(i, j)]
    }

    /// Gets the classification of the `i`th original item against the `j`th
    /// updated item, both counted from one.
    fn substitution(&self, i: usize, j: usize) -> Substitution {
        self.substitutions[(i - 1) * self.columns + (j - 1)]
    }
}

#[cfg(test)]
mod test {
    use crate::diff::{levenshtein, Operation, OperationKind, Substitution};

    type Var = (&'static str, &'static str);

    fn classify(a: &Var, b: &Var) -> Substitution {
        Substitution::from_equalities(a.0 == b.0, a.1 == b.1)
    }

    fn kinds(ops: &[Operation<Var>]) -> Vec<OperationKind> {
        ops.iter().map(Operation::kind).collect()
    }

    #[test]
    fn identical_sequences_are_all_equal() {
        let vars = [("a", "uint256"), ("b", "address"), ("c", "bool")];
        let ops = levenshtein(&vars, &vars, classify);
        assert_eq!(kinds(&ops), vec![OperationKind::Equal; 3]);
    }

    #[test]
    fn trailing_insertions_are_appends() {
        let original = [("a", "uint256")];
        let updated = [("a", "uint256"), ("b", "bool"), ("c", "bool")];
        let ops = levenshtein(&original, &updated, classify);
        assert_eq!(
            ops,
            vec![
                Operation::Equal,
                Operation::Append {
                    updated: ("b", "bool"),
                },
                Operation::Append {
                    updated: ("c", "bool"),
                },
            ]
        );
        assert!(ops.iter().all(Operation::is_safe));
    }

    #[test]
    fn inner_insertions_are_inserts() {
        let original = [("a", "uint256"), ("c", "bool")];
        let updated = [("a", "uint256"), ("b", "address"), ("c", "bool")];
        let ops = levenshtein(&original, &updated, classify);
        assert_eq!(
            kinds(&ops),
            vec![OperationKind::Equal, OperationKind::Insert, OperationKind::Equal]
        );
    }

    #[test]
    fn removed_items_are_deletes() {
        let original = [("x1", "uint256"), ("x2", "uint256")];
        let updated = [("x2", "uint256")];
        let ops = levenshtein(&original, &updated, classify);
        assert_eq!(
            ops,
            vec![
                Operation::Delete {
                    original: ("x1", "uint256"),
                },
                Operation::Equal,
            ]
        );
    }

    #[test]
    fn trailing_replacement_is_not_a_delete_and_append() {
        let original = [("x1", "uint256"), ("x2", "uint256")];
        let updated = [("x1", "uint256"), ("renamed", "string")];
        let ops = levenshtein(&original, &updated, classify);
        assert_eq!(
            ops,
            vec![
                Operation::Equal,
                Operation::Replace {
                    original: ("x2", "uint256"),
                    updated:  ("renamed", "string"),
                },
            ]
        );
    }

    #[test]
    fn rename_followed_by_an_append_keeps_the_append() {
        let original = [("x1", "uint256"), ("x2", "uint256")];
        let updated = [("x1", "uint256"), ("renamed", "uint256"), ("x3", "uint256")];
        let ops = levenshtein(&original, &updated, classify);
        assert_eq!(
            ops,
            vec![
                Operation::Equal,
                Operation::Rename {
                    original: ("x2", "uint256"),
                    updated:  ("renamed", "uint256"),
                },
                Operation::Append {
                    updated: ("x3", "uint256"),
                },
            ]
        );
    }

    #[test]
    fn classifies_renames_and_type_changes() {
        let original = [("a", "uint256"), ("b", "uint256")];
        let updated = [("z", "uint256"), ("b", "int256")];
        let ops = levenshtein(&original, &updated, classify);
        assert_eq!(
            kinds(&ops),
            vec![OperationKind::Rename, OperationKind::TypeChange]
        );
    }

    #[test]
    fn swapped_items_are_not_silently_accepted() {
        let original = [("a", "uint256"), ("b", "address")];
        let updated = [("b", "address"), ("a", "uint256")];
        let ops = levenshtein(&original, &updated, classify);
        assert!(ops.iter().any(|op| !op.is_safe()));
    }

    #[test]
    fn handles_empty_sequences() {
        let some = [("a", "uint256"), ("b", "bool")];
        let none: [Var; 0] = [];

        assert!(levenshtein(&none, &none, classify).is_empty());
        assert_eq!(
            kinds(&levenshtein(&none, &some, classify)),
            vec![OperationKind::Append; 2]
        );
        assert_eq!(
            kinds(&levenshtein(&some, &none, classify)),
            vec![OperationKind::Delete; 2]
        );
    }

    #[test]
    fn keeps_the_longest_run_of_equal_items() {
        let original = [("a", "uint256"), ("b", "bool"), ("c", "address"), ("d", "bytes32")];
        let updated = [("b", "bool"), ("c", "address"), ("d", "bytes32"), ("e", "uint8")];
        let ops = levenshtein(&original, &updated, classify);
        assert_eq!(
            kinds(&ops),
            vec![
                OperationKind::Delete,
                OperationKind::Equal,
                OperationKind::Equal,
                OperationKind::Equal,
                OperationKind::Append,
            ]
        );
    }
}
