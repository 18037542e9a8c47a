//! This module contains constants that are needed throughout the codebase.

/// The escape token that the compiler uses in place of an opening parenthesis
/// (`(`) in type identifiers.
pub const ESCAPE_OPEN: &str = "$_";

/// The escape token that the compiler uses in place of a closing parenthesis
/// (`)`) in type identifiers.
pub const ESCAPE_CLOSE: &str = "_$";

/// The escape token that the compiler uses in place of a comma (`,`) in type
/// identifiers.
pub const ESCAPE_COMMA: &str = "_$_";

/// The escape tokens in the order in which the decoder tries them at any given
/// position.
///
/// The order matters. The grammar is not prefix-free as [`ESCAPE_CLOSE`] is a
/// prefix of [`ESCAPE_COMMA`], so the longer token must be tried first.
pub const ESCAPE_TOKENS: [(&str, char); 3] = [
    (ESCAPE_OPEN, '('),
    (ESCAPE_COMMA, ','),
    (ESCAPE_CLOSE, ')'),
];

/// The suffix used by the compiler for storage pointer locations.
pub const STORAGE_POINTER_SUFFIX: &str = "_storage_ptr";

/// The suffix used by the compiler for storage reference locations.
pub const STORAGE_SUFFIX: &str = "_storage";

/// The prefixes of the type identifiers that embed a compiler-assigned AST id
/// immediately after their closing parenthesis.
pub const ID_BEARING_PREFIXES: [&str; 3] = ["t_struct(", "t_enum(", "t_contract("];

/// The head of struct type identifiers.
pub const STRUCT_HEAD: &str = "t_struct";

/// The head of enum type identifiers.
pub const ENUM_HEAD: &str = "t_enum";

/// The head of contract type identifiers.
pub const CONTRACT_HEAD: &str = "t_contract";

/// The marker that introduces the return types of a function type identifier.
pub const RETURNS_MARKER: &str = "returns";

/// The cost of substituting one item for a different one in the sequence diff.
pub const SUBSTITUTION_COST: usize = 3;

/// The cost of inserting an item in the sequence diff.
pub const INSERTION_COST: usize = 2;

/// The cost of deleting an item in the sequence diff.
pub const DELETION_COST: usize = 2;

/// The default value for whether the checker tolerates type changes that only
/// differ in compiler-assigned ids.
pub const DEFAULT_ALLOW_CUSTOM_TYPE_CHURN: bool = false;

/// The default value for whether the checker tolerates renamed variables.
pub const DEFAULT_ALLOW_RENAMES: bool = false;
