//! This module deals with the type identifiers that the compiler attaches to
//! every typed node in the syntax tree.
//!
//! It provides the [`codec`] for the compiler's escaped encoding of these
//! identifiers, and a [`parse`]r that turns them into a structural
//! [`ParsedTypeId`].

pub mod codec;
pub mod parse;

pub use codec::{decode, encode, normalize, stabilize};
pub use parse::{parse, ParsedTypeId};
