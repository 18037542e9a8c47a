//! This library extracts the storage layout of
//! [Solidity](https://soliditylang.org) contracts from the compiler's syntax
//! tree, and checks whether a new version of a contract can replace an old
//! one behind an upgradeable proxy without corrupting the data already in
//! storage.
//!
//! # How it Works
//!
//! From a very high level, the check is performed as follows:
//!
//! 1. The [`extractor`] walks the declarations of a contract and records every
//!    storage variable, in declaration order, into a [`StorageLayout`]. It
//!    also records a definition for every type that those variables use.
//! 2. The layouts of the original and updated contracts are each handed to
//!    the [`resolver`], which expands every variable's type into a detailed
//!    type tree, rejecting types that contain themselves.
//! 3. The [`checker`] aligns the two sequences of variables using the edit
//!    distance algorithm in [`diff`], classifying each aligned pair by
//!    whether its name and its structural type are unchanged.
//! 4. Any operation that would move or reinterpret existing storage is
//!    reported as an incompatibility, which the [`report`] module can turn
//!    into a diagnostic.
//!
//! # Basic Usage
//!
//! Layouts are usually extracted from the compiler output, but they can also
//! be built by hand or reloaded from a JSON baseline.
//!
//! ```
//! use storage_layout_checker::{
//!     check,
//!     checker::Config,
//!     diff::OperationKind,
//!     layout::{StorageItem, StorageLayout, TypeItem},
//! };
//!
//! let mut original = StorageLayout::new();
//! original.add_item(StorageItem::new("Box", "x1", "t_uint256", "Box.sol:4"));
//! original.add_item(StorageItem::new("Box", "x2", "t_uint256", "Box.sol:5"));
//! original.add_type("t_uint256", TypeItem::new("uint256"));
//!
//! let mut updated = StorageLayout::new();
//! updated.add_item(StorageItem::new("Box", "x2", "t_uint256", "Box.sol:4"));
//! updated.add_type("t_uint256", TypeItem::new("uint256"));
//!
//! let incompatibilities = check(&original, &updated, Config::default()).unwrap();
//! assert_eq!(incompatibilities.len(), 1);
//! assert_eq!(incompatibilities[0].kind(), OperationKind::Delete);
//! ```

#![warn(clippy::all, clippy::cargo, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // Allows for better API naming

pub mod checker;
pub mod constant;
pub mod diff;
pub mod error;
pub mod extractor;
pub mod identifier;
pub mod layout;
pub mod report;
pub mod resolver;

// Re-exports to provide the library interface.
pub use checker::{assert_safe, check};
pub use extractor::extract_storage_layout;
pub use layout::StorageLayout;
