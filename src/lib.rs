// SPDX-License-Identifier: MPL-2.0

//! Version range algebra for security advisory databases.
//!
//! Security advisories usually report the affected versions of a package
//! as a list of ranges, one per advisory, such as `>=1.0,<1.4.2` or `<2.1`.
//! When building a consolidated list for a package, many of those ranges
//! overlap or contain each other. This crate decides which ones can be merged
//! into a single range without changing the set of matched versions,
//! and computes the merge.
//!
//! # Constraints
//!
//! A [VersionConstraint] is parsed from its text form and is either
//!  - a [Range](VersionConstraint::Range) with an optional lower and upper
//!    [Boundary], written `>=1.0,<2.0`, `<2.0` or `>=1.0`,
//!  - or an [Opaque](VersionConstraint::Opaque) string, for everything else.
//!    Those are written back as is, and never merge with anything.
//!
//! ```
//! use advisory_ranges::VersionConstraint;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let a: VersionConstraint = ">=1.0,<3.0".parse()?;
//! let b: VersionConstraint = ">=2.0,<4.0".parse()?;
//!
//! assert!(a.can_merge_with(&b));
//! assert_eq!(a.merge_with(&b)?.constraint_string(), ">=1.0,<4.0");
//!
//! let wildcard: VersionConstraint = "*".parse()?;
//! assert!(!wildcard.is_simple_range_string());
//! assert!(!wildcard.can_merge_with(&wildcard));
//! # Ok(())
//! # }
//! ```
//!
//! # Merging many constraints
//!
//! [merge_all](reduce::merge_all) merges the constraints of a package
//! until no pair is mergeable anymore.
//!
//! ```
//! use advisory_ranges::reduce::merge_all;
//!
//! let constraints = ["<1.2", ">=1.1,<1.5", ">=3.0", "*"]
//!     .iter()
//!     .map(|s| s.parse())
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//! let merged: Vec<String> = merge_all(constraints)
//!     .iter()
//!     .map(|c| c.to_string())
//!     .collect();
//! assert_eq!(merged, ["<1.5", ">=3.0", "*"]);
//! ```
//!
//! # Logging
//!
//! Merge decisions are reported through the [log] facade,
//! at `debug` level for merges and `trace` level for rejected pairs.

#![warn(missing_docs)]

pub mod boundary;
pub mod constraint;
pub mod error;
pub mod reduce;
pub mod version;

pub use boundary::{Boundary, Comparator};
pub use constraint::{SimpleRange, VersionConstraint};
pub use error::{MergeError, ParseError};
pub use version::Version;
