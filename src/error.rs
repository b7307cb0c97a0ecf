// SPDX-License-Identifier: MPL-2.0

//! Handling parse and merge errors.

use thiserror::Error;

/// Errors that may occur while parsing versions, boundaries and constraints.
///
/// These are the "invalid argument" failures: the input looked like a
/// recognized range but one of its tokens is malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The version is not made of dot separated numbers.
    #[error("version \"{version}\" must be made of numbers separated by dots")]
    InvalidVersion {
        /// Version that was being parsed.
        version: String,
    },

    /// The boundary is not a comparator followed by a version.
    #[error("boundary \"{boundary}\" must be one of <, <=, >, >= followed by a version")]
    InvalidBoundary {
        /// Boundary that was being parsed.
        boundary: String,
    },
}

/// Errors that may occur while merging two constraints.
///
/// Those are logic errors: callers are expected to check
/// [can_merge_with](crate::constraint::VersionConstraint::can_merge_with) first.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// The two constraints neither contain nor overlap each other.
    #[error("cannot merge \"{left}\" with \"{right}\": constraints do not overlap")]
    Disjoint {
        /// Constraint on which the merge was requested.
        left: String,
        /// Constraint that was to be merged in.
        right: String,
    },

    /// The overlap merge was requested for a pair that does not overlap.
    #[error("\"{base}\" does not overlap with \"{other}\"")]
    NotOverlapping {
        /// Range used as the base of the merge.
        base: String,
        /// Range that was to be merged in.
        other: String,
    },
}
