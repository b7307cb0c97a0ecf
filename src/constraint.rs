// SPDX-License-Identifier: MPL-2.0

//! Version constraints as written in security advisories, and the rules
//! to decide when two of them can be merged into one.
//!
//! Only three shapes of constraints are understood:
//!  - closed ranges: `>=1.0,<2.0` (any of `>`, `>=` then any of `<`, `<=`)
//!  - left open ranges: `<2.0` or `<=2.0`
//!  - right open ranges: `>1.0` or `>=1.0`
//!
//! Everything else (`*`, `^1.0`, `~1.2`, `1.0 || 2.0`, ...) is kept as an
//! [opaque](VersionConstraint::Opaque) string. Opaque constraints are written
//! back untouched but never contain, overlap or merge with anything.

use std::fmt::{self, Display};
use std::str::FromStr;

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;

use crate::boundary::Boundary;
use crate::error::{MergeError, ParseError};
use crate::version::Version;

lazy_static! {
    // `\d` would also match non ASCII digits, which versions do not accept.
    static ref CLOSED_RANGE_RE: Regex =
        Regex::new(r"^>(=?)\s*((?:[0-9]+\.)*[0-9]+)\s*,\s*<(=?)\s*((?:[0-9]+\.)*[0-9]+)$").unwrap();
    static ref LEFT_OPEN_RANGE_RE: Regex =
        Regex::new(r"^<(=?)\s*((?:[0-9]+\.)*[0-9]+)$").unwrap();
    static ref RIGHT_OPEN_RANGE_RE: Regex =
        Regex::new(r"^>(=?)\s*((?:[0-9]+\.)*[0-9]+)$").unwrap();
}

// SimpleRange #################################################################

/// A contiguous range of versions with an optional boundary on each side.
/// A missing boundary means the range is unbounded on that side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimpleRange {
    lower: Option<Boundary>,
    upper: Option<Boundary>,
}

impl SimpleRange {
    /// Create a range from its lower and upper boundaries.
    pub fn new(lower: Option<Boundary>, upper: Option<Boundary>) -> Self {
        Self { lower, upper }
    }

    /// Boundary limiting the range from below.
    pub fn lower(&self) -> Option<&Boundary> {
        self.lower.as_ref()
    }

    /// Boundary limiting the range from above.
    pub fn upper(&self) -> Option<&Boundary> {
        self.upper.as_ref()
    }

    /// Check if every version of `other` is also in this range.
    pub fn contains(&self, other: &Self) -> bool {
        self.contains_lower_bound(other.lower())
            && self.contains_upper_bound(other.upper())
    }

    fn contains_lower_bound(&self, other: Option<&Boundary>) -> bool {
        let Some(lower) = self.lower() else {
            return true;
        };
        let Some(other) = other else {
            return false;
        };
        if lower.limit_included() || lower.limit_included() == other.limit_included() {
            other.version() >= lower.version()
        } else {
            other.version() > lower.version()
        }
    }

    fn contains_upper_bound(&self, other: Option<&Boundary>) -> bool {
        let Some(upper) = self.upper() else {
            return true;
        };
        let Some(other) = other else {
            return false;
        };
        if upper.limit_included() || upper.limit_included() == other.limit_included() {
            other.version() <= upper.version()
        } else {
            other.version() < upper.version()
        }
    }

    /// Check if the version of `boundary` lies strictly between the
    /// versions of this range's boundaries, inclusivity aside.
    ///
    /// An absent boundary is never contained.
    pub fn strictly_contains_bound(&self, boundary: Option<&Boundary>) -> bool {
        let Some(boundary) = boundary else {
            return false;
        };
        let version = boundary.version();
        let above_lower = self.lower().map_or(true, |lower| version > lower.version());
        let below_upper = self.upper().map_or(true, |upper| version < upper.version());
        above_lower && below_upper
    }

    /// Check if the two ranges partially overlap:
    /// neither contains the other, and exactly one boundary of `other`
    /// lies strictly inside this range.
    pub fn overlaps_with(&self, other: &Self) -> bool {
        if self.contains(other) || other.contains(self) {
            return false;
        }
        self.strictly_contains_bound(other.lower()) != self.strictly_contains_bound(other.upper())
    }

    /// Merge a range overlapping with this one.
    ///
    /// The result keeps the side of `self` that `other` does not extend past,
    /// and takes the other side from `other`.
    pub fn merge_overlapping(&self, other: &Self) -> Result<Self, MergeError> {
        if !self.overlaps_with(other) {
            return Err(MergeError::NotOverlapping {
                base: self.to_string(),
                other: other.to_string(),
            });
        }
        if self.strictly_contains_bound(other.lower()) {
            // other extends this range upward
            Ok(Self::new(self.lower.clone(), other.upper.clone()))
        } else {
            Ok(Self::new(other.lower.clone(), self.upper.clone()))
        }
    }

    /// Check if a given version is in the range.
    pub fn contains_version(&self, version: &Version) -> bool {
        let above_lower = self.lower().map_or(true, |lower| {
            version > lower.version() || (lower.limit_included() && version == lower.version())
        });
        let below_upper = self.upper().map_or(true, |upper| {
            version < upper.version() || (upper.limit_included() && version == upper.version())
        });
        above_lower && below_upper
    }
}

/// Boundaries are joined with a comma, lower first.
///
/// A range without any boundary renders as the empty string, which parses
/// back as an opaque constraint. Keep that in mind when serializing merge
/// results with the `serde` feature.
impl Display for SimpleRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.lower(), self.upper()) {
            (Some(lower), Some(upper)) => write!(f, "{},{}", lower, upper),
            (Some(lower), None) => write!(f, "{}", lower),
            (None, Some(upper)) => write!(f, "{}", upper),
            (None, None) => Ok(()),
        }
    }
}

// VersionConstraint ###########################################################

/// A constraint on versions, as found in an advisory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionConstraint {
    /// A range we know how to reason about.
    Range(SimpleRange),
    /// Any other constraint, kept exactly as written.
    Opaque(String),
}

impl VersionConstraint {
    /// Whether this constraint was recognized as a simple range.
    pub fn is_simple_range_string(&self) -> bool {
        matches!(self, Self::Range(_))
    }

    /// The range behind this constraint, if it is not opaque.
    pub fn as_range(&self) -> Option<&SimpleRange> {
        match self {
            Self::Range(range) => Some(range),
            Self::Opaque(_) => None,
        }
    }

    /// Text form of the constraint.
    ///
    /// Opaque constraints are returned as written. Ranges are rebuilt from their
    /// boundaries, so whitespace may differ from the parsed input,
    /// but parsing the result again always gives back an equal constraint.
    pub fn constraint_string(&self) -> String {
        self.to_string()
    }

    /// Lower boundary, if the constraint is a range bounded from below.
    pub fn lower_boundary(&self) -> Option<&Boundary> {
        self.as_range().and_then(SimpleRange::lower)
    }

    /// Upper boundary, if the constraint is a range bounded from above.
    pub fn upper_boundary(&self) -> Option<&Boundary> {
        self.as_range().and_then(SimpleRange::upper)
    }

    /// Version of the lower boundary.
    pub fn lower_bound(&self) -> Option<&Version> {
        self.lower_boundary().map(Boundary::version)
    }

    /// Version of the upper boundary.
    pub fn upper_bound(&self) -> Option<&Version> {
        self.upper_boundary().map(Boundary::version)
    }

    /// Whether the lower bound version is part of the range.
    /// False when there is no lower bound.
    pub fn is_lower_bound_included(&self) -> bool {
        self.lower_boundary().map_or(false, Boundary::limit_included)
    }

    /// Whether the upper bound version is part of the range.
    /// False when there is no upper bound.
    pub fn is_upper_bound_included(&self) -> bool {
        self.upper_boundary().map_or(false, Boundary::limit_included)
    }

    /// Check if every version matched by `other` is matched by this constraint.
    /// Always false if either side is opaque.
    pub fn contains(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Range(range), Self::Range(other)) => range.contains(other),
            _ => false,
        }
    }

    /// Check if the two constraints partially overlap.
    /// Always false if either side is opaque.
    pub fn overlaps_with(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Opaque(_), Self::Range(_)) => false,
            (Self::Range(range), Self::Range(other)) => range.overlaps_with(other),
            // No boundary of an opaque constraint can fall inside anything.
            (_, Self::Opaque(_)) => false,
        }
    }

    /// Check if the two constraints can be merged into one
    /// matching exactly the versions matched by either.
    pub fn can_merge_with(&self, other: &Self) -> bool {
        self.contains(other)
            || other.contains(self)
            || self.overlaps_with(other)
            || other.overlaps_with(self)
    }

    /// Merge two constraints into one matching exactly the versions matched by either.
    ///
    /// Fails with [MergeError::Disjoint] when [can_merge_with](Self::can_merge_with) is false.
    pub fn merge_with(&self, other: &Self) -> Result<Self, MergeError> {
        if self.contains(other) {
            debug!("{} contains {}", self, other);
            return Ok(self.clone());
        }
        if other.contains(self) {
            debug!("{} is contained in {}", self, other);
            return Ok(other.clone());
        }
        if let (Self::Range(range), Self::Range(other_range)) = (self, other) {
            if range.overlaps_with(other_range) {
                let merged = range.merge_overlapping(other_range)?;
                debug!("{} overlaps with {}, merged into {}", self, other, merged);
                return Ok(Self::Range(merged));
            }
            if other_range.overlaps_with(range) {
                let merged = other_range.merge_overlapping(range)?;
                debug!("{} overlaps with {}, merged into {}", other, self, merged);
                return Ok(Self::Range(merged));
            }
        }
        trace!("cannot merge {} with {}", self, other);
        Err(MergeError::Disjoint {
            left: self.to_string(),
            right: other.to_string(),
        })
    }

    /// Check if a version is matched by the constraint.
    /// Returns `None` for opaque constraints, which cannot be evaluated.
    pub fn matches_version(&self, version: &Version) -> Option<bool> {
        self.as_range().map(|range| range.contains_version(version))
    }
}

impl From<SimpleRange> for VersionConstraint {
    fn from(range: SimpleRange) -> Self {
        Self::Range(range)
    }
}

impl FromStr for VersionConstraint {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if CLOSED_RANGE_RE.is_match(trimmed) {
            if let Some((lower, upper)) = trimmed.split_once(',') {
                return Ok(Self::Range(SimpleRange::new(
                    Some(lower.parse()?),
                    Some(upper.parse()?),
                )));
            }
        }
        if LEFT_OPEN_RANGE_RE.is_match(trimmed) {
            return Ok(Self::Range(SimpleRange::new(None, Some(trimmed.parse()?))));
        }
        if RIGHT_OPEN_RANGE_RE.is_match(trimmed) {
            return Ok(Self::Range(SimpleRange::new(Some(trimmed.parse()?), None)));
        }

        Ok(Self::Opaque(s.to_string()))
    }
}

impl Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range(range) => write!(f, "{}", range),
            Self::Opaque(raw) => f.write_str(raw),
        }
    }
}

// SERIALIZATION ###############################################################

#[cfg(feature = "serde")]
impl serde::Serialize for VersionConstraint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for VersionConstraint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Generate constraints of every recognized shape, with non empty ranges,
/// plus a few opaque ones.
#[cfg(any(feature = "proptest", test))]
pub fn proptest_strategy() -> impl proptest::strategy::Strategy<Value = VersionConstraint> {
    use crate::boundary::Comparator;
    use crate::version;
    use proptest::prelude::*;

    fn lower(version: Version, inclusive: bool) -> Boundary {
        let comparator = if inclusive {
            Comparator::GreaterOrEqual
        } else {
            Comparator::Greater
        };
        Boundary::new(comparator, version)
    }

    fn upper(version: Version, inclusive: bool) -> Boundary {
        let comparator = if inclusive {
            Comparator::LessOrEqual
        } else {
            Comparator::Less
        };
        Boundary::new(comparator, version)
    }

    let left_open = (version::proptest_strategy(), any::<bool>()).prop_map(|(v, inclusive)| {
        VersionConstraint::Range(SimpleRange::new(None, Some(upper(v, inclusive))))
    });
    let right_open = (version::proptest_strategy(), any::<bool>()).prop_map(|(v, inclusive)| {
        VersionConstraint::Range(SimpleRange::new(Some(lower(v, inclusive)), None))
    });
    let closed = (
        version::proptest_strategy(),
        version::proptest_strategy(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_filter("range must not be empty", |(v1, v2, _, _)| v1 != v2)
        .prop_map(|(v1, v2, lower_inclusive, upper_inclusive)| {
            let (low, high) = if v1 < v2 { (v1, v2) } else { (v2, v1) };
            VersionConstraint::Range(SimpleRange::new(
                Some(lower(low, lower_inclusive)),
                Some(upper(high, upper_inclusive)),
            ))
        });
    let opaque = prop::sample::select(vec!["*", "^1.0", "~2.1", "1.0 || 2.0", "dev-main"])
        .prop_map(|raw| VersionConstraint::Opaque(raw.to_string()));

    prop_oneof![
        2 => left_open,
        2 => right_open,
        5 => closed,
        1 => opaque,
    ]
}

// TESTS #######################################################################
