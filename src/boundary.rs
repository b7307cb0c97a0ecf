// SPDX-License-Identifier: MPL-2.0

//! One side of a version range: a comparator and a version.

use std::fmt::{self, Display};
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ParseError;
use crate::version::Version;

lazy_static! {
    static ref BOUNDARY_RE: Regex = Regex::new(r"^\s*(<=|<|>=|>)\s*((?:[0-9]+\.)*[0-9]+)\s*$").unwrap();
}

/// Comparators allowed in front of a boundary version.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
}

impl Comparator {
    /// Whether the version next to the comparator is part of the range.
    pub fn is_inclusive(self) -> bool {
        matches!(self, Self::LessOrEqual | Self::GreaterOrEqual)
    }

    /// The comparator as written in constraints.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
        }
    }
}

impl FromStr for Comparator {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<" => Ok(Self::Less),
            "<=" => Ok(Self::LessOrEqual),
            ">" => Ok(Self::Greater),
            ">=" => Ok(Self::GreaterOrEqual),
            _ => Err(ParseError::InvalidBoundary {
                boundary: s.to_string(),
            }),
        }
    }
}

impl Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A version together with the comparator limiting a range on one side,
/// like `>=1.2.3` or `<4.5.6`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Boundary {
    comparator: Comparator,
    version: Version,
}

impl Boundary {
    /// Create a boundary from its parts.
    pub fn new(comparator: Comparator, version: Version) -> Self {
        Self {
            comparator,
            version,
        }
    }

    /// The version limiting the range.
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// The comparator this boundary was written with.
    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    /// Whether the boundary version itself belongs to the range.
    pub fn limit_included(&self) -> bool {
        self.comparator.is_inclusive()
    }

    /// Canonical text form, comparator directly followed by the version.
    pub fn boundary_string(&self) -> String {
        self.to_string()
    }
}

impl FromStr for Boundary {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = BOUNDARY_RE
            .captures(s)
            .ok_or_else(|| ParseError::InvalidBoundary {
                boundary: s.to_string(),
            })?;
        let comparator = captures[1].parse()?;
        let version = captures[2].parse()?;
        Ok(Self::new(comparator, version))
    }
}

impl Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.comparator, self.version)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Boundary {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Boundary {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(serde::de::Error::custom)
    }
}
