// SPDX-License-Identifier: MPL-2.0

//! Dotted numeric versions, as found in advisory constraints.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::ParseError;

/// A version made of any number of dot separated numbers, like `1.2.3` or `2.0.0.14`.
///
/// Versions are compared number by number, from left to right,
/// and a missing trailing number counts as `0`.
/// So `1.2` and `1.2.0` are equal, while still being displayed as written.
/// Numbers are not limited in size, date stamps like `20240101000000000000` are fine.
#[derive(Debug, Clone)]
pub struct Version {
    /// Decimal digits of each number, without leading zeros (`0` is kept as `"0"`).
    components: Vec<String>,
}

impl Version {
    /// The numbers making up this version, in order, as decimal strings.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(String::as_str)
    }

    /// Components without the trailing zeros, which do not take part in comparisons.
    fn significant(&self) -> &[String] {
        let len = self
            .components
            .iter()
            .rposition(|c| c != "0")
            .map_or(0, |last| last + 1);
        &self.components[..len]
    }
}

/// Compare two numbers written without leading zeros.
fn cmp_component(left: &str, right: &str) -> Ordering {
    left.len().cmp(&right.len()).then_with(|| left.cmp(right))
}

impl FromStr for Version {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalize = |part: &str| {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Self::Err::InvalidVersion {
                    version: s.to_string(),
                });
            }
            match part.trim_start_matches('0') {
                "" => Ok("0".to_string()),
                digits => Ok(digits.to_string()),
            }
        };

        let components = s.split('.').map(normalize).collect::<Result<_, _>>()?;
        Ok(Self { components })
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        (0..len)
            .map(|i| {
                let left = self.components.get(i).map_or("0", String::as_str);
                let right = other.components.get(i).map_or("0", String::as_str);
                cmp_component(left, right)
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

// Must agree with `Eq`, so trailing zeros are left out.
impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.components.join("."))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Generate short versions with small numbers, so that equal and
/// neighbouring versions show up often.
#[cfg(any(feature = "proptest", test))]
pub fn proptest_strategy() -> impl proptest::strategy::Strategy<Value = Version> {
    use proptest::prelude::*;

    prop::collection::vec(0u64..4, 1..4).prop_map(|numbers| Version {
        components: numbers.iter().map(u64::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    fn parts(version: &Version) -> Vec<&str> {
        version.components().collect()
    }

    #[test]
    fn parse_dotted_numbers() {
        assert_eq!(parts(&v("1.2.3")), ["1", "2", "3"]);
        assert_eq!(parts(&v("7")), ["7"]);
        assert_eq!(parts(&v("2.0.0.14")), ["2", "0", "0", "14"]);
        assert_eq!(parts(&v("1.02.000")), ["1", "2", "0"]);
    }

    #[test]
    fn parse_rejects_non_numeric() {
        for input in ["", "1.", ".1", "1..2", "1.x", "v1.0", "1.0-beta", " 1.0", "-1", "\u{0661}"] {
            assert_eq!(
                input.parse::<Version>(),
                Err(ParseError::InvalidVersion {
                    version: input.to_string()
                }),
                "{:?}",
                input
            );
        }
    }

    #[test]
    fn numbers_are_not_size_limited() {
        let date_stamp = v("20240101000000000000");
        assert_eq!(date_stamp.to_string(), "20240101000000000000");
        assert!(date_stamp > v("18446744073709551615"));
        assert!(v("1.99999999999999999999999") > v("1.99999999999999999999998"));
        assert!(v("1.99999999999999999999999") < v("1.100000000000000000000000"));
        assert_eq!(v("0001.0099999999999999999999999"), v("1.99999999999999999999999"));
    }

    #[test]
    fn missing_components_are_zero() {
        assert_eq!(v("1.2"), v("1.2.0"));
        assert_eq!(v("1"), v("1.0.0.0"));
        assert!(v("1.2") < v("1.2.0.1"));
        assert!(v("1.10") > v("1.9.9"));
        assert!(v("2") > v("1.999"));
        assert!(v("0.0") < v("0.0.0.1"));
    }

    #[test]
    fn display_keeps_written_form() {
        assert_eq!(v("1.0").to_string(), "1.0");
        assert_eq!(v("1.02.3").to_string(), "1.2.3");
        assert_eq!(v("0.00").to_string(), "0.0");
    }

    #[test]
    fn hash_agrees_with_eq() {
        let set: HashSet<Version> = ["1", "1.0", "01.0.0", "1.0.1"].iter().map(|s| v(s)).collect();
        assert_eq!(set.len(), 2);
    }

    proptest! {
        #[test]
        fn display_then_parse_is_equal(version in proptest_strategy()) {
            let parsed: Version = version.to_string().parse().unwrap();
            prop_assert_eq!(parts(&parsed), parts(&version));
        }

        #[test]
        fn order_is_antisymmetric(a in proptest_strategy(), b in proptest_strategy()) {
            prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        }

        #[test]
        fn order_matches_integers(a in any::<u64>(), b in any::<u64>()) {
            prop_assert_eq!(v(&a.to_string()).cmp(&v(&b.to_string())), a.cmp(&b));
        }
    }
}
