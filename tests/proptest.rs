// SPDX-License-Identifier: MPL-2.0

use advisory_ranges::reduce::merge_all;
use advisory_ranges::version::Version;
use advisory_ranges::VersionConstraint;

use proptest::collection::vec;
use proptest::prelude::*;
use proptest::string::string_regex;

fn version_text() -> impl Strategy<Value = String> {
    vec(0u32..4, 1..4).prop_map(|parts| {
        parts
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(".")
    })
}

fn spaces() -> impl Strategy<Value = String> {
    string_regex("[ \t]{0,2}").unwrap()
}

fn lower_text() -> impl Strategy<Value = String> {
    (prop::bool::ANY, spaces(), version_text())
        .prop_map(|(inclusive, s, v)| format!(">{}{}{}", if inclusive { "=" } else { "" }, s, v))
}

fn upper_text() -> impl Strategy<Value = String> {
    (prop::bool::ANY, spaces(), version_text())
        .prop_map(|(inclusive, s, v)| format!("<{}{}{}", if inclusive { "=" } else { "" }, s, v))
}

/// Constraints as they may be written in advisories, including odd spacing
/// and shapes that are not understood.
fn constraint_text() -> impl Strategy<Value = String> {
    let closed = (lower_text(), spaces(), spaces(), upper_text())
        .prop_map(|(l, s1, s2, u)| format!("{}{},{}{}", l, s1, s2, u));
    let unsupported = prop::sample::select(vec!["*", "^1.2", "~2.0", ">=1.0 <2.0", "1.0 || 2.0"])
        .prop_map(str::to_string);

    prop_oneof![
        5 => closed,
        2 => lower_text(),
        2 => upper_text(),
        1 => unsupported,
    ]
}

fn version() -> impl Strategy<Value = Version> {
    version_text().prop_map(|v| v.parse().unwrap())
}

/// Keep only constraints matching at least one version, merging relies on it.
fn is_non_empty(constraint: &VersionConstraint) -> bool {
    match (constraint.lower_boundary(), constraint.upper_boundary()) {
        (Some(lower), Some(upper)) => {
            lower.version() < upper.version()
                || (lower.version() == upper.version()
                    && lower.limit_included()
                    && upper.limit_included())
        }
        _ => true,
    }
}

fn parsed_constraints() -> impl Strategy<Value = Vec<VersionConstraint>> {
    vec(constraint_text(), 0..8).prop_map(|texts| {
        texts
            .iter()
            .map(|t| t.parse::<VersionConstraint>().unwrap())
            .filter(is_non_empty)
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        result_cache: prop::test_runner::basic_result_cache,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_parse_never_fails_on_small_numbers(text in constraint_text()) {
        prop_assert!(text.parse::<VersionConstraint>().is_ok());
    }

    #[test]
    fn prop_rendering_parses_back(text in constraint_text()) {
        let constraint: VersionConstraint = text.parse().unwrap();
        let rendered = constraint.constraint_string();
        let reparsed: VersionConstraint = rendered.parse().unwrap();
        prop_assert_eq!(reparsed, constraint);
    }

    #[test]
    fn prop_merge_all_is_stable(constraints in parsed_constraints()) {
        let merged = merge_all(constraints);
        for (i, left) in merged.iter().enumerate() {
            for right in &merged[i + 1..] {
                prop_assert!(!left.can_merge_with(right), "{} can still merge with {}", left, right);
            }
        }
    }

    #[test]
    fn prop_merge_all_keeps_matched_versions(
        constraints in parsed_constraints(),
        versions in vec(version(), 1..10),
    ) {
        let merged = merge_all(constraints.clone());
        for version in &versions {
            let before = constraints.iter().any(|c| c.matches_version(version) == Some(true));
            let after = merged.iter().any(|c| c.matches_version(version) == Some(true));
            prop_assert_eq!(before, after, "version {}", version);
        }
    }

    #[test]
    fn prop_merge_all_keeps_opaque_constraints(constraints in parsed_constraints()) {
        let opaque_before: Vec<_> = constraints.iter().filter(|c| !c.is_simple_range_string()).cloned().collect();
        let opaque_after: Vec<_> = merge_all(constraints).into_iter().filter(|c| !c.is_simple_range_string()).collect();
        prop_assert_eq!(opaque_before, opaque_after);
    }
}
