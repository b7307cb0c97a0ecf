// SPDX-License-Identifier: MPL-2.0

//! Reduce the constraints reported for one package to a minimal list.

use log::debug;

use crate::constraint::VersionConstraint;

/// Merge constraints together until no two of them can be merged anymore.
///
/// Pairs are looked up in order: the first constraint that can merge with a
/// later one is replaced by the merge, and the later one is dropped.
/// Opaque constraints never merge and are kept in place.
/// The matched set of versions is left unchanged.
pub fn merge_all<I>(constraints: I) -> Vec<VersionConstraint>
where
    I: IntoIterator<Item = VersionConstraint>,
{
    let mut constraints: Vec<_> = constraints.into_iter().collect();
    let initial_len = constraints.len();

    while let Some((i, j, merged)) = first_merge(&constraints) {
        debug!(
            "merged {} with {} into {}",
            constraints[i], constraints[j], merged
        );
        constraints[i] = merged;
        constraints.remove(j);
    }

    debug!(
        "reduced {} constraints to {}",
        initial_len,
        constraints.len()
    );
    constraints
}

/// Find the first mergeable pair `i < j` and compute its merge.
fn first_merge(constraints: &[VersionConstraint]) -> Option<(usize, usize, VersionConstraint)> {
    constraints.iter().enumerate().find_map(|(i, left)| {
        constraints
            .iter()
            .enumerate()
            .skip(i + 1)
            .filter(|(_, right)| left.can_merge_with(right))
            .find_map(|(j, right)| left.merge_with(right).ok().map(|merged| (i, j, merged)))
    })
}
