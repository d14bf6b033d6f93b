//! Candidate ordering and sort direction.
//!
//! The solver walks a project's version list front to back, so the order of
//! that list *is* the solver's preference. Both directions share one total
//! pre-order and differ only in how two semantic versions compare:
//!
//! 1. Paired versions are unwrapped to their symbolic part before comparing;
//!    only the symbolic shape participates in ordering.
//! 2. Versions of different kinds order by a fixed kind precedence:
//!    semver tags, then plain tags, then branches, then bare revisions.
//! 3. Same-kind revisions, branches, and plain tags tie-break by
//!    lexicographic comparison of their string form, in both directions.
//! 4. Semver tags: prerelease versions sort after *all* full releases in
//!    both directions. Among versions of equal prerelease status, upgrade
//!    prefers greater and downgrade prefers lesser.
//!
//! The ordering leaves genuine ties (identical strings, equal parsed
//! versions spelled differently); sorting must be stable so equal elements
//! keep their input order and repeated solves see identical lists.

use crate::version::{UnpairedVersion, Version};
use std::cmp::Ordering;

/// Which end of the version range a solve run prefers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Prefer newer versions: the upgrade direction.
    Upgrade,
    /// Prefer older versions: the downgrade direction.
    Downgrade,
}

impl SortDirection {
    /// Sort a version list into this direction's preference order.
    ///
    /// Uses a stable sort: elements the ordering cannot distinguish keep
    /// their input order.
    pub fn sort(self, versions: &mut [Version]) {
        match self {
            Self::Upgrade => versions.sort_by(upgrade_cmp),
            Self::Downgrade => versions.sort_by(downgrade_cmp),
        }
    }
}

/// Compare two versions in upgrade preference order.
#[must_use]
pub fn upgrade_cmp(left: &Version, right: &Version) -> Ordering {
    cmp_in_direction(left, right, SortDirection::Upgrade)
}

/// Compare two versions in downgrade preference order.
#[must_use]
pub fn downgrade_cmp(left: &Version, right: &Version) -> Ordering {
    cmp_in_direction(left, right, SortDirection::Downgrade)
}

fn cmp_in_direction(left: &Version, right: &Version, direction: SortDirection) -> Ordering {
    let by_kind = kind_rank(left).cmp(&kind_rank(right));
    if by_kind != Ordering::Equal {
        return by_kind;
    }

    match (left.unpaired_part(), right.unpaired_part()) {
        // Same kind, both semver: prerelease partition, then direction.
        (Some(UnpairedVersion::Semver { version: l, .. }), Some(UnpairedVersion::Semver { version: r, .. })) => {
            match (l.pre.is_empty(), r.pre.is_empty()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => match direction {
                    SortDirection::Upgrade => r.cmp(l),
                    SortDirection::Downgrade => l.cmp(r),
                },
            }
        }
        // Branches, plain tags, and bare revisions order lexicographically
        // in both directions.
        _ => sort_key(left).cmp(sort_key(right)),
    }
}

/// Kind precedence of the symbolic (unwrapped) form.
fn kind_rank(v: &Version) -> u8 {
    match v.unpaired_part() {
        Some(UnpairedVersion::Semver { .. }) => 0,
        Some(UnpairedVersion::Plain(_)) => 1,
        Some(UnpairedVersion::Branch(_)) => 2,
        None => 3,
    }
}

/// The string a non-semver version orders by.
fn sort_key(v: &Version) -> &str {
    match v.unpaired_part() {
        Some(uv) => uv.as_str(),
        None => match v {
            Version::Revision(r) => r.as_str(),
            // unpaired_part is None only for bare revisions.
            _ => unreachable!("paired and unpaired versions have a symbolic part"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::Revision;

    fn tags(input: &[&str]) -> Vec<Version> {
        input.iter().map(|tag| Version::from_tag(tag)).collect()
    }

    fn rendered(versions: &[Version]) -> Vec<String> {
        versions.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn upgrade_sort_prefers_newest_with_prereleases_last() {
        let mut versions = tags(&["v1.0.0", "v2.0.0-alpha", "v2.0.0", "v1.5.0"]);
        SortDirection::Upgrade.sort(&mut versions);
        assert_eq!(rendered(&versions), ["v2.0.0", "v1.5.0", "v1.0.0", "v2.0.0-alpha"]);
    }

    #[test]
    fn downgrade_sort_prefers_oldest_with_prereleases_last() {
        let mut versions = tags(&["v1.0.0", "v2.0.0-alpha", "v2.0.0", "v1.5.0"]);
        SortDirection::Downgrade.sort(&mut versions);
        assert_eq!(rendered(&versions), ["v1.0.0", "v1.5.0", "v2.0.0", "v2.0.0-alpha"]);
    }

    #[test]
    fn prereleases_order_by_direction_among_themselves() {
        let mut versions = tags(&["v2.0.0-alpha", "v2.0.0-beta", "v1.0.0-rc.1"]);
        SortDirection::Upgrade.sort(&mut versions);
        assert_eq!(rendered(&versions), ["v2.0.0-beta", "v2.0.0-alpha", "v1.0.0-rc.1"]);

        SortDirection::Downgrade.sort(&mut versions);
        assert_eq!(rendered(&versions), ["v1.0.0-rc.1", "v2.0.0-alpha", "v2.0.0-beta"]);
    }

    #[test]
    fn kind_precedence_groups_versions() {
        let mut versions = vec![
            Version::revision("ffffffff"),
            Version::branch("master"),
            Version::from_tag("release-2023"),
            Version::from_tag("v1.0.0"),
        ];
        SortDirection::Upgrade.sort(&mut versions);
        assert_eq!(rendered(&versions), ["v1.0.0", "release-2023", "master", "ffffffff"]);

        // Kind precedence is direction-independent.
        SortDirection::Downgrade.sort(&mut versions);
        assert_eq!(rendered(&versions), ["v1.0.0", "release-2023", "master", "ffffffff"]);
    }

    #[test]
    fn same_kind_non_semver_sorts_lexicographically_both_directions() {
        for direction in [SortDirection::Upgrade, SortDirection::Downgrade] {
            let mut versions =
                vec![Version::branch("release"), Version::branch("develop"), Version::branch("master")];
            direction.sort(&mut versions);
            assert_eq!(rendered(&versions), ["develop", "master", "release"]);
        }
    }

    #[test]
    fn paired_versions_order_by_their_symbolic_part() {
        let rev = Revision::from("abc1234");
        let mut versions = vec![
            Version::from(crate::version::UnpairedVersion::from_tag("v1.0.0").pair(rev.clone())),
            Version::from(crate::version::UnpairedVersion::from_tag("v2.0.0").pair(rev)),
        ];
        SortDirection::Upgrade.sort(&mut versions);
        assert_eq!(rendered(&versions), ["v2.0.0", "v1.0.0"]);
    }

    #[test]
    fn stable_sort_keeps_tied_spellings_in_input_order() {
        // "1.0.0" and "v1.0.0" parse identically: a genuine tie.
        let mut versions = tags(&["1.0.0", "v1.0.0"]);
        SortDirection::Upgrade.sort(&mut versions);
        assert_eq!(rendered(&versions), ["1.0.0", "v1.0.0"]);
    }
}
