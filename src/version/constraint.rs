//! Constraint algebra over versions.
//!
//! A [`Constraint`] is anything a manifest (or the solver itself) can demand
//! of a project's version:
//!
//! - any concrete [`Version`] (which matches only itself or a revision alias
//!   of itself),
//! - a [`SemverConstraint`] range such as `^1.0.0`,
//! - the trivial bounds [`Constraint::Any`] and [`Constraint::None`],
//! - and the solver-internal [`VersionTypeUnion`], an OR-group of versions
//!   known to share an underlying revision for the scope of one solve.
//!
//! The operations here are the *local* half of the algebra: they answer from
//! the information the operands already carry, never consulting a source.
//! [`SourceAdapter`](crate::resolver::SourceAdapter) layers the authoritative
//! half on top by pairing symbolic versions with revisions and retrying these
//! same local operations.
//!
//! # Intersection Semantics
//!
//! [`Constraint::intersect`] returns [`Constraint::None`] as *the* sentinel
//! for incompatibility; callers test for it with [`Constraint::is_none`].
//! Intersecting two semver ranges concatenates their comparator lists (a
//! `VersionReq` is a conjunction, so this is exact) and collapses
//! provably-disjoint combinations to `None` via a bounds analysis. Ranges the
//! analysis cannot refute are returned combined; they may still be
//! unsatisfiable, which the solver discovers when no concrete version
//! matches.

use crate::core::Error;
use crate::version::{parse_semver_tag, Version};
use regex::Regex;
use semver::{BuildMetadata, Comparator, Op, Version as SemVersion, VersionReq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

/// A semantic-version range constraint.
///
/// Wraps a parsed [`semver::VersionReq`] together with the raw input string,
/// which is preserved for display and serialization.
#[derive(Debug, Clone)]
pub struct SemverConstraint {
    raw: String,
    req: VersionReq,
}

impl SemverConstraint {
    /// Parse a range expression.
    ///
    /// `v` prefixes on the version numbers are tolerated (`^v1.0.0` means
    /// `^1.0.0`), matching how tags are commonly spelled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConstraint`] when the expression is not a
    /// valid semver requirement.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let normalized = normalize_requirement(input);
        match VersionReq::parse(&normalized) {
            Ok(req) => Ok(Self { raw: input.to_string(), req }),
            Err(err) => Err(Error::InvalidConstraint {
                input: input.to_string(),
                reason: err.to_string(),
            }),
        }
    }

    /// The range expression as originally written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the range admits this version.
    ///
    /// Prerelease versions are only admitted when a comparator names the
    /// same release triple with a prerelease component, per standard semver
    /// matching rules.
    #[must_use]
    pub fn matches(&self, version: &SemVersion) -> bool {
        self.req.matches(version)
    }

    /// Intersect two ranges.
    ///
    /// The result is [`Constraint::None`] when the ranges are provably
    /// disjoint, otherwise a combined range whose comparator list is the
    /// conjunction of both inputs.
    #[must_use]
    pub fn intersect(&self, other: &SemverConstraint) -> Constraint {
        if reqs_are_disjoint(&self.req, &other.req) {
            return Constraint::None;
        }

        let mut comparators = self.req.comparators.clone();
        for comp in &other.req.comparators {
            if !comparators.contains(comp) {
                comparators.push(comp.clone());
            }
        }

        let req = VersionReq { comparators };
        let raw = req.to_string();
        Constraint::Semver(Self { raw, req })
    }
}

// Identity is the parsed requirement; the raw spelling ("^1.0.0" vs
// "^v1.0.0") is presentation only.
impl PartialEq for SemverConstraint {
    fn eq(&self, other: &Self) -> bool {
        self.req == other.req
    }
}

impl Eq for SemverConstraint {}

impl fmt::Display for SemverConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Strip `v`/`V` prefixes from the version numbers of a range expression.
///
/// The prefix is only removed at the start of the expression or directly
/// after an operator or separator, so branch names that merely contain a `v`
/// (`develop`) pass through untouched.
fn normalize_requirement(requirement: &str) -> Cow<'_, str> {
    static VERSION_PREFIX: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(^|[\s,~^=><])[vV]").unwrap());

    VERSION_PREFIX.replace_all(requirement, "$1")
}

/// A set of versions equivalent for the scope of one solve.
///
/// The members all refer to the same underlying revision (or, when pairing
/// failed, the set degenerates to the single input version). Constraint
/// operations treat the members as OR'd together and take the most
/// optimistic answer.
///
/// This type is solver-internal. It has no public constructor, and turning
/// it into a string panics: if a union reaches user output or recorded lock
/// state, an invariant is broken and aborting beats corrupting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTypeUnion {
    members: Vec<Version>,
}

impl VersionTypeUnion {
    pub(crate) fn new(members: Vec<Version>) -> Self {
        Self { members }
    }

    pub(crate) fn members(&self) -> &[Version] {
        &self.members
    }
}

impl fmt::Display for VersionTypeUnion {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        panic!("version unions are solver-internal and must never be rendered");
    }
}

/// A demand on a project's version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Matches every version.
    Any,
    /// Matches no version. The sentinel result of an incompatible
    /// intersection; no other constraint value compares equal to it.
    None,
    /// A semantic-version range.
    Semver(SemverConstraint),
    /// A concrete version, matching itself and its revision aliases.
    Version(Version),
    /// Solver-internal OR-group. Never crosses the adapter's public
    /// boundary.
    Union(VersionTypeUnion),
}

impl Constraint {
    /// Classify a manifest constraint string.
    ///
    /// In order: `*` is [`Constraint::Any`]; seven or more hex digits are a
    /// bare revision; a bare semantic version (optionally `v`-prefixed) is
    /// that concrete version; a parseable range expression is a
    /// [`SemverConstraint`]; anything else names a branch. Plain (non-semver)
    /// tags cannot be distinguished from branches by spelling alone, so they
    /// also classify as branches here; matching via the project's actual
    /// version list sorts out which they are.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConstraint`] for an empty input.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::InvalidConstraint {
                input: String::new(),
                reason: "constraint is empty".to_string(),
            });
        }

        if input == "*" {
            return Ok(Self::Any);
        }

        // Commit identifiers: at least seven hex digits, nothing else.
        if input.len() >= 7 && input.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(Self::Version(Version::revision(input)));
        }

        if parse_semver_tag(input).is_some() {
            return Ok(Self::Version(Version::from_tag(input)));
        }

        if let Ok(sc) = SemverConstraint::parse(input) {
            return Ok(Self::Semver(sc));
        }

        Ok(Self::Version(Version::branch(input)))
    }

    /// Whether this is the incompatibility sentinel.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// A short name for the constraint's shape, for diagnostics.
    ///
    /// # Panics
    ///
    /// Panics on a [`Constraint::Union`]: naming one outside the solver
    /// means it escaped.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::None => "none",
            Self::Semver(_) => "semver",
            Self::Version(Version::Revision(_)) => "revision",
            Self::Version(Version::Unpaired(_)) => "version",
            Self::Version(Version::Paired(_)) => "paired-version",
            Self::Union(_) => {
                panic!("version unions are solver-internal and must never be identified")
            }
        }
    }

    /// Local match test: does this constraint admit `v`, given only the
    /// information both operands carry?
    #[must_use]
    pub fn matches(&self, v: &Version) -> bool {
        match self {
            Self::Any => true,
            Self::None => false,
            Self::Semver(sc) => v.semver().is_some_and(|sv| sc.matches(sv)),
            Self::Version(cv) => cv.matches(v),
            Self::Union(u) => u.members().iter().any(|m| m.matches(v)),
        }
    }

    /// Local overlap test: could some version satisfy both constraints?
    ///
    /// Commutative. For two semver ranges this is defined as "the
    /// intersection is not [`Constraint::None`]", so it inherits the
    /// conservative bounds analysis of [`SemverConstraint::intersect`].
    #[must_use]
    pub fn matches_any(&self, other: &Constraint) -> bool {
        match (self, other) {
            (Self::None, _) | (_, Self::None) => false,
            (Self::Any, _) | (_, Self::Any) => true,
            (Self::Semver(a), Self::Semver(b)) => !a.intersect(b).is_none(),
            (Self::Semver(s), Self::Version(v)) | (Self::Version(v), Self::Semver(s)) => {
                v.semver().is_some_and(|sv| s.matches(sv))
            }
            (Self::Version(a), Self::Version(b)) => a.matches(b),
            (Self::Union(u), c) | (c, Self::Union(u)) => {
                u.members().iter().any(|m| version_matches_any(m, c))
            }
        }
    }

    /// Local intersection.
    ///
    /// Commutative as a set operation, though the representative returned
    /// for equivalent operands may be either one. [`Constraint::None`]
    /// result means provably incompatible.
    #[must_use]
    pub fn intersect(&self, other: &Constraint) -> Constraint {
        match (self, other) {
            (Self::None, _) | (_, Self::None) => Self::None,
            (Self::Any, c) | (c, Self::Any) => c.clone(),
            (Self::Semver(a), Self::Semver(b)) => a.intersect(b),
            (Self::Semver(s), Self::Version(v)) | (Self::Version(v), Self::Semver(s)) => {
                if v.semver().is_some_and(|sv| s.matches(sv)) {
                    Self::Version(v.clone())
                } else {
                    Self::None
                }
            }
            (Self::Version(a), Self::Version(b)) => {
                if a.matches(b) {
                    Self::Version(a.clone())
                } else {
                    Self::None
                }
            }
            (Self::Union(u), c) | (c, Self::Union(u)) => union_intersect(u, c),
        }
    }
}

/// OR-fold a union member (a concrete version) against a constraint.
fn version_matches_any(v: &Version, c: &Constraint) -> bool {
    match c {
        Constraint::None => false,
        Constraint::Any => true,
        Constraint::Semver(s) => v.semver().is_some_and(|sv| s.matches(sv)),
        Constraint::Version(w) => v.matches(w),
        Constraint::Union(u) => u.members().iter().any(|m| v.matches(m)),
    }
}

/// First non-`None` member intersection wins; all-`None` means `None`.
///
/// Every member of a union is equivalent for the current solve, so
/// returning whichever member intersects first keeps the caller-supplied
/// constraint stable in spirit without floating to an unrelated version.
fn union_intersect(u: &VersionTypeUnion, c: &Constraint) -> Constraint {
    for member in u.members() {
        let result = Constraint::Version(member.clone()).intersect(c);
        if !result.is_none() {
            return result;
        }
    }
    Constraint::None
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::None => f.write_str("none"),
            Self::Semver(sc) => fmt::Display::fmt(sc, f),
            Self::Version(v) => fmt::Display::fmt(v, f),
            // Delegates to the union's own Display, which panics.
            Self::Union(u) => fmt::Display::fmt(u, f),
        }
    }
}

impl From<Version> for Constraint {
    fn from(version: Version) -> Self {
        Self::Version(version)
    }
}

// Constraints serialize as their manifest spelling and deserialize through
// the same classification as `Constraint::parse`. Serializing a union panics
// via Display: unions must never reach recorded state.
impl Serialize for Constraint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Constraint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Constraint::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// One end of a version range, with inclusivity.
#[derive(Debug, Clone)]
struct RangeBound {
    version: SemVersion,
    inclusive: bool,
}

impl RangeBound {
    fn inclusive(version: SemVersion) -> Self {
        Self { version, inclusive: true }
    }

    fn exclusive(version: SemVersion) -> Self {
        Self { version, inclusive: false }
    }
}

/// Conservative disjointness test over the union of both comparator lists.
///
/// Computes the tightest implied lower and upper bounds across every
/// comparator of both requirements. If the lower bound exceeds the upper
/// bound (or meets it without both ends inclusive), no version can satisfy
/// the conjunction. "False" means "not provably disjoint", not "satisfiable".
fn reqs_are_disjoint(a: &VersionReq, b: &VersionReq) -> bool {
    let mut lower: Option<RangeBound> = None;
    let mut upper: Option<RangeBound> = None;

    for comp in a.comparators.iter().chain(&b.comparators) {
        let (lo, hi) = comparator_bounds(comp);
        if let Some(lo) = lo {
            lower = Some(match lower {
                Some(cur) => tighter_lower(cur, lo),
                None => lo,
            });
        }
        if let Some(hi) = hi {
            upper = Some(match upper {
                Some(cur) => tighter_upper(cur, hi),
                None => hi,
            });
        }
    }

    match (lower, upper) {
        (Some(lo), Some(hi)) => match lo.version.cmp(&hi.version) {
            Ordering::Greater => true,
            Ordering::Equal => !(lo.inclusive && hi.inclusive),
            Ordering::Less => false,
        },
        _ => false,
    }
}

fn tighter_lower(current: RangeBound, candidate: RangeBound) -> RangeBound {
    match candidate.version.cmp(&current.version) {
        Ordering::Greater => candidate,
        Ordering::Less => current,
        // Same version: exclusive is the tighter lower bound.
        Ordering::Equal => {
            if current.inclusive {
                candidate
            } else {
                current
            }
        }
    }
}

fn tighter_upper(current: RangeBound, candidate: RangeBound) -> RangeBound {
    match candidate.version.cmp(&current.version) {
        Ordering::Less => candidate,
        Ordering::Greater => current,
        Ordering::Equal => {
            if current.inclusive {
                candidate
            } else {
                current
            }
        }
    }
}

/// The (lower, upper) bounds a single comparator implies, where computable.
fn comparator_bounds(comp: &Comparator) -> (Option<RangeBound>, Option<RangeBound>) {
    let base = SemVersion {
        major: comp.major,
        minor: comp.minor.unwrap_or(0),
        patch: comp.patch.unwrap_or(0),
        pre: comp.pre.clone(),
        build: BuildMetadata::EMPTY,
    };
    let next_major = SemVersion::new(comp.major + 1, 0, 0);
    let next_minor = comp.minor.map(|minor| SemVersion::new(comp.major, minor + 1, 0));

    match comp.op {
        Op::Exact => match (comp.minor, comp.patch) {
            (Some(_), Some(_)) => {
                (Some(RangeBound::inclusive(base.clone())), Some(RangeBound::inclusive(base)))
            }
            (Some(_), None) => (
                Some(RangeBound::inclusive(base)),
                next_minor.map(RangeBound::exclusive),
            ),
            _ => (Some(RangeBound::inclusive(base)), Some(RangeBound::exclusive(next_major))),
        },
        Op::Greater => match (comp.minor, comp.patch) {
            (Some(_), Some(_)) => (Some(RangeBound::exclusive(base)), None),
            (Some(_), None) => (next_minor.map(RangeBound::inclusive), None),
            _ => (Some(RangeBound::inclusive(next_major)), None),
        },
        Op::GreaterEq => (Some(RangeBound::inclusive(base)), None),
        Op::Less => (None, Some(RangeBound::exclusive(base))),
        Op::LessEq => match (comp.minor, comp.patch) {
            (Some(_), Some(_)) => (None, Some(RangeBound::inclusive(base))),
            (Some(_), None) => (None, next_minor.map(RangeBound::exclusive)),
            _ => (None, Some(RangeBound::exclusive(next_major))),
        },
        Op::Tilde => match comp.minor {
            Some(_) => (
                Some(RangeBound::inclusive(base)),
                next_minor.map(RangeBound::exclusive),
            ),
            None => (Some(RangeBound::inclusive(base)), Some(RangeBound::exclusive(next_major))),
        },
        Op::Caret => caret_bounds(comp, base, next_major),
        Op::Wildcard => match comp.minor {
            Some(_) => (
                Some(RangeBound::inclusive(base)),
                next_minor.map(RangeBound::exclusive),
            ),
            None => (Some(RangeBound::inclusive(base)), Some(RangeBound::exclusive(next_major))),
        },
        // Comparator ops are non-exhaustive; unknown ops contribute nothing.
        _ => (None, None),
    }
}

fn caret_bounds(
    comp: &Comparator,
    base: SemVersion,
    next_major: SemVersion,
) -> (Option<RangeBound>, Option<RangeBound>) {
    if comp.major > 0 {
        return (Some(RangeBound::inclusive(base)), Some(RangeBound::exclusive(next_major)));
    }

    match (comp.minor, comp.patch) {
        // ^0.m.p and ^0.m with m > 0 stay within the minor series.
        (Some(minor), _) if minor > 0 => (
            Some(RangeBound::inclusive(base)),
            Some(RangeBound::exclusive(SemVersion::new(0, minor + 1, 0))),
        ),
        // ^0.0.p admits exactly that patch series.
        (Some(0), Some(patch)) => (
            Some(RangeBound::inclusive(base)),
            Some(RangeBound::exclusive(SemVersion::new(0, 0, patch + 1))),
        ),
        // ^0.0 admits 0.0.x.
        (Some(0), None) => (
            Some(RangeBound::inclusive(base)),
            Some(RangeBound::exclusive(SemVersion::new(0, 1, 0))),
        ),
        // ^0 admits all of 0.x.y.
        _ => (Some(RangeBound::inclusive(base)), Some(RangeBound::exclusive(next_major))),
    }
}
