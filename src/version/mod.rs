//! Version taxonomy for Git-backed dependencies.
//!
//! Everything the solver can pin a project to is a [`Version`], a tagged
//! union over four concrete shapes:
//!
//! - [`Revision`] - an opaque immutable commit identifier. The only form
//!   that is always authoritatively comparable on its own.
//! - [`UnpairedVersion`] - a symbolic name whose underlying revision is not
//!   (yet) known: a branch, a plain tag, or a tag that parses as a semantic
//!   version.
//! - [`PairedVersion`] - a symbolic name that *has* been resolved to its
//!   current underlying revision.
//!
//! Pairing is what makes constraint checks authoritative: `v1.2.0` and a
//! bare revision can only be proven equivalent by discovering that the tag
//! currently points at that revision. The resolver's adapter performs that
//! discovery; this module provides the value types and their local (cheap,
//! non-consulting) matching rules.
//!
//! # Tag Classification
//!
//! [`Version::from_tag`] decides whether a tag is semantic: a tag parses as
//! semver after an optional `v`/`V` prefix is stripped (`v1.2.0` and `1.2.0`
//! name the same version). Tags that do not parse stay [`UnpairedVersion::Plain`].
//! Two semver tags are the *same version* when their parsed forms agree,
//! regardless of prefix spelling.

use semver::Version as SemVersion;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

pub mod constraint;
pub mod ordering;

/// An opaque immutable commit identifier.
///
/// Revisions are never interpreted: equal strings are the same commit,
/// unequal strings are not. Abbreviated and full forms of the same commit
/// are therefore *different* revisions at this layer; the enclosing manager
/// canonicalizes before handing revisions to the solver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(String);

impl Revision {
    /// Create a revision from a commit identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The commit identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Revision {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A symbolic version whose underlying revision has not been resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum UnpairedVersion {
    /// A branch name. Branches float: the revision a branch names can change
    /// between solves.
    Branch(String),
    /// A tag that does not parse as a semantic version.
    Plain(String),
    /// A tag that parses as a semantic version. The original tag spelling is
    /// retained for display; identity is the parsed version.
    Semver {
        /// The tag exactly as it appears in the repository (e.g. `v1.2.0`).
        tag: String,
        /// The parsed semantic version.
        version: SemVersion,
    },
}

impl UnpairedVersion {
    /// Create a branch version.
    pub fn branch(name: impl Into<String>) -> Self {
        Self::Branch(name.into())
    }

    /// Classify a tag: semver if it parses (with an optional `v`/`V`
    /// prefix), plain otherwise.
    pub fn from_tag(tag: &str) -> Self {
        match parse_semver_tag(tag) {
            Some(version) => Self::Semver { tag: tag.to_string(), version },
            None => Self::Plain(tag.to_string()),
        }
    }

    /// The symbolic name as written (branch name or tag spelling).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Branch(name) | Self::Plain(name) => name,
            Self::Semver { tag, .. } => tag,
        }
    }

    /// The parsed semantic version, for semver tags.
    #[must_use]
    pub fn semver(&self) -> Option<&SemVersion> {
        match self {
            Self::Semver { version, .. } => Some(version),
            _ => None,
        }
    }

    /// Pair this symbolic version with the revision it currently names.
    #[must_use]
    pub fn pair(self, revision: Revision) -> PairedVersion {
        PairedVersion { unpaired: self, revision }
    }
}

// Semver tags are identified by their parsed version, not their spelling:
// "v1.2.0" and "1.2.0" are the same version. Hash must agree with Eq, so
// both are implemented by hand.
impl PartialEq for UnpairedVersion {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Branch(a), Self::Branch(b)) | (Self::Plain(a), Self::Plain(b)) => a == b,
            (Self::Semver { version: a, .. }, Self::Semver { version: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl Eq for UnpairedVersion {}

impl Hash for UnpairedVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Branch(name) => {
                0u8.hash(state);
                name.hash(state);
            }
            Self::Plain(name) => {
                1u8.hash(state);
                name.hash(state);
            }
            Self::Semver { version, .. } => {
                2u8.hash(state);
                version.hash(state);
            }
        }
    }
}

impl fmt::Display for UnpairedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A symbolic version resolved to its current underlying revision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairedVersion {
    unpaired: UnpairedVersion,
    revision: Revision,
}

impl PairedVersion {
    /// Pair a symbolic version with a revision.
    pub fn new(unpaired: UnpairedVersion, revision: Revision) -> Self {
        Self { unpaired, revision }
    }

    /// The symbolic part of the pair.
    #[must_use]
    pub fn unpaired(&self) -> &UnpairedVersion {
        &self.unpaired
    }

    /// The revision the symbolic name currently points at.
    #[must_use]
    pub fn underlying(&self) -> &Revision {
        &self.revision
    }
}

impl fmt::Display for PairedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The symbolic form is the user-meaningful one; the revision is an
        // implementation detail of the current solve.
        fmt::Display::fmt(&self.unpaired, f)
    }
}

/// Any version the solver can consider for a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Version {
    /// A bare commit revision.
    Revision(Revision),
    /// A symbolic name without revision information.
    Unpaired(UnpairedVersion),
    /// A symbolic name resolved to its revision.
    Paired(PairedVersion),
}

impl Version {
    /// A bare revision version.
    pub fn revision(id: impl Into<String>) -> Self {
        Self::Revision(Revision::new(id))
    }

    /// A branch version.
    pub fn branch(name: impl Into<String>) -> Self {
        Self::Unpaired(UnpairedVersion::branch(name))
    }

    /// Classify a tag as a semver or plain version. See
    /// [`UnpairedVersion::from_tag`].
    pub fn from_tag(tag: &str) -> Self {
        Self::Unpaired(UnpairedVersion::from_tag(tag))
    }

    /// The parsed semantic version carried by this version, if any.
    ///
    /// Both unpaired and paired semver tags answer here; branches, plain
    /// tags, and bare revisions have none.
    #[must_use]
    pub fn semver(&self) -> Option<&SemVersion> {
        match self {
            Self::Unpaired(uv) => uv.semver(),
            Self::Paired(pv) => pv.unpaired().semver(),
            Self::Revision(_) => None,
        }
    }

    /// The symbolic part of this version: the version itself for unpaired
    /// forms, the embedded symbolic name for paired forms, and `None` for
    /// bare revisions.
    #[must_use]
    pub fn unpaired_part(&self) -> Option<&UnpairedVersion> {
        match self {
            Self::Unpaired(uv) => Some(uv),
            Self::Paired(pv) => Some(pv.unpaired()),
            Self::Revision(_) => None,
        }
    }

    /// Local aliasing test: do these two versions name the same thing given
    /// only the information they carry?
    ///
    /// Two paired versions alias when their underlying revisions agree, even
    /// if one is a tag and the other a branch. A bare revision aliases a
    /// paired version pointing at it. Symbolic forms without revision
    /// information alias only on symbolic equality. Anything this test
    /// cannot prove may still be proven by the resolver's adapter, which can
    /// consult the project's version list to pair the symbolic operand.
    #[must_use]
    pub fn matches(&self, other: &Version) -> bool {
        match (self, other) {
            (Self::Revision(a), Self::Revision(b)) => a == b,
            (Self::Revision(r), Self::Paired(p)) | (Self::Paired(p), Self::Revision(r)) => {
                p.underlying() == r
            }
            (Self::Revision(_), Self::Unpaired(_)) | (Self::Unpaired(_), Self::Revision(_)) => {
                false
            }
            (Self::Unpaired(a), Self::Unpaired(b)) => a == b,
            (Self::Unpaired(u), Self::Paired(p)) | (Self::Paired(p), Self::Unpaired(u)) => {
                p.unpaired() == u
            }
            (Self::Paired(a), Self::Paired(b)) => a.underlying() == b.underlying(),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Revision(r) => fmt::Display::fmt(r, f),
            Self::Unpaired(uv) => fmt::Display::fmt(uv, f),
            Self::Paired(pv) => fmt::Display::fmt(pv, f),
        }
    }
}

impl From<Revision> for Version {
    fn from(revision: Revision) -> Self {
        Self::Revision(revision)
    }
}

impl From<UnpairedVersion> for Version {
    fn from(unpaired: UnpairedVersion) -> Self {
        Self::Unpaired(unpaired)
    }
}

impl From<PairedVersion> for Version {
    fn from(paired: PairedVersion) -> Self {
        Self::Paired(paired)
    }
}

/// Parse a tag as a semantic version, tolerating a `v`/`V` prefix.
///
/// Returns `None` for tags that are not semantic versions.
#[must_use]
pub fn parse_semver_tag(tag: &str) -> Option<SemVersion> {
    let cleaned = tag.strip_prefix(['v', 'V']).unwrap_or(tag);
    SemVersion::parse(cleaned).ok()
}
