//! The per-solve source manager adapter.
//!
//! `SourceAdapter` wraps a [`SourceManager`] for the duration of one solve
//! run. Alongside caching and identity translation (see the
//! [module docs](crate::resolver)), it is the authority on whether two
//! constraint-like values are compatible: where the local operations on
//! [`Constraint`] answer only from what the operands carry, the adapter can
//! pair symbolic versions with their underlying revisions via the project's
//! version list and retry, so that *every* route to a match is considered -
//! including ones not literally encoded in the inputs.
//!
//! # Matching Strategy
//!
//! Every authoritative operation is two-phase:
//!
//! 1. Run the local operation. A positive answer is final - nothing the
//!    version list could add would retract it.
//! 2. Otherwise, gather revision aliases. For [`matches`] this dispatches on
//!    the version/constraint shapes and pairs whichever side lacks revision
//!    information; for [`matches_any`] and [`intersect`] each bare-version
//!    operand is coerced to the OR-group of everything sharing its revision
//!    ([`VersionTypeUnion`]) and the local operation is re-run.
//!
//! No version is ever invented: the adapter only looks up aliases the
//! project's own version list already declares.
//!
//! [`matches`]: SourceAdapter::matches
//! [`matches_any`]: SourceAdapter::matches_any
//! [`intersect`]: SourceAdapter::intersect

use crate::core::Error;
use crate::project::{ProjectAtom, ProjectIdentifier, ProjectName};
use crate::source::{ProjectInfo, SourceManager};
use crate::version::constraint::{Constraint, VersionTypeUnion};
use crate::version::ordering::SortDirection;
use crate::version::{PairedVersion, Revision, UnpairedVersion, Version};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Solve-scoped adapter around a [`SourceManager`].
///
/// Owns the provider and a monotonic version-list cache for the lifetime of
/// one solve run. Not shareable between solves: a parallel implementation
/// must give each solve its own adapter instance, which the `&mut self`
/// receivers enforce at compile time.
pub struct SourceAdapter<S> {
    /// The underlying, adapted-to provider.
    sm: S,
    /// Sort direction for every cached version list.
    direction: SortDirection,
    /// Version lists by project key, sorted in `direction`, frozen once
    /// filled. Entries are only ever added; failed fetches leave no entry.
    version_lists: HashMap<ProjectName, Vec<Version>>,
}

impl<S: SourceManager> SourceAdapter<S> {
    /// Create an adapter for one solve run in the given direction.
    pub fn new(sm: S, direction: SortDirection) -> Self {
        Self { sm, direction, version_lists: HashMap::new() }
    }

    /// The direction this solve sorts candidate lists in.
    #[must_use]
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// The wrapped provider.
    #[must_use]
    pub fn source_manager(&self) -> &S {
        &self.sm
    }

    /// Manifest and lock data for a project pinned to a specific version.
    ///
    /// # Errors
    ///
    /// Surfaces the provider's failure verbatim.
    pub fn project_info(&mut self, atom: &ProjectAtom) -> Result<ProjectInfo, Error> {
        self.sm.get_project_info(atom.ident.key(), &atom.version)
    }

    /// The project's versions, sorted for this solve's direction.
    ///
    /// The first successful fetch is cached; all later calls (and every
    /// pairing operation) see the identical list, which keeps "first match"
    /// answers deterministic for the whole run. A failed fetch is not
    /// cached, so the next call retries cleanly.
    ///
    /// # Errors
    ///
    /// Surfaces the provider's failure verbatim.
    pub fn list_versions(&mut self, id: &ProjectIdentifier) -> Result<&[Version], Error> {
        let key = id.key();
        if !self.version_lists.contains_key(key) {
            let mut list = self.sm.list_versions(key)?;
            self.direction.sort(&mut list);
            debug!(
                target: "resolver",
                project = %key,
                count = list.len(),
                direction = ?self.direction,
                "cached sorted version list"
            );
            self.version_lists.insert(key.clone(), list);
        }

        Ok(self.version_lists[key].as_slice())
    }

    /// Whether the project's upstream repository is reachable.
    ///
    /// # Errors
    ///
    /// Surfaces the provider's failure verbatim.
    pub fn repo_exists(&mut self, id: &ProjectIdentifier) -> Result<bool, Error> {
        self.sm.repo_exists(id.key())
    }

    /// Whether vendored code for the project already exists locally.
    ///
    /// # Errors
    ///
    /// Surfaces the provider's failure verbatim.
    pub fn vendor_code_exists(&mut self, id: &ProjectIdentifier) -> Result<bool, Error> {
        self.sm.vendor_code_exists(id.key())
    }

    /// Resolve a symbolic version to its revision-paired form.
    ///
    /// Scans the cached list front to back and returns the first paired
    /// version whose symbolic part matches; the frozen list order makes the
    /// answer stable across the run. Returns `None` when no pairing exists
    /// or the list cannot be fetched - the caller is testing a hypothesis,
    /// and "no answer" simply fails to prove it.
    pub fn pair_version(
        &mut self,
        id: &ProjectIdentifier,
        uv: &UnpairedVersion,
    ) -> Option<PairedVersion> {
        let list = match self.list_versions(id) {
            Ok(list) => list,
            Err(err) => {
                debug!(
                    target: "resolver",
                    project = %id.key(),
                    error = %err,
                    "version list unavailable, cannot pair symbolic version"
                );
                return None;
            }
        };

        list.iter().find_map(|candidate| match candidate {
            Version::Paired(pv) if pv.unpaired() == uv => Some(pv.clone()),
            _ => None,
        })
    }

    /// Every known alias of a revision: the revision itself, then each
    /// paired version in the cached list that points at it, in list order.
    ///
    /// On a failed list fetch the aliases degrade to the bare revision
    /// alone; the error is not propagated for the same reason as
    /// [`pair_version`](Self::pair_version).
    pub fn pair_revision(&mut self, id: &ProjectIdentifier, revision: &Revision) -> Vec<Version> {
        let mut aliases = vec![Version::Revision(revision.clone())];

        let list = match self.list_versions(id) {
            Ok(list) => list,
            Err(err) => {
                debug!(
                    target: "resolver",
                    project = %id.key(),
                    error = %err,
                    "version list unavailable, revision pairs with nothing"
                );
                return aliases;
            }
        };

        aliases.extend(list.iter().filter(|candidate| {
            matches!(candidate, Version::Paired(pv) if pv.underlying() == revision)
        }).cloned());

        aliases
    }

    /// Authoritative match check between a constraint and a version.
    ///
    /// Tries the local check first; when it fails, the only remaining routes
    /// to a match run through revision pairing, and the dispatch below
    /// tries exactly the routes that can still succeed for each shape
    /// combination. Everything else is authoritatively false.
    ///
    /// # Panics
    ///
    /// Panics when handed a [`Constraint::Union`]: unions never cross this
    /// boundary from outside.
    pub fn matches(&mut self, id: &ProjectIdentifier, c: &Constraint, v: &Version) -> bool {
        reject_union(c);

        if c.matches(v) {
            return true;
        }

        trace!(
            target: "resolver",
            project = %id.key(),
            constraint = %c,
            version = %v,
            kind = c.type_name(),
            "local match failed, consulting revision pairs"
        );

        match v {
            Version::Paired(pv) => match c {
                // Fully revision-informed on both sides: the local check was
                // already authoritative.
                Constraint::None
                | Constraint::Version(Version::Paired(_) | Version::Revision(_)) => false,
                // A paired version and an unpaired constraint can only agree
                // by sharing an underlying revision.
                Constraint::Version(Version::Unpaired(uc)) => self
                    .pair_version(id, uc)
                    .is_some_and(|pc| Version::Paired(pc).matches(v)),
                // Some other version at this revision may satisfy the range.
                Constraint::Semver(_) => {
                    self.pair_revision(id, pv.underlying()).iter().any(|alias| c.matches(alias))
                }
                Constraint::Any => unreachable!("any-constraint matches on the local fast path"),
                Constraint::Union(_) => unreachable!("unions rejected at entry"),
            },

            Version::Revision(r) => match c {
                Constraint::None
                | Constraint::Version(Version::Paired(_) | Version::Revision(_)) => false,
                Constraint::Version(Version::Unpaired(uc)) => self
                    .pair_version(id, uc)
                    .is_some_and(|pc| Version::Paired(pc).matches(v)),
                Constraint::Semver(_) => {
                    self.pair_revision(id, r).iter().any(|alias| c.matches(alias))
                }
                Constraint::Any => unreachable!("any-constraint matches on the local fast path"),
                Constraint::Union(_) => unreachable!("unions rejected at entry"),
            },

            // An unpaired version on the input side has the widest field of
            // pairing routes; it is also the shape the solver hands us least.
            Version::Unpaired(uv) => match c {
                Constraint::None => false,
                // Pair the version and compare against the revision-informed
                // constraint.
                Constraint::Version(Version::Paired(_) | Version::Revision(_)) => self
                    .pair_version(id, uv)
                    .is_some_and(|pv| c.matches(&Version::Paired(pv))),
                // Both symbolic: they agree only if they pair to the same
                // underlying revision.
                Constraint::Version(Version::Unpaired(uc)) => {
                    let Some(pv) = self.pair_version(id, uv) else {
                        return false;
                    };
                    let Some(pc) = self.pair_version(id, uc) else {
                        return false;
                    };
                    Version::Paired(pc).matches(&Version::Paired(pv))
                }
                // A range can never match the symbolic name directly, but
                // another version at the same revision might satisfy it.
                Constraint::Semver(_) => {
                    let Some(pv) = self.pair_version(id, uv) else {
                        return false;
                    };
                    self.pair_revision(id, pv.underlying()).iter().any(|alias| c.matches(alias))
                }
                Constraint::Any => unreachable!("any-constraint matches on the local fast path"),
                Constraint::Union(_) => unreachable!("unions rejected at entry"),
            },
        }
    }

    /// Authoritative overlap check between two constraints.
    ///
    /// Commutative. Tries the local check, then coerces each bare-version
    /// operand into its revision-alias OR-group and retries once.
    ///
    /// # Panics
    ///
    /// Panics when handed a [`Constraint::Union`].
    pub fn matches_any(
        &mut self,
        id: &ProjectIdentifier,
        c1: &Constraint,
        c2: &Constraint,
    ) -> bool {
        reject_union(c1);
        reject_union(c2);

        if c1.matches_any(c2) {
            return true;
        }

        // Slightly wasteful when only one operand is a version, but far
        // simpler to reason about than routing each combination separately.
        let u1 = self.alias_coerce(id, c1);
        let u2 = self.alias_coerce(id, c2);
        u1.matches_any(&u2)
    }

    /// Authoritative intersection of two constraints.
    ///
    /// Commutative as a set operation. A non-`None` local answer is final;
    /// otherwise both operands are alias-coerced and intersected again.
    /// [`Constraint::None`] remains the only incompatibility sentinel.
    ///
    /// # Panics
    ///
    /// Panics when handed a [`Constraint::Union`].
    pub fn intersect(
        &mut self,
        id: &ProjectIdentifier,
        c1: &Constraint,
        c2: &Constraint,
    ) -> Constraint {
        reject_union(c1);
        reject_union(c2);

        let local = c1.intersect(c2);
        if !local.is_none() {
            return local;
        }

        let u1 = self.alias_coerce(id, c1);
        let u2 = self.alias_coerce(id, c2);
        u1.intersect(&u2)
    }

    /// Coerce a bare version into its [`VersionTypeUnion`]; other
    /// constraints pass through unchanged.
    fn alias_coerce(&mut self, id: &ProjectIdentifier, c: &Constraint) -> Constraint {
        match c {
            Constraint::Version(v) => Constraint::Union(self.union_for(id, v)),
            _ => c.clone(),
        }
    }

    /// The OR-group of versions equivalent to `v` within this solve.
    ///
    /// Typically just the version plus its underlying revision, but every
    /// tag or branch pointing at the same revision joins the group. An
    /// unpaired version that cannot be paired forms a singleton group,
    /// which keeps the subsequent local checks exactly as strong as the
    /// information available.
    fn union_for(&mut self, id: &ProjectIdentifier, v: &Version) -> VersionTypeUnion {
        match v {
            Version::Revision(r) => VersionTypeUnion::new(self.pair_revision(id, r)),
            Version::Paired(pv) => VersionTypeUnion::new(self.pair_revision(id, pv.underlying())),
            Version::Unpaired(uv) => match self.pair_version(id, uv) {
                Some(pv) => {
                    let revision = pv.underlying().clone();
                    VersionTypeUnion::new(self.pair_revision(id, &revision))
                }
                None => VersionTypeUnion::new(vec![v.clone()]),
            },
        }
    }
}

/// Public-boundary guard: unions are created by the adapter, never accepted
/// by it.
fn reject_union(c: &Constraint) {
    assert!(
        !matches!(c, Constraint::Union(_)),
        "version unions are solver-internal and must never cross the adapter boundary"
    );
}
