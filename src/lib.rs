//! Carton - version solver core for Git-backed vendored dependencies
//!
//! This crate is the constraint-matching heart of the carton dependency
//! manager. Given a root project with declared dependency constraints, the
//! enclosing manager resolves a consistent set of concrete project versions to
//! place in a vendor directory. The manager's solver links against this crate
//! for the part that is genuinely hard: deciding, authoritatively, whether a
//! constraint matches a version when the two may name the same underlying
//! commit through indirect aliases (tags, branches, semver ranges, bare
//! revisions).
//!
//! # Architecture Overview
//!
//! The crate is organized around five tightly-coupled pieces:
//!
//! - [`project`] - Project identity: the solver-side [`project::ProjectIdentifier`]
//!   (local name plus optional network name) and its translation to the single
//!   [`project::ProjectName`] the source layer traffics in
//! - [`version`] - The version taxonomy (revisions, branches, tags, semver
//!   tags, and revision-paired forms), the constraint algebra, and the
//!   direction-aware ordering used to rank candidates
//! - [`source`] - The [`source::SourceManager`] trait, the crate's only
//!   dependency on the outside world, plus the manifest/lock data it returns
//! - [`resolver`] - The per-solve [`resolver::SourceAdapter`]: version-list
//!   caching, sorted in the solve direction, and the authoritative
//!   match/intersect operations built on revision pairing
//! - [`core`] - Error types shared across the crate
//!
//! # How a Solve Uses This Crate
//!
//! The solver holds one [`resolver::SourceAdapter`] for the duration of a
//! solve run. Candidate versions for a project are fetched once through the
//! adapter, sorted for the run's direction (prefer-newest for upgrades,
//! prefer-oldest for downgrades), and cached. Constraint checks first try the
//! cheap local test; only ambiguous cases consult the cached version list to
//! pair symbolic versions with their underlying revisions and retry.
//!
//! ```rust,no_run
//! use carton::project::ProjectIdentifier;
//! use carton::resolver::SourceAdapter;
//! use carton::test_utils::StubSourceManager;
//! use carton::version::constraint::Constraint;
//! use carton::version::ordering::SortDirection;
//! use carton::version::Version;
//!
//! let sm = StubSourceManager::new();
//! let mut adapter = SourceAdapter::new(sm, SortDirection::Upgrade);
//!
//! let id = ProjectIdentifier::new("github.com/example/dep");
//! let constraint = Constraint::parse("^1.0.0")?;
//! let candidate = Version::revision("abc123def456");
//!
//! // Authoritative: true when some tag at that revision satisfies the range.
//! let compatible = adapter.matches(&id, &constraint, &candidate);
//! # Ok::<(), carton::core::Error>(())
//! ```
//!
//! # Scope
//!
//! VCS fetching, lockfile serialization, CLI dispatch, and vendor-directory
//! export live in the enclosing manager. They reach this crate only through
//! the [`source::SourceManager`] boundary.

pub mod core;
pub mod project;
pub mod resolver;
pub mod source;
pub mod test_utils;
pub mod version;
