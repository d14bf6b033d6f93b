//! Per-solve resolution machinery.
//!
//! The solver never talks to a [`SourceManager`](crate::source::SourceManager)
//! directly. It goes through a [`SourceAdapter`], which exists for exactly
//! one solve run and adds three things the raw source layer does not have:
//!
//! 1. **A solve-local cache** of version lists, sorted in the direction the
//!    run prefers (newest-first for upgrades, oldest-first for downgrades)
//!    and frozen on first fetch, so every decision in the run sees the same
//!    ordering.
//! 2. **Identity translation** from the solver's
//!    [`ProjectIdentifier`](crate::project::ProjectIdentifier) to the source
//!    layer's single-name keys.
//! 3. **Authoritative constraint operations**: match, overlap, and
//!    intersection checks that chase revision aliases through the cached
//!    version list when the cheap local checks come up empty.

pub mod adapter;

pub use adapter::SourceAdapter;
