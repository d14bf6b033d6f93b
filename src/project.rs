//! Project identity types.
//!
//! The solver and the source layer deliberately use different notions of
//! identity. The source layer deals exclusively in [`ProjectName`]: a single
//! globally-unique string (typically an import path such as
//! `github.com/example/dep`). The solver deals in [`ProjectIdentifier`],
//! which additionally records how a project is referred to *inside* manifests
//! - a name that may be project-relative and need not match the network name.
//!
//! Keeping the two apart means all the complexity of deciding what a name
//! "means" stays inside the solver, while the source layer traffics only in
//! network names. The translation point is [`ProjectIdentifier::key`].

use crate::core::Error;
use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The single-string project identity used by the source layer.
///
/// A `ProjectName` is opaque to this crate: it is a map key and a lookup
/// argument, never parsed or interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
    /// Create a project name from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the name is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for ProjectName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// The solver-side project identity: a local name plus an optional network
/// name.
///
/// - `local_name` is how the project is referred to inside manifests.
/// - `network_name`, when present, is the globally-unique remote identifier
///   the project is fetched under.
///
/// The network name takes precedence when both are present; see [`key`].
/// Invariant: at least one of the two names is non-empty. Constructors that
/// accept arbitrary input ([`from_parts`]) validate this; the infallible
/// constructors guarantee it by shape.
///
/// [`key`]: ProjectIdentifier::key
/// [`from_parts`]: ProjectIdentifier::from_parts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectIdentifier {
    /// Manifest-internal name for the project.
    pub local_name: ProjectName,
    /// Globally-unique remote identifier, when it differs from (or
    /// supplements) the local name.
    pub network_name: Option<ProjectName>,
}

impl ProjectIdentifier {
    /// Create an identifier whose local name doubles as its network identity.
    ///
    /// This is the common case: most manifests refer to dependencies by their
    /// import path directly.
    pub fn new(local_name: impl Into<ProjectName>) -> Self {
        Self { local_name: local_name.into(), network_name: None }
    }

    /// Create an identifier with distinct local and network names.
    pub fn with_network_name(
        local_name: impl Into<ProjectName>,
        network_name: impl Into<ProjectName>,
    ) -> Self {
        Self { local_name: local_name.into(), network_name: Some(network_name.into()) }
    }

    /// Build an identifier from raw manifest input, enforcing the non-empty
    /// invariant.
    ///
    /// An empty network name is normalized to `None` rather than kept as an
    /// empty string, so [`key`](Self::key) never selects an empty name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyProjectIdentifier`] if both names are empty.
    pub fn from_parts(local_name: &str, network_name: &str) -> Result<Self, Error> {
        if local_name.is_empty() && network_name.is_empty() {
            return Err(Error::EmptyProjectIdentifier);
        }

        let network_name =
            if network_name.is_empty() { None } else { Some(ProjectName::from(network_name)) };

        Ok(Self { local_name: ProjectName::from(local_name), network_name })
    }

    /// The name this identifier resolves to at the source layer.
    ///
    /// Returns the network name when present and non-empty, otherwise the
    /// local name. This is the key used both for the adapter's internal
    /// version-list cache and for every query passed through to the
    /// [`SourceManager`](crate::source::SourceManager).
    #[must_use]
    pub fn key(&self) -> &ProjectName {
        match &self.network_name {
            Some(network) if !network.is_empty() => network,
            _ => &self.local_name,
        }
    }
}

impl fmt::Display for ProjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key().as_str())
    }
}

/// A project pinned to one concrete version.
///
/// Atoms are what the solver selects: an identifier plus the exact version
/// the solve run is currently considering for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectAtom {
    /// Which project.
    pub ident: ProjectIdentifier,
    /// Which version of it.
    pub version: Version,
}

impl ProjectAtom {
    /// Pin an identifier to a version.
    pub fn new(ident: ProjectIdentifier, version: Version) -> Self {
        Self { ident, version }
    }
}

impl fmt::Display for ProjectAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.ident, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_prefers_network_name() {
        let id = ProjectIdentifier::with_network_name("dep", "github.com/example/dep");
        assert_eq!(id.key().as_str(), "github.com/example/dep");
    }

    #[test]
    fn key_falls_back_to_local_name() {
        let id = ProjectIdentifier::new("github.com/example/dep");
        assert_eq!(id.key().as_str(), "github.com/example/dep");

        // An explicitly empty network name must not win over the local name.
        let id = ProjectIdentifier {
            local_name: ProjectName::from("local"),
            network_name: Some(ProjectName::from("")),
        };
        assert_eq!(id.key().as_str(), "local");
    }

    #[test]
    fn from_parts_normalizes_empty_network_name() {
        let id = ProjectIdentifier::from_parts("local", "").unwrap();
        assert_eq!(id.network_name, None);
        assert_eq!(id.key().as_str(), "local");

        let id = ProjectIdentifier::from_parts("", "github.com/example/dep").unwrap();
        assert_eq!(id.key().as_str(), "github.com/example/dep");
    }

    #[test]
    fn from_parts_rejects_fully_empty_identifiers() {
        assert!(matches!(
            ProjectIdentifier::from_parts("", ""),
            Err(Error::EmptyProjectIdentifier)
        ));
    }

    #[test]
    fn identifier_serializes_through_serde() {
        let id = ProjectIdentifier::with_network_name("dep", "github.com/example/dep");
        let json = serde_json::to_string(&id).unwrap();
        let back: ProjectIdentifier = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
