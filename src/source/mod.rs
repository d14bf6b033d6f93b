//! The source boundary: where the solver meets the outside world.
//!
//! Everything the solver knows about real repositories arrives through the
//! [`SourceManager`] trait: which versions a project has, whether its
//! repository is reachable, whether vendored code for it already exists, and
//! the manifest/lock data attached to a specific version. Implementations
//! live in the enclosing manager (backed by a clone cache, network fetches,
//! and a cross-solve system lock); this crate only consumes the trait.
//!
//! Source managers deal in [`ProjectName`] - the single globally-unique
//! string form of identity. The richer solver-side
//! [`ProjectIdentifier`](crate::project::ProjectIdentifier) never crosses
//! this boundary; the resolver's adapter translates before every call.
//!
//! Calls are synchronous: a provider is free to block on network or VCS
//! work, and the single-threaded solve absorbs that wait. Providers decide
//! their own caching; the adapter adds its own per-solve, direction-sorted
//! layer on top regardless.

use crate::core::Error;
use crate::project::{ProjectIdentifier, ProjectName};
use crate::version::constraint::Constraint;
use crate::version::Version;
use serde::{Deserialize, Serialize};

/// Provider of project version lists and project metadata.
///
/// The resolver's only dependency on the outside world. Version lists may be
/// returned in any order; the adapter sorts them for the solve direction.
/// Within one solve a provider should answer [`list_versions`] consistently
/// for a given name, since the adapter caches the first successful answer.
///
/// [`list_versions`]: SourceManager::list_versions
pub trait SourceManager {
    /// The manifest and lock data of a project at a specific version.
    fn get_project_info(
        &mut self,
        name: &ProjectName,
        version: &Version,
    ) -> Result<ProjectInfo, Error>;

    /// All versions the project's repository offers: tags, branches, and
    /// revision-paired forms where the provider already knows the pairing.
    fn list_versions(&mut self, name: &ProjectName) -> Result<Vec<Version>, Error>;

    /// Whether the project's upstream repository exists and is reachable.
    fn repo_exists(&mut self, name: &ProjectName) -> Result<bool, Error>;

    /// Whether vendored code for the project is already present locally.
    fn vendor_code_exists(&mut self, name: &ProjectName) -> Result<bool, Error>;
}

/// Manifest and lock data for a project at one version.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInfo {
    /// The project's declared dependencies at this version.
    pub manifest: Manifest,
    /// The project's own lock data, when it ships one.
    pub lock: Option<Lock>,
}

/// A single declared dependency: who, and what versions of them are
/// acceptable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDep {
    /// The depended-upon project.
    pub ident: ProjectIdentifier,
    /// Acceptable versions of it.
    pub constraint: Constraint,
}

/// The dependency declarations of one project at one version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// The declaring project's own name.
    pub name: ProjectName,
    /// Dependencies needed to build the project.
    pub dependencies: Vec<ProjectDep>,
    /// Additional dependencies needed only to develop or test it.
    pub dev_dependencies: Vec<ProjectDep>,
}

impl Manifest {
    /// A manifest with no dependencies.
    pub fn new(name: impl Into<ProjectName>) -> Self {
        Self { name: name.into(), dependencies: Vec::new(), dev_dependencies: Vec::new() }
    }

    /// Both dependency lists, build dependencies first.
    pub fn all_dependencies(&self) -> impl Iterator<Item = &ProjectDep> {
        self.dependencies.iter().chain(&self.dev_dependencies)
    }
}

/// A project pinned by a lock: the exact version a previous solve chose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockedProject {
    /// Which project.
    pub ident: ProjectIdentifier,
    /// The pinned version.
    pub version: Version,
}

/// The pinned outcome of a previous solve, as shipped by a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lock {
    /// All pinned projects.
    pub projects: Vec<LockedProject>,
}

impl Lock {
    /// Look up a pin by the project's source-layer key.
    #[must_use]
    pub fn project(&self, key: &ProjectName) -> Option<&LockedProject> {
        self.projects.iter().find(|locked| locked.ident.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_iterates_all_dependencies_in_declaration_order() {
        let mut manifest = Manifest::new("github.com/example/app");
        manifest.dependencies.push(ProjectDep {
            ident: ProjectIdentifier::new("github.com/example/dep"),
            constraint: Constraint::parse("^1.0.0").unwrap(),
        });
        manifest.dev_dependencies.push(ProjectDep {
            ident: ProjectIdentifier::new("github.com/example/testlib"),
            constraint: Constraint::parse("master").unwrap(),
        });

        let names: Vec<_> =
            manifest.all_dependencies().map(|dep| dep.ident.key().as_str().to_string()).collect();
        assert_eq!(names, ["github.com/example/dep", "github.com/example/testlib"]);
    }

    #[test]
    fn lock_lookup_uses_the_source_layer_key() {
        let lock = Lock {
            projects: vec![LockedProject {
                ident: ProjectIdentifier::with_network_name("dep", "github.com/example/dep"),
                version: Version::from_tag("v1.2.0"),
            }],
        };

        let key = ProjectName::from("github.com/example/dep");
        assert!(lock.project(&key).is_some());
        assert!(lock.project(&ProjectName::from("dep")).is_none());
    }

    #[test]
    fn manifest_serializes_with_constraint_spellings() {
        let manifest = Manifest {
            name: ProjectName::from("github.com/example/app"),
            dependencies: vec![ProjectDep {
                ident: ProjectIdentifier::new("github.com/example/dep"),
                constraint: Constraint::parse(">=1.0.0, <2.0.0").unwrap(),
            }],
            dev_dependencies: Vec::new(),
        };

        let json = serde_json::to_string(&manifest).unwrap();
        assert!(json.contains(">=1.0.0, <2.0.0"));
        let back: Manifest = serde_json::from_str(&json).unwrap();
        assert_eq!(manifest, back);
    }
}
