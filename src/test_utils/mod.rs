//! Test fixtures for exercising the resolver without real repositories.
//!
//! The centerpiece is [`StubSourceManager`], an in-memory
//! [`SourceManager`](crate::source::SourceManager) with three capabilities
//! the test suites lean on:
//!
//! - **Declarative fixtures**: builder methods register projects with a
//!   fixed version list, optional project info, and vendored state.
//! - **Call counting**: every `list_versions` invocation is recorded per
//!   project, so tests can assert the adapter's caching discipline.
//! - **Failure injection**: any project can be marked unreachable, making
//!   its queries fail the way a dead remote would, and recovered later to
//!   test retry behavior.
//!
//! The module is compiled into the library proper (not behind `cfg(test)`)
//! so integration tests and downstream solvers' test suites can use the
//! same fixtures.

use crate::core::Error;
use crate::project::ProjectName;
use crate::source::{ProjectInfo, SourceManager};
use crate::version::Version;
use std::collections::{HashMap, HashSet};

/// One registered project's canned answers.
#[derive(Debug, Clone, Default)]
struct ProjectFixture {
    versions: Vec<Version>,
    info: Option<ProjectInfo>,
    vendored: bool,
}

/// In-memory [`SourceManager`] for tests.
#[derive(Debug, Default)]
pub struct StubSourceManager {
    projects: HashMap<ProjectName, ProjectFixture>,
    unreachable: HashSet<ProjectName>,
    list_calls: HashMap<ProjectName, usize>,
}

impl StubSourceManager {
    /// An empty stub: every project is unknown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project with the versions its repository offers.
    ///
    /// The list is handed to callers in exactly this order; the adapter
    /// under test is responsible for sorting.
    #[must_use]
    pub fn with_project(mut self, name: impl Into<ProjectName>, versions: Vec<Version>) -> Self {
        self.projects.entry(name.into()).or_default().versions = versions;
        self
    }

    /// Attach manifest/lock data to an already-registered (or new) project.
    #[must_use]
    pub fn with_project_info(mut self, name: impl Into<ProjectName>, info: ProjectInfo) -> Self {
        self.projects.entry(name.into()).or_default().info = Some(info);
        self
    }

    /// Mark a project's code as already vendored.
    #[must_use]
    pub fn with_vendored(mut self, name: impl Into<ProjectName>) -> Self {
        self.projects.entry(name.into()).or_default().vendored = true;
        self
    }

    /// Make every query about this project fail like a dead remote.
    pub fn set_unreachable(&mut self, name: impl Into<ProjectName>) {
        self.unreachable.insert(name.into());
    }

    /// Undo [`set_unreachable`](Self::set_unreachable).
    pub fn set_reachable(&mut self, name: impl Into<ProjectName>) {
        self.unreachable.remove(&name.into());
    }

    /// How many times `list_versions` has been invoked for this project,
    /// counting failed attempts.
    #[must_use]
    pub fn list_calls(&self, name: &ProjectName) -> usize {
        self.list_calls.get(name).copied().unwrap_or(0)
    }

    fn check_reachable(&self, name: &ProjectName) -> Result<(), Error> {
        if self.unreachable.contains(name) {
            return Err(Error::source_failure(name, anyhow::anyhow!("repository unreachable")));
        }
        Ok(())
    }

    fn fixture(&self, name: &ProjectName) -> Result<&ProjectFixture, Error> {
        self.projects
            .get(name)
            .ok_or_else(|| Error::source_failure(name, anyhow::anyhow!("unknown project")))
    }
}

impl SourceManager for StubSourceManager {
    fn get_project_info(
        &mut self,
        name: &ProjectName,
        _version: &Version,
    ) -> Result<ProjectInfo, Error> {
        self.check_reachable(name)?;
        self.fixture(name)?
            .info
            .clone()
            .ok_or_else(|| Error::source_failure(name, anyhow::anyhow!("no project info fixture")))
    }

    fn list_versions(&mut self, name: &ProjectName) -> Result<Vec<Version>, Error> {
        *self.list_calls.entry(name.clone()).or_insert(0) += 1;
        self.check_reachable(name)?;
        Ok(self.fixture(name)?.versions.clone())
    }

    fn repo_exists(&mut self, name: &ProjectName) -> Result<bool, Error> {
        self.check_reachable(name)?;
        Ok(self.projects.contains_key(name))
    }

    fn vendor_code_exists(&mut self, name: &ProjectName) -> Result<bool, Error> {
        self.check_reachable(name)?;
        Ok(self.projects.get(name).is_some_and(|fixture| fixture.vendored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Manifest;

    #[test]
    fn counts_list_calls_including_failures() {
        let name = ProjectName::from("github.com/example/dep");
        let mut sm = StubSourceManager::new().with_project(name.clone(), vec![]);

        sm.set_unreachable(name.clone());
        assert!(sm.list_versions(&name).is_err());
        sm.set_reachable(name.clone());
        assert!(sm.list_versions(&name).is_ok());

        assert_eq!(sm.list_calls(&name), 2);
    }

    #[test]
    fn unknown_projects_fail_all_queries_except_existence() {
        let name = ProjectName::from("github.com/example/ghost");
        let mut sm = StubSourceManager::new();

        assert!(sm.list_versions(&name).is_err());
        assert!(!sm.repo_exists(&name).unwrap());
        assert!(!sm.vendor_code_exists(&name).unwrap());
    }

    #[test]
    fn project_info_round_trips_through_fixture() {
        let name = ProjectName::from("github.com/example/dep");
        let info = ProjectInfo { manifest: Manifest::new(name.clone()), lock: None };
        let mut sm = StubSourceManager::new().with_project_info(name.clone(), info.clone());

        let fetched = sm.get_project_info(&name, &Version::from_tag("v1.0.0")).unwrap();
        assert_eq!(fetched, info);
    }
}
