//! Error handling for the carton solver core.
//!
//! The crate distinguishes three failure classes, and only the first one is
//! represented by [`Error`]:
//!
//! 1. **Provider failures** - the underlying [`crate::source::SourceManager`]
//!    could not answer (network, VCS, auth). These surface verbatim through
//!    the adapter operations that need a definitive answer
//!    (`list_versions`, `project_info`, `repo_exists`, `vendor_code_exists`).
//! 2. **Negative answers** - "these constraints are incompatible" is not an
//!    error. It is a `false` from a match operation or a
//!    [`Constraint::None`](crate::version::constraint::Constraint::None)
//!    from an intersection.
//! 3. **Broken invariants** - solver-internal values escaping the solver, or
//!    dispatch arms that are unreachable by construction. These panic: they
//!    indicate a programmer error, not a recoverable condition.
//!
//! Pairing helpers deliberately swallow class-1 errors and report "no
//! answer": their callers are testing a hypothesis, and a missing version
//! list simply means the hypothesis cannot be proven.

use crate::project::ProjectName;
use thiserror::Error as ThisError;

/// The error type for fallible carton solver operations.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The underlying source manager failed to answer a query.
    ///
    /// Carries the project the query was about and the provider's own error
    /// as the cause chain. The solver decides whether to retry the query or
    /// abort the solve; the adapter never caches these failures.
    #[error("source manager failure for project '{name}'")]
    Source {
        /// Key of the project the failed query was about.
        name: ProjectName,
        /// The provider's underlying failure.
        #[source]
        source: anyhow::Error,
    },

    /// A constraint string could not be parsed.
    #[error("invalid version constraint '{input}': {reason}")]
    InvalidConstraint {
        /// The offending input, verbatim.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A project identifier carried no usable name.
    ///
    /// Identifiers must have a non-empty local name, a non-empty network
    /// name, or both.
    #[error("project identifier must carry at least one non-empty name")]
    EmptyProjectIdentifier,
}

impl Error {
    /// Wrap a provider failure for the given project key.
    pub fn source_failure(name: &ProjectName, source: impl Into<anyhow::Error>) -> Self {
        Self::Source { name: name.clone(), source: source.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_failure_carries_project_and_cause() {
        let name = ProjectName::from("github.com/example/dep");
        let err = Error::source_failure(&name, anyhow::anyhow!("connection reset"));

        let message = err.to_string();
        assert!(message.contains("github.com/example/dep"));

        let cause = std::error::Error::source(&err).expect("cause retained");
        assert!(cause.to_string().contains("connection reset"));
    }

    #[test]
    fn invalid_constraint_reports_input() {
        let err = Error::InvalidConstraint {
            input: "^not-a-version".to_string(),
            reason: "unexpected character".to_string(),
        };
        assert!(err.to_string().contains("^not-a-version"));
    }
}
