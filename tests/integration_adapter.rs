//! End-to-end scenarios for the source adapter: revision aliasing, sort
//! direction, and the constraint algebra working together over a realistic
//! project fixture.

use carton::project::{ProjectAtom, ProjectIdentifier};
use carton::resolver::SourceAdapter;
use carton::source::{Lock, LockedProject, Manifest, ProjectDep, ProjectInfo};
use carton::test_utils::StubSourceManager;
use carton::version::constraint::Constraint;
use carton::version::ordering::SortDirection;
use carton::version::{Revision, UnpairedVersion, Version};

/// Repository fixture: tag `v1.2.0` points at revision A, branch `master`
/// at revision B, and revision A is also listed bare.
fn project_versions() -> Vec<Version> {
    let rev_a = Revision::from("aaaaaaa");
    let rev_b = Revision::from("bbbbbbb");
    vec![
        Version::from(UnpairedVersion::from_tag("v1.2.0").pair(rev_a.clone())),
        Version::from(UnpairedVersion::branch("master").pair(rev_b)),
        Version::Revision(rev_a),
    ]
}

fn adapter_for(
    id: &ProjectIdentifier,
    direction: SortDirection,
) -> SourceAdapter<StubSourceManager> {
    let sm = StubSourceManager::new().with_project(id.key().clone(), project_versions());
    SourceAdapter::new(sm, direction)
}

#[test]
fn semver_range_accepts_a_bare_revision_via_its_tag() {
    let id = ProjectIdentifier::new("github.com/example/dep");
    let mut adapter = adapter_for(&id, SortDirection::Upgrade);

    let range = Constraint::parse("^1.0.0").unwrap();
    // Revision A is not a semver version, but the tag v1.2.0 at the same
    // revision satisfies the range.
    assert!(adapter.matches(&id, &range, &Version::revision("aaaaaaa")));
    // Revision B has no tag: nothing can satisfy the range.
    assert!(!adapter.matches(&id, &range, &Version::revision("bbbbbbb")));
}

#[test]
fn branch_constraint_accepts_exactly_its_current_revision() {
    let id = ProjectIdentifier::new("github.com/example/dep");
    let mut adapter = adapter_for(&id, SortDirection::Upgrade);

    let master = Constraint::parse("master").unwrap();
    assert!(adapter.matches(&id, &master, &Version::revision("bbbbbbb")));
    assert!(!adapter.matches(&id, &master, &Version::revision("aaaaaaa")));
}

#[test]
fn matches_any_bridges_ranges_and_revisions() {
    let id = ProjectIdentifier::new("github.com/example/dep");
    let mut adapter = adapter_for(&id, SortDirection::Upgrade);

    let range = Constraint::parse("^1.0.0").unwrap();
    let revision = Constraint::parse("aaaaaaa").unwrap();

    assert!(adapter.matches_any(&id, &range, &revision));
    assert!(adapter.matches_any(&id, &revision, &range));
}

#[test]
fn upgrade_sort_returns_newest_first_with_prereleases_last() {
    let id = ProjectIdentifier::new("github.com/example/tags");
    let sm = StubSourceManager::new().with_project(
        id.key().clone(),
        vec![
            Version::from_tag("v1.0.0"),
            Version::from_tag("v2.0.0-alpha"),
            Version::from_tag("v2.0.0"),
            Version::from_tag("v1.5.0"),
        ],
    );
    let mut adapter = SourceAdapter::new(sm, SortDirection::Upgrade);

    let listed: Vec<String> =
        adapter.list_versions(&id).unwrap().iter().map(ToString::to_string).collect();
    assert_eq!(listed, ["v2.0.0", "v1.5.0", "v1.0.0", "v2.0.0-alpha"]);
}

#[test]
fn downgrade_sort_returns_oldest_first_with_prereleases_last() {
    let id = ProjectIdentifier::new("github.com/example/tags");
    let sm = StubSourceManager::new().with_project(
        id.key().clone(),
        vec![
            Version::from_tag("v1.0.0"),
            Version::from_tag("v2.0.0-alpha"),
            Version::from_tag("v2.0.0"),
            Version::from_tag("v1.5.0"),
        ],
    );
    let mut adapter = SourceAdapter::new(sm, SortDirection::Downgrade);

    let listed: Vec<String> =
        adapter.list_versions(&id).unwrap().iter().map(ToString::to_string).collect();
    assert_eq!(listed, ["v1.0.0", "v1.5.0", "v2.0.0", "v2.0.0-alpha"]);
}

#[test]
fn none_intersected_with_any_stays_none() {
    let id = ProjectIdentifier::new("github.com/example/dep");
    let mut adapter = adapter_for(&id, SortDirection::Upgrade);

    assert_eq!(adapter.intersect(&id, &Constraint::None, &Constraint::Any), Constraint::None);
}

#[test]
fn network_name_drives_all_source_queries() {
    // The stub only knows the project under its network name; a lookup by
    // local name would fail, so passing tests prove the translation.
    let id = ProjectIdentifier::with_network_name("dep", "github.com/example/dep");
    let sm = StubSourceManager::new()
        .with_project(id.key().clone(), project_versions())
        .with_vendored(id.key().clone());
    let mut adapter = SourceAdapter::new(sm, SortDirection::Upgrade);

    assert!(adapter.repo_exists(&id).unwrap());
    assert!(adapter.vendor_code_exists(&id).unwrap());
    assert_eq!(adapter.list_versions(&id).unwrap().len(), 3);
}

#[test]
fn project_info_flows_through_for_a_pinned_atom() {
    let id = ProjectIdentifier::new("github.com/example/app");
    let dep_id = ProjectIdentifier::new("github.com/example/dep");

    let mut manifest = Manifest::new(id.key().clone());
    manifest.dependencies.push(ProjectDep {
        ident: dep_id.clone(),
        constraint: Constraint::parse("^1.0.0").unwrap(),
    });
    let lock = Lock {
        projects: vec![LockedProject {
            ident: dep_id.clone(),
            version: Version::from(
                UnpairedVersion::from_tag("v1.2.0").pair(Revision::from("aaaaaaa")),
            ),
        }],
    };
    let info = ProjectInfo { manifest, lock: Some(lock) };

    let sm = StubSourceManager::new().with_project_info(id.key().clone(), info);
    let mut adapter = SourceAdapter::new(sm, SortDirection::Upgrade);

    let atom = ProjectAtom::new(id.clone(), Version::from_tag("v3.0.0"));
    let fetched = adapter.project_info(&atom).unwrap();

    assert_eq!(fetched.manifest.dependencies.len(), 1);
    let pinned = fetched.lock.unwrap();
    assert!(pinned.project(dep_id.key()).is_some());
}

#[test]
fn a_solve_checks_lock_pins_against_manifest_constraints() {
    // A miniature of what the enclosing solver does: read a dependency's
    // constraint from the manifest, and test the lock's pinned version
    // against it authoritatively.
    let dep_id = ProjectIdentifier::new("github.com/example/dep");
    let sm = StubSourceManager::new().with_project(dep_id.key().clone(), project_versions());
    let mut adapter = SourceAdapter::new(sm, SortDirection::Upgrade);

    let constraint = Constraint::parse("^1.0.0").unwrap();
    let pinned = Version::revision("aaaaaaa");

    assert!(adapter.matches(&dep_id, &constraint, &pinned));
    assert!(!adapter.intersect(&dep_id, &constraint, &Constraint::Version(pinned)).is_none());
}
