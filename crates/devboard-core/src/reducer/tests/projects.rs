use pretty_assertions::assert_eq;

use super::*;

#[test]
fn add_project_appends_and_reports_upsert() {
    let initial = snapshot_with(vec![project("p-1")], Vec::new());

    let (next, writes) = reduce(&initial, &Action::AddProject(project("p-2")));

    assert_eq!(next.projects.len(), 2);
    assert_eq!(next.projects[1].id, "p-2");
    assert_eq!(writes, vec![WriteBack::UpsertProject("p-2".to_string())]);
    // Input untouched.
    assert_eq!(initial.projects.len(), 1);
}

#[test]
fn update_project_replaces_matching_entry() {
    let initial = snapshot_with(vec![project("p-1"), project("p-2")], Vec::new());

    let mut updated = project("p-2");
    updated.name = "Renamed".to_string();
    updated.status = ProjectStatus::Paused;
    let (next, writes) = reduce(&initial, &Action::UpdateProject(updated.clone()));

    assert_eq!(next.projects[0], initial.projects[0]);
    assert_eq!(next.projects[1], updated);
    assert_eq!(writes, vec![WriteBack::UpsertProject("p-2".to_string())]);
}

#[test]
fn update_unknown_project_is_a_pure_noop() {
    let initial = snapshot_with(vec![project("p-1")], Vec::new());

    let (next, writes) = reduce(&initial, &Action::UpdateProject(project("p-missing")));

    assert_eq!(next, initial);
    assert!(writes.is_empty());
}

#[test]
fn delete_project_cascades_to_its_tasks() {
    let initial = snapshot_with(
        vec![project("p-1"), project("p-2")],
        vec![task("t-1", "p-1"), task("t-2", "p-2"), task("t-3", "p-1")],
    );

    let (next, writes) = reduce(
        &initial,
        &Action::DeleteProject {
            project_id: "p-1".to_string(),
        },
    );

    assert_eq!(next.projects.len(), 1);
    assert_eq!(next.projects[0].id, "p-2");
    assert!(next.tasks.iter().all(|t| t.project_id != "p-1"));
    assert_eq!(next.tasks.len(), 1);
    assert_eq!(writes, vec![WriteBack::RemoveProject("p-1".to_string())]);
}

#[test]
fn delete_unknown_project_is_a_pure_noop() {
    let initial = snapshot_with(vec![project("p-1")], vec![task("t-1", "p-1")]);

    let (next, writes) = reduce(
        &initial,
        &Action::DeleteProject {
            project_id: "p-missing".to_string(),
        },
    );

    assert_eq!(next, initial);
    assert!(writes.is_empty());
}

#[test]
fn init_snapshot_replaces_everything_wholesale() {
    let initial = snapshot_with(vec![project("p-1")], vec![task("t-1", "p-1")]);
    let replacement = snapshot_with(vec![project("p-9")], Vec::new());

    let (next, writes) = reduce(&initial, &Action::InitSnapshot(replacement.clone()));

    assert_eq!(next, replacement);
    assert!(writes.is_empty());
}
