pub(super) use super::apply;
pub(super) use super::reduce;
pub(super) use super::WriteBack;
pub(super) use crate::actions::Action;
pub(super) use crate::actions::SettingsPatch;
pub(super) use crate::state::default_columns;
pub(super) use crate::state::now_millis;
pub(super) use crate::state::DocEntry;
pub(super) use crate::state::DocKind;
pub(super) use crate::state::DocSource;
pub(super) use crate::state::Priority;
pub(super) use crate::state::Project;
pub(super) use crate::state::ProjectStatus;
pub(super) use crate::state::Snapshot;
pub(super) use crate::state::Task;

mod projects;

fn project(id: &str) -> Project {
    Project {
        id: id.to_string(),
        name: format!("Project {id}"),
        description: String::new(),
        status: ProjectStatus::Active,
        files: Vec::new(),
        columns: default_columns(),
        tags: Vec::new(),
        created_at: now_millis(),
        updated_at: now_millis(),
    }
}

fn task(id: &str, project_id: &str) -> Task {
    Task {
        id: id.to_string(),
        project_id: project_id.to_string(),
        title: format!("Task {id}"),
        description: String::new(),
        status: "TODO".to_string(),
        priority: Priority::Medium,
        tags: Vec::new(),
        subtasks: Vec::new(),
        start_date: None,
        due_date: None,
        time_spent: 0,
        is_timer_running: false,
        created_at: now_millis(),
        updated_at: now_millis(),
    }
}

fn doc(id: &str, name: &str) -> DocEntry {
    DocEntry {
        id: id.to_string(),
        name: name.to_string(),
        content_type: "md".to_string(),
        kind: DocKind::File,
        content: String::new(),
        path: "/".to_string(),
        source: DocSource::Local,
    }
}

fn snapshot_with(projects: Vec<Project>, tasks: Vec<Task>) -> Snapshot {
    Snapshot {
        projects,
        tasks,
        settings: Default::default(),
    }
}
