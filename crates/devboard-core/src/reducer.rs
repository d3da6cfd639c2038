use crate::actions::Action;
use crate::state::now_millis;
use crate::state::Snapshot;

/// Write-through descriptor emitted alongside a transition. The local
/// persistence path rewrites the whole snapshot regardless of scope; the
/// scopes mirror the per-entity writes a remote mirror would perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteBack {
    UpsertProject(String),
    RemoveProject(String),
    UpsertTask(String),
    RemoveTask(String),
    UpsertFile { project_id: String, file_id: String },
    RemoveFile { project_id: String, file_id: String },
    Settings,
}

/// Pure transition: never mutates its input. `InitSnapshot` and `TickTimers`
/// emit no write-back; actions that end up as no-ops (unknown ids) emit none
/// either.
pub fn reduce(snapshot: &Snapshot, action: &Action) -> (Snapshot, Vec<WriteBack>) {
    match action {
        Action::InitSnapshot(next) => (next.clone(), Vec::new()),

        Action::AddProject(project) => {
            let mut next = snapshot.clone();
            next.projects.push(project.clone());
            (next, vec![WriteBack::UpsertProject(project.id.clone())])
        }

        Action::UpdateProject(project) => {
            if snapshot.project(&project.id).is_none() {
                return (snapshot.clone(), Vec::new());
            }
            let mut next = snapshot.clone();
            for slot in &mut next.projects {
                if slot.id == project.id {
                    *slot = project.clone();
                }
            }
            (next, vec![WriteBack::UpsertProject(project.id.clone())])
        }

        Action::DeleteProject { project_id } => {
            if snapshot.project(project_id).is_none() {
                return (snapshot.clone(), Vec::new());
            }
            let mut next = snapshot.clone();
            next.projects.retain(|p| p.id != *project_id);
            // Cascade: no task referencing a deleted project survives.
            next.tasks.retain(|t| t.project_id != *project_id);
            (next, vec![WriteBack::RemoveProject(project_id.clone())])
        }

        Action::SaveFile { project_id, file } => {
            if snapshot.project(project_id).is_none() {
                return (snapshot.clone(), Vec::new());
            }
            let mut next = snapshot.clone();
            for project in &mut next.projects {
                if project.id != *project_id {
                    continue;
                }
                match project.files.iter_mut().find(|f| f.id == file.id) {
                    Some(existing) => *existing = file.clone(),
                    None => project.files.push(file.clone()),
                }
                project.updated_at = now_millis();
            }
            (
                next,
                vec![WriteBack::UpsertFile {
                    project_id: project_id.clone(),
                    file_id: file.id.clone(),
                }],
            )
        }

        Action::DeleteFile {
            project_id,
            file_id,
        } => {
            if snapshot.project(project_id).is_none() {
                return (snapshot.clone(), Vec::new());
            }
            let mut next = snapshot.clone();
            for project in &mut next.projects {
                if project.id != *project_id {
                    continue;
                }
                project.files.retain(|f| f.id != *file_id);
                project.updated_at = now_millis();
            }
            (
                next,
                vec![WriteBack::RemoveFile {
                    project_id: project_id.clone(),
                    file_id: file_id.clone(),
                }],
            )
        }

        Action::SaveTask(task) => {
            let mut next = snapshot.clone();
            match next.tasks.iter_mut().find(|t| t.id == task.id) {
                Some(existing) => *existing = task.clone(),
                None => next.tasks.push(task.clone()),
            }
            (next, vec![WriteBack::UpsertTask(task.id.clone())])
        }

        Action::MoveTask {
            task_id,
            new_status,
        } => {
            if snapshot.task(task_id).is_none() {
                return (snapshot.clone(), Vec::new());
            }
            let mut next = snapshot.clone();
            for task in &mut next.tasks {
                if task.id == *task_id {
                    task.status = new_status.clone();
                    task.updated_at = now_millis();
                }
            }
            (next, vec![WriteBack::UpsertTask(task_id.clone())])
        }

        Action::DeleteTask { task_id } => {
            if snapshot.task(task_id).is_none() {
                return (snapshot.clone(), Vec::new());
            }
            let mut next = snapshot.clone();
            next.tasks.retain(|t| t.id != *task_id);
            (next, vec![WriteBack::RemoveTask(task_id.clone())])
        }

        Action::UpdateSettings(patch) => {
            let mut next = snapshot.clone();
            next.settings = patch.merged_into(&snapshot.settings);
            (next, vec![WriteBack::Settings])
        }

        Action::TickTimers => {
            let mut next = snapshot.clone();
            for task in &mut next.tasks {
                if task.is_timer_running {
                    task.time_spent += 1;
                }
            }
            (next, Vec::new())
        }
    }
}

/// The pure transition alone, for callers that do not care about
/// write-through effects.
pub fn apply(snapshot: &Snapshot, action: &Action) -> Snapshot {
    reduce(snapshot, action).0
}

#[cfg(test)]
mod tests;
