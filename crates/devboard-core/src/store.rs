use crate::actions::Action;
use crate::reducer::reduce;
use crate::reducer::WriteBack;
use crate::state::Snapshot;

/// Consumes write-through effects after a transition. Implementations must
/// swallow their own failures (log, don't raise): the in-memory snapshot is
/// the source of truth for the running process and storage is a mirror.
pub trait PersistenceSink {
    fn persist(&self, write: &WriteBack, snapshot: &Snapshot);
}

/// Sink that drops every write. Used in tests and for read-only commands.
pub struct NullSink;

impl PersistenceSink for NullSink {
    fn persist(&self, _write: &WriteBack, _snapshot: &Snapshot) {}
}

/// Owns the snapshot and serializes all mutations through the reducer.
/// `dispatch` applies the pure transition first, then hands each write-back
/// to the sink; a sink failure never affects the transition's outcome.
pub struct Store {
    snapshot: Snapshot,
    sink: Box<dyn PersistenceSink + Send>,
}

impl Store {
    pub fn new(snapshot: Snapshot, sink: Box<dyn PersistenceSink + Send>) -> Self {
        Self { snapshot, sink }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn dispatch(&mut self, action: Action) -> &Snapshot {
        let (next, writes) = reduce(&self.snapshot, &action);
        self.snapshot = next;
        for write in &writes {
            self.sink.persist(write, &self.snapshot);
        }
        &self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::state::now_millis;
    use crate::state::Priority;
    use crate::state::Project;
    use crate::state::ProjectStatus;
    use crate::state::Task;

    struct RecordingSink(Arc<Mutex<Vec<WriteBack>>>);

    impl PersistenceSink for RecordingSink {
        fn persist(&self, write: &WriteBack, _snapshot: &Snapshot) {
            self.0.lock().unwrap().push(write.clone());
        }
    }

    fn project(id: &str) -> Project {
        Project {
            id: id.to_string(),
            name: format!("Project {id}"),
            description: String::new(),
            status: ProjectStatus::Active,
            files: Vec::new(),
            columns: crate::state::default_columns(),
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

    #[test]
    fn dispatch_forwards_write_backs_to_the_sink() {
        let writes = Arc::new(Mutex::new(Vec::new()));
        let mut store = Store::new(
            Snapshot::default(),
            Box::new(RecordingSink(Arc::clone(&writes))),
        );

        store.dispatch(Action::AddProject(project("p-1")));
        store.dispatch(Action::SaveTask(task("t-1", "p-1")));
        store.dispatch(Action::TickTimers);

        assert_eq!(
            writes.lock().unwrap().as_slice(),
            &[
                WriteBack::UpsertProject("p-1".to_string()),
                WriteBack::UpsertTask("t-1".to_string()),
            ]
        );
    }

    #[test]
    fn noop_actions_emit_no_writes() {
        let writes = Arc::new(Mutex::new(Vec::new()));
        let mut store = Store::new(
            Snapshot::default(),
            Box::new(RecordingSink(Arc::clone(&writes))),
        );

        store.dispatch(Action::MoveTask {
            task_id: "missing".to_string(),
            new_status: "DONE".to_string(),
        });

        assert!(writes.lock().unwrap().is_empty());
    }
}
