use devboard_core::now_millis;
use devboard_core::Action;
use devboard_core::DocEntry;
use devboard_core::DocKind;
use devboard_core::DocSource;
use devboard_core::KanbanColumn;
use devboard_core::Priority;
use devboard_core::Project;
use devboard_core::ProjectStatus;
use devboard_core::Snapshot;
use devboard_core::Subtask;
use devboard_core::Task;
use serde_json::Value;
use uuid::Uuid;

use crate::parse::ToolCall;

/// Outcome of one tool call: the actions to feed the store plus a short
/// status line to append to the assistant's reply. Failures never raise;
/// they come back as an `Error: ...` message with no actions.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResult {
    pub actions: Vec<Action>,
    pub message: String,
}

impl DispatchResult {
    fn ok(actions: Vec<Action>, message: impl Into<String>) -> Self {
        Self {
            actions,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            actions: Vec::new(),
            message: format!("Error: {}", message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.message.starts_with("Error:")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub at: i64,
    pub tool: String,
    pub outcome: String,
}

/// Turns model tool calls into store actions. Keeps an in-memory audit of
/// every call it handled; the audit is not persisted.
#[derive(Debug, Default)]
pub struct ToolDispatcher {
    audit: Vec<AuditEntry>,
}

/// Missing `action` verbs are inferred: a call that carries an `id` means
/// UPDATE, anything else means CREATE.
fn infer_verb(args: &Value) -> &'static str {
    match args.get("action").and_then(Value::as_str) {
        Some(v) if v.eq_ignore_ascii_case("update") => "UPDATE",
        Some(v) if v.eq_ignore_ascii_case("create") => "CREATE",
        Some(v) if v.eq_ignore_ascii_case("delete") => "DELETE",
        _ if args.get("id").and_then(Value::as_str).is_some() => "UPDATE",
        _ => "CREATE",
    }
}

fn str_arg<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str)
}

fn mint_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// Subtask lists arrive either as plain title strings or as objects with
/// `title`/`completed` fields; both forms normalize to records.
fn parse_subtasks(value: &Value) -> Vec<Subtask> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(title) => Some(Subtask {
                id: mint_id("st"),
                title: title.clone(),
                completed: false,
            }),
            Value::Object(obj) => {
                let title = obj.get("title").and_then(Value::as_str)?;
                Some(Subtask {
                    id: obj
                        .get("id")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| mint_id("st")),
                    title: title.to_string(),
                    completed: obj
                        .get("completed")
                        .and_then(Value::as_bool)
                        .unwrap_or(false),
                })
            }
            _ => None,
        })
        .collect()
}

fn parse_columns(value: &Value) -> Option<Vec<KanbanColumn>> {
    let items = value.as_array()?;
    let columns: Vec<KanbanColumn> = items
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let title = obj.get("title").and_then(Value::as_str)?;
            Some(KanbanColumn {
                id: obj
                    .get("id")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| title.to_ascii_uppercase().replace(' ', "_")),
                title: title.to_string(),
                color: obj
                    .get("color")
                    .and_then(Value::as_str)
                    .unwrap_or("slate")
                    .to_string(),
            })
        })
        .collect();
    if columns.is_empty() {
        None
    } else {
        Some(columns)
    }
}

fn parse_tags(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

impl ToolDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn audit(&self) -> &[AuditEntry] {
        &self.audit
    }

    pub fn dispatch(
        &mut self,
        snapshot: &Snapshot,
        active_project_id: Option<&str>,
        call: &ToolCall,
    ) -> DispatchResult {
        let result = match call.tool.as_str() {
            "MANAGE_PROJECT" => manage_project(snapshot, &call.args),
            "MANAGE_TASK" => manage_task(snapshot, active_project_id, &call.args),
            "BATCH_CREATE_TASKS" => batch_create_tasks(snapshot, active_project_id, &call.args),
            "MANAGE_FILE" => manage_file(snapshot, active_project_id, &call.args),
            other => DispatchResult::error(format!("unknown tool '{other}'")),
        };
        tracing::info!(tool = %call.tool, outcome = %result.message, "tool dispatched");
        self.audit.push(AuditEntry {
            at: now_millis(),
            tool: call.tool.clone(),
            outcome: result.message.clone(),
        });
        result
    }
}

fn manage_project(snapshot: &Snapshot, args: &Value) -> DispatchResult {
    match infer_verb(args) {
        "CREATE" => {
            let Some(name) = str_arg(args, "name") else {
                return DispatchResult::error("project creation requires a name");
            };
            let now = now_millis();
            let project = Project {
                id: mint_id("p"),
                name: name.to_string(),
                description: str_arg(args, "description").unwrap_or_default().to_string(),
                status: str_arg(args, "status")
                    .and_then(ProjectStatus::parse)
                    .unwrap_or_default(),
                files: Vec::new(),
                columns: args
                    .get("columns")
                    .and_then(parse_columns)
                    .unwrap_or_else(devboard_core::default_columns),
                tags: args.get("tags").and_then(parse_tags).unwrap_or_default(),
                created_at: now,
                updated_at: now,
            };
            let message = format!("Created project '{}'.", project.name);
            DispatchResult::ok(vec![Action::AddProject(project)], message)
        }
        "UPDATE" => {
            let Some(id) = str_arg(args, "id") else {
                return DispatchResult::error("project update requires an id");
            };
            let Some(existing) = snapshot.project(id) else {
                return DispatchResult::error(format!("no project with id '{id}'"));
            };
            let mut project = existing.clone();
            if let Some(name) = str_arg(args, "name") {
                project.name = name.to_string();
            }
            if let Some(description) = str_arg(args, "description") {
                project.description = description.to_string();
            }
            if let Some(status) = str_arg(args, "status").and_then(ProjectStatus::parse) {
                project.status = status;
            }
            if let Some(columns) = args.get("columns").and_then(parse_columns) {
                project.columns = columns;
            }
            if let Some(tags) = args.get("tags").and_then(parse_tags) {
                project.tags = tags;
            }
            project.updated_at = now_millis();
            let message = format!("Updated project '{}'.", project.name);
            DispatchResult::ok(vec![Action::UpdateProject(project)], message)
        }
        verb => DispatchResult::error(format!("MANAGE_PROJECT does not support '{verb}'")),
    }
}

fn manage_task(snapshot: &Snapshot, active_project_id: Option<&str>, args: &Value) -> DispatchResult {
    match infer_verb(args) {
        "CREATE" => match build_task(snapshot, active_project_id, args) {
            Ok(task) => {
                let message = format!("Created task '{}'.", task.title);
                DispatchResult::ok(vec![Action::SaveTask(task)], message)
            }
            Err(err) => DispatchResult::error(err),
        },
        "UPDATE" => {
            let Some(id) = str_arg(args, "id") else {
                return DispatchResult::error("task update requires an id");
            };
            let Some(existing) = snapshot.task(id) else {
                return DispatchResult::error(format!("no task with id '{id}'"));
            };
            let mut task = existing.clone();
            if let Some(title) = str_arg(args, "title") {
                task.title = title.to_string();
            }
            if let Some(description) = str_arg(args, "description") {
                task.description = description.to_string();
            }
            if let Some(status) = str_arg(args, "status") {
                task.status = status.to_string();
            }
            if let Some(priority) = str_arg(args, "priority").and_then(Priority::parse) {
                task.priority = priority;
            }
            if let Some(subtasks) = args.get("subtasks") {
                task.subtasks = parse_subtasks(subtasks);
            }
            if let Some(due) = args.get("dueDate").and_then(Value::as_i64) {
                task.due_date = Some(due);
            }
            if let Some(start) = args.get("startDate").and_then(Value::as_i64) {
                task.start_date = Some(start);
            }
            if let Some(tags) = args.get("tags").and_then(parse_tags) {
                task.tags = tags;
            }
            task.updated_at = now_millis();
            let message = format!("Updated task '{}'.", task.title);
            DispatchResult::ok(vec![Action::SaveTask(task)], message)
        }
        verb => DispatchResult::error(format!("MANAGE_TASK does not support '{verb}'")),
    }
}

fn build_task(
    snapshot: &Snapshot,
    active_project_id: Option<&str>,
    args: &Value,
) -> Result<Task, String> {
    let title = str_arg(args, "title").ok_or("task creation requires a title")?;
    let project_id = str_arg(args, "projectId")
        .or(active_project_id)
        .ok_or("task creation requires a projectId or an active project")?;
    let project = snapshot
        .project(project_id)
        .ok_or_else(|| format!("no project with id '{project_id}'"))?;

    let status = str_arg(args, "status")
        .unwrap_or_else(|| project.default_task_status())
        .to_string();
    let now = now_millis();
    Ok(Task {
        id: mint_id("t"),
        project_id: project.id.clone(),
        title: title.to_string(),
        description: str_arg(args, "description").unwrap_or_default().to_string(),
        status,
        priority: str_arg(args, "priority")
            .and_then(Priority::parse)
            .unwrap_or_default(),
        tags: args.get("tags").and_then(parse_tags).unwrap_or_default(),
        subtasks: args
            .get("subtasks")
            .map(parse_subtasks)
            .unwrap_or_default(),
        start_date: args.get("startDate").and_then(Value::as_i64),
        due_date: args.get("dueDate").and_then(Value::as_i64),
        time_spent: 0,
        is_timer_running: false,
        created_at: now,
        updated_at: now,
    })
}

fn batch_create_tasks(
    snapshot: &Snapshot,
    active_project_id: Option<&str>,
    args: &Value,
) -> DispatchResult {
    let Some(items) = args.get("tasks").and_then(Value::as_array) else {
        return DispatchResult::error("BATCH_CREATE_TASKS requires a tasks array");
    };
    let batch_project = str_arg(args, "projectId").or(active_project_id);

    let mut actions = Vec::new();
    let mut skipped = 0usize;
    for item in items {
        // Per-item fallback: the batch projectId applies unless the item
        // carries its own.
        let merged = match (item.get("projectId"), batch_project) {
            (None, Some(pid)) => {
                let mut owned = item.clone();
                if let Some(obj) = owned.as_object_mut() {
                    obj.insert("projectId".to_string(), Value::String(pid.to_string()));
                }
                owned
            }
            _ => item.clone(),
        };
        match build_task(snapshot, active_project_id, &merged) {
            Ok(task) => actions.push(Action::SaveTask(task)),
            Err(err) => {
                tracing::debug!(%err, "skipping batch item");
                skipped += 1;
            }
        }
    }

    if actions.is_empty() {
        return DispatchResult::error("no valid tasks in batch");
    }
    let message = if skipped > 0 {
        format!("Created {} task(s), skipped {skipped}.", actions.len())
    } else {
        format!("Created {} task(s).", actions.len())
    };
    DispatchResult::ok(actions, message)
}

fn manage_file(
    snapshot: &Snapshot,
    active_project_id: Option<&str>,
    args: &Value,
) -> DispatchResult {
    let Some(project) = str_arg(args, "projectId")
        .or(active_project_id)
        .and_then(|id| snapshot.project(id))
    else {
        return DispatchResult::error("file management requires an active project");
    };

    match infer_verb(args) {
        "CREATE" => {
            let Some(name) = str_arg(args, "name") else {
                return DispatchResult::error("file creation requires a name");
            };
            let file = DocEntry {
                id: mint_id("f"),
                name: name.to_string(),
                content_type: name
                    .rsplit_once('.')
                    .map(|(_, ext)| ext)
                    .unwrap_or("md")
                    .to_string(),
                kind: DocKind::File,
                content: str_arg(args, "content").unwrap_or_default().to_string(),
                path: str_arg(args, "path").unwrap_or("/").to_string(),
                source: DocSource::Local,
            };
            let message = format!("Created file '{}' in '{}'.", file.name, project.name);
            DispatchResult::ok(
                vec![Action::SaveFile {
                    project_id: project.id.clone(),
                    file,
                }],
                message,
            )
        }
        "UPDATE" => {
            // Files are addressable by id or by exact name.
            let existing = str_arg(args, "id")
                .and_then(|id| project.file(id))
                .or_else(|| {
                    str_arg(args, "name")
                        .and_then(|name| project.files.iter().find(|f| f.name == name))
                });
            let Some(existing) = existing else {
                return DispatchResult::error("file update matched no existing file");
            };
            let mut file = existing.clone();
            if let Some(content) = str_arg(args, "content") {
                file.content = content.to_string();
            }
            if let Some(path) = str_arg(args, "path") {
                file.path = path.to_string();
            }
            let message = format!("Updated file '{}'.", file.name);
            DispatchResult::ok(
                vec![Action::SaveFile {
                    project_id: project.id.clone(),
                    file,
                }],
                message,
            )
        }
        verb => DispatchResult::error(format!("MANAGE_FILE does not support '{verb}'")),
    }
}
