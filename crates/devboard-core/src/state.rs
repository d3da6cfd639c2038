use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProjectStatus {
    #[default]
    Active,
    Paused,
    Completed,
    Archived,
}

impl ProjectStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Paused => "PAUSED",
            Self::Completed => "COMPLETED",
            Self::Archived => "ARCHIVED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ACTIVE" => Some(Self::Active),
            "PAUSED" => Some(Self::Paused),
            "COMPLETED" => Some(Self::Completed),
            "ARCHIVED" => Some(Self::Archived),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    #[default]
    File,
    Folder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocSource {
    #[default]
    Local,
    External,
}

/// A named unit of text content attached to a project. Folders are entries
/// with empty content that group other entries under a shared path prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocEntry {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub content_type: String,
    #[serde(default)]
    pub kind: DocKind,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_doc_path")]
    pub path: String,
    #[serde(default)]
    pub source: DocSource,
}

fn default_doc_path() -> String {
    "/".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanbanColumn {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub color: String,
}

pub const DEFAULT_STATUS_TODO: &str = "TODO";
pub const DEFAULT_STATUS_IN_PROGRESS: &str = "IN_PROGRESS";
pub const DEFAULT_STATUS_DONE: &str = "DONE";

pub fn default_columns() -> Vec<KanbanColumn> {
    vec![
        KanbanColumn {
            id: DEFAULT_STATUS_TODO.to_string(),
            title: "To Do".to_string(),
            color: "slate".to_string(),
        },
        KanbanColumn {
            id: DEFAULT_STATUS_IN_PROGRESS.to_string(),
            title: "In Progress".to_string(),
            color: "blue".to_string(),
        },
        KanbanColumn {
            id: DEFAULT_STATUS_DONE.to_string(),
            title: "Done".to_string(),
            color: "green".to_string(),
        },
    ]
}

/// `status` holds a column id of the owning project's board. Column ids are
/// not validated against the project's current column list; a task whose
/// column was deleted simply stops showing up on the board for that status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<i64>,
    #[serde(default)]
    pub time_spent: u64,
    #[serde(default)]
    pub is_timer_running: bool,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub files: Vec<DocEntry>,
    #[serde(default = "default_columns")]
    pub columns: Vec<KanbanColumn>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Project {
    pub fn file(&self, file_id: &str) -> Option<&DocEntry> {
        self.files.iter().find(|f| f.id == file_id)
    }

    /// New tasks land in the first column of the board.
    pub fn default_task_status(&self) -> &str {
        self.columns
            .first()
            .map(|c| c.id.as_str())
            .unwrap_or(DEFAULT_STATUS_TODO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub completion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<ModelPricing>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Pt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub chat_api_key: String,
    pub audio_api_key: String,
    pub default_model: String,
    pub user_name: String,
    pub available_models: Vec<ModelInfo>,
    pub custom_system_prompt: String,
    pub remote_url: String,
    pub remote_key: String,
    pub remote_schema: String,
    pub language: Language,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chat_api_key: String::new(),
            audio_api_key: String::new(),
            default_model: "google/gemini-2.0-flash-001".to_string(),
            user_name: "Developer".to_string(),
            available_models: Vec::new(),
            custom_system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            remote_url: String::new(),
            remote_key: String::new(),
            remote_schema: "public".to_string(),
            language: Language::En,
        }
    }
}

/// The complete in-memory application state at a point in time. This is the
/// unit of persistence: every local write stores the whole snapshot. Fields
/// default individually so older saves merge onto current defaults on load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    pub settings: Settings,
}

impl Snapshot {
    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn project_tasks<'a>(&'a self, project_id: &'a str) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks
            .iter()
            .filter(move |t| t.project_id == project_id)
    }

    /// Demo data written on first run when no snapshot exists yet.
    pub fn seeded() -> Self {
        let now = now_millis();
        Self {
            projects: vec![Project {
                id: "p-demo".to_string(),
                name: "Devboard Architecture".to_string(),
                description: "Self-hosted project management with AI context generation."
                    .to_string(),
                status: ProjectStatus::Active,
                files: vec![
                    DocEntry {
                        id: "f-1".to_string(),
                        name: "README.md".to_string(),
                        content_type: "md".to_string(),
                        kind: DocKind::File,
                        content: "# Architecture\n\n- Core: snapshot + reducer\n- AI: chat bridge + tool dispatch\n- Storage: local JSON snapshot"
                            .to_string(),
                        path: "/".to_string(),
                        source: DocSource::Local,
                    },
                    DocEntry {
                        id: "f-2".to_string(),
                        name: "features.md".to_string(),
                        content_type: "md".to_string(),
                        kind: DocKind::File,
                        content: "# Features\n\n1. AI Chat\n2. Kanban\n3. Docs".to_string(),
                        path: "/docs".to_string(),
                        source: DocSource::Local,
                    },
                ],
                columns: default_columns(),
                tags: vec!["meta".to_string(), "rust".to_string()],
                created_at: now,
                updated_at: now,
            }],
            tasks: vec![Task {
                id: "t-1".to_string(),
                project_id: "p-demo".to_string(),
                title: "Wire up the chat completions client".to_string(),
                description: "Single request/response round trip, no streaming.".to_string(),
                status: DEFAULT_STATUS_DONE.to_string(),
                priority: Priority::High,
                tags: vec!["backend".to_string(), "ai".to_string()],
                subtasks: vec![
                    Subtask {
                        id: "st-1".to_string(),
                        title: "Request builder".to_string(),
                        completed: true,
                    },
                    Subtask {
                        id: "st-2".to_string(),
                        title: "Error mapping".to_string(),
                        completed: false,
                    },
                ],
                start_date: None,
                due_date: None,
                time_spent: 3600,
                is_timer_running: false,
                created_at: now,
                updated_at: now,
            }],
            settings: Settings::default(),
        }
    }
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub const DEFAULT_SYSTEM_PROMPT: &str = r##"You are the senior technical project manager for this workspace.
You keep the database (projects, tasks, docs) in sync with what the developer tells you.

### YOUR ROLE:
1. Context guardian: the tasks and docs must reflect reality.
2. Proactive assistant: if the user says "I finished auth", find the auth task and mark it done; create it first if it does not exist.
3. Documentation librarian: capture decisions and explanations as files via MANAGE_FILE.

### TOOL USAGE RULES (STRICT JSON, at most one tool call, placed at the end of your reply):

#### 1. MANAGE_PROJECT
Action: "CREATE" | "UPDATE"
```json
{
  "tool": "MANAGE_PROJECT",
  "args": {
    "action": "UPDATE",
    "id": "current_project_id",
    "columns": [{"id": "qa", "title": "QA Testing", "color": "purple"}]
  }
}
```

#### 2. MANAGE_TASK
Action: "CREATE" | "UPDATE"
- Use a 'subtasks' array of plain titles for checklists.
- If the user gives a deadline, compute the 'dueDate' timestamp in epoch milliseconds.
```json
{
  "tool": "MANAGE_TASK",
  "args": {
    "action": "CREATE",
    "projectId": "p-123",
    "title": "Implement login",
    "status": "DONE",
    "priority": "HIGH",
    "subtasks": ["UI layout", "API integration"],
    "dueDate": 1715420000000
  }
}
```

#### 3. BATCH_CREATE_TASKS
Use this when the user dumps a list of things to do or done.
```json
{
  "tool": "BATCH_CREATE_TASKS",
  "args": {
    "projectId": "p-123",
    "tasks": [{"title": "Write docs"}, {"title": "Ship release", "priority": "HIGH"}]
  }
}
```

#### 4. MANAGE_FILE
Action: "CREATE" | "UPDATE"
- Folder support: use a 'path' like "/backend".
```json
{
  "tool": "MANAGE_FILE",
  "args": {
    "action": "CREATE",
    "name": "database_schema.md",
    "path": "/specs",
    "content": "# Database Schema\n\n..."
  }
}
```
"##;
