use serde::Deserialize;
use serde::Serialize;

use crate::state::DocEntry;
use crate::state::Language;
use crate::state::ModelInfo;
use crate::state::Project;
use crate::state::Settings;
use crate::state::Snapshot;
use crate::state::Task;

/// A named, immutable description of an intended state change, consumed by
/// the reducer. Unknown ids on Update/Move/Delete variants are no-ops.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    InitSnapshot(Snapshot),
    AddProject(Project),
    UpdateProject(Project),
    DeleteProject {
        project_id: String,
    },
    /// Upserts a documentation entry under the project and refreshes the
    /// project's `updated_at`.
    SaveFile {
        project_id: String,
        file: DocEntry,
    },
    DeleteFile {
        project_id: String,
        file_id: String,
    },
    /// Replaces the task with a matching id in place, or appends it as new.
    SaveTask(Task),
    MoveTask {
        task_id: String,
        new_status: String,
    },
    DeleteTask {
        task_id: String,
    },
    UpdateSettings(SettingsPatch),
    /// Advances every running task timer by one second. Driven by an
    /// external 1 Hz clock.
    TickTimers,
}

/// Partial settings; `None` fields keep their current value (shallow merge).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub chat_api_key: Option<String>,
    pub audio_api_key: Option<String>,
    pub default_model: Option<String>,
    pub user_name: Option<String>,
    pub available_models: Option<Vec<ModelInfo>>,
    pub custom_system_prompt: Option<String>,
    pub remote_url: Option<String>,
    pub remote_key: Option<String>,
    pub remote_schema: Option<String>,
    pub language: Option<Language>,
}

impl SettingsPatch {
    pub fn merged_into(&self, current: &Settings) -> Settings {
        let mut next = current.clone();
        if let Some(v) = &self.chat_api_key {
            next.chat_api_key = v.clone();
        }
        if let Some(v) = &self.audio_api_key {
            next.audio_api_key = v.clone();
        }
        if let Some(v) = &self.default_model {
            next.default_model = v.clone();
        }
        if let Some(v) = &self.user_name {
            next.user_name = v.clone();
        }
        if let Some(v) = &self.available_models {
            next.available_models = v.clone();
        }
        if let Some(v) = &self.custom_system_prompt {
            next.custom_system_prompt = v.clone();
        }
        if let Some(v) = &self.remote_url {
            next.remote_url = v.clone();
        }
        if let Some(v) = &self.remote_key {
            next.remote_key = v.clone();
        }
        if let Some(v) = &self.remote_schema {
            next.remote_schema = v.clone();
        }
        if let Some(v) = self.language {
            next.language = v;
        }
        next
    }
}
