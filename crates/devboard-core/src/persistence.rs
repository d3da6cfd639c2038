use std::io;
use std::path::Path;
use std::path::PathBuf;

use crate::reducer::WriteBack;
use crate::state::Snapshot;
use crate::store::PersistenceSink;

// Bump the suffix when the snapshot schema changes shape incompatibly;
// individual field additions are covered by serde defaults.
pub const SNAPSHOT_FILE: &str = "snapshot.v6.json";

/// Whole-snapshot JSON storage under a single versioned file name. Last
/// write wins; there is no version counter or conflict detection.
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn open(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(SNAPSHOT_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored snapshot. A missing file seeds and persists the demo
    /// snapshot; an unparseable file falls back to the demo snapshot without
    /// touching the stored bytes. Fields absent from an older save are
    /// filled from defaults (merge, not overwrite).
    pub fn load(&self) -> Snapshot {
        if !self.path.exists() {
            let seeded = Snapshot::seeded();
            if let Err(err) = self.save(&seeded) {
                tracing::warn!(path = %self.path.display(), %err, "failed to write seed snapshot");
            }
            return seeded;
        }
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "failed to read snapshot");
                return Snapshot::seeded();
            }
        };
        match serde_json::from_slice::<Snapshot>(&bytes) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "snapshot unparseable, using seed data");
                Snapshot::seeded()
            }
        }
    }

    pub fn save(&self, snapshot: &Snapshot) -> io::Result<()> {
        let encoded = serde_json::to_vec(snapshot)
            .map_err(|err| io::Error::other(format!("serialize snapshot: {err}")))?;
        std::fs::write(&self.path, encoded)
    }

    /// Accepts an exported snapshot only if it carries `projects` and
    /// `tasks` arrays; anything else is rejected without touching storage.
    pub fn import(&self, json: &str) -> Option<Snapshot> {
        let value: serde_json::Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(%err, "import rejected: not valid JSON");
                return None;
            }
        };
        let looks_like_snapshot =
            value.get("projects").is_some_and(|v| v.is_array())
                && value.get("tasks").is_some_and(|v| v.is_array());
        if !looks_like_snapshot {
            tracing::warn!("import rejected: missing projects/tasks arrays");
            return None;
        }
        let snapshot: Snapshot = match serde_json::from_value(value) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(%err, "import rejected: shape mismatch");
                return None;
            }
        };
        if let Err(err) = self.save(&snapshot) {
            tracing::warn!(path = %self.path.display(), %err, "failed to persist imported snapshot");
        }
        Some(snapshot)
    }

    pub fn export(snapshot: &Snapshot) -> String {
        serde_json::to_string_pretty(snapshot).unwrap_or_default()
    }
}

impl PersistenceSink for SnapshotStore {
    // The local path has no partial writes: every scope rewrites the whole
    // snapshot. Failures are logged and never surfaced to the dispatcher.
    fn persist(&self, _write: &WriteBack, snapshot: &Snapshot) {
        if let Err(err) = self.save(snapshot) {
            tracing::warn!(path = %self.path.display(), %err, "snapshot write-through failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::SnapshotStore;
    use crate::state::Language;
    use crate::state::Settings;
    use crate::state::Snapshot;

    #[test]
    fn absent_file_seeds_demo_data_and_persists_it() {
        let dir = tempdir().expect("tmpdir");
        let store = SnapshotStore::open(dir.path()).expect("open");

        let first = store.load();
        assert!(!first.projects.is_empty());
        assert!(store.path().exists());

        let second = store.load();
        assert_eq!(first, second);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().expect("tmpdir");
        let store = SnapshotStore::open(dir.path()).expect("open");

        let mut snapshot = Snapshot::seeded();
        snapshot.settings.user_name = "Ada".to_string();
        snapshot.settings.language = Language::Pt;
        store.save(&snapshot).expect("save");

        assert_eq!(store.load(), snapshot);
    }

    #[test]
    fn missing_settings_fields_merge_onto_defaults() {
        let dir = tempdir().expect("tmpdir");
        let store = SnapshotStore::open(dir.path()).expect("open");

        // A save from before userName/language existed.
        let stored = r#"{
            "projects": [],
            "tasks": [],
            "settings": { "chatApiKey": "sk-123", "defaultModel": "older-model" }
        }"#;
        std::fs::write(store.path(), stored).expect("write");

        let loaded = store.load();
        let defaults = Settings::default();
        assert_eq!(loaded.settings.chat_api_key, "sk-123");
        assert_eq!(loaded.settings.default_model, "older-model");
        assert_eq!(loaded.settings.user_name, defaults.user_name);
        assert_eq!(loaded.settings.language, defaults.language);
        assert_eq!(
            loaded.settings.custom_system_prompt,
            defaults.custom_system_prompt
        );
    }

    #[test]
    fn corrupt_snapshot_falls_back_to_seed() {
        let dir = tempdir().expect("tmpdir");
        let store = SnapshotStore::open(dir.path()).expect("open");
        std::fs::write(store.path(), b"{ not json").expect("write");

        let loaded = store.load();
        assert_eq!(loaded, Snapshot::seeded());
    }

    #[test]
    fn import_requires_projects_and_tasks() {
        let dir = tempdir().expect("tmpdir");
        let store = SnapshotStore::open(dir.path()).expect("open");

        assert!(store.import("not json").is_none());
        assert!(store.import(r#"{"settings": {}}"#).is_none());

        let ok = store.import(r#"{"projects": [], "tasks": []}"#);
        assert!(ok.is_some());
    }

    #[test]
    fn export_import_round_trips() {
        let dir = tempdir().expect("tmpdir");
        let store = SnapshotStore::open(dir.path()).expect("open");

        let snapshot = Snapshot::seeded();
        let exported = SnapshotStore::export(&snapshot);
        let imported = store.import(&exported).expect("import");
        assert_eq!(imported, snapshot);
    }
}
