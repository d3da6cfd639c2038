use chrono::SecondsFormat;
use chrono::TimeZone;
use chrono::Utc;
use devboard_core::Snapshot;

/// Per-file cap on documentation text included in the model context. Larger
/// files are cut at the nearest char boundary below the cap.
pub const DOC_EXCERPT_CHARS: usize = 1000;

fn excerpt(content: &str, cap: usize) -> &str {
    match content.char_indices().nth(cap) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

fn format_epoch_millis(millis: i64) -> String {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
        None => millis.to_string(),
    }
}

/// Assembles the system prompt sent ahead of every chat turn: the configured
/// base prompt, a JSON summary of every project, the active project's docs
/// and tasks in full detail, and the current date.
pub fn build_context(snapshot: &Snapshot, active_project_id: Option<&str>) -> String {
    let mut prompt = snapshot.settings.custom_system_prompt.clone();

    let summary: Vec<serde_json::Value> = snapshot
        .projects
        .iter()
        .map(|p| {
            serde_json::json!({
                "id": p.id,
                "name": p.name,
                "status": p.status.label(),
                "taskCount": snapshot.project_tasks(&p.id).count(),
            })
        })
        .collect();
    prompt.push_str("\n\n### WORKSPACE PROJECTS:\n");
    prompt.push_str(&serde_json::to_string(&summary).unwrap_or_default());

    if let Some(project) = active_project_id.and_then(|id| snapshot.project(id)) {
        prompt.push_str(&format!(
            "\n\n### ACTIVE PROJECT: {} (id: {})\n{}\n",
            project.name, project.id, project.description
        ));

        prompt.push_str("\n#### DOCUMENTATION:\n");
        for file in &project.files {
            prompt.push_str(&format!(
                "--- {} (path: {}) ---\n{}\n",
                file.name,
                file.path,
                excerpt(&file.content, DOC_EXCERPT_CHARS)
            ));
        }

        prompt.push_str("\n#### TASKS:\n");
        for task in snapshot.project_tasks(&project.id) {
            let tags = if task.tags.is_empty() {
                String::new()
            } else {
                format!(" #{}", task.tags.join(" #"))
            };
            let due = task
                .due_date
                .map(|d| format!(" (due {})", format_epoch_millis(d)))
                .unwrap_or_default();
            prompt.push_str(&format!(
                "- [{}] {} (id: {}, priority: {}){}{}\n",
                task.status,
                task.title,
                task.id,
                task.priority.label(),
                tags,
                due
            ));
        }
    }

    prompt.push_str(&format!(
        "\n### CURRENT DATE: {}\n",
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    prompt
}

#[cfg(test)]
mod tests {
    use devboard_core::Snapshot;
    use pretty_assertions::assert_eq;

    use super::build_context;
    use super::excerpt;
    use super::DOC_EXCERPT_CHARS;

    #[test]
    fn excerpt_cuts_on_a_char_boundary() {
        let text = "é".repeat(20);
        let cut = excerpt(&text, 10);
        assert_eq!(cut.chars().count(), 10);

        let short = "hello";
        assert_eq!(excerpt(short, 10), "hello");
    }

    #[test]
    fn context_lists_every_project_but_details_only_the_active_one() {
        let snapshot = Snapshot::seeded();

        let with_active = build_context(&snapshot, Some("p-demo"));
        assert!(with_active.contains("### WORKSPACE PROJECTS:"));
        assert!(with_active.contains("### ACTIVE PROJECT: Devboard Architecture"));
        assert!(with_active.contains("README.md"));
        assert!(with_active.contains("Wire up the chat completions client"));

        let without = build_context(&snapshot, None);
        assert!(without.contains("### WORKSPACE PROJECTS:"));
        assert!(!without.contains("### ACTIVE PROJECT"));
    }

    #[test]
    fn oversized_docs_are_capped() {
        let mut snapshot = Snapshot::seeded();
        snapshot.projects[0].files[0].content = "x".repeat(DOC_EXCERPT_CHARS * 3);

        let context = build_context(&snapshot, Some("p-demo"));
        let run = context
            .chars()
            .fold((0usize, 0usize), |(best, cur), c| {
                if c == 'x' {
                    (best.max(cur + 1), cur + 1)
                } else {
                    (best, 0)
                }
            })
            .0;
        assert_eq!(run, DOC_EXCERPT_CHARS);
    }

    #[test]
    fn unknown_active_project_degrades_to_summary_only() {
        let snapshot = Snapshot::seeded();
        let context = build_context(&snapshot, Some("p-missing"));
        assert!(!context.contains("### ACTIVE PROJECT"));
    }
}
