use devboard_core::Project;
use devboard_core::Snapshot;
use devboard_core::Task;

/// Output shape for a project context export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextFormat {
    /// Human-readable report.
    Markdown,
    /// Paste-ready framing for a fresh AI session.
    Prompt,
    /// Markdown plus raw ids and timestamps.
    Technical,
}

impl ContextFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Some(Self::Markdown),
            "prompt" => Some(Self::Prompt),
            "technical" => Some(Self::Technical),
            _ => None,
        }
    }
}

/// Renders one project (docs, board, tasks) as a standalone text document.
/// Returns `None` when the project does not exist.
pub fn generate_project_context(
    snapshot: &Snapshot,
    project_id: &str,
    format: ContextFormat,
) -> Option<String> {
    let project = snapshot.project(project_id)?;
    let tasks: Vec<&Task> = snapshot.project_tasks(project_id).collect();

    let mut out = String::new();
    if format == ContextFormat::Prompt {
        out.push_str(
            "You are joining an ongoing software project. The document below is the complete current context. Read it before answering.\n\n",
        );
    }

    out.push_str(&format!("# {}\n\n", project.name));
    if !project.description.is_empty() {
        out.push_str(&format!("{}\n\n", project.description));
    }
    out.push_str(&format!("Status: {}\n", project.status.label()));
    if !project.tags.is_empty() {
        out.push_str(&format!("Tags: {}\n", project.tags.join(", ")));
    }
    if format == ContextFormat::Technical {
        out.push_str(&format!(
            "Id: {}\nCreated: {}\nUpdated: {}\n",
            project.id, project.created_at, project.updated_at
        ));
    }
    out.push('\n');

    push_board(&mut out, project, &tasks, format);
    push_docs(&mut out, project, format);

    if format == ContextFormat::Prompt {
        out.push_str("\nAcknowledge that you have absorbed this context, then wait for my first question.\n");
    }
    Some(out)
}

fn push_board(out: &mut String, project: &Project, tasks: &[&Task], format: ContextFormat) {
    out.push_str("## Board\n\n");
    // The last column is treated as the done column for progress purposes.
    if let Some(done) = project.columns.last() {
        let finished = tasks.iter().filter(|t| t.status == done.id).count();
        let percent = if tasks.is_empty() {
            0
        } else {
            finished * 100 / tasks.len()
        };
        out.push_str(&format!(
            "Progress: {percent}% ({finished}/{} in {})\n\n",
            tasks.len(),
            done.title
        ));
    }
    for column in &project.columns {
        let in_column: Vec<&&Task> = tasks.iter().filter(|t| t.status == column.id).collect();
        out.push_str(&format!("### {} ({})\n", column.title, in_column.len()));
        for task in in_column {
            out.push_str(&format!("- **{}** [{}]", task.title, task.priority.label()));
            if format == ContextFormat::Technical {
                out.push_str(&format!(" (id: {}, spent: {}s)", task.id, task.time_spent));
            }
            out.push('\n');
            if !task.description.is_empty() {
                out.push_str(&format!("  {}\n", task.description));
            }
            for subtask in &task.subtasks {
                let mark = if subtask.completed { "x" } else { " " };
                out.push_str(&format!("  - [{mark}] {}\n", subtask.title));
            }
        }
        out.push('\n');
    }

    // Orphans: tasks whose column was deleted still belong to the project.
    let known: Vec<&str> = project.columns.iter().map(|c| c.id.as_str()).collect();
    let orphans: Vec<&&Task> = tasks
        .iter()
        .filter(|t| !known.contains(&t.status.as_str()))
        .collect();
    if !orphans.is_empty() {
        out.push_str("### Unassigned\n");
        for task in orphans {
            out.push_str(&format!("- **{}** (status: {})\n", task.title, task.status));
        }
        out.push('\n');
    }
}

fn push_docs(out: &mut String, project: &Project, format: ContextFormat) {
    if project.files.is_empty() {
        return;
    }
    out.push_str("## Documentation\n\n");
    for file in &project.files {
        out.push_str(&format!(
            "### {}/{}\n",
            file.path.trim_end_matches('/'),
            file.name
        ));
        if format == ContextFormat::Technical {
            out.push_str(&format!("(id: {}, type: {})\n", file.id, file.content_type));
        }
        out.push('\n');
        out.push_str(&file.content);
        out.push_str("\n\n");
    }
}

#[cfg(test)]
mod tests {
    use devboard_core::Snapshot;
    use pretty_assertions::assert_eq;

    use super::generate_project_context;
    use super::ContextFormat;

    #[test]
    fn markdown_export_covers_board_and_docs() {
        let snapshot = Snapshot::seeded();
        let out = generate_project_context(&snapshot, "p-demo", ContextFormat::Markdown)
            .expect("project exists");

        assert!(out.starts_with("# Devboard Architecture"));
        assert!(out.contains("Progress: 100% (1/1 in Done)"));
        assert!(out.contains("### Done (1)"));
        assert!(out.contains("- [x] Request builder"));
        assert!(out.contains("- [ ] Error mapping"));
        assert!(out.contains("## Documentation"));
        assert!(out.contains("# Architecture"));
        assert!(!out.contains("id: t-1"));
    }

    #[test]
    fn prompt_format_wraps_the_report_in_framing() {
        let snapshot = Snapshot::seeded();
        let out = generate_project_context(&snapshot, "p-demo", ContextFormat::Prompt)
            .expect("project exists");

        assert!(out.starts_with("You are joining an ongoing software project."));
        assert!(out.trim_end().ends_with("wait for my first question."));
    }

    #[test]
    fn technical_format_includes_raw_ids() {
        let snapshot = Snapshot::seeded();
        let out = generate_project_context(&snapshot, "p-demo", ContextFormat::Technical)
            .expect("project exists");

        assert!(out.contains("Id: p-demo"));
        assert!(out.contains("(id: t-1"));
        assert!(out.contains("(id: f-1"));
    }

    #[test]
    fn unknown_project_exports_nothing() {
        let snapshot = Snapshot::seeded();
        assert_eq!(
            generate_project_context(&snapshot, "p-404", ContextFormat::Markdown),
            None
        );
    }

    #[test]
    fn tasks_in_deleted_columns_land_under_unassigned() {
        let mut snapshot = Snapshot::seeded();
        snapshot.tasks[0].status = "ARCHIVE".to_string();

        let out = generate_project_context(&snapshot, "p-demo", ContextFormat::Markdown)
            .expect("project exists");
        assert!(out.contains("### Unassigned"));
        assert!(out.contains("(status: ARCHIVE)"));
    }

    #[test]
    fn format_parse_accepts_aliases() {
        assert_eq!(ContextFormat::parse("md"), Some(ContextFormat::Markdown));
        assert_eq!(ContextFormat::parse("PROMPT"), Some(ContextFormat::Prompt));
        assert_eq!(ContextFormat::parse("weird"), None);
    }
}
