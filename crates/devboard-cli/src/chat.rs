use std::time::Duration;

use devboard_ai::build_context;
use devboard_ai::extract_tool_call;
use devboard_ai::ChatClient;
use devboard_ai::ChatMessage;
use devboard_ai::ToolDispatcher;
use devboard_core::Action;
use devboard_core::SettingsPatch;
use devboard_core::Snapshot;
use devboard_core::SnapshotStore;
use devboard_core::Store;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::time::MissedTickBehavior;

/// Interactive assistant session. A 1 Hz tick keeps task timers advancing
/// while the session is open; everything else is driven by stdin lines.
pub async fn run(persisted: SnapshotStore) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = persisted.load();
    let mut store = Store::new(snapshot, Box::new(persisted));
    let mut dispatcher = ToolDispatcher::new();
    let mut history: Vec<ChatMessage> = Vec::new();
    let mut active_project: Option<String> =
        store.snapshot().projects.first().map(|p| p.id.clone());

    println!(
        "devboard chat. {} project(s) loaded, active: {}.",
        store.snapshot().projects.len(),
        active_project.as_deref().unwrap_or("none")
    );
    println!("Commands: /use <id> /projects /tasks /models /model <id> /key <key> /audit /quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                store.dispatch(Action::TickTimers);
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                if let Some(command) = line.strip_prefix('/') {
                    if !handle_command(command, &mut store, &mut active_project, &dispatcher).await {
                        break;
                    }
                } else {
                    chat_turn(
                        &line,
                        &mut store,
                        &mut dispatcher,
                        &mut history,
                        active_project.as_deref(),
                    )
                    .await;
                }
            }
        }
    }
    Ok(())
}

/// Returns false when the session should end.
async fn handle_command(
    command: &str,
    store: &mut Store,
    active_project: &mut Option<String>,
    dispatcher: &ToolDispatcher,
) -> bool {
    let (name, arg) = match command.split_once(' ') {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    match name {
        "quit" | "exit" => return false,
        "use" => {
            if store.snapshot().project(arg).is_some() {
                *active_project = Some(arg.to_string());
                println!("active project: {arg}");
            } else {
                println!("no project with id '{arg}'");
            }
        }
        "projects" => print_projects(store.snapshot()),
        "tasks" => print_tasks(store.snapshot(), active_project.as_deref()),
        "audit" => {
            if dispatcher.audit().is_empty() {
                println!("no tool calls this session");
            }
            for entry in dispatcher.audit() {
                println!("[{}] {}: {}", entry.at, entry.tool, entry.outcome);
            }
        }
        "key" => {
            store.dispatch(Action::UpdateSettings(SettingsPatch {
                chat_api_key: Some(arg.to_string()),
                ..Default::default()
            }));
            println!("chat API key updated");
        }
        "model" => {
            store.dispatch(Action::UpdateSettings(SettingsPatch {
                default_model: Some(arg.to_string()),
                ..Default::default()
            }));
            println!("default model: {arg}");
        }
        "models" => {
            let client = ChatClient::new(store.snapshot().settings.chat_api_key.clone());
            match client.list_models().await {
                Ok(models) => {
                    for model in models.iter().take(40) {
                        println!("{}  {}", model.id, model.name);
                    }
                    println!("({} available)", models.len());
                    store.dispatch(Action::UpdateSettings(SettingsPatch {
                        available_models: Some(models),
                        ..Default::default()
                    }));
                }
                Err(err) => println!("model list failed: {err}"),
            }
        }
        other => println!("unknown command: /{other}"),
    }
    true
}

async fn chat_turn(
    input: &str,
    store: &mut Store,
    dispatcher: &mut ToolDispatcher,
    history: &mut Vec<ChatMessage>,
    active_project: Option<&str>,
) {
    let settings = store.snapshot().settings.clone();
    if settings.chat_api_key.is_empty() {
        println!("no chat API key configured. Set one with /key <key>.");
        return;
    }

    let context = build_context(store.snapshot(), active_project);
    history.push(ChatMessage::user(input));

    let client = ChatClient::new(settings.chat_api_key);
    let reply = match client
        .converse(&settings.default_model, &context, history)
        .await
    {
        Ok(reply) => reply,
        Err(err) => {
            history.pop();
            println!("assistant unavailable: {err}");
            return;
        }
    };

    let (text, call) = extract_tool_call(&reply);
    let mut display = text;
    if let Some(call) = call {
        let result = dispatcher.dispatch(store.snapshot(), active_project, &call);
        for action in result.actions {
            store.dispatch(action);
        }
        if !display.is_empty() {
            display.push_str("\n\n");
        }
        display.push_str(&format!("System action ({}). Status: {}", call.tool, result.message));
    }

    println!("{display}");
    // The model sees its own tool outcome on the next turn.
    history.push(ChatMessage::assistant(display));
}

pub fn print_projects(snapshot: &Snapshot) {
    for project in &snapshot.projects {
        println!(
            "{}  {}  [{}]  {} task(s), {} doc(s)",
            project.id,
            project.name,
            project.status.label(),
            snapshot.project_tasks(&project.id).count(),
            project.files.len()
        );
    }
    if snapshot.projects.is_empty() {
        println!("no projects");
    }
}

pub fn print_tasks(snapshot: &Snapshot, project_id: Option<&str>) {
    let mut any = false;
    for task in &snapshot.tasks {
        if project_id.is_some_and(|p| p != task.project_id) {
            continue;
        }
        any = true;
        let timer = if task.is_timer_running { " (running)" } else { "" };
        println!(
            "{}  [{}] {}  {} {}s{}",
            task.id,
            task.status,
            task.title,
            task.priority.label(),
            task.time_spent,
            timer
        );
    }
    if !any {
        println!("no tasks");
    }
}
