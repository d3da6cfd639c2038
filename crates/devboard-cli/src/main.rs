use std::env;
use std::fs;
use std::path::PathBuf;

use devboard_ai::generate_project_context;
use devboard_ai::ContextFormat;
use devboard_core::NullSink;
use devboard_core::SnapshotStore;
use devboard_core::Store;
use tracing_subscriber::EnvFilter;

mod chat;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args: Vec<String> = env::args().skip(1).collect();
    let data_dir = take_data_dir(&mut args)?;

    let Some(command) = args.first().cloned() else {
        print_help();
        return Ok(());
    };
    let rest = args[1..].to_vec();

    match command.as_str() {
        "--help" | "-h" | "help" => {
            print_help();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("devboard {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "chat" => {
            let store = SnapshotStore::open(&data_dir)?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(chat::run(store))
        }
        "projects" => {
            let store = read_only_store(&data_dir)?;
            chat::print_projects(store.snapshot());
            Ok(())
        }
        "tasks" => {
            let store = read_only_store(&data_dir)?;
            let project = flag_value(&rest, "--project");
            chat::print_tasks(store.snapshot(), project.as_deref());
            Ok(())
        }
        "export" => {
            let store = read_only_store(&data_dir)?;
            match flag_value(&rest, "--project") {
                Some(project_id) => {
                    let format = flag_value(&rest, "--format")
                        .as_deref()
                        .map(|f| {
                            ContextFormat::parse(f)
                                .ok_or_else(|| format!("unknown format: {f}"))
                        })
                        .transpose()?
                        .unwrap_or(ContextFormat::Markdown);
                    let context = generate_project_context(store.snapshot(), &project_id, format)
                        .ok_or_else(|| format!("no project with id '{project_id}'"))?;
                    println!("{context}");
                }
                None => println!("{}", SnapshotStore::export(store.snapshot())),
            }
            Ok(())
        }
        "import" => {
            let Some(path) = rest.first() else {
                return Err("import requires a file path".into());
            };
            let json = fs::read_to_string(path)?;
            let store = SnapshotStore::open(&data_dir)?;
            match store.import(&json) {
                Some(snapshot) => {
                    println!(
                        "imported {} project(s), {} task(s)",
                        snapshot.projects.len(),
                        snapshot.tasks.len()
                    );
                    Ok(())
                }
                None => Err("import rejected: not a valid snapshot".into()),
            }
        }
        _ => {
            print_help();
            Err(format!("unknown command: {command}").into())
        }
    }
}

fn read_only_store(data_dir: &PathBuf) -> Result<Store, Box<dyn std::error::Error>> {
    let persisted = SnapshotStore::open(data_dir)?;
    Ok(Store::new(persisted.load(), Box::new(NullSink)))
}

/// `--data-dir PATH` can appear anywhere; it is stripped before command
/// parsing. Defaults to the platform data directory.
fn take_data_dir(args: &mut Vec<String>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(i) = args.iter().position(|a| a == "--data-dir") {
        let Some(value) = args.get(i + 1).cloned() else {
            return Err("--data-dir requires a path".into());
        };
        args.drain(i..=i + 1);
        return Ok(PathBuf::from(value));
    }
    Ok(dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("devboard"))
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1).cloned())
}

fn print_help() {
    println!(
        "devboard {}

USAGE:
    devboard [--data-dir PATH] <COMMAND>

COMMANDS:
    chat                       interactive assistant session
    projects                   list projects
    tasks [--project ID]       list tasks, optionally for one project
    export [--project ID [--format md|prompt|technical]]
                               print the snapshot as JSON, or one project
                               as a context document
    import <FILE>              replace the snapshot from an exported file
    help                       show this message
    version                    show the version",
        env!("CARGO_PKG_VERSION")
    );
}
