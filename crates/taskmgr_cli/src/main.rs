use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use std::path::PathBuf;
use taskmgr_cli::cli::{Cli, Command, collect_overrides};
use taskmgr_cli::render::{task_json, task_table, tasks_json};
use taskmgr_core::config::{self, Config, Palette, palette_for_theme};
use taskmgr_core::error::AppError;
use taskmgr_core::model::{NewTask, SortKey, Task, TaskUpdate};
use taskmgr_core::notify::{AlertKind, alert_text, notifier_from_env};
use taskmgr_core::store::TaskStore;
use tracing_subscriber::EnvFilter;

/// One open store plus the configuration it was opened with.
struct Session {
    store: TaskStore,
    config: Config,
}

impl Session {
    fn open(config: Config) -> Result<Self, AppError> {
        let store = TaskStore::open_default(config.store_path.as_deref())?;
        tracing::debug!(path = %store.path().display(), "opened task store");
        Ok(Self { store, config })
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("TASKMGR_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn base_config() -> Config {
    let loaded = config::load_config_with_fallback();
    if let Some(err) = loaded.error {
        tracing::warn!(error = %err, "ignoring configuration file");
    }
    loaded.config
}

fn effective_config(base: &Config, cli: &Cli) -> Result<Config, AppError> {
    let overrides = collect_overrides(&cli.config_override).map_err(AppError::invalid_input)?;
    Ok(config::merge_overrides(base, &overrides))
}

fn print_tasks(tasks: &[&Task], json: bool, palette: &Palette, empty_message: &str) {
    if json {
        println!("{}", tasks_json(tasks.iter().copied()));
    } else if tasks.is_empty() {
        println!("{empty_message}");
    } else {
        println!("{}", task_table(tasks.iter().copied(), palette));
    }
}

fn print_task(json: bool, task: &Task, message: &str) {
    if json {
        println!("{}", task_json(task));
    } else {
        println!("{message}");
    }
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn is_help_request(err: &clap::Error) -> bool {
    matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            quoted = true;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() || quoted {
                args.push(std::mem::take(&mut current));
                quoted = false;
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() || quoted {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_command(session: &mut Session, cli: Cli) -> Result<(), AppError> {
    let config = effective_config(&session.config, &cli)?;
    let palette = palette_for_theme(config.theme.as_deref());
    let store = &mut session.store;

    match cli.command {
        Command::Add {
            title,
            due_date,
            category,
            priority,
            description,
        } => {
            let title = match title {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(AppError::invalid_input("title is required")),
            };

            let task = store.add(NewTask {
                title,
                category,
                priority,
                due_date,
                description,
            })?;
            print_task(
                cli.json,
                &task,
                &format!("Added task: {} (due {})", palette.accentize(&task.title), task.due_date),
            );
        }
        Command::Remove { title } => {
            let task = store.remove(&title)?;
            print_task(cli.json, &task, &format!("Removed task: {}", task.title));
        }
        Command::Edit {
            title,
            new_title,
            category,
            priority,
            due_date,
            description,
        } => {
            let update = TaskUpdate {
                title: new_title,
                category,
                priority,
                due_date,
                description,
            };
            if update.is_empty() {
                return Err(AppError::invalid_input("nothing to change"));
            }
            let task = store.edit(&title, &update)?;
            print_task(cli.json, &task, &format!("Updated task: {}", task.title));
        }
        Command::List => {
            let tasks: Vec<&Task> = store.list().iter().collect();
            print_tasks(&tasks, cli.json, &palette, "No tasks.");
        }
        Command::Done { title } => {
            let task = store.mark_completed(&title)?;
            print_task(cli.json, &task, &format!("Completed task: {}", task.title));
        }
        Command::ClearCompleted => {
            let removed = store.clear_completed()?;
            if cli.json {
                println!("{}", serde_json::json!({ "removed": removed }));
            } else {
                println!("Cleared {removed} completed task(s).");
            }
        }
        Command::Export { path } => {
            let path = path.map(PathBuf::from).unwrap_or_else(|| config.export_path());
            store.export_csv(&path)?;
            let count = store.list().len();
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({ "path": path.display().to_string(), "exported": count })
                );
            } else {
                println!("Exported {count} task(s) to {}", path.display());
            }
        }
        Command::Stats => {
            let stats = store.statistics();
            if cli.json {
                println!("{}", serde_json::json!(stats));
            } else {
                println!(
                    "Total: {}\nCompleted: {}\nPending: {}",
                    stats.total, stats.completed, stats.pending
                );
            }
        }
        Command::Search { keyword } => {
            let tasks = store.search(&keyword);
            print_tasks(&tasks, cli.json, &palette, "No matching tasks.");
        }
        Command::Remind { title, at } => {
            let task = store.set_reminder(&title, &at)?;
            let reminder = task.reminder.as_deref().unwrap_or("-");
            print_task(
                cli.json,
                &task,
                &format!("Reminder set for '{}' at {}", task.title, reminder),
            );
        }
        Command::Reminders => {
            let due = store.check_reminders();
            if cli.json {
                println!("{}", tasks_json(due.iter().copied()));
            } else if due.is_empty() {
                println!("No reminders due.");
            } else {
                for task in due {
                    println!("{}", alert_text(task, AlertKind::Reminder));
                }
            }
        }
        Command::Sort { by } => {
            let key: SortKey = by.parse()?;
            store.sort(key)?;
            if cli.json {
                println!("{}", tasks_json(store.list()));
            } else {
                println!("Sorted tasks by {}.", key.label());
            }
        }
        Command::Filter { completed, pending } => {
            let wanted = match (completed, pending) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let tasks = store.filter(wanted);
            print_tasks(&tasks, cli.json, &palette, "No tasks.");
        }
        Command::Undo => match store.undo() {
            Ok(entry) => {
                if cli.json {
                    println!(
                        "{}",
                        serde_json::json!({ "undone": entry.label(), "title": entry.title() })
                    );
                } else {
                    println!("Undid {} of '{}'.", entry.label(), entry.title());
                }
            }
            Err(AppError::NothingToUndo) => {
                if cli.json {
                    println!("{}", serde_json::json!({ "undone": null }));
                } else {
                    println!("Nothing to undo.");
                }
            }
            Err(err) => return Err(err),
        },
        Command::Deadlines => {
            let near = store.deadline_alerts();
            if cli.json {
                println!("{}", tasks_json(near.iter().copied()));
            } else if near.is_empty() {
                println!("No upcoming deadlines.");
            } else {
                for task in near {
                    println!("{}", alert_text(task, AlertKind::Deadline));
                }
            }
        }
        Command::Notify => {
            let notifier = notifier_from_env()?;
            let outcome = store.notify_due(notifier.as_ref());

            for failure in &outcome.failures {
                eprintln!(
                    "ERROR: {} notification for '{}' failed: {}",
                    failure.kind.label(),
                    failure.title,
                    failure.error
                );
            }

            if cli.json {
                let sent: Vec<serde_json::Value> = outcome
                    .sent
                    .iter()
                    .map(|(task, kind)| {
                        serde_json::json!({ "title": task.title, "kind": kind.label() })
                    })
                    .collect();
                println!("{}", serde_json::Value::Array(sent));
            } else if outcome.sent.is_empty() && outcome.failures.is_empty() {
                println!("Nothing to notify.");
            } else {
                for (task, kind) in &outcome.sent {
                    println!("Notified {}: {}", kind.label(), task.title);
                }
            }
        }
    }

    Ok(())
}

fn run_interactive() -> Result<(), AppError> {
    let mut session = Session::open(base_config())?;
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("taskmgr".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) if is_help_request(&err) => {
                println!("{err}");
                continue;
            }
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(&mut session, cli) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn run_once(cli: Cli) -> Result<(), AppError> {
    let config = effective_config(&base_config(), &cli)?;
    let mut session = Session::open(config)?;
    run_command(&mut session, cli)
}

fn main() {
    init_logging();

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive() {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if is_help_request(&err) {
                err.exit();
            }
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_once(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
