use clap::{Parser, Subcommand};
use taskmgr_core::config::{ConfigOverrides, canonicalize_key};

#[derive(Parser, Debug)]
#[command(author, version, about = "Personal task tracker", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: taskmgr add "Buy milk" --due 2025-01-01 --category Errands --priority low
    Add {
        title: Option<String>,
        #[arg(long = "due", value_name = "YYYY-MM-DD")]
        due_date: String,
        #[arg(short, long, default_value = "")]
        category: String,
        #[arg(short, long, default_value = "")]
        priority: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Remove the first task with the given title
    ///
    /// Example: taskmgr remove "Buy milk"
    Remove { title: String },
    /// Edit a task; only the given fields change
    ///
    /// Example: taskmgr edit "Buy milk" --title "Buy oat milk" --priority high
    Edit {
        title: String,
        #[arg(long = "title", value_name = "NEW_TITLE")]
        new_title: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        priority: Option<String>,
        #[arg(long = "due", value_name = "YYYY-MM-DD")]
        due_date: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List all tasks
    ///
    /// Example: taskmgr list
    List,
    /// Mark a task as completed
    ///
    /// Example: taskmgr done "Buy milk"
    Done { title: String },
    /// Delete every completed task
    ///
    /// Example: taskmgr clear-completed
    ClearCompleted,
    /// Export tasks as CSV
    ///
    /// Example: taskmgr export
    /// Example: taskmgr export reports/tasks.csv
    Export { path: Option<String> },
    /// Show task counts
    ///
    /// Example: taskmgr stats
    Stats,
    /// Search titles and categories
    ///
    /// Example: taskmgr search desk
    Search { keyword: String },
    /// Set a reminder for a task
    ///
    /// Example: taskmgr remind "Buy milk" "2024-12-31 18:30:00"
    Remind {
        title: String,
        #[arg(value_name = "YYYY-MM-DD HH:MM:SS")]
        at: String,
    },
    /// Show tasks whose reminder time has passed
    ///
    /// Example: taskmgr reminders
    Reminders,
    /// Sort the stored tasks
    ///
    /// Example: taskmgr sort priority
    /// Example: taskmgr sort due_date
    Sort {
        #[arg(default_value = "priority")]
        by: String,
    },
    /// Filter tasks by completion
    ///
    /// Example: taskmgr filter --completed
    /// Example: taskmgr filter --pending
    Filter {
        #[arg(long, conflicts_with = "pending")]
        completed: bool,
        #[arg(long)]
        pending: bool,
    },
    /// Undo the last add, remove, edit or completion of this session
    ///
    /// Example: taskmgr undo
    Undo,
    /// Show tasks due within a day
    ///
    /// Example: taskmgr deadlines
    Deadlines,
    /// Send desktop notifications for due reminders and deadlines
    ///
    /// Example: taskmgr notify
    Notify,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    StorePath,
    ExportPath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let key = canonicalize_key(key_raw);
    let target = match key.as_str() {
        "" => return Err("override key cannot be empty".to_string()),
        "theme" => ConfigOverrideTarget::Theme,
        "store_path" | "store" => ConfigOverrideTarget::StorePath,
        "export_path" | "export" => ConfigOverrideTarget::ExportPath,
        other => return Err(format!("unknown config field '{other}'")),
    };

    if value.is_empty() {
        return Err(format!("override for '{key}' needs a value"));
    }

    Ok(ParsedConfigOverride { target, value })
}

pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::StorePath => overrides.store_path = Some(parsed.value),
            ConfigOverrideTarget::ExportPath => overrides.export_path = Some(parsed.value),
        }
    }
    Ok(overrides)
}
