use tabled::settings::Style;
use tabled::{Table, Tabled};
use taskmgr_core::config::Palette;
use taskmgr_core::model::Task;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Due Date")]
    due_date: String,
    #[tabled(rename = "Done")]
    done: &'static str,
    #[tabled(rename = "Reminder")]
    reminder: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl TaskRow {
    fn from_task(task: &Task, palette: &Palette) -> Self {
        Self {
            title: palette.accentize(&task.title),
            category: task.category.clone(),
            priority: task.priority.clone(),
            due_date: task.due_date.clone(),
            done: if task.completed { "yes" } else { "no" },
            reminder: task.reminder.clone().unwrap_or_else(|| "-".to_string()),
            description: palette.mutedize(&task.description),
        }
    }
}

pub fn task_table<'a>(tasks: impl IntoIterator<Item = &'a Task>, palette: &Palette) -> String {
    let rows: Vec<TaskRow> = tasks
        .into_iter()
        .map(|task| TaskRow::from_task(task, palette))
        .collect();
    Table::new(rows).with(Style::psql()).to_string()
}

pub fn tasks_json<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> serde_json::Value {
    serde_json::Value::Array(
        tasks
            .into_iter()
            .map(|task| serde_json::json!(task))
            .collect(),
    )
}

pub fn task_json(task: &Task) -> serde_json::Value {
    serde_json::json!(task)
}

#[cfg(test)]
mod tests {
    use super::{task_table, tasks_json};
    use taskmgr_core::config::palette_for_theme;
    use taskmgr_core::model::Task;

    fn task(title: &str, completed: bool) -> Task {
        Task {
            title: title.to_string(),
            category: "Home".to_string(),
            priority: "low".to_string(),
            due_date: "2025-01-01".to_string(),
            description: "with care".to_string(),
            created_at: "2024-12-01T00:00:00Z".to_string(),
            completed,
            reminder: None,
        }
    }

    #[test]
    fn table_has_header_and_one_line_per_task() {
        let tasks = [task("Clean Desk", false), task("Water plants", true)];
        let table = task_table(&tasks, &palette_for_theme(None));

        assert!(table.contains("Title"));
        assert!(table.contains("Due Date"));
        assert!(table.contains("Clean Desk"));
        assert!(table.contains("Water plants"));
        assert!(table.contains("yes"));
        assert!(!table.contains('\x1b'));
    }

    #[test]
    fn table_colors_titles_with_theme() {
        let tasks = [task("Clean Desk", false)];
        let table = task_table(&tasks, &palette_for_theme(Some("noir")));

        assert!(table.contains("\x1b[38;5;208mClean Desk\x1b[0m"));
    }

    #[test]
    fn json_lists_full_records() {
        let tasks = [task("Clean Desk", false)];
        let value = tasks_json(&tasks);

        assert_eq!(value[0]["title"], "Clean Desk");
        assert_eq!(value[0]["completed"], false);
        assert!(value[0]["reminder"].is_null());
    }
}
