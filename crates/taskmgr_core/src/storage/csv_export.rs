use crate::error::AppError;
use crate::model::Task;
use std::path::Path;

pub const CSV_HEADER: [&str; 6] = [
    "Title",
    "Category",
    "Priority",
    "Due Date",
    "Completed",
    "Description",
];

pub fn render_csv(tasks: &[Task]) -> String {
    let mut out = String::new();
    push_row(&mut out, CSV_HEADER);

    for task in tasks {
        let completed = if task.completed { "true" } else { "false" };
        push_row(
            &mut out,
            [
                task.title.as_str(),
                task.category.as_str(),
                task.priority.as_str(),
                task.due_date.as_str(),
                completed,
                task.description.as_str(),
            ],
        );
    }

    out
}

pub fn write_csv(path: &Path, tasks: &[Task]) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    std::fs::write(path, render_csv(tasks))
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    tracing::debug!(path = %path.display(), count = tasks.len(), "exported tasks");
    Ok(())
}

fn push_row<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (index, field) in fields.into_iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push_str("\r\n");
}

fn push_field(out: &mut String, field: &str) {
    let needs_quotes = field
        .chars()
        .any(|ch| matches!(ch, ',' | '"' | '\n' | '\r'));
    if !needs_quotes {
        out.push_str(field);
        return;
    }

    out.push('"');
    for ch in field.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::render_csv;
    use crate::model::Task;

    fn task(title: &str, description: &str, completed: bool) -> Task {
        Task {
            title: title.to_string(),
            category: "Home".to_string(),
            priority: "high".to_string(),
            due_date: "2025-03-01".to_string(),
            description: description.to_string(),
            created_at: "2025-02-01T00:00:00Z".to_string(),
            completed,
            reminder: None,
        }
    }

    #[test]
    fn header_comes_first_in_fixed_order() {
        let csv = render_csv(&[]);
        assert_eq!(csv, "Title,Category,Priority,Due Date,Completed,Description\r\n");
    }

    #[test]
    fn rows_follow_header_column_order() {
        let csv = render_csv(&[task("Clean Desk", "", true)]);
        let rows: Vec<&str> = csv.split("\r\n").collect();

        assert_eq!(rows[1], "Clean Desk,Home,high,2025-03-01,true,");
    }

    #[test]
    fn quotes_fields_with_separators_and_quotes() {
        let csv = render_csv(&[task("Pack, ship", "say \"hi\"", false)]);
        let rows: Vec<&str> = csv.split("\r\n").collect();

        assert_eq!(
            rows[1],
            "\"Pack, ship\",Home,high,2025-03-01,false,\"say \"\"hi\"\"\""
        );
    }
}
