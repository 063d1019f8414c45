use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: String,
    pub due_date: String,
    #[serde(default)]
    pub description: String,
    pub created_at: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub reminder: Option<String>,
}

impl Task {
    /// Two snapshots refer to the same stored task when they share a
    /// creation timestamp, which never changes after `add`.
    pub fn same_instance(&self, other: &Task) -> bool {
        self.created_at == other.created_at
    }
}

/// Fields supplied when adding a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub category: String,
    pub priority: String,
    pub due_date: String,
    pub description: String,
}

/// Partial update for `edit`. Missing or blank fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub description: Option<String>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        [
            &self.title,
            &self.category,
            &self.priority,
            &self.due_date,
            &self.description,
        ]
        .into_iter()
        .all(|field| provided(field).is_none())
    }
}

pub(crate) fn provided(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Priority,
    DueDate,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::DueDate => "due_date",
        }
    }
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "priority" => Ok(Self::Priority),
            "due_date" | "due-date" | "due" => Ok(Self::DueDate),
            other => Err(AppError::invalid_input(format!(
                "unknown sort key '{other}' (expected priority or due_date)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

#[cfg(test)]
mod tests {
    use super::{SortKey, TaskUpdate};

    #[test]
    fn sort_key_accepts_aliases() {
        assert_eq!("priority".parse::<SortKey>().unwrap(), SortKey::Priority);
        assert_eq!(" Due-Date ".parse::<SortKey>().unwrap(), SortKey::DueDate);
        assert_eq!("due".parse::<SortKey>().unwrap(), SortKey::DueDate);
    }

    #[test]
    fn sort_key_rejects_unknown_values() {
        let err = "severity".parse::<SortKey>().unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn update_with_only_blank_fields_is_empty() {
        let update = TaskUpdate {
            title: Some("  ".into()),
            description: Some(String::new()),
            ..TaskUpdate::default()
        };
        assert!(update.is_empty());

        let update = TaskUpdate {
            priority: Some("high".into()),
            ..TaskUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
