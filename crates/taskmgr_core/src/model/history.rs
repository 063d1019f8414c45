use crate::model::Task;

/// One reversible mutation, recorded so `undo` can apply its inverse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEntry {
    Add(Task),
    Remove(Task),
    Edit { before: Task, after: Task },
    MarkCompleted(Task),
}

impl HistoryEntry {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Remove(_) => "remove",
            Self::Edit { .. } => "edit",
            Self::MarkCompleted(_) => "mark_completed",
        }
    }

    /// Title of the task the entry refers to, as it was before the change.
    pub fn title(&self) -> &str {
        match self {
            Self::Add(task) | Self::Remove(task) | Self::MarkCompleted(task) => &task.title,
            Self::Edit { before, .. } => &before.title,
        }
    }
}
