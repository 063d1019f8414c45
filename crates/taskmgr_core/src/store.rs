use crate::error::AppError;
use crate::model::task::provided;
use crate::model::{HistoryEntry, NewTask, SortKey, Statistics, Task, TaskUpdate};
use crate::notify::{AlertKind, Notifier};
use crate::storage::{csv_export, json_store};
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

#[derive(Debug)]
pub struct NotificationOutcome {
    pub sent: Vec<(Task, AlertKind)>,
    pub failures: Vec<NotificationFailure>,
}

#[derive(Debug)]
pub struct NotificationFailure {
    pub title: String,
    pub kind: AlertKind,
    pub error: AppError,
}

/// Owns the task list, its backing file and the undo history.
///
/// Every mutating call writes the whole list back to disk before returning.
/// Title lookups always act on the first task with an exactly matching title.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
    history: Vec<HistoryEntry>,
}

impl TaskStore {
    /// Opens the store at `path`. A missing or damaged file gives an empty list.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let tasks = json_store::load_tasks_or_empty(&path);
        Self {
            path,
            tasks,
            history: Vec::new(),
        }
    }

    pub fn open_default(configured: Option<&str>) -> Result<Self, AppError> {
        let path = json_store::store_path(configured)?;
        Ok(Self::open(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn add(&mut self, new_task: NewTask) -> Result<Task, AppError> {
        let title = new_task.title.trim();
        if title.is_empty() {
            return Err(AppError::invalid_input("title is required"));
        }
        let due_date = validate_due_date(&new_task.due_date)?;

        let task = Task {
            title: title.to_string(),
            category: new_task.category.trim().to_string(),
            priority: new_task.priority.trim().to_string(),
            due_date,
            description: new_task.description.trim().to_string(),
            created_at: self.fresh_created_at()?,
            completed: false,
            reminder: None,
        };

        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.commit(next)?;
        self.history.push(HistoryEntry::Add(task.clone()));
        tracing::info!(title = %task.title, "task added");

        Ok(task)
    }

    pub fn remove(&mut self, title: &str) -> Result<Task, AppError> {
        let index = self.position(title)?;
        let mut next = self.tasks.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        self.history.push(HistoryEntry::Remove(removed.clone()));
        tracing::info!(title = %removed.title, "task removed");

        Ok(removed)
    }

    pub fn edit(&mut self, title: &str, update: &TaskUpdate) -> Result<Task, AppError> {
        let due_date = provided(&update.due_date)
            .map(validate_due_date)
            .transpose()?;

        let index = self.position(title)?;
        let before = self.tasks[index].clone();
        let mut task = before.clone();

        if let Some(value) = provided(&update.title) {
            task.title = value.to_string();
        }
        if let Some(value) = provided(&update.category) {
            task.category = value.to_string();
        }
        if let Some(value) = provided(&update.priority) {
            task.priority = value.to_string();
        }
        if let Some(value) = due_date {
            task.due_date = value;
        }
        if let Some(value) = provided(&update.description) {
            task.description = value.to_string();
        }

        let mut next = self.tasks.clone();
        next[index] = task.clone();
        self.commit(next)?;
        self.history.push(HistoryEntry::Edit {
            before,
            after: task.clone(),
        });
        tracing::info!(title = %task.title, "task edited");

        Ok(task)
    }

    pub fn mark_completed(&mut self, title: &str) -> Result<Task, AppError> {
        let index = self.position(title)?;
        let mut next = self.tasks.clone();
        next[index].completed = true;
        let task = next[index].clone();
        self.commit(next)?;
        self.history.push(HistoryEntry::MarkCompleted(task.clone()));
        tracing::info!(title = %task.title, "task completed");

        Ok(task)
    }

    /// Sets the reminder timestamp (`YYYY-MM-DD HH:MM:SS`, local time).
    /// Not recorded in the undo history.
    pub fn set_reminder(&mut self, title: &str, reminder: &str) -> Result<Task, AppError> {
        let reminder = reminder.trim();
        parse_reminder(reminder)
            .ok_or_else(|| AppError::invalid_input("reminder must be YYYY-MM-DD HH:MM:SS"))?;

        let index = self.position(title)?;
        let mut next = self.tasks.clone();
        next[index].reminder = Some(reminder.to_string());
        let task = next[index].clone();
        self.commit(next)?;

        Ok(task)
    }

    /// Reverts the most recent add, remove, edit or completion.
    /// The entry stays on the history when the write fails.
    pub fn undo(&mut self) -> Result<HistoryEntry, AppError> {
        let entry = self.history.last().cloned().ok_or(AppError::NothingToUndo)?;
        let mut next = self.tasks.clone();

        match &entry {
            HistoryEntry::Add(added) => {
                match next.iter().position(|task| task.same_instance(added)) {
                    Some(index) => {
                        next.remove(index);
                    }
                    None => tracing::warn!(title = %added.title, "added task no longer present"),
                }
            }
            HistoryEntry::Remove(removed) => next.push(removed.clone()),
            HistoryEntry::Edit { before, after } => {
                for task in next.iter_mut().filter(|task| task.same_instance(after)) {
                    *task = before.clone();
                }
            }
            HistoryEntry::MarkCompleted(completed) => {
                match next.iter_mut().find(|task| task.same_instance(completed)) {
                    Some(task) => task.completed = false,
                    None => {
                        tracing::warn!(title = %completed.title, "completed task no longer present")
                    }
                }
            }
        }

        self.commit(next)?;
        self.history.pop();
        tracing::info!(action = entry.label(), title = entry.title(), "undone");

        Ok(entry)
    }

    /// Case-insensitive substring match on title or category.
    pub fn search(&self, keyword: &str) -> Vec<&Task> {
        let needle = keyword.to_lowercase();
        self.tasks
            .iter()
            .filter(|task| {
                task.title.to_lowercase().contains(&needle)
                    || task.category.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn filter(&self, completed: Option<bool>) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| completed.is_none_or(|wanted| task.completed == wanted))
            .collect()
    }

    /// Reorders the stored list by the raw label, then persists the new order.
    pub fn sort(&mut self, key: SortKey) -> Result<(), AppError> {
        let mut next = self.tasks.clone();
        match key {
            SortKey::Priority => next.sort_by(|a, b| a.priority.cmp(&b.priority)),
            SortKey::DueDate => next.sort_by(|a, b| a.due_date.cmp(&b.due_date)),
        }
        self.commit(next)
    }

    /// Drops every completed task. Not undoable.
    pub fn clear_completed(&mut self) -> Result<usize, AppError> {
        let next: Vec<Task> = self
            .tasks
            .iter()
            .filter(|task| !task.completed)
            .cloned()
            .collect();
        let removed = self.tasks.len() - next.len();
        self.commit(next)?;
        tracing::info!(removed, "cleared completed tasks");

        Ok(removed)
    }

    pub fn check_reminders(&self) -> Vec<&Task> {
        self.check_reminders_at(OffsetDateTime::now_utc())
    }

    pub fn check_reminders_at(&self, now: OffsetDateTime) -> Vec<&Task> {
        reminders_due(&self.tasks, now, local_offset())
    }

    pub fn deadline_alerts(&self) -> Vec<&Task> {
        self.deadline_alerts_at(OffsetDateTime::now_utc())
    }

    pub fn deadline_alerts_at(&self, now: OffsetDateTime) -> Vec<&Task> {
        deadlines_near(&self.tasks, now, local_offset())
    }

    pub fn export_csv(&self, path: &Path) -> Result<(), AppError> {
        csv_export::write_csv(path, &self.tasks)
    }

    pub fn statistics(&self) -> Statistics {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|task| task.completed).count();
        Statistics {
            total,
            completed,
            pending: total - completed,
        }
    }

    /// Delivers one notification per due reminder and per near deadline
    /// among pending tasks. Delivery failures are collected, not returned.
    pub fn notify_due(&self, notifier: &dyn Notifier) -> NotificationOutcome {
        self.notify_due_at(notifier, OffsetDateTime::now_utc())
    }

    pub fn notify_due_at(
        &self,
        notifier: &dyn Notifier,
        now: OffsetDateTime,
    ) -> NotificationOutcome {
        let offset = local_offset();
        let alerts = reminders_due(&self.tasks, now, offset)
            .into_iter()
            .map(|task| (task, AlertKind::Reminder))
            .chain(
                deadlines_near(&self.tasks, now, offset)
                    .into_iter()
                    .map(|task| (task, AlertKind::Deadline)),
            )
            .filter(|(task, _)| !task.completed);

        let mut sent = Vec::new();
        let mut failures = Vec::new();
        for (task, kind) in alerts {
            match notifier.notify(task, kind) {
                Ok(()) => sent.push((task.clone(), kind)),
                Err(error) => failures.push(NotificationFailure {
                    title: task.title.clone(),
                    kind,
                    error,
                }),
            }
        }

        NotificationOutcome { sent, failures }
    }

    fn position(&self, title: &str) -> Result<usize, AppError> {
        self.tasks
            .iter()
            .position(|task| task.title == title)
            .ok_or_else(|| AppError::not_found(title))
    }

    /// Writes `next` to disk and only then replaces the in-memory list.
    fn commit(&mut self, next: Vec<Task>) -> Result<(), AppError> {
        json_store::save_tasks(&self.path, &next)?;
        self.tasks = next;
        Ok(())
    }

    fn fresh_created_at(&self) -> Result<String, AppError> {
        let mut now = OffsetDateTime::now_utc();
        loop {
            let stamp = now
                .format(&Rfc3339)
                .map_err(|err| AppError::invalid_data(err.to_string()))?;
            if !self.tasks.iter().any(|task| task.created_at == stamp) {
                return Ok(stamp);
            }
            now += Duration::nanoseconds(1);
        }
    }
}

fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

fn validate_due_date(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    parse_due_date(trimmed)
        .map(|_| trimmed.to_string())
        .ok_or_else(|| AppError::invalid_input("due date must be YYYY-MM-DD"))
}

fn parse_due_date(raw: &str) -> Option<Date> {
    Date::parse(raw, format_description!("[year]-[month]-[day]")).ok()
}

fn parse_reminder(raw: &str) -> Option<PrimitiveDateTime> {
    PrimitiveDateTime::parse(
        raw,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    )
    .ok()
}

fn reminders_due(tasks: &[Task], now: OffsetDateTime, offset: UtcOffset) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| {
            let Some(raw) = task.reminder.as_deref() else {
                return false;
            };
            match parse_reminder(raw) {
                Some(at) => at.assume_offset(offset) <= now,
                None => {
                    tracing::warn!(title = %task.title, reminder = raw, "skipping bad reminder");
                    false
                }
            }
        })
        .collect()
}

fn deadlines_near(tasks: &[Task], now: OffsetDateTime, offset: UtcOffset) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| match parse_due_date(task.due_date.trim()) {
            Some(date) => date.midnight().assume_offset(offset) - now <= Duration::days(1),
            None => {
                tracing::warn!(
                    title = %task.title,
                    due_date = %task.due_date,
                    "skipping unparsable due date"
                );
                false
            }
        })
        .collect()
}
