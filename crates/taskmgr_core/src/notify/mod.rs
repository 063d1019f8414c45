use crate::error::AppError;
use crate::model::Task;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::LinuxNotifier;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WindowsNotifier;

pub const DISABLE_ENV_VAR: &str = "TASKMGR_DISABLE_NOTIFICATIONS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Reminder,
    Deadline,
}

impl AlertKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Reminder => "reminder",
            Self::Deadline => "deadline",
        }
    }
}

/// Body line shown for an alert, shared by every backend.
pub fn alert_text(task: &Task, kind: AlertKind) -> String {
    match kind {
        AlertKind::Reminder => format!(
            "Reminder for '{}': {}",
            task.title,
            task.reminder.as_deref().unwrap_or("-")
        ),
        AlertKind::Deadline => format!("'{}' is due soon: {}", task.title, task.due_date),
    }
}

pub trait Notifier {
    fn notify(&self, task: &Task, kind: AlertKind) -> Result<(), AppError>;
}

pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _task: &Task, _kind: AlertKind) -> Result<(), AppError> {
        Ok(())
    }
}

pub fn notifier_from_env() -> Result<Box<dyn Notifier>, AppError> {
    if std::env::var(DISABLE_ENV_VAR).is_ok() {
        return Ok(Box::new(NoopNotifier));
    }

    match platform_notifier() {
        Ok(notifier) => Ok(notifier),
        Err(err) => match err {
            AppError::InvalidData(_) => {
                tracing::debug!(error = %err, "falling back to no-op notifier");
                Ok(Box::new(NoopNotifier))
            }
            other => Err(other),
        },
    }
}

#[cfg(target_os = "linux")]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(LinuxNotifier))
}

#[cfg(windows)]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(WindowsNotifier))
}

#[cfg(not(any(target_os = "linux", windows)))]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Err(AppError::invalid_data(
        "notifications are not supported on this platform",
    ))
}
