use crate::error::AppError;
use crate::model::Task;
use crate::notify::{AlertKind, Notifier, alert_text};
use notify_rust::{Notification, Urgency};

pub struct LinuxNotifier;

impl Notifier for LinuxNotifier {
    fn notify(&self, task: &Task, kind: AlertKind) -> Result<(), AppError> {
        let urgency = match kind {
            AlertKind::Reminder => Urgency::Normal,
            AlertKind::Deadline => Urgency::Critical,
        };

        Notification::new()
            .summary(&format!("taskmgr {}", kind.label()))
            .body(&alert_text(task, kind))
            .urgency(urgency)
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }
}
