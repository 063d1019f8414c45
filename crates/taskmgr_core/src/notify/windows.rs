use crate::error::AppError;
use crate::model::Task;
use crate::notify::{AlertKind, Notifier, alert_text};
use tauri_winrt_notification::Toast;

pub struct WindowsNotifier;

impl Notifier for WindowsNotifier {
    fn notify(&self, task: &Task, kind: AlertKind) -> Result<(), AppError> {
        let detail = if task.category.is_empty() {
            task.priority.clone()
        } else {
            format!("{} / {}", task.category, task.priority)
        };

        Toast::new(Toast::POWERSHELL_APP_ID)
            .title(&format!("taskmgr {}", kind.label()))
            .text1(&alert_text(task, kind))
            .text2(&detail)
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }
}
