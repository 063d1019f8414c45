use crate::error::AppError;
use crate::model::Task;
use std::path::{Path, PathBuf};

const STORE_FILE_NAME: &str = "tasks.json";
pub const STORE_ENV_VAR: &str = "TASKMGR_STORE_PATH";

/// Resolves where tasks live: the env var wins, then a configured path,
/// then the per-user default.
pub fn store_path(configured: Option<&str>) -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if let Some(path) = configured
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path.trim()));
    }

    Ok(crate::config::app_dir()?.join(STORE_FILE_NAME))
}

pub fn load_tasks(path: &Path) -> Result<Vec<Task>, AppError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path).map_err(|err| AppError::io(err.to_string()))?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(&content).map_err(|err| AppError::invalid_data(err.to_string()))
}

/// Same as [`load_tasks`], but a missing or damaged file yields an empty list.
pub fn load_tasks_or_empty(path: &Path) -> Vec<Task> {
    match load_tasks(path) {
        Ok(tasks) => {
            tracing::debug!(path = %path.display(), count = tasks.len(), "loaded tasks");
            tasks
        }
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "task file unreadable, starting with an empty list"
            );
            Vec::new()
        }
    }
}

pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let content =
        serde_json::to_string_pretty(tasks).map_err(|err| AppError::invalid_data(err.to_string()))?;
    std::fs::write(path, content).map_err(|err| AppError::io(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions).map_err(|err| AppError::io(err.to_string()))?;
    }

    tracing::debug!(path = %path.display(), count = tasks.len(), "saved tasks");
    Ok(())
}
