mod history;
pub(crate) mod task;

pub use history::HistoryEntry;
pub use task::{NewTask, SortKey, Statistics, Task, TaskUpdate};
