pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod storage;
pub mod store;

pub use error::AppError;
pub use store::TaskStore;
