// Flat storage backend shared by every session

pub mod error;
pub mod storage;

pub use error::StorageError;
pub use storage::{FileStat, Storage};
