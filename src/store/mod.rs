pub mod storage;
pub mod types;

pub use storage::{get_data_path, RecordStore};
pub use types::{ScoreTable, StudentRecord, Subject, SCHEMA};
