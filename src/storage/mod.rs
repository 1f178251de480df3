// storage/mod.rs
// Persistence of the analysis log

pub mod migrations;
pub mod models;
pub mod pool;
pub mod store;

// Re-export commonly used items
pub use migrations::run_migrations;
pub use models::{findings_to_text, AnalysisLogEntry, NewLogEntry};
pub use pool::init_db_pool_with_path;
pub use store::{LogStore, SqliteLogStore};
