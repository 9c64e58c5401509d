pub mod file_registry;
pub mod upload_manager;

pub use file_registry::FileRegistry;
pub use upload_manager::{App, ProcessingStats};
