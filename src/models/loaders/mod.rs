pub mod file_loader;

pub use file_loader::{load_upload_file, load_upload_files};
