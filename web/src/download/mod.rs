pub mod bundle;
pub mod command;
pub mod manager;
pub mod runner;
pub mod types;

pub use manager::DownloadManager;
pub use runner::ToolRunner;
pub use types::*;
