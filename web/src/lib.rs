pub mod api;
pub mod config;
pub mod download;
pub mod error;
pub mod storage;

pub use config::Config;
pub use error::{AppError, Result};
