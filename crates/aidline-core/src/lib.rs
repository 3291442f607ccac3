pub mod config;
pub mod error;
pub mod types;

pub use config::AidlineConfig;
pub use error::{AidlineError, Result};
pub use types::*;
